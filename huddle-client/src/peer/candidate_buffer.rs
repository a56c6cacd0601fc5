use huddle_core::{IceCandidate, PeerId};
use std::collections::{HashMap, VecDeque};

/// Candidates kept per peer before the rest are refused. A full gathering
/// round is a few dozen at most.
pub const MAX_PENDING_PER_PEER: usize = 64;

/// ICE candidates that arrived before their peer had a remote description.
/// One FIFO per peer, including peers the session has not seen yet.
#[derive(Debug, Default)]
pub struct PendingCandidates {
    queues: HashMap<PeerId, VecDeque<IceCandidate>>,
}

impl PendingCandidates {
    /// Queues `candidate`, or returns `false` when the peer's queue is full.
    pub fn push(&mut self, peer_id: PeerId, candidate: IceCandidate) -> bool {
        let queue = self.queues.entry(peer_id).or_default();
        if queue.len() >= MAX_PENDING_PER_PEER {
            return false;
        }
        queue.push_back(candidate);
        true
    }

    /// Removes and returns the peer's queue in receipt order.
    pub fn take(&mut self, peer_id: &PeerId) -> Vec<IceCandidate> {
        self.queues
            .remove(peer_id)
            .map(Vec::from)
            .unwrap_or_default()
    }

    /// Drops the peer's queue, returning how many candidates were lost.
    pub fn discard(&mut self, peer_id: &PeerId) -> usize {
        self.queues.remove(peer_id).map_or(0, |q| q.len())
    }

    pub fn len(&self, peer_id: &PeerId) -> usize {
        self.queues.get(peer_id).map_or(0, |q| q.len())
    }

    pub fn is_empty(&self) -> bool {
        self.queues.values().all(|q| q.is_empty())
    }

    pub fn clear(&mut self) {
        self.queues.clear();
    }
}
