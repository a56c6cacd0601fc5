use crate::error::PeerError;
use crate::peer::{LinkTag, NegotiationStep, PeerLink, PeerState, PendingCandidates, RemoteStream};
use huddle_core::{IceCandidate, PeerId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct PeerEntry {
    pub peer_id: PeerId,
    pub name: String,
    pub link: Arc<dyn PeerLink>,
    /// Generation of `link`; see [`LinkTag`].
    pub generation: u64,
    pub state: PeerState,
    /// The polite side yields when both peers offer at once.
    pub polite: bool,
    pub remote_stream: Option<RemoteStream>,
    pub tracks_attached: bool,
    /// Local media changed while an offer was in flight; re-offer once stable.
    pub needs_renegotiation: bool,
}

pub enum Upsert {
    Inserted,
    /// The peer already had an open entry; the link passed in was not used
    /// and should be closed by the caller.
    Existing(Arc<dyn PeerLink>),
}

pub enum CandidateRoute {
    ApplyNow(Arc<dyn PeerLink>, IceCandidate),
    Buffered,
    Rejected,
}

/// Owns every peer entry of a session together with the candidates that
/// arrived ahead of a remote description.
///
/// A peer that leaves stays behind as a `Closed` entry, so late candidates
/// and link events for it are rejected instead of buffered. Rejoining under
/// the same id replaces that entry.
pub struct PeerRegistry {
    local_id: PeerId,
    peers: HashMap<PeerId, PeerEntry>,
    pending: PendingCandidates,
    generations: u64,
}

impl PeerRegistry {
    pub fn new(local_id: PeerId) -> Self {
        Self {
            local_id,
            peers: HashMap::new(),
            pending: PendingCandidates::default(),
            generations: 0,
        }
    }

    /// Tag for a link about to be created for `peer_id`.
    pub fn next_tag(&mut self, peer_id: &PeerId) -> LinkTag {
        self.generations += 1;
        LinkTag::new(peer_id.clone(), self.generations)
    }

    pub fn upsert(&mut self, tag: LinkTag, name: String, link: Arc<dyn PeerLink>) -> Upsert {
        let peer_id = tag.peer_id;
        if let Some(entry) = self.peers.get_mut(&peer_id)
            && !entry.state.is_closed()
        {
            entry.name = name;
            return Upsert::Existing(link);
        }

        let polite = self.local_id < peer_id;
        self.peers.insert(
            peer_id.clone(),
            PeerEntry {
                peer_id,
                name,
                link,
                generation: tag.generation,
                state: PeerState::New,
                polite,
                remote_stream: None,
                tracks_attached: false,
                needs_renegotiation: false,
            },
        );
        Upsert::Inserted
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.peers.get(peer_id).is_some_and(|e| !e.state.is_closed())
    }

    /// Whether `tag` names the open link currently registered for its peer.
    pub fn is_current(&self, tag: &LinkTag) -> bool {
        self.peers
            .get(&tag.peer_id)
            .is_some_and(|e| e.generation == tag.generation && !e.state.is_closed())
    }

    pub fn get(&self, peer_id: &PeerId) -> Option<&PeerEntry> {
        self.peers.get(peer_id)
    }

    pub fn get_mut(&mut self, peer_id: &PeerId) -> Option<&mut PeerEntry> {
        self.peers.get_mut(peer_id)
    }

    /// Moves the peer to `Closed`, keeping the entry, and hands back its
    /// link for closing. `None` when the peer is unknown or already closed.
    pub fn close(&mut self, peer_id: &PeerId) -> Option<(String, Arc<dyn PeerLink>)> {
        if !self.contains(peer_id) {
            return None;
        }
        if let Err(e) = self.advance(peer_id, NegotiationStep::Close) {
            warn!("Failed to close peer {:?}: {}", peer_id, e);
            return None;
        }
        let entry = self.peers.get_mut(peer_id)?;
        entry.remote_stream = None;
        entry.needs_renegotiation = false;
        Some((entry.name.clone(), entry.link.clone()))
    }

    /// Moves the peer to its next state. When the step installed a remote
    /// description the buffered candidates are handed back for applying.
    pub fn advance(
        &mut self,
        peer_id: &PeerId,
        step: NegotiationStep,
    ) -> Result<(PeerState, Vec<IceCandidate>), PeerError> {
        let entry = self
            .peers
            .get_mut(peer_id)
            .ok_or_else(|| PeerError::Unknown(peer_id.clone()))?;

        let Some(next) = entry.state.apply(step) else {
            return Err(PeerError::InvalidTransition {
                peer_id: peer_id.clone(),
                state: entry.state,
                step,
            });
        };
        debug!("Peer {:?}: {:?} -> {:?}", peer_id, entry.state, next);
        entry.state = next;

        let drained = match step {
            NegotiationStep::RemoteOfferApplied | NegotiationStep::RemoteAnswerApplied => {
                self.pending.take(peer_id)
            }
            NegotiationStep::Close => {
                let dropped = self.pending.discard(peer_id);
                if dropped > 0 {
                    debug!("Discarded {} buffered candidates for {:?}", dropped, peer_id);
                }
                Vec::new()
            }
            _ => Vec::new(),
        };
        Ok((next, drained))
    }

    pub fn route_candidate(&mut self, peer_id: &PeerId, candidate: IceCandidate) -> CandidateRoute {
        match self.peers.get(peer_id) {
            Some(entry) if entry.state.is_closed() => {
                warn!("Rejected candidate for closed peer {:?}", peer_id);
                CandidateRoute::Rejected
            }
            Some(entry) if entry.state.has_remote_description() => {
                CandidateRoute::ApplyNow(entry.link.clone(), candidate)
            }
            _ => {
                if self.pending.push(peer_id.clone(), candidate) {
                    CandidateRoute::Buffered
                } else {
                    warn!("Candidate buffer for {:?} is full, dropping candidate", peer_id);
                    CandidateRoute::Rejected
                }
            }
        }
    }

    pub fn pending_candidates(&self, peer_id: &PeerId) -> usize {
        self.pending.len(peer_id)
    }

    /// Links of every open peer.
    pub fn links(&self) -> Vec<(PeerId, Arc<dyn PeerLink>)> {
        self.peers
            .values()
            .filter(|e| !e.state.is_closed())
            .map(|e| (e.peer_id.clone(), e.link.clone()))
            .collect()
    }

    /// Open entries.
    pub fn entries(&self) -> impl Iterator<Item = &PeerEntry> {
        self.peers.values().filter(|e| !e.state.is_closed())
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut PeerEntry> {
        self.peers.values_mut().filter(|e| !e.state.is_closed())
    }

    /// Empties the registry and the candidate buffer.
    pub fn drain(&mut self) -> Vec<PeerEntry> {
        self.pending.clear();
        self.peers.drain().map(|(_, entry)| entry).collect()
    }

    /// Number of open peers.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
