use dashmap::DashMap;
use huddle_core::PeerId;
use std::sync::Arc;

/// Last known presence of a remote participant. `None` means nothing was
/// announced yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemotePresence {
    pub hand_raised: bool,
    pub video: Option<bool>,
    pub audio: Option<bool>,
}

/// Shared between the session task, which writes, and every handle, which
/// reads without a round trip.
#[derive(Clone, Default)]
pub(crate) struct PresenceBoard {
    peers: Arc<DashMap<PeerId, RemotePresence>>,
}

impl PresenceBoard {
    pub fn update<F>(&self, peer_id: PeerId, f: F)
    where
        F: FnOnce(&mut RemotePresence),
    {
        let mut entry = self.peers.entry(peer_id).or_default();
        f(entry.value_mut());
    }

    pub fn get(&self, peer_id: &PeerId) -> RemotePresence {
        self.peers.get(peer_id).map(|p| *p).unwrap_or_default()
    }

    pub fn video_enabled(&self, peer_id: &PeerId) -> bool {
        self.get(peer_id).video.unwrap_or(true)
    }

    pub fn audio_enabled(&self, peer_id: &PeerId) -> bool {
        self.get(peer_id).audio.unwrap_or(true)
    }

    pub fn hand_raised(&self, peer_id: &PeerId) -> bool {
        self.get(peer_id).hand_raised
    }

    pub fn remove(&self, peer_id: &PeerId) -> bool {
        self.peers.remove(peer_id).is_some()
    }

    pub fn clear(&self) {
        self.peers.clear();
    }
}
