use crate::error::PeerError;
use crate::media::{LocalTrack, MediaKind};
use async_trait::async_trait;
use huddle_core::{IceCandidate, PeerId};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use webrtc::track::track_remote::TrackRemote;

/// Transport level connection state reported by a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

#[derive(Clone)]
pub struct RemoteTrack {
    pub id: String,
    pub stream_id: String,
    pub kind: MediaKind,
    pub rtp: Option<Arc<TrackRemote>>,
}

impl RemoteTrack {
    pub fn new(id: impl Into<String>, stream_id: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            stream_id: stream_id.into(),
            kind,
            rtp: None,
        }
    }

    pub fn with_rtp(mut self, rtp: Arc<TrackRemote>) -> Self {
        self.rtp = Some(rtp);
        self
    }
}

impl fmt::Debug for RemoteTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTrack")
            .field("id", &self.id)
            .field("stream_id", &self.stream_id)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Media received from one remote participant. Holds at most one track per kind.
#[derive(Debug, Clone)]
pub struct RemoteStream {
    pub stream_id: String,
    pub tracks: Vec<RemoteTrack>,
}

impl RemoteStream {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            tracks: Vec::new(),
        }
    }

    /// Adds `track`, replacing a previous track of the same kind.
    pub fn insert(&mut self, track: RemoteTrack) {
        self.tracks.retain(|t| t.kind != track.kind);
        self.stream_id = track.stream_id.clone();
        self.tracks.push(track);
    }

    pub fn track(&self, kind: MediaKind) -> Option<&RemoteTrack> {
        self.tracks.iter().find(|t| t.kind == kind)
    }
}

/// Events a link reports back to the session that owns it.
#[derive(Debug, Clone)]
pub enum LinkEvent {
    CandidateGenerated(LinkTag, IceCandidate),
    TrackArrived(LinkTag, RemoteTrack),
    StateChanged(LinkTag, LinkState),
}

/// Identifies the link an event came from. A peer that leaves and rejoins
/// under the same id gets a new generation, so events still queued from the
/// old link can be told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkTag {
    pub peer_id: PeerId,
    pub generation: u64,
}

impl LinkTag {
    pub fn new(peer_id: PeerId, generation: u64) -> Self {
        Self {
            peer_id,
            generation,
        }
    }
}

/// One negotiated connection to a remote participant.
///
/// `create_offer` and `create_answer` also install the result as the local
/// description and return its SDP.
#[async_trait]
pub trait PeerLink: Send + Sync {
    async fn add_track(&self, track: Arc<LocalTrack>) -> Result<(), PeerError>;

    async fn remove_track(&self, track_id: &str) -> Result<(), PeerError>;

    async fn create_offer(&self) -> Result<String, PeerError>;

    async fn create_answer(&self) -> Result<String, PeerError>;

    async fn set_remote_offer(&self, sdp: String) -> Result<(), PeerError>;

    async fn set_remote_answer(&self, sdp: String) -> Result<(), PeerError>;

    /// Discards an outstanding local offer.
    async fn rollback(&self) -> Result<(), PeerError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), PeerError>;

    async fn close(&self) -> Result<(), PeerError>;
}

/// Creates links and wires their callbacks into `events`, stamping every
/// event with `tag`.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn connect(
        &self,
        tag: LinkTag,
        events: mpsc::UnboundedSender<LinkEvent>,
    ) -> Result<Arc<dyn PeerLink>, PeerError>;
}
