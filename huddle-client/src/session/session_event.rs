use crate::error::MediaError;
use crate::media::LocalTrack;
use crate::peer::RemoteStream;
use huddle_core::PeerId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything the session reports to the application.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Local capture is ready, or was replaced by a camera restart.
    LocalStream {
        stream_id: String,
        tracks: Vec<Arc<LocalTrack>>,
    },
    RemoteStream {
        peer_id: PeerId,
        peer_name: String,
        stream: RemoteStream,
    },
    UserConnected {
        peer_id: PeerId,
        name: String,
    },
    UserDisconnected {
        peer_id: PeerId,
        name: Option<String>,
    },
    HandRaised {
        peer_id: PeerId,
        raised: bool,
    },
    RemoteVideoState {
        peer_id: PeerId,
        enabled: bool,
    },
    RemoteAudioState {
        peer_id: PeerId,
        enabled: bool,
    },
    RoomState {
        video: HashMap<PeerId, bool>,
        audio: HashMap<PeerId, bool>,
    },
    MediaError(MediaError),
    /// Negotiation with one peer failed; the other peers are unaffected.
    PeerFailed {
        peer_id: PeerId,
        reason: String,
    },
}

pub type SessionEvents = mpsc::UnboundedReceiver<SessionEvent>;
