use crate::media::MediaKind;
use crate::peer::{NegotiationStep, PeerState};
use huddle_core::PeerId;
use thiserror::Error;

/// Local capture failures. Cloneable so they can be reported through events
/// and returned to the caller at the same time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("permission to capture {0} was denied")]
    PermissionDenied(MediaKind),

    #[error("no {0} capture device found")]
    DeviceNotFound(MediaKind),

    #[error("capture failed: {0}")]
    Capture(String),
}

#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("failed to connect to signaling relay: {0}")]
    Connect(String),

    #[error("signaling transport is not connected")]
    NotConnected,

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("malformed signaling message: {0}")]
    Codec(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("webrtc error: {0}")]
    Rtc(#[from] webrtc::Error),

    #[error("invalid session description: {0}")]
    Sdp(String),

    #[error("peer {peer_id} cannot apply {step:?} while {state:?}")]
    InvalidTransition {
        peer_id: PeerId,
        state: PeerState,
        step: NegotiationStep,
    },

    #[error("peer {0} is not in the session")]
    Unknown(PeerId),

    #[error("link to peer {0} is closed")]
    Closed(PeerId),

    #[error("peer {0} has no remote description yet")]
    NoRemoteDescription(PeerId),

    #[error("cannot roll back the renegotiation offer to peer {0}")]
    RollbackUnsupported(PeerId),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Signaling(#[from] SignalingError),

    #[error(transparent)]
    Peer(#[from] PeerError),

    #[error("session has already left the room")]
    Closed,
}
