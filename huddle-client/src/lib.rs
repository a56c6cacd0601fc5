//! Client-side coordinator for multi-peer WebRTC calls.
//!
//! A [`CallClient`] joins a room through a [`SignalingTransport`], negotiates
//! one [`PeerLink`] per remote participant and reports everything that happens
//! as [`SessionEvent`]s. The returned [`SessionHandle`] drives local actions
//! (mute, camera, hand-raise, leave).

mod config;
mod error;
pub mod media;
pub mod peer;
pub mod session;
pub mod signaling;

pub use config::{SessionConfig, SignalingConfig};
pub use error::{MediaError, PeerError, SessionError, SignalingError};
pub use media::{
    LocalStream, LocalTrack, MediaConstraints, MediaDevices, MediaKind, SyntheticDevices,
};
pub use peer::{
    LinkEvent, LinkState, LinkTag, NegotiationStep, PeerConnector, PeerLink, PeerState,
    RemoteStream, RemoteTrack, RtcConnector,
};
pub use session::{
    CallClient, PeerSnapshot, RemotePresence, RenegotiationReport, SessionEvent, SessionEvents,
    SessionHandle, SessionSnapshot,
};
pub use signaling::{SignalingTransport, WsSignalingTransport};

pub use huddle_core::{ClientSignal, IceCandidate, IceServerConfig, PeerId, RoomId, ServerSignal};
