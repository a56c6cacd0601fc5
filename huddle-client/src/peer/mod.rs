mod candidate_buffer;
mod peer_link;
mod peer_registry;
mod peer_state;
mod rtc_link;

pub use candidate_buffer::PendingCandidates;
pub use peer_link::{LinkEvent, LinkState, LinkTag, PeerConnector, PeerLink, RemoteStream, RemoteTrack};
pub use peer_registry::{CandidateRoute, PeerEntry, PeerRegistry, Upsert};
pub use peer_state::{NegotiationStep, PeerState};
pub use rtc_link::{RtcConnector, RtcPeerLink};
