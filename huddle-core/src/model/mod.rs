mod candidate;
mod peer;
mod room;
mod signaling;

pub use candidate::IceCandidate;
pub use peer::PeerId;
pub use room::RoomId;
pub use signaling::{ClientSignal, IceServerConfig, ServerSignal};
