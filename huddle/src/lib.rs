pub use huddle_core::{PeerId, RoomId};

pub mod model {
    pub use huddle_core::model::*;
    pub use huddle_core::utils::default_ice_servers;
}

#[cfg(feature = "client")]
pub mod client {
    pub use huddle_client::*;
}
