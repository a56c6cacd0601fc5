use huddle_core::IceServerConfig;
use huddle_core::utils::default_ice_servers;

/// Session tuning. ICE servers fall back to the public STUN list when unset;
/// an explicit empty list means host candidates only.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ice_servers: Option<Vec<IceServerConfig>>,
    pub command_capacity: usize,
}

impl SessionConfig {
    pub fn ice_servers(&self) -> Vec<IceServerConfig> {
        match &self.ice_servers {
            Some(servers) => servers.clone(),
            None => default_ice_servers(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ice_servers: None,
            command_capacity: 64,
        }
    }
}

/// Relay endpoint for [`crate::WsSignalingTransport`].
#[derive(Debug, Clone)]
pub struct SignalingConfig {
    pub url: String,
    pub inbound_capacity: usize,
}

impl SignalingConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:3000/signal".to_owned(),
            inbound_capacity: 256,
        }
    }
}
