use crate::error::SignalingError;
use async_trait::async_trait;
use huddle_core::{ClientSignal, ServerSignal};
use tokio::sync::mpsc;

/// Connection to the room relay.
///
/// `connect` hands out the only inbound stream, so a session registers its
/// handlers exactly once. `send` does not wait for delivery.
#[async_trait]
pub trait SignalingTransport: Send + Sync {
    async fn connect(&self) -> Result<mpsc::Receiver<ServerSignal>, SignalingError>;

    async fn send(&self, signal: ClientSignal) -> Result<(), SignalingError>;

    /// Safe to call more than once.
    async fn disconnect(&self);
}
