mod signaling_transport;
mod ws_transport;

pub use signaling_transport::SignalingTransport;
pub use ws_transport::WsSignalingTransport;
