//! Integration tests for huddle-client.
//!
//! Tests are organized by functionality:
//! - `negotiation_tests` - initiator, responder and collision paths
//! - `ice_tests` - candidate buffering and forwarding
//! - `media_tests` - local media toggles and camera restart
//! - `presence_tests` - hand-raise and remote mute state
//! - `session_tests` - join and leave lifecycle
//! - `rtc_tests` - real webrtc-rs links over an in-memory relay

pub mod negotiation_tests;
pub mod session_tests;

use std::sync::Arc;

use anyhow::{Context, Result};
use huddle_client::{
    CallClient, PeerId, PeerState, ServerSignal, SessionConfig, SessionHandle, SyntheticDevices,
};
use tracing::Level;

use crate::utils::{EventRecorder, MockConnector, MockSignaling};

/// Timeout for anything the session does in reaction to one message (ms).
pub const STEP_TIMEOUT_MS: u64 = 2000;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A joined session wired to mocks.
pub struct TestSession {
    pub handle: SessionHandle,
    pub signaling: MockSignaling,
    pub connector: Arc<MockConnector>,
    pub devices: Arc<SyntheticDevices>,
    pub events: EventRecorder,
}

pub async fn join_test_session(local_id: &str) -> Result<TestSession> {
    join_with_devices(local_id, Arc::new(SyntheticDevices::new())).await
}

pub async fn join_with_devices(local_id: &str, devices: Arc<SyntheticDevices>) -> Result<TestSession> {
    let signaling = MockSignaling::new();
    let connector = MockConnector::new();
    let (client, events) = CallClient::new(
        SessionConfig::default(),
        Arc::new(signaling.clone()),
        devices.clone(),
        connector.clone(),
    );
    let events = EventRecorder::start(events);

    let handle = client
        .join_room("room-1", local_id, format!("{local_id} name"))
        .await
        .context("join_room failed")?;

    Ok(TestSession {
        handle,
        signaling,
        connector,
        devices,
        events,
    })
}

/// Give the session time to drain signals injected so far. Commands and
/// signals arrive on separate channels, so a snapshot alone does not order
/// them.
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
}

/// Poll the session until `peer_id` reaches `state`.
pub async fn wait_for_peer_state(
    handle: &SessionHandle,
    peer_id: &PeerId,
    state: PeerState,
    timeout_ms: u64,
) -> bool {
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);

    loop {
        if let Ok(snapshot) = handle.snapshot().await
            && snapshot
                .peers
                .iter()
                .any(|p| p.peer_id == *peer_id && p.state == state)
        {
            return true;
        }
        if start.elapsed() > timeout {
            return false;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}

/// Announce `peer` and complete the initiator exchange with it.
pub async fn connect_peer(session: &TestSession, peer: &str) -> Result<PeerId> {
    let peer_id = PeerId::from(peer);
    session
        .signaling
        .inject(ServerSignal::UserConnected {
            user_id: peer_id.clone(),
            user_name: format!("{peer} name"),
        })
        .await;

    session
        .signaling
        .wait_for_offer_to(&peer_id, STEP_TIMEOUT_MS)
        .await
        .context("no offer sent")?;

    session
        .signaling
        .inject(ServerSignal::Answer {
            caller: peer_id.clone(),
            sdp: format!("answer-from-{peer}"),
            user_name: Some(format!("{peer} name")),
        })
        .await;

    anyhow::ensure!(
        wait_for_peer_state(&session.handle, &peer_id, PeerState::Connected, STEP_TIMEOUT_MS).await,
        "peer {peer} did not reach Connected"
    );
    Ok(peer_id)
}
