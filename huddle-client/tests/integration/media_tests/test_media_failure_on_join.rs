use std::sync::Arc;

use huddle_client::{
    CallClient, MediaError, MediaKind, SessionConfig, SessionError, SessionEvent, SyntheticDevices,
};

use crate::integration::init_tracing;
use crate::utils::{EventRecorder, MockConnector, MockSignaling};

#[tokio::test]
async fn test_media_failure_on_join() {
    init_tracing();

    let signaling = MockSignaling::new();
    let devices = Arc::new(SyntheticDevices::failing(MediaError::PermissionDenied(
        MediaKind::Video,
    )));
    let (client, events) = CallClient::new(
        SessionConfig::default(),
        Arc::new(signaling.clone()),
        devices,
        MockConnector::new(),
    );
    let events = EventRecorder::start(events);

    let result = client.join_room("room-1", "alice", "Alice").await;

    assert!(matches!(
        result,
        Err(SessionError::Media(MediaError::PermissionDenied(MediaKind::Video)))
    ));
    assert!(
        events
            .wait_for(1, 1000, |e| matches!(e, SessionEvent::MediaError(_)))
            .await
    );
    assert_eq!(
        events
            .count(|e| matches!(e, SessionEvent::LocalStream { .. }))
            .await,
        0
    );
    assert_eq!(signaling.connect_count(), 0);
    assert!(signaling.sent().await.is_empty());
}
