use huddle_client::{SessionError, SessionEvent};

use crate::integration::{connect_peer, init_tracing, join_test_session};

#[tokio::test]
async fn test_leave_room() {
    init_tracing();

    let session = join_test_session("alice").await.expect("join failed");
    let bob = connect_peer(&session, "bob").await.expect("bob connected");
    let carol = connect_peer(&session, "carol").await.expect("carol connected");

    let mut local_tracks = Vec::new();
    for event in session.events.events().await {
        if let SessionEvent::LocalStream { tracks, .. } = event {
            local_tracks.extend(tracks);
        }
    }
    assert_eq!(local_tracks.len(), 2);

    session.handle.leave_room().await.expect("leave failed");

    assert!(local_tracks.iter().all(|t| t.is_stopped()));
    assert_eq!(session.devices.live_audio_tracks(), 0);
    assert_eq!(session.devices.live_video_tracks(), 0);
    for peer in [&bob, &carol] {
        assert!(session.connector.link(peer).await.unwrap().is_closed().await);
    }
    assert_eq!(session.signaling.disconnect_count(), 1);

    assert!(matches!(
        session.handle.snapshot().await,
        Err(SessionError::Closed)
    ));
    assert!(matches!(
        session.handle.toggle_audio(false).await,
        Err(SessionError::Closed)
    ));
    // A second leave is a no-op.
    session.handle.leave_room().await.expect("second leave failed");
    assert_eq!(session.signaling.disconnect_count(), 1);
}
