use huddle_client::{IceCandidate, PeerId, PeerState, ServerSignal};

use crate::integration::{
    STEP_TIMEOUT_MS, init_tracing, join_test_session, settle, wait_for_peer_state,
};

#[tokio::test]
async fn test_candidates_before_answer() {
    init_tracing();

    let session = join_test_session("alice").await.expect("join failed");
    let bob = PeerId::from("bob");

    session
        .signaling
        .inject(ServerSignal::UserConnected {
            user_id: bob.clone(),
            user_name: "Bob".into(),
        })
        .await;
    session
        .signaling
        .wait_for_offer_to(&bob, STEP_TIMEOUT_MS)
        .await
        .expect("offer sent");

    for c in ["c1", "c2"] {
        session
            .signaling
            .inject(ServerSignal::IceCandidate {
                caller: bob.clone(),
                candidate: IceCandidate::new(c),
            })
            .await;
    }
    settle().await;

    let link = session.connector.link(&bob).await.unwrap();
    assert!(link.applied_candidates().await.is_empty());
    let snapshot = session.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.peers[0].pending_candidates, 2);

    session
        .signaling
        .inject(ServerSignal::Answer {
            caller: bob.clone(),
            sdp: "bob-answer".into(),
            user_name: None,
        })
        .await;
    assert!(wait_for_peer_state(&session.handle, &bob, PeerState::Connected, STEP_TIMEOUT_MS).await);
    assert_eq!(link.applied_candidates().await, vec!["c1", "c2"]);

    // Later candidates go straight to the link; the buffer is not replayed.
    session
        .signaling
        .inject(ServerSignal::IceCandidate {
            caller: bob.clone(),
            candidate: IceCandidate::new("c3"),
        })
        .await;
    settle().await;

    assert_eq!(link.applied_candidates().await, vec!["c1", "c2", "c3"]);
    let snapshot = session.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.peers[0].pending_candidates, 0);

    session.handle.leave_room().await.expect("leave failed");
}
