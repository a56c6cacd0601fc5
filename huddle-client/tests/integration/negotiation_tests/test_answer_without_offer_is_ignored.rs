use huddle_client::{PeerId, PeerState, ServerSignal};

use crate::integration::{STEP_TIMEOUT_MS, connect_peer, init_tracing, join_test_session, settle};
use crate::utils::LinkOp;

#[tokio::test]
async fn test_answer_without_offer_is_ignored() {
    init_tracing();

    let session = join_test_session("alice").await.expect("join failed");
    let bob = connect_peer(&session, "bob").await.expect("bob connected");

    session
        .signaling
        .inject(ServerSignal::Answer {
            caller: bob.clone(),
            sdp: "stray-answer".into(),
            user_name: None,
        })
        .await;
    // An answer from someone we never offered to is dropped as well.
    session
        .signaling
        .inject(ServerSignal::Answer {
            caller: PeerId::from("ghost"),
            sdp: "ghost-answer".into(),
            user_name: None,
        })
        .await;
    settle().await;

    let snapshot = session.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.peers.len(), 1);
    assert_eq!(snapshot.peers[0].state, PeerState::Connected);

    let link = session
        .connector
        .wait_for_link(&bob, STEP_TIMEOUT_MS)
        .await
        .unwrap();
    assert_eq!(
        link.count(|op| matches!(op, LinkOp::SetRemoteAnswer(_))).await,
        1
    );

    session.handle.leave_room().await.expect("leave failed");
}
