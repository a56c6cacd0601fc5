use huddle_client::{PeerId, PeerState, ServerSignal, SessionEvent};

use crate::integration::{STEP_TIMEOUT_MS, init_tracing, join_test_session, wait_for_peer_state};
use crate::utils::LinkOp;

#[tokio::test]
async fn test_responder_flow() {
    init_tracing();

    let session = join_test_session("bob").await.expect("join failed");
    let carol = PeerId::from("carol");

    session
        .signaling
        .inject(ServerSignal::Offer {
            caller: carol.clone(),
            sdp: "carol-offer".into(),
            user_name: "Carol".into(),
        })
        .await;

    let answer = session
        .signaling
        .wait_for_answer_to(&carol, STEP_TIMEOUT_MS)
        .await
        .expect("answer should be sent");
    assert_eq!(answer, "answer-carol");
    assert!(wait_for_peer_state(&session.handle, &carol, PeerState::Connected, STEP_TIMEOUT_MS).await);

    let link = session.connector.link(&carol).await.expect("link created");
    let ops = link.ops().await;
    let set_remote = ops
        .iter()
        .position(|op| *op == LinkOp::SetRemoteOffer("carol-offer".into()))
        .expect("remote offer applied");
    let answer_at = ops.iter().position(|op| *op == LinkOp::CreateAnswer).unwrap();
    assert!(set_remote < answer_at);
    assert_eq!(
        ops[..set_remote]
            .iter()
            .filter(|op| matches!(op, LinkOp::AddTrack(..)))
            .count(),
        2
    );

    let snapshot = session.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.peers.len(), 1);
    assert_eq!(snapshot.peers[0].name, "Carol");

    // Peers discovered through an offer are not announced as new users.
    let connected = session
        .events
        .count(|e| matches!(e, SessionEvent::UserConnected { .. }))
        .await;
    assert_eq!(connected, 0);

    session.handle.leave_room().await.expect("leave failed");
}
