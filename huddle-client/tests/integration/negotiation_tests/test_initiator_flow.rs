use huddle_client::{ClientSignal, PeerId, PeerState, ServerSignal, SessionEvent};

use crate::integration::{STEP_TIMEOUT_MS, init_tracing, join_test_session, wait_for_peer_state};
use crate::utils::LinkOp;

#[tokio::test]
async fn test_initiator_flow() {
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

    let offer = session
        .signaling
        .wait_for_offer_to(&bob, STEP_TIMEOUT_MS)
        .await
        .expect("offer should be sent on user-connected");
    assert!(wait_for_peer_state(&session.handle, &bob, PeerState::AwaitingAnswer, STEP_TIMEOUT_MS).await);

    let sent = session.signaling.sent().await;
    assert!(sent.iter().any(|s| matches!(
        s,
        ClientSignal::Offer { target, sdp, user_name } if *target == bob && *sdp == offer && user_name == "alice name"
    )));

    // Both local tracks are attached before the offer is created.
    let link = session.connector.link(&bob).await.expect("link created");
    let ops = link.ops().await;
    let offer_at = ops.iter().position(|op| *op == LinkOp::CreateOffer).unwrap();
    let tracks_before = ops[..offer_at]
        .iter()
        .filter(|op| matches!(op, LinkOp::AddTrack(..)))
        .count();
    assert_eq!(tracks_before, 2);

    session
        .signaling
        .inject(ServerSignal::Answer {
            caller: bob.clone(),
            sdp: "bob-answer".into(),
            user_name: Some("Bob".into()),
        })
        .await;

    assert!(wait_for_peer_state(&session.handle, &bob, PeerState::Connected, STEP_TIMEOUT_MS).await);
    assert!(link.ops().await.contains(&LinkOp::SetRemoteAnswer("bob-answer".into())));

    let is_remote_stream =
        |e: &SessionEvent| matches!(e, SessionEvent::RemoteStream { peer_id, .. } if peer_id.as_str() == "bob");
    assert!(session.events.wait_for(1, STEP_TIMEOUT_MS, is_remote_stream).await);
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert_eq!(session.events.count(is_remote_stream).await, 1);

    let connected = session
        .events
        .count(|e| matches!(e, SessionEvent::UserConnected { peer_id, name } if *peer_id == bob && name == "Bob"))
        .await;
    assert_eq!(connected, 1);

    session.handle.leave_room().await.expect("leave failed");
}
