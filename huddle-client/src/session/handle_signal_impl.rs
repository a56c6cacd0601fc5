use crate::session::Session;
use huddle_core::ServerSignal;
use tracing::debug;

impl Session {
    pub(super) async fn handle_signal(&mut self, signal: ServerSignal) {
        match signal {
            ServerSignal::UserConnected { user_id, user_name } => {
                self.handle_user_connected(user_id, user_name).await;
            }

            ServerSignal::UserDisconnected { user_id, user_name } => {
                self.handle_user_disconnected(user_id, user_name).await;
            }

            ServerSignal::Offer {
                caller,
                sdp,
                user_name,
            } => {
                debug!("Received offer from {:?}", caller);
                self.handle_remote_offer(caller, sdp, user_name).await;
            }

            ServerSignal::Answer {
                caller,
                sdp,
                user_name,
            } => {
                debug!("Received answer from {:?}", caller);
                self.handle_answer(caller, sdp, user_name).await;
            }

            ServerSignal::IceCandidate { caller, candidate } => {
                self.handle_remote_candidate(caller, candidate).await;
            }

            ServerSignal::HandRaised { user_id, raised } => {
                self.handle_hand_raised(user_id, raised);
            }

            ServerSignal::VideoState { user_id, enabled } => {
                self.handle_video_state(user_id, enabled);
            }

            ServerSignal::AudioState { user_id, enabled } => {
                self.handle_audio_state(user_id, enabled);
            }

            ServerSignal::RoomState { video, audio } => {
                self.handle_room_state(video, audio);
            }
        }
    }
}
