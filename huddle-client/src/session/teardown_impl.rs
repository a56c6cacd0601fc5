use crate::session::{Session, SessionEvent};
use huddle_core::PeerId;
use tracing::{info, warn};

impl Session {
    pub(super) async fn handle_user_disconnected(&mut self, peer_id: PeerId, name: Option<String>) {
        self.presence.remove(&peer_id);
        let Some((known_name, link)) = self.peers.close(&peer_id) else {
            return;
        };
        info!("User {:?} disconnected", peer_id);

        if let Err(e) = link.close().await {
            warn!("Failed to close link to {:?}: {}", peer_id, e);
        }
        self.emit(SessionEvent::UserDisconnected {
            peer_id,
            name: name.or(Some(known_name)),
        });
    }

    /// Stops local media, closes every link and leaves the relay. Runs once.
    pub(super) async fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        self.local_stream.stop_all();
        for entry in self.peers.drain() {
            if entry.state.is_closed() {
                continue;
            }
            if let Err(e) = entry.link.close().await {
                warn!("Failed to close link to {:?}: {}", entry.peer_id, e);
            }
        }
        self.presence.clear();
        self.transport.disconnect().await;

        info!("Left room {:?}", self.room_id);
    }
}
