use crate::peer::{LinkEvent, LinkState, RemoteStream};
use crate::session::{Session, SessionEvent};
use huddle_core::ClientSignal;
use tracing::{debug, info, warn};

impl Session {
    pub(super) async fn handle_link_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::CandidateGenerated(tag, candidate) => {
                if !self.peers.is_current(&tag) {
                    debug!("Dropping candidate from stale link to {:?}", tag.peer_id);
                    return;
                }
                self.send_to_peer(ClientSignal::IceCandidate {
                    target: tag.peer_id,
                    candidate,
                })
                .await;
            }

            LinkEvent::TrackArrived(tag, track) => {
                if !self.peers.is_current(&tag) {
                    debug!("Dropping track from stale link to {:?}", tag.peer_id);
                    return;
                }
                let Some(entry) = self.peers.get_mut(&tag.peer_id) else {
                    return;
                };
                debug!("Remote {} track from {:?}", track.kind, tag.peer_id);

                let stream = entry
                    .remote_stream
                    .get_or_insert_with(|| RemoteStream::new(track.stream_id.clone()));
                stream.insert(track);

                let event = SessionEvent::RemoteStream {
                    peer_id: tag.peer_id,
                    peer_name: entry.name.clone(),
                    stream: stream.clone(),
                };
                self.emit(event);
            }

            LinkEvent::StateChanged(tag, state) => {
                let peer_id = tag.peer_id.clone();
                match state {
                    _ if !self.peers.is_current(&tag) => {
                        debug!("Stale link to {:?} is {:?}", peer_id, state)
                    }
                    LinkState::Connected => info!("Media link to {:?} connected", peer_id),
                    LinkState::Failed => {
                        warn!("Media link to {:?} failed", peer_id);
                        self.emit(SessionEvent::PeerFailed {
                            peer_id,
                            reason: "connection failed".into(),
                        });
                    }
                    other => debug!("Media link to {:?} is {:?}", peer_id, other),
                }
            }
        }
    }
}
