use crate::error::PeerError;
use crate::peer::{NegotiationStep, PeerLink};
use crate::session::Session;
use huddle_core::{ClientSignal, PeerId};
use std::sync::Arc;
use tracing::info;

impl Session {
    /// Responder path. Also covers renegotiation offers from known peers and
    /// offer collisions, where the polite side rolls back and the impolite
    /// side keeps its own offer.
    pub(super) async fn handle_remote_offer(&mut self, caller: PeerId, sdp: String, name: String) {
        if caller == self.local_id {
            return;
        }

        let link = match self.peers.get_mut(&caller) {
            Some(entry) if !entry.state.is_closed() => {
                entry.name = name;
                if entry.state.has_local_offer() {
                    if !entry.polite {
                        info!("Ignoring colliding offer from {:?}", caller);
                        return;
                    }
                    info!("Offer collision with {:?}, rolling back", caller);
                    let link = entry.link.clone();
                    if let Err(e) = self.rollback(&caller, &link).await {
                        self.report_peer_failure(&caller, e);
                        return;
                    }
                }
                match self.peers.get(&caller) {
                    Some(entry) => entry.link.clone(),
                    None => return,
                }
            }
            _ => {
                info!("Offer from new peer {:?}, answering", caller);
                match self.open_link(&caller, name).await {
                    Some(link) => link,
                    None => return,
                }
            }
        };

        if let Err(e) = self.answer_offer(&caller, link, sdp).await {
            self.report_peer_failure(&caller, e);
        }
    }

    async fn rollback(&mut self, peer_id: &PeerId, link: &Arc<dyn PeerLink>) -> Result<(), PeerError> {
        link.rollback().await?;
        self.peers.advance(peer_id, NegotiationStep::RolledBack)?;
        Ok(())
    }

    async fn answer_offer(
        &mut self,
        caller: &PeerId,
        link: Arc<dyn PeerLink>,
        sdp: String,
    ) -> Result<(), PeerError> {
        self.attach_local_tracks(caller, &link).await?;
        link.set_remote_offer(sdp).await?;

        if !self.peers.contains(caller) {
            return Ok(());
        }
        let (_, pending) = self
            .peers
            .advance(caller, NegotiationStep::RemoteOfferApplied)?;
        self.apply_candidates(caller, &link, pending).await;

        let answer = link.create_answer().await?;
        if !self.peers.contains(caller) {
            return Ok(());
        }
        self.peers.advance(caller, NegotiationStep::AnswerSent)?;

        self.send_to_peer(ClientSignal::Answer {
            target: caller.clone(),
            sdp: answer,
            user_name: self.local_name.clone(),
        })
        .await;

        self.resume_deferred_offer(caller).await;
        Ok(())
    }
}
