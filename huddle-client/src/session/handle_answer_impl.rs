use crate::error::PeerError;
use crate::peer::NegotiationStep;
use crate::session::Session;
use huddle_core::PeerId;
use tracing::{debug, warn};

impl Session {
    pub(super) async fn handle_answer(&mut self, caller: PeerId, sdp: String, name: Option<String>) {
        let Some(entry) = self
            .peers
            .get_mut(&caller)
            .filter(|e| !e.state.is_closed())
        else {
            debug!("Answer from unknown or departed peer {:?} dropped", caller);
            return;
        };
        if let Some(name) = name {
            entry.name = name;
        }

        let step = NegotiationStep::RemoteAnswerApplied;
        if entry.state.apply(step).is_none() {
            let err = PeerError::InvalidTransition {
                peer_id: caller.clone(),
                state: entry.state,
                step,
            };
            warn!("Dropping answer: {}", err);
            return;
        }
        let link = entry.link.clone();

        if let Err(e) = link.set_remote_answer(sdp).await {
            self.report_peer_failure(&caller, e);
            return;
        }
        if !self.peers.contains(&caller) {
            return;
        }

        match self.peers.advance(&caller, step) {
            Ok((_, pending)) => self.apply_candidates(&caller, &link, pending).await,
            Err(e) => {
                self.report_peer_failure(&caller, e);
                return;
            }
        }

        self.resume_deferred_offer(&caller).await;
    }
}
