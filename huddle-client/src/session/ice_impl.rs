use crate::peer::{CandidateRoute, PeerLink};
use crate::session::Session;
use huddle_core::{IceCandidate, PeerId};
use std::sync::Arc;
use tracing::{debug, warn};

impl Session {
    pub(super) async fn handle_remote_candidate(&mut self, caller: PeerId, candidate: IceCandidate) {
        match self.peers.route_candidate(&caller, candidate) {
            CandidateRoute::ApplyNow(link, candidate) => {
                if let Err(e) = link.add_ice_candidate(candidate).await {
                    warn!("Failed to add ICE candidate from {:?}: {}", caller, e);
                }
            }
            CandidateRoute::Buffered => {
                debug!(
                    "Buffered ICE candidate from {:?} ({} pending)",
                    caller,
                    self.peers.pending_candidates(&caller)
                );
            }
            CandidateRoute::Rejected => {}
        }
    }

    /// Applies candidates drained after a remote description, in receipt order.
    pub(super) async fn apply_candidates(
        &self,
        peer_id: &PeerId,
        link: &Arc<dyn PeerLink>,
        candidates: Vec<IceCandidate>,
    ) {
        if candidates.is_empty() {
            return;
        }
        debug!("Applying {} buffered candidates for {:?}", candidates.len(), peer_id);

        for candidate in candidates {
            if let Err(e) = link.add_ice_candidate(candidate).await {
                warn!("Failed to add buffered candidate for {:?}: {}", peer_id, e);
            }
        }
    }
}
