use crate::error::PeerError;
use crate::peer::{NegotiationStep, PeerLink, Upsert};
use crate::session::{Session, SessionEvent};
use huddle_core::{ClientSignal, PeerId};
use std::sync::Arc;
use tracing::{debug, info, warn};

impl Session {
    /// A new participant joined: we are the initiator towards them.
    pub(super) async fn handle_user_connected(&mut self, peer_id: PeerId, name: String) {
        if peer_id == self.local_id {
            return;
        }

        if let Some(entry) = self.peers.get_mut(&peer_id)
            && !entry.state.is_closed()
        {
            debug!("Peer {:?} already known, refreshing name", peer_id);
            entry.name = name;
            return;
        }

        info!("User {:?} ({}) connected, sending offer", peer_id, name);
        let Some(link) = self.open_link(&peer_id, name.clone()).await else {
            return;
        };
        self.emit(SessionEvent::UserConnected {
            peer_id: peer_id.clone(),
            name,
        });

        if let Err(e) = self.send_initial_offer(&peer_id, link).await {
            self.report_peer_failure(&peer_id, e);
        }
    }

    /// Creates the link and registers the peer. Returns `None` when the
    /// peer could not be connected or was registered meanwhile.
    pub(super) async fn open_link(
        &mut self,
        peer_id: &PeerId,
        name: String,
    ) -> Option<Arc<dyn PeerLink>> {
        let tag = self.peers.next_tag(peer_id);
        let link = match self
            .connector
            .connect(tag.clone(), self.link_tx.clone())
            .await
        {
            Ok(link) => link,
            Err(e) => {
                self.report_peer_failure(peer_id, e);
                return None;
            }
        };

        match self.peers.upsert(tag, name, link.clone()) {
            Upsert::Inserted => Some(link),
            Upsert::Existing(unused) => {
                let _ = unused.close().await;
                None
            }
        }
    }

    pub(super) async fn attach_local_tracks(
        &mut self,
        peer_id: &PeerId,
        link: &Arc<dyn PeerLink>,
    ) -> Result<(), PeerError> {
        if self.peers.get(peer_id).is_none_or(|e| e.tracks_attached) {
            return Ok(());
        }

        for track in self.local_stream.tracks() {
            link.add_track(track.clone()).await?;
        }

        if let Some(entry) = self.peers.get_mut(peer_id) {
            entry.tracks_attached = true;
        }
        Ok(())
    }

    async fn send_initial_offer(
        &mut self,
        peer_id: &PeerId,
        link: Arc<dyn PeerLink>,
    ) -> Result<(), PeerError> {
        self.attach_local_tracks(peer_id, &link).await?;
        let sdp = link.create_offer().await?;

        if !self.peers.contains(peer_id) {
            return Ok(());
        }
        self.peers.advance(peer_id, NegotiationStep::LocalOfferSent)?;

        self.send_to_peer(ClientSignal::Offer {
            target: peer_id.clone(),
            sdp,
            user_name: self.local_name.clone(),
        })
        .await;
        Ok(())
    }

    pub(super) fn report_peer_failure(&self, peer_id: &PeerId, error: PeerError) {
        warn!("Negotiation with {:?} failed: {}", peer_id, error);
        self.emit(SessionEvent::PeerFailed {
            peer_id: peer_id.clone(),
            reason: error.to_string(),
        });
    }
}
