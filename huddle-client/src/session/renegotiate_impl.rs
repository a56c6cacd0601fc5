use crate::error::{PeerError, SessionError};
use crate::media::LocalTrack;
use crate::peer::{NegotiationStep, PeerLink, PeerState};
use crate::session::{Session, SessionEvent};
use futures::future::join_all;
use huddle_core::{ClientSignal, PeerId};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome of a camera restart across the room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenegotiationReport {
    pub track_id: String,
    /// Peers that were sent a fresh offer.
    pub renegotiated: Vec<PeerId>,
    /// Peers mid-negotiation. They got the new track and are re-offered as
    /// soon as their current exchange completes.
    pub deferred: Vec<PeerId>,
    pub failed: Vec<(PeerId, String)>,
}

impl Session {
    /// Replaces the camera track on every peer and turns video on.
    ///
    /// The old track is stopped before capturing so the device is free. One
    /// capture is shared by all peers, which are then renegotiated
    /// concurrently. The room is told the resulting video state, which is off
    /// when the capture failed.
    pub(super) async fn restart_video(&mut self) -> Result<RenegotiationReport, SessionError> {
        let old_ids: Vec<String> = self
            .local_stream
            .detach_video()
            .iter()
            .map(|t| t.id().to_owned())
            .collect();

        let track = match self.devices.capture_video(self.local_stream.id()).await {
            Ok(track) => track,
            Err(e) => {
                warn!("Camera capture failed: {}", e);
                self.emit(SessionEvent::MediaError(e.clone()));
                // The old track is gone either way.
                if let Err(send_err) = self.announce_video_state(false).await {
                    error!("Failed to send video-state signal: {}", send_err);
                }
                return Err(e.into());
            }
        };
        self.local_stream.add_track(track.clone());
        if let Err(e) = self.announce_video_state(true).await {
            error!("Failed to send video-state signal: {}", e);
        }
        self.emit(SessionEvent::LocalStream {
            stream_id: self.local_stream.id().to_owned(),
            tracks: self.local_stream.tracks().to_vec(),
        });

        let mut report = RenegotiationReport {
            track_id: track.id().to_owned(),
            ..Default::default()
        };

        let mut targets = Vec::new();
        for entry in self.peers.entries_mut() {
            match entry.state {
                PeerState::Connected => {
                    targets.push((entry.peer_id.clone(), entry.link.clone(), true));
                }
                // Tracks not attached yet are picked up by the first negotiation.
                _ if entry.tracks_attached => {
                    entry.needs_renegotiation = true;
                    targets.push((entry.peer_id.clone(), entry.link.clone(), false));
                }
                _ => {}
            }
        }

        let results = join_all(targets.into_iter().map(|(peer_id, link, offer)| {
            let old_ids = old_ids.clone();
            let track = track.clone();
            async move {
                let result = swap_video(&link, &old_ids, track, offer).await;
                (peer_id, result)
            }
        }))
        .await;

        for (peer_id, result) in results {
            if !self.peers.contains(&peer_id) {
                continue;
            }
            match result {
                Ok(Some(sdp)) => match self.send_renegotiation_offer(&peer_id, sdp).await {
                    Ok(()) => report.renegotiated.push(peer_id),
                    Err(e) => {
                        report.failed.push((peer_id.clone(), e.to_string()));
                        self.report_peer_failure(&peer_id, e);
                    }
                },
                Ok(None) => report.deferred.push(peer_id),
                Err(e) => {
                    report.failed.push((peer_id.clone(), e.to_string()));
                    self.report_peer_failure(&peer_id, e);
                }
            }
        }

        info!(
            "Video restarted: {} renegotiated, {} deferred, {} failed",
            report.renegotiated.len(),
            report.deferred.len(),
            report.failed.len()
        );
        Ok(report)
    }

    async fn send_renegotiation_offer(&mut self, peer_id: &PeerId, sdp: String) -> Result<(), PeerError> {
        self.peers.advance(peer_id, NegotiationStep::LocalOfferSent)?;
        self.send_to_peer(ClientSignal::Offer {
            target: peer_id.clone(),
            sdp,
            user_name: self.local_name.clone(),
        })
        .await;
        Ok(())
    }

    /// Sends the offer postponed by a restart that raced a negotiation.
    pub(super) async fn resume_deferred_offer(&mut self, peer_id: &PeerId) {
        let link = match self.peers.get_mut(peer_id) {
            Some(entry) if entry.needs_renegotiation && entry.state == PeerState::Connected => {
                entry.needs_renegotiation = false;
                entry.link.clone()
            }
            _ => return,
        };
        info!("Sending deferred offer to {:?}", peer_id);

        let result = match link.create_offer().await {
            Ok(sdp) if self.peers.contains(peer_id) => {
                self.send_renegotiation_offer(peer_id, sdp).await
            }
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            self.report_peer_failure(peer_id, e);
        }
    }
}

/// Swaps the outbound video on one link and, when `offer` is set, creates
/// the offer carrying it.
async fn swap_video(
    link: &Arc<dyn PeerLink>,
    old_ids: &[String],
    track: Arc<LocalTrack>,
    offer: bool,
) -> Result<Option<String>, PeerError> {
    for id in old_ids {
        link.remove_track(id).await?;
    }
    link.add_track(track).await?;

    if offer {
        Ok(Some(link.create_offer().await?))
    } else {
        Ok(None)
    }
}
