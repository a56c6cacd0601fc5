use crate::config::SessionConfig;
use crate::error::PeerError;
use crate::media::{LocalTrack, MediaKind};
use crate::peer::{LinkEvent, LinkState, LinkTag, PeerConnector, PeerLink, RemoteTrack};
use async_trait::async_trait;
use huddle_core::IceCandidate;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::track::track_remote::TrackRemote;

/// Builds webrtc-rs peer connections. The media engine and interceptors are
/// registered once and shared by every link of the session.
pub struct RtcConnector {
    factory: Arc<ConnectionFactory>,
}

struct ConnectionFactory {
    api: API,
    ice_servers: Vec<RTCIceServer>,
}

impl RtcConnector {
    pub fn new(config: &SessionConfig) -> Result<Self, PeerError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = config
            .ice_servers()
            .into_iter()
            .map(|server| RTCIceServer {
                urls: server.urls,
                username: server.username.unwrap_or_default(),
                credential: server.credential.unwrap_or_default(),
            })
            .collect();

        Ok(Self {
            factory: Arc::new(ConnectionFactory { api, ice_servers }),
        })
    }
}

impl ConnectionFactory {
    /// Opens a connection whose callbacks report under `tag` for as long as
    /// `epoch` still holds `current`.
    async fn open(
        &self,
        tag: &LinkTag,
        epoch: Arc<AtomicU64>,
        current: u64,
        events: mpsc::UnboundedSender<LinkEvent>,
    ) -> Result<Arc<RTCPeerConnection>, PeerError> {
        let rtc_config = RTCConfiguration {
            ice_servers: self.ice_servers.clone(),
            ..Default::default()
        };
        let pc = Arc::new(self.api.new_peer_connection(rtc_config).await?);

        let state_tx = events.clone();
        let state_tag = tag.clone();
        let state_epoch = epoch.clone();
        pc.on_peer_connection_state_change(Box::new(move |s: RTCPeerConnectionState| {
            let tx = state_tx.clone();
            let tag = state_tag.clone();
            let live = state_epoch.load(Ordering::SeqCst) == current;

            Box::pin(async move {
                info!("Peer connection state changed for {:?}: {:?}", tag.peer_id, s);
                let state = match s {
                    RTCPeerConnectionState::New => LinkState::New,
                    RTCPeerConnectionState::Connecting => LinkState::Connecting,
                    RTCPeerConnectionState::Connected => LinkState::Connected,
                    RTCPeerConnectionState::Disconnected => LinkState::Disconnected,
                    RTCPeerConnectionState::Failed => LinkState::Failed,
                    RTCPeerConnectionState::Closed => LinkState::Closed,
                    _ => return,
                };
                if live {
                    let _ = tx.send(LinkEvent::StateChanged(tag, state));
                }
            })
        }));

        let ice_tx = events.clone();
        let ice_tag = tag.clone();
        let ice_epoch = epoch.clone();
        pc.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let tag = ice_tag.clone();
            let live = ice_epoch.load(Ordering::SeqCst) == current;

            Box::pin(async move {
                let Some(candidate) = c else { return };
                if !live {
                    return;
                }
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                    username_fragment: init.username_fragment,
                };
                let _ = tx.send(LinkEvent::CandidateGenerated(tag, candidate));
            })
        }));

        let track_tx = events;
        let track_tag = tag.clone();
        pc.on_track(Box::new(move |track: Arc<TrackRemote>, _receiver, _transceiver| {
            let tx = track_tx.clone();
            let tag = track_tag.clone();
            let live = epoch.load(Ordering::SeqCst) == current;

            Box::pin(async move {
                let kind = match track.kind() {
                    RTPCodecType::Audio => MediaKind::Audio,
                    RTPCodecType::Video => MediaKind::Video,
                    _ => return,
                };
                if !live {
                    return;
                }
                debug!(
                    "Remote {} track {} arrived from {:?}",
                    kind,
                    track.id(),
                    tag.peer_id
                );

                let remote =
                    RemoteTrack::new(track.id().to_string(), track.stream_id().to_string(), kind)
                        .with_rtp(track);
                let _ = tx.send(LinkEvent::TrackArrived(tag, remote));
            })
        }));

        Ok(pc)
    }
}

#[async_trait]
impl PeerConnector for RtcConnector {
    async fn connect(
        &self,
        tag: LinkTag,
        events: mpsc::UnboundedSender<LinkEvent>,
    ) -> Result<Arc<dyn PeerLink>, PeerError> {
        let epoch = Arc::new(AtomicU64::new(0));
        let pc = self
            .factory
            .open(&tag, epoch.clone(), 0, events.clone())
            .await?;

        Ok(Arc::new(RtcPeerLink {
            tag,
            factory: self.factory.clone(),
            events,
            epoch,
            closed: AtomicBool::new(false),
            pc: RwLock::new(pc),
            senders: Mutex::new(HashMap::new()),
        }))
    }
}

/// A link backed by one `RTCPeerConnection` at a time. Rolling back a first
/// offer swaps in a fresh connection, since webrtc-rs cannot leave
/// have-local-offer by a local rollback.
pub struct RtcPeerLink {
    tag: LinkTag,
    factory: Arc<ConnectionFactory>,
    events: mpsc::UnboundedSender<LinkEvent>,
    /// Bumped whenever the connection is replaced or closed; callbacks of
    /// older connections stop reporting.
    epoch: Arc<AtomicU64>,
    closed: AtomicBool,
    pc: RwLock<Arc<RTCPeerConnection>>,
    senders: Mutex<HashMap<String, (Arc<LocalTrack>, Arc<RTCRtpSender>)>>,
}

impl RtcPeerLink {
    pub async fn peer_connection(&self) -> Result<Arc<RTCPeerConnection>, PeerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PeerError::Closed(self.tag.peer_id.clone()));
        }
        Ok(self.pc.read().await.clone())
    }

    /// Discards the unanswered offer by replacing the connection. Local
    /// tracks are attached again to the new one.
    async fn restart_connection(&self) -> Result<(), PeerError> {
        let current = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let fresh = self
            .factory
            .open(&self.tag, self.epoch.clone(), current, self.events.clone())
            .await?;

        let mut senders = self.senders.lock().await;
        for (track, sender) in senders.values_mut() {
            *sender = attach(&fresh, track.clone()).await?;
        }
        let stale = std::mem::replace(&mut *self.pc.write().await, fresh);
        drop(senders);

        if let Err(e) = stale.close().await {
            warn!("Closing replaced connection to {:?} failed: {}", self.tag.peer_id, e);
        }
        info!("Restarted connection to {:?} to drop its offer", self.tag.peer_id);
        Ok(())
    }
}

/// Adds `track` and drains its RTCP, which the interceptors need.
async fn attach(
    pc: &Arc<RTCPeerConnection>,
    track: Arc<LocalTrack>,
) -> Result<Arc<RTCRtpSender>, PeerError> {
    let sender = pc.add_track(track.rtp_track()).await?;

    let rtcp_sender = sender.clone();
    tokio::spawn(async move {
        let mut rtcp_buf = vec![0u8; 1500];
        while rtcp_sender.read(&mut rtcp_buf).await.is_ok() {}
    });
    Ok(sender)
}

#[async_trait]
impl PeerLink for RtcPeerLink {
    async fn add_track(&self, track: Arc<LocalTrack>) -> Result<(), PeerError> {
        let pc = self.peer_connection().await?;
        let sender = attach(&pc, track.clone()).await?;
        self.senders
            .lock()
            .await
            .insert(track.id().to_owned(), (track, sender));
        Ok(())
    }

    async fn remove_track(&self, track_id: &str) -> Result<(), PeerError> {
        let pc = self.peer_connection().await?;
        let removed = self.senders.lock().await.remove(track_id);
        if let Some((_, sender)) = removed {
            pc.remove_track(&sender).await?;
        }
        Ok(())
    }

    async fn create_offer(&self) -> Result<String, PeerError> {
        let pc = self.peer_connection().await?;
        let offer = pc.create_offer(None).await?;
        pc.set_local_description(offer.clone()).await?;
        Ok(offer.sdp)
    }

    async fn create_answer(&self) -> Result<String, PeerError> {
        let pc = self.peer_connection().await?;
        let answer = pc.create_answer(None).await?;
        pc.set_local_description(answer.clone()).await?;
        Ok(answer.sdp)
    }

    async fn set_remote_offer(&self, sdp: String) -> Result<(), PeerError> {
        let desc = RTCSessionDescription::offer(sdp)?;
        self.peer_connection()
            .await?
            .set_remote_description(desc)
            .await?;
        Ok(())
    }

    async fn set_remote_answer(&self, sdp: String) -> Result<(), PeerError> {
        let desc = RTCSessionDescription::answer(sdp)?;
        self.peer_connection()
            .await?
            .set_remote_description(desc)
            .await?;
        Ok(())
    }

    async fn rollback(&self) -> Result<(), PeerError> {
        let pc = self.peer_connection().await?;

        if let Some(mut desc) = pc.pending_local_description().await {
            desc.sdp_type = RTCSdpType::Rollback;
            match pc.set_local_description(desc).await {
                Ok(()) => return Ok(()),
                Err(e) => debug!("Local rollback refused for {:?}: {}", self.tag.peer_id, e),
            }
        }

        // Media already flows once a remote description was applied, so the
        // connection cannot simply be replaced.
        if pc.current_remote_description().await.is_some() {
            return Err(PeerError::RollbackUnsupported(self.tag.peer_id.clone()));
        }
        self.restart_connection().await
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), PeerError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment,
        };
        self.peer_connection()
            .await?
            .add_ice_candidate(init)
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), PeerError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.senders.lock().await.clear();

        let pc = self.pc.read().await.clone();
        if let Err(e) = pc.close().await {
            warn!("Closing link to {:?} failed: {}", self.tag.peer_id, e);
            return Err(e.into());
        }
        debug!("Link to {:?} closed", self.tag.peer_id);
        Ok(())
    }
}
