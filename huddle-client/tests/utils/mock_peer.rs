use async_trait::async_trait;
use huddle_client::{
    IceCandidate, LinkEvent, LinkState, LinkTag, LocalTrack, MediaKind, PeerConnector, PeerError,
    PeerId, PeerLink, RemoteTrack,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Mutex, mpsc};

/// Every call a session made on a [`MockLink`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOp {
    AddTrack(String, MediaKind),
    RemoveTrack(String),
    CreateOffer,
    CreateAnswer,
    SetRemoteOffer(String),
    SetRemoteAnswer(String),
    Rollback,
    AddIceCandidate(String),
    Close,
}

/// Link double. Applying a remote description makes one remote video track
/// arrive, and candidates are refused until a remote description exists.
pub struct MockLink {
    pub peer_id: PeerId,
    tag: LinkTag,
    ops: Mutex<Vec<LinkOp>>,
    has_remote: AtomicBool,
    fail_offers: AtomicBool,
    offers: AtomicUsize,
    events: mpsc::UnboundedSender<LinkEvent>,
}

impl MockLink {
    fn new(tag: LinkTag, events: mpsc::UnboundedSender<LinkEvent>, fail_offers: bool) -> Self {
        Self {
            peer_id: tag.peer_id.clone(),
            tag,
            ops: Mutex::new(Vec::new()),
            has_remote: AtomicBool::new(false),
            fail_offers: AtomicBool::new(fail_offers),
            offers: AtomicUsize::new(0),
            events,
        }
    }

    pub async fn ops(&self) -> Vec<LinkOp> {
        self.ops.lock().await.clone()
    }

    pub async fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&LinkOp) -> bool,
    {
        self.ops.lock().await.iter().filter(|op| pred(*op)).count()
    }

    /// Candidates applied to the link, in order.
    pub async fn applied_candidates(&self) -> Vec<String> {
        self.ops
            .lock()
            .await
            .iter()
            .filter_map(|op| match op {
                LinkOp::AddIceCandidate(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn is_closed(&self) -> bool {
        self.ops.lock().await.contains(&LinkOp::Close)
    }

    pub fn set_fail_offers(&self, fail: bool) {
        self.fail_offers.store(fail, Ordering::SeqCst);
    }

    /// Simulate a locally gathered ICE candidate.
    pub fn emit_candidate(&self, candidate: &str) {
        let _ = self.events.send(LinkEvent::CandidateGenerated(
            self.tag.clone(),
            IceCandidate::new(candidate),
        ));
    }

    pub fn emit_state(&self, state: LinkState) {
        let _ = self
            .events
            .send(LinkEvent::StateChanged(self.tag.clone(), state));
    }

    fn remote_track_arrives(&self) {
        let track = RemoteTrack::new(
            format!("{}-video", self.peer_id),
            format!("{}-stream", self.peer_id),
            MediaKind::Video,
        );
        let _ = self
            .events
            .send(LinkEvent::TrackArrived(self.tag.clone(), track));
    }

    async fn record(&self, op: LinkOp) {
        self.ops.lock().await.push(op);
    }
}

#[async_trait]
impl PeerLink for MockLink {
    async fn add_track(&self, track: Arc<LocalTrack>) -> Result<(), PeerError> {
        self.record(LinkOp::AddTrack(track.id().to_owned(), track.kind()))
            .await;
        Ok(())
    }

    async fn remove_track(&self, track_id: &str) -> Result<(), PeerError> {
        self.record(LinkOp::RemoveTrack(track_id.to_owned())).await;
        Ok(())
    }

    async fn create_offer(&self) -> Result<String, PeerError> {
        if self.fail_offers.load(Ordering::SeqCst) {
            return Err(PeerError::Sdp("scripted offer failure".into()));
        }
        self.record(LinkOp::CreateOffer).await;
        let n = self.offers.fetch_add(1, Ordering::SeqCst);
        Ok(format!("offer-{}-{}", self.peer_id, n))
    }

    async fn create_answer(&self) -> Result<String, PeerError> {
        self.record(LinkOp::CreateAnswer).await;
        Ok(format!("answer-{}", self.peer_id))
    }

    async fn set_remote_offer(&self, sdp: String) -> Result<(), PeerError> {
        self.record(LinkOp::SetRemoteOffer(sdp)).await;
        self.has_remote.store(true, Ordering::SeqCst);
        self.remote_track_arrives();
        Ok(())
    }

    async fn set_remote_answer(&self, sdp: String) -> Result<(), PeerError> {
        self.record(LinkOp::SetRemoteAnswer(sdp)).await;
        self.has_remote.store(true, Ordering::SeqCst);
        self.remote_track_arrives();
        Ok(())
    }

    async fn rollback(&self) -> Result<(), PeerError> {
        self.record(LinkOp::Rollback).await;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), PeerError> {
        if !self.has_remote.load(Ordering::SeqCst) {
            return Err(PeerError::NoRemoteDescription(self.peer_id.clone()));
        }
        self.record(LinkOp::AddIceCandidate(candidate.candidate))
            .await;
        Ok(())
    }

    async fn close(&self) -> Result<(), PeerError> {
        self.record(LinkOp::Close).await;
        Ok(())
    }
}

/// Hands out [`MockLink`]s and keeps the latest one per peer for inspection.
#[derive(Default)]
pub struct MockConnector {
    links: Mutex<HashMap<PeerId, Arc<MockLink>>>,
    failing_offers: Mutex<HashSet<PeerId>>,
    connects: AtomicUsize,
}

impl MockConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Links created for `peer_id` from now on fail `create_offer`.
    pub async fn fail_offers_for(&self, peer_id: &PeerId) {
        self.failing_offers.lock().await.insert(peer_id.clone());
        if let Some(link) = self.links.lock().await.get(peer_id) {
            link.set_fail_offers(true);
        }
    }

    pub async fn link(&self, peer_id: &PeerId) -> Option<Arc<MockLink>> {
        self.links.lock().await.get(peer_id).cloned()
    }

    pub async fn wait_for_link(&self, peer_id: &PeerId, timeout_ms: u64) -> Option<Arc<MockLink>> {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if let Some(link) = self.link(peer_id).await {
                return Some(link);
            }
            if start.elapsed() > timeout {
                return None;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PeerConnector for MockConnector {
    async fn connect(
        &self,
        tag: LinkTag,
        events: mpsc::UnboundedSender<LinkEvent>,
    ) -> Result<Arc<dyn PeerLink>, PeerError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let peer_id = tag.peer_id.clone();
        let fail = self.failing_offers.lock().await.contains(&peer_id);
        let link = Arc::new(MockLink::new(tag, events, fail));
        self.links.lock().await.insert(peer_id, link.clone());
        Ok(link)
    }
}
