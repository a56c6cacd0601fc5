use async_trait::async_trait;
use huddle_client::{ClientSignal, PeerId, ServerSignal, SignalingError, SignalingTransport};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, mpsc};

/// Mock relay connection: records every outbound signal and lets the test
/// push inbound ones.
///
/// # Example
///
/// ```ignore
/// let signaling = MockSignaling::new();
/// // ... join a room with it ...
/// signaling.inject(ServerSignal::UserConnected { .. }).await;
/// let offer = signaling.wait_for_offer_to(&peer, 2000).await;
/// ```
#[derive(Clone, Default)]
pub struct MockSignaling {
    inbound: Arc<Mutex<Option<mpsc::Sender<ServerSignal>>>>,
    sent: Arc<Mutex<Vec<ClientSignal>>>,
    connects: Arc<AtomicUsize>,
    disconnects: Arc<AtomicUsize>,
}

impl MockSignaling {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a signal as if the relay had sent it. Returns false when the
    /// session is not listening.
    pub async fn inject(&self, signal: ServerSignal) -> bool {
        let Some(tx) = self.inbound.lock().await.clone() else {
            return false;
        };
        tx.send(signal).await.is_ok()
    }

    pub async fn sent(&self) -> Vec<ClientSignal> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_named(&self, event: &str) -> Vec<ClientSignal> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|s| s.event_name() == event)
            .cloned()
            .collect()
    }

    pub async fn offers_to(&self, peer_id: &PeerId) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|s| match s {
                ClientSignal::Offer { target, sdp, .. } if target == peer_id => Some(sdp.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn answers_to(&self, peer_id: &PeerId) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|s| match s {
                ClientSignal::Answer { target, sdp, .. } if target == peer_id => Some(sdp.clone()),
                _ => None,
            })
            .collect()
    }

    /// Wait until at least `count` signals matching `pred` were sent.
    pub async fn wait_for<F>(&self, count: usize, timeout_ms: u64, pred: F) -> bool
    where
        F: Fn(&ClientSignal) -> bool,
    {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if self.sent.lock().await.iter().filter(|s| pred(*s)).count() >= count {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    pub async fn wait_for_offer_to(&self, peer_id: &PeerId, timeout_ms: u64) -> Option<String> {
        let target = peer_id.clone();
        self.wait_for(1, timeout_ms, |s| {
            matches!(s, ClientSignal::Offer { target: t, .. } if *t == target)
        })
        .await;
        self.offers_to(peer_id).await.pop()
    }

    pub async fn wait_for_answer_to(&self, peer_id: &PeerId, timeout_ms: u64) -> Option<String> {
        let target = peer_id.clone();
        self.wait_for(1, timeout_ms, |s| {
            matches!(s, ClientSignal::Answer { target: t, .. } if *t == target)
        })
        .await;
        self.answers_to(peer_id).await.pop()
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignalingTransport for MockSignaling {
    async fn connect(&self) -> Result<mpsc::Receiver<ServerSignal>, SignalingError> {
        let (tx, rx) = mpsc::channel(256);
        *self.inbound.lock().await = Some(tx);
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(rx)
    }

    async fn send(&self, signal: ClientSignal) -> Result<(), SignalingError> {
        if self.inbound.lock().await.is_none() {
            return Err(SignalingError::NotConnected);
        }
        tracing::debug!("[MockSignaling] send {}", signal.event_name());
        self.sent.lock().await.push(signal);
        Ok(())
    }

    async fn disconnect(&self) {
        if self.inbound.lock().await.take().is_some() {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
        }
    }
}
