use crate::error::SignalingError;
use crate::media::{LocalStream, MediaDevices};
use crate::peer::{LinkEvent, PeerConnector, PeerRegistry};
use crate::signaling::SignalingTransport;
use huddle_core::{ClientSignal, PeerId, RoomId, ServerSignal};
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

mod call_client;
mod handle_answer_impl;
mod handle_remote_offer_impl;
mod handle_signal_impl;
mod ice_impl;
mod init_connection_impl;
mod link_event_impl;
mod presence;
mod presence_impl;
mod renegotiate_impl;
mod session_command;
mod session_event;
mod session_handle;
mod teardown_impl;

pub use call_client::CallClient;
pub use presence::RemotePresence;
pub use renegotiate_impl::RenegotiationReport;
pub use session_event::{SessionEvent, SessionEvents};
pub use session_handle::{PeerSnapshot, SessionHandle, SessionSnapshot};

use presence::PresenceBoard;
use session_command::SessionCommand;

/// The actor behind a [`SessionHandle`]. Owns the local stream and every
/// peer, and handles one command, signal or link event at a time.
pub(crate) struct Session {
    room_id: RoomId,
    local_id: PeerId,
    local_name: String,

    local_stream: LocalStream,
    audio_enabled: bool,
    video_enabled: bool,
    hand_raised: bool,

    peers: PeerRegistry,
    presence: PresenceBoard,

    transport: Arc<dyn SignalingTransport>,
    devices: Arc<dyn MediaDevices>,
    connector: Arc<dyn PeerConnector>,

    events: mpsc::UnboundedSender<SessionEvent>,
    command_rx: mpsc::Receiver<SessionCommand>,
    /// `None` once the relay stream ended.
    signal_rx: Option<mpsc::Receiver<ServerSignal>>,
    link_tx: mpsc::UnboundedSender<LinkEvent>,
    link_rx: mpsc::UnboundedReceiver<LinkEvent>,

    closed: bool,
}

pub(crate) struct SessionParts {
    pub room_id: RoomId,
    pub local_id: PeerId,
    pub local_name: String,
    pub local_stream: LocalStream,
    pub presence: PresenceBoard,
    pub transport: Arc<dyn SignalingTransport>,
    pub devices: Arc<dyn MediaDevices>,
    pub connector: Arc<dyn PeerConnector>,
    pub events: mpsc::UnboundedSender<SessionEvent>,
    pub command_rx: mpsc::Receiver<SessionCommand>,
    pub signal_rx: mpsc::Receiver<ServerSignal>,
}

impl Session {
    pub(crate) fn new(parts: SessionParts) -> Self {
        // Callbacks fire inside calls the session is awaiting, so this
        // channel must never apply backpressure.
        let (link_tx, link_rx) = mpsc::unbounded_channel();

        Self {
            peers: PeerRegistry::new(parts.local_id.clone()),
            room_id: parts.room_id,
            local_id: parts.local_id,
            local_name: parts.local_name,
            local_stream: parts.local_stream,
            audio_enabled: true,
            video_enabled: true,
            hand_raised: false,
            presence: parts.presence,
            transport: parts.transport,
            devices: parts.devices,
            connector: parts.connector,
            events: parts.events,
            command_rx: parts.command_rx,
            signal_rx: Some(parts.signal_rx),
            link_tx,
            link_rx,
            closed: false,
        }
    }

    /// Event loop. Runs until the room is left or every handle is dropped.
    pub(crate) async fn run(mut self) {
        info!(
            "Session loop started for {:?} in room {:?}",
            self.local_id, self.room_id
        );

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => {
                            if self.handle_command(c).await.is_break() {
                                break;
                            }
                        }
                        None => {
                            info!("All session handles dropped, leaving room {:?}", self.room_id);
                            self.teardown().await;
                            break;
                        }
                    }
                }

                signal = next_signal(&mut self.signal_rx) => {
                    match signal {
                        Some(s) => self.handle_signal(s).await,
                        None => {
                            warn!("Signaling stream for room {:?} closed", self.room_id);
                            self.signal_rx = None;
                        }
                    }
                }

                evt = self.link_rx.recv() => {
                    if let Some(e) = evt {
                        self.handle_link_event(e).await;
                    }
                }
            }
        }

        info!("Session loop finished for {:?}", self.local_id);
    }

    async fn handle_command(&mut self, cmd: SessionCommand) -> ControlFlow<()> {
        match cmd {
            SessionCommand::Leave { reply } => {
                self.teardown().await;
                let _ = reply.send(());
                return ControlFlow::Break(());
            }
            SessionCommand::ToggleAudio { enabled, reply } => {
                let _ = reply.send(self.toggle_audio(enabled).await);
            }
            SessionCommand::ToggleVideo { enabled, reply } => {
                let _ = reply.send(self.toggle_video(enabled).await);
            }
            SessionCommand::RestartVideo { reply } => {
                let _ = reply.send(self.restart_video().await);
            }
            SessionCommand::RaiseHand { raised, reply } => {
                let _ = reply.send(self.raise_hand(raised).await);
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
        ControlFlow::Continue(())
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    async fn send_signal(&self, signal: ClientSignal) -> Result<(), SignalingError> {
        self.transport.send(signal).await
    }

    /// Sends a signal whose loss only affects one peer.
    async fn send_to_peer(&self, signal: ClientSignal) {
        let event = signal.event_name();
        if let Err(e) = self.send_signal(signal).await {
            error!("Failed to send {} signal: {}", event, e);
        }
    }
}

async fn next_signal(rx: &mut Option<mpsc::Receiver<ServerSignal>>) -> Option<ServerSignal> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
