use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::media::{MediaConstraints, MediaDevices};
use crate::peer::PeerConnector;
use crate::session::presence::PresenceBoard;
use crate::session::{Session, SessionEvent, SessionEvents, SessionHandle, SessionParts};
use crate::signaling::SignalingTransport;
use huddle_core::{ClientSignal, PeerId, RoomId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Entry point: joins rooms and reports every session's events on one channel.
pub struct CallClient {
    config: SessionConfig,
    transport: Arc<dyn SignalingTransport>,
    devices: Arc<dyn MediaDevices>,
    connector: Arc<dyn PeerConnector>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl CallClient {
    pub fn new(
        config: SessionConfig,
        transport: Arc<dyn SignalingTransport>,
        devices: Arc<dyn MediaDevices>,
        connector: Arc<dyn PeerConnector>,
    ) -> (Self, SessionEvents) {
        let (events, events_rx) = mpsc::unbounded_channel();
        (
            Self {
                config,
                transport,
                devices,
                connector,
                events,
            },
            events_rx,
        )
    }

    /// Captures local media, announces the user to the room and starts the
    /// session. A capture failure is reported before any signaling happens.
    pub async fn join_room(
        &self,
        room_id: impl Into<RoomId>,
        user_id: impl Into<PeerId>,
        user_name: impl Into<String>,
    ) -> Result<SessionHandle, SessionError> {
        let room_id = room_id.into();
        let local_id = user_id.into();
        let local_name = user_name.into();

        let local_stream = match self
            .devices
            .get_user_media(MediaConstraints::AUDIO_VIDEO)
            .await
        {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Local media unavailable: {}", e);
                let _ = self.events.send(SessionEvent::MediaError(e.clone()));
                return Err(e.into());
            }
        };
        let _ = self.events.send(SessionEvent::LocalStream {
            stream_id: local_stream.id().to_owned(),
            tracks: local_stream.tracks().to_vec(),
        });

        let signal_rx = match self.transport.connect().await {
            Ok(rx) => rx,
            Err(e) => {
                local_stream.stop_all();
                return Err(e.into());
            }
        };

        let join = ClientSignal::JoinRoom {
            room_id: room_id.clone(),
            user_id: local_id.clone(),
            user_name: local_name.clone(),
        };
        if let Err(e) = self.transport.send(join).await {
            local_stream.stop_all();
            self.transport.disconnect().await;
            return Err(e.into());
        }
        info!("Joined room {:?} as {:?} ({})", room_id, local_id, local_name);

        let (command_tx, command_rx) = mpsc::channel(self.config.command_capacity.max(1));
        let presence = PresenceBoard::default();

        let session = Session::new(SessionParts {
            room_id: room_id.clone(),
            local_id: local_id.clone(),
            local_name,
            local_stream,
            presence: presence.clone(),
            transport: self.transport.clone(),
            devices: self.devices.clone(),
            connector: self.connector.clone(),
            events: self.events.clone(),
            command_rx,
            signal_rx,
        });
        tokio::spawn(session.run());

        Ok(SessionHandle::new(room_id, local_id, command_tx, presence))
    }
}
