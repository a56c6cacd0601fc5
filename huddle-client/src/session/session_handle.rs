use crate::error::SessionError;
use crate::media::MediaKind;
use crate::peer::PeerState;
use crate::session::presence::PresenceBoard;
use crate::session::session_command::SessionCommand;
use crate::session::{RemotePresence, RenegotiationReport, Session};
use huddle_core::{PeerId, RoomId};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerSnapshot {
    pub peer_id: PeerId,
    pub name: String,
    pub state: PeerState,
    pub polite: bool,
    pub pending_candidates: usize,
    pub remote_tracks: Vec<MediaKind>,
    pub presence: RemotePresence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub room_id: RoomId,
    pub local_id: PeerId,
    pub local_name: String,
    pub audio_enabled: bool,
    pub video_enabled: bool,
    pub hand_raised: bool,
    pub audio_track_id: Option<String>,
    pub video_track_id: Option<String>,
    /// Sorted by peer id.
    pub peers: Vec<PeerSnapshot>,
}

/// Cheap to clone. The session leaves the room once the last handle is dropped.
#[derive(Clone)]
pub struct SessionHandle {
    room_id: RoomId,
    local_id: PeerId,
    commands: mpsc::Sender<SessionCommand>,
    presence: PresenceBoard,
}

impl SessionHandle {
    pub(crate) fn new(
        room_id: RoomId,
        local_id: PeerId,
        commands: mpsc::Sender<SessionCommand>,
        presence: PresenceBoard,
    ) -> Self {
        Self {
            room_id,
            local_id,
            commands,
            presence,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn local_id(&self) -> &PeerId {
        &self.local_id
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Leaving twice is not an error.
    pub async fn leave_room(&self) -> Result<(), SessionError> {
        match self.request(|reply| SessionCommand::Leave { reply }).await {
            Ok(()) | Err(SessionError::Closed) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn toggle_audio(&self, enabled: bool) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::ToggleAudio { enabled, reply })
            .await?
    }

    pub async fn toggle_video(&self, enabled: bool) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::ToggleVideo { enabled, reply })
            .await?
    }

    pub async fn restart_video(&self) -> Result<RenegotiationReport, SessionError> {
        self.request(|reply| SessionCommand::RestartVideo { reply })
            .await?
    }

    pub async fn raise_hand(&self, raised: bool) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::RaiseHand { raised, reply })
            .await?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| SessionCommand::Snapshot { reply })
            .await
    }

    pub fn is_remote_video_enabled(&self, peer_id: &PeerId) -> bool {
        self.presence.video_enabled(peer_id)
    }

    pub fn is_remote_audio_enabled(&self, peer_id: &PeerId) -> bool {
        self.presence.audio_enabled(peer_id)
    }

    pub fn is_remote_hand_raised(&self, peer_id: &PeerId) -> bool {
        self.presence.hand_raised(peer_id)
    }
}

impl Session {
    pub(super) fn snapshot(&self) -> SessionSnapshot {
        let mut peers: Vec<PeerSnapshot> = self
            .peers
            .entries()
            .map(|entry| PeerSnapshot {
                peer_id: entry.peer_id.clone(),
                name: entry.name.clone(),
                state: entry.state,
                polite: entry.polite,
                pending_candidates: self.peers.pending_candidates(&entry.peer_id),
                remote_tracks: entry
                    .remote_stream
                    .as_ref()
                    .map(|s| s.tracks.iter().map(|t| t.kind).collect())
                    .unwrap_or_default(),
                presence: self.presence.get(&entry.peer_id),
            })
            .collect();
        peers.sort_by(|a, b| a.peer_id.cmp(&b.peer_id));

        SessionSnapshot {
            room_id: self.room_id.clone(),
            local_id: self.local_id.clone(),
            local_name: self.local_name.clone(),
            audio_enabled: self.audio_enabled,
            video_enabled: self.video_enabled,
            hand_raised: self.hand_raised,
            audio_track_id: self.local_stream.audio_track().map(|t| t.id().to_owned()),
            video_track_id: self.local_stream.video_track().map(|t| t.id().to_owned()),
            peers,
        }
    }
}
