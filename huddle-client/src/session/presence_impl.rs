use crate::error::{SessionError, SignalingError};
use crate::media::MediaKind;
use crate::session::{Session, SessionEvent};
use huddle_core::{ClientSignal, PeerId};
use std::collections::HashMap;
use tracing::{debug, info};

impl Session {
    pub(super) fn handle_hand_raised(&self, peer_id: PeerId, raised: bool) {
        if peer_id == self.local_id {
            return;
        }
        self.presence
            .update(peer_id.clone(), |p| p.hand_raised = raised);
        self.emit(SessionEvent::HandRaised { peer_id, raised });
    }

    pub(super) fn handle_video_state(&self, peer_id: PeerId, enabled: bool) {
        if peer_id == self.local_id {
            return;
        }
        self.presence.update(peer_id.clone(), |p| p.video = Some(enabled));
        self.emit(SessionEvent::RemoteVideoState { peer_id, enabled });
    }

    pub(super) fn handle_audio_state(&self, peer_id: PeerId, enabled: bool) {
        if peer_id == self.local_id {
            return;
        }
        self.presence.update(peer_id.clone(), |p| p.audio = Some(enabled));
        self.emit(SessionEvent::RemoteAudioState { peer_id, enabled });
    }

    /// Snapshot of everyone already in the room, sent once after joining.
    pub(super) fn handle_room_state(
        &self,
        mut video: HashMap<PeerId, bool>,
        mut audio: HashMap<PeerId, bool>,
    ) {
        video.remove(&self.local_id);
        audio.remove(&self.local_id);
        debug!(
            "Room state: {} video, {} audio entries",
            video.len(),
            audio.len()
        );

        for (peer_id, enabled) in &video {
            let enabled = *enabled;
            self.presence.update(peer_id.clone(), |p| p.video = Some(enabled));
        }
        for (peer_id, enabled) in &audio {
            let enabled = *enabled;
            self.presence.update(peer_id.clone(), |p| p.audio = Some(enabled));
        }

        self.emit(SessionEvent::RoomState { video, audio });
    }

    pub(super) async fn toggle_audio(&mut self, enabled: bool) -> Result<(), SessionError> {
        self.local_stream.set_enabled(MediaKind::Audio, enabled);
        self.audio_enabled = enabled;
        info!("Local audio {}", if enabled { "unmuted" } else { "muted" });

        self.send_signal(ClientSignal::AudioState {
            room_id: self.room_id.clone(),
            enabled,
        })
        .await?;
        Ok(())
    }

    /// Disabling mutes the current camera track. Enabling always captures a
    /// fresh track, since the previous one may have been released.
    pub(super) async fn toggle_video(&mut self, enabled: bool) -> Result<(), SessionError> {
        if enabled {
            return self.restart_video().await.map(|_| ());
        }

        self.local_stream.set_enabled(MediaKind::Video, false);
        self.announce_video_state(false).await?;
        Ok(())
    }

    /// Records the local camera state and tells the room.
    pub(super) async fn announce_video_state(&mut self, enabled: bool) -> Result<(), SignalingError> {
        self.video_enabled = enabled;
        info!("Local video {}", if enabled { "on" } else { "off" });

        self.send_signal(ClientSignal::VideoState {
            room_id: self.room_id.clone(),
            enabled,
        })
        .await
    }

    pub(super) async fn raise_hand(&mut self, raised: bool) -> Result<(), SessionError> {
        self.hand_raised = raised;
        self.send_signal(ClientSignal::HandRaise {
            room_id: self.room_id.clone(),
            raised,
        })
        .await?;
        Ok(())
    }
}
