use crate::media::{LocalTrack, MediaKind};
use std::sync::Arc;

/// The session's capture stream. Exactly one exists per session and only the
/// session stops its tracks.
#[derive(Debug)]
pub struct LocalStream {
    id: String,
    tracks: Vec<Arc<LocalTrack>>,
}

impl LocalStream {
    pub fn new(id: impl Into<String>, tracks: Vec<Arc<LocalTrack>>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[Arc<LocalTrack>] {
        &self.tracks
    }

    pub fn tracks_of(&self, kind: MediaKind) -> impl Iterator<Item = &Arc<LocalTrack>> {
        self.tracks.iter().filter(move |t| t.kind() == kind)
    }

    pub fn video_track(&self) -> Option<&Arc<LocalTrack>> {
        self.tracks_of(MediaKind::Video).next()
    }

    pub fn audio_track(&self) -> Option<&Arc<LocalTrack>> {
        self.tracks_of(MediaKind::Audio).next()
    }

    /// Flips the mute flag in place; tracks stay attached.
    pub fn set_enabled(&self, kind: MediaKind, enabled: bool) {
        for track in self.tracks_of(kind) {
            track.set_enabled(enabled);
        }
    }

    /// Stops and detaches every video track, releasing the camera.
    pub fn detach_video(&mut self) -> Vec<Arc<LocalTrack>> {
        let (video, rest): (Vec<_>, Vec<_>) = self
            .tracks
            .drain(..)
            .partition(|t| t.kind() == MediaKind::Video);
        self.tracks = rest;

        for track in &video {
            track.stop();
        }
        video
    }

    pub fn add_track(&mut self, track: Arc<LocalTrack>) {
        self.tracks.push(track);
    }

    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}
