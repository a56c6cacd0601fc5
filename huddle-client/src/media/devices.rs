use crate::error::MediaError;
use crate::media::{LocalStream, LocalTrack, MediaKind};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl MediaConstraints {
    pub const AUDIO_VIDEO: Self = Self {
        audio: true,
        video: true,
    };
}

/// Local capture, the `getUserMedia` of the platform.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn get_user_media(&self, constraints: MediaConstraints)
    -> Result<LocalStream, MediaError>;

    /// Opens the camera again for an existing stream. The track joins
    /// `stream_id` so remote peers keep grouping it with the audio.
    async fn capture_video(&self, stream_id: &str) -> Result<Arc<LocalTrack>, MediaError>;
}

/// Headless devices: tracks carry no samples, but the camera is modelled as an
/// exclusive resource, so opening it twice without stopping the first track
/// fails the same way real hardware does.
pub struct SyntheticDevices {
    live_audio: Arc<AtomicUsize>,
    live_video: Arc<AtomicUsize>,
    captures: AtomicUsize,
    exclusive_camera: bool,
    failure: Mutex<Option<MediaError>>,
}

impl SyntheticDevices {
    pub fn new() -> Self {
        Self {
            live_audio: Arc::new(AtomicUsize::new(0)),
            live_video: Arc::new(AtomicUsize::new(0)),
            captures: AtomicUsize::new(0),
            exclusive_camera: true,
            failure: Mutex::new(None),
        }
    }

    /// Devices that refuse every capture with `error`.
    pub fn failing(error: MediaError) -> Self {
        let devices = Self::new();
        devices.fail_with(Some(error));
        devices
    }

    pub fn with_shared_camera(mut self) -> Self {
        self.exclusive_camera = false;
        self
    }

    pub fn fail_with(&self, error: Option<MediaError>) {
        if let Ok(mut slot) = self.failure.lock() {
            *slot = error;
        }
    }

    /// Video tracks captured and not yet stopped.
    pub fn live_video_tracks(&self) -> usize {
        self.live_video.load(Ordering::SeqCst)
    }

    pub fn live_audio_tracks(&self) -> usize {
        self.live_audio.load(Ordering::SeqCst)
    }

    /// Successful capture calls so far.
    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), MediaError> {
        match self.failure.lock() {
            Ok(slot) => match slot.as_ref() {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            },
            Err(_) => Err(MediaError::Capture("device state poisoned".into())),
        }
    }

    fn open(&self, kind: MediaKind, stream_id: &str) -> Result<Arc<LocalTrack>, MediaError> {
        let counter = match kind {
            MediaKind::Audio => self.live_audio.clone(),
            MediaKind::Video => self.live_video.clone(),
        };

        if kind == MediaKind::Video
            && self.exclusive_camera
            && counter.load(Ordering::SeqCst) > 0
        {
            return Err(MediaError::Capture("camera is already in use".into()));
        }

        counter.fetch_add(1, Ordering::SeqCst);
        let release = counter.clone();
        let track = LocalTrack::new(kind, stream_id).with_release(move || {
            release.fetch_sub(1, Ordering::SeqCst);
        });
        debug!("Opened synthetic {} track {}", kind, track.id());

        Ok(Arc::new(track))
    }
}

impl Default for SyntheticDevices {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaDevices for SyntheticDevices {
    async fn get_user_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<LocalStream, MediaError> {
        self.check_failure()?;

        let stream_id = Uuid::new_v4().to_string();
        let mut tracks = Vec::new();
        if constraints.audio {
            tracks.push(self.open(MediaKind::Audio, &stream_id)?);
        }
        if constraints.video {
            match self.open(MediaKind::Video, &stream_id) {
                Ok(track) => tracks.push(track),
                Err(e) => {
                    for track in &tracks {
                        track.stop();
                    }
                    return Err(e);
                }
            }
        }

        self.captures.fetch_add(1, Ordering::SeqCst);
        Ok(LocalStream::new(stream_id, tracks))
    }

    async fn capture_video(&self, stream_id: &str) -> Result<Arc<LocalTrack>, MediaError> {
        self.check_failure()?;

        let track = self.open(MediaKind::Video, stream_id)?;
        self.captures.fetch_add(1, Ordering::SeqCst);
        Ok(track)
    }
}
