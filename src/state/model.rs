//! Model types mirrored from the native engine.

use std::path::PathBuf;

/// Whether the engine is currently producing audio.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self::Paused
    }
}

impl PlaybackStatus {
    /// The status after one toggle-pause. Strict alternation is an invariant
    /// of the engine boundary.
    pub fn toggled(self) -> Self {
        match self {
            Self::Playing => Self::Paused,
            Self::Paused => Self::Playing,
        }
    }
}

/// Mirror of the engine's playback state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub position_ms: u64,
    pub rate: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::default(),
            position_ms: 0,
            rate: 1.0,
        }
    }
}

/// Metadata for the current track. Replaced wholesale on track change,
/// never patched field by field.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub cover_path: Option<PathBuf>,
    pub duration_ms: u64,
}

/// Runtime permissions the host may gate actions on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PermissionKind {
    ReadAudio,
    PostNotifications,
}

/// Snapshot of the host's permission answers. Built fresh on each query,
/// there is no persistent cache.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionState {
    pub read_audio: bool,
    pub post_notifications: bool,
}

impl PermissionState {
    pub fn granted(&self, kind: PermissionKind) -> bool {
        match kind {
            PermissionKind::ReadAudio => self.read_audio,
            PermissionKind::PostNotifications => self.post_notifications,
        }
    }
}

/// Which chooser dialog a picker request opens.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PickerKind {
    Directory,
    File,
}

/// Session context passed to every handler instead of a global singleton.
#[derive(Debug, Default)]
pub struct RelayState {
    pub playback: PlaybackState,
    pub track: Option<TrackMetadata>,
    /// At most one picker request may be outstanding.
    pub pending_picker: Option<PickerKind>,
    /// Monotonic id handed to the session surface so each track gets a
    /// distinct track object path.
    pub track_serial: u64,
}

impl RelayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a wholesale track replacement and restart the position mirror.
    /// Returns the serial assigned to the new track.
    pub fn replace_track(&mut self, track: TrackMetadata) -> u64 {
        self.track_serial += 1;
        self.playback.position_ms = 0;
        self.track = Some(track);
        self.track_serial
    }
}
