//! The boundary with the native audio engine.
//!
//! Calls into the engine are plain function calls and infallible, exactly
//! like the external declarations they stand in for. Everything the engine
//! reports back arrives as an [`EngineEvent`] on the channel handed to
//! [`Engine::start`]; the relay drains that channel on its own thread.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Callbacks from the engine into the relay.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// The current track changed. Metadata replaces the previous track
    /// wholesale.
    NowPlaying {
        title: String,
        artist: String,
        cover_path: Option<PathBuf>,
        duration_secs: f64,
    },
    /// Authoritative playback on/off correction.
    Playing(bool),
    /// Authoritative position correction, in seconds.
    Position { position_secs: f64 },
}

/// The normalized native call table.
pub trait Engine {
    /// Engine initialization; the engine keeps `events` for callbacks.
    fn start(&mut self, events: Sender<EngineEvent>);
    /// The user chose a music directory.
    fn directory_selected(&mut self, path: &Path);
    /// The user chose a single file.
    fn file_selected(&mut self, path: &Path);
    fn toggle_pause(&mut self);
    fn play_next(&mut self);
    fn play_previous(&mut self);
    /// Engine-side position unit is seconds.
    fn seek(&mut self, position_secs: f64);
    /// Periodic tick for engines that need one. No-op by default.
    fn poll(&mut self) {}
}

/// Development stand-in for the external engine: cycles through the audio
/// files of the selected directory and echoes transport calls back as
/// events, so the relay is exercisable end to end without the real core.
#[derive(Default)]
pub struct DirectoryEngine {
    events: Option<Sender<EngineEvent>>,
    tracks: Vec<PathBuf>,
    index: usize,
    playing: bool,
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "mp3" | "flac" | "wav" | "ogg"
            )
        })
        .unwrap_or(false)
}

fn find_cover(track: &Path) -> Option<PathBuf> {
    let dir = track.parent()?;
    ["cover.png", "cover.jpg", "folder.jpg"]
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

impl DirectoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    fn announce(&self) {
        let Some(path) = self.tracks.get(self.index) else {
            return;
        };
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        self.emit(EngineEvent::NowPlaying {
            title,
            artist: String::new(),
            cover_path: find_cover(path),
            duration_secs: 0.0,
        });
    }
}

impl Engine for DirectoryEngine {
    fn start(&mut self, events: Sender<EngineEvent>) {
        self.events = Some(events);
    }

    fn directory_selected(&mut self, path: &Path) {
        let mut tracks: Vec<PathBuf> = match fs::read_dir(path) {
            Ok(dir) => dir
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|p| p.is_file() && is_audio_file(p))
                .collect(),
            Err(e) => {
                tracing::warn!("can't read chosen directory {path:?}: {e}");
                return;
            }
        };
        tracks.sort();

        self.tracks = tracks;
        self.index = 0;
        self.playing = !self.tracks.is_empty();
        self.announce();
    }

    fn file_selected(&mut self, path: &Path) {
        self.tracks = vec![path.to_path_buf()];
        self.index = 0;
        self.playing = true;
        self.announce();
    }

    fn toggle_pause(&mut self) {
        self.playing = !self.playing;
        self.emit(EngineEvent::Playing(self.playing));
    }

    fn play_next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.tracks.len();
        self.playing = true;
        self.announce();
    }

    fn play_previous(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.index = (self.index + self.tracks.len() - 1) % self.tracks.len();
        self.playing = true;
        self.announce();
    }

    fn seek(&mut self, position_secs: f64) {
        self.emit(EngineEvent::Position { position_secs });
    }
}
