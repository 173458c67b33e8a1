//! The control relay: maps OS media-control events to engine calls and
//! reflects state back into the session surface and notification shelf.
//!
//! The engine is authoritative but its callbacks are not synchronous with
//! the button press, so each transport action performs a dual-write: the
//! engine call first, then an optimistic local update, then the session
//! push. That order is an invariant; engine callbacks later correct any
//! drift.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::Settings;
use crate::engine::{Engine, EngineEvent};
use crate::host::{Host, HostEvent};
use crate::notify::Presenter;
use crate::permissions;
use crate::picker;
use crate::session::{ControlCmd, SessionHandle};
use crate::state::{PermissionKind, PickerKind, PlaybackStatus, RelayState, TrackMetadata};

pub struct Relay<E: Engine, H: Host> {
    engine: E,
    host: H,
    session: SessionHandle,
    presenter: Presenter,
    volumes: HashMap<String, PathBuf>,
    pub(crate) state: RelayState,
}

impl<E: Engine, H: Host> Relay<E, H> {
    pub fn new(
        engine: E,
        host: H,
        session: SessionHandle,
        presenter: Presenter,
        settings: &Settings,
    ) -> Self {
        Self {
            engine,
            host,
            session,
            presenter,
            volumes: settings.storage.volumes.clone(),
            state: RelayState::new(),
        }
    }

    /// Hand the engine its callback channel.
    pub fn start(&mut self, events: std::sync::mpsc::Sender<EngineEvent>) {
        self.engine.start(events);
    }

    /// Handle one inbound transport command. Returns `true` on quit.
    pub fn handle_control(&mut self, cmd: ControlCmd) -> bool {
        match cmd {
            ControlCmd::Quit => return true,
            ControlCmd::Play => {
                if self.state.playback.status == PlaybackStatus::Paused {
                    self.engine.toggle_pause();
                    self.state.playback.status = PlaybackStatus::Playing;
                    self.push_playback();
                }
            }
            // No terminal state in this layer: Stop behaves as pause.
            ControlCmd::Pause | ControlCmd::Stop => {
                if self.state.playback.status == PlaybackStatus::Playing {
                    self.engine.toggle_pause();
                    self.state.playback.status = PlaybackStatus::Paused;
                    self.push_playback();
                }
            }
            ControlCmd::PlayPause => {
                self.engine.toggle_pause();
                self.state.playback.status = self.state.playback.status.toggled();
                self.push_playback();
            }
            ControlCmd::Next => {
                self.engine.play_next();
                self.state.playback.status = PlaybackStatus::Playing;
                self.push_playback();
            }
            ControlCmd::Prev => {
                self.engine.play_previous();
                self.state.playback.status = PlaybackStatus::Playing;
                self.state.playback.position_ms = 0;
                self.push_playback();
            }
            ControlCmd::SeekTo(position_ms) => self.seek_to(position_ms),
            ControlCmd::SeekBy(delta_ms) => {
                let current = self.state.playback.position_ms as i64;
                self.seek_to((current + delta_ms).max(0) as u64);
            }
        }
        false
    }

    fn push_playback(&self) {
        self.session.set_playback(self.state.playback.status);
        self.session.set_position_ms(self.state.playback.position_ms);
    }

    fn seek_to(&mut self, position_ms: u64) {
        // The engine takes seconds; the mirror must report the exact
        // millisecond value it was asked for.
        self.engine.seek(position_ms as f64 / 1000.0);
        self.state.playback.position_ms = position_ms;
        self.push_playback();
    }

    /// Handle one engine callback.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::NowPlaying {
                title,
                artist,
                cover_path,
                duration_secs,
            } => {
                let track = TrackMetadata {
                    title,
                    artist,
                    cover_path,
                    duration_ms: (duration_secs * 1000.0) as u64,
                };
                let serial = self.state.replace_track(track.clone());
                self.session.set_track_metadata(Some(serial), Some(&track));
                self.session.set_position_ms(0);
                self.presenter.present(&self.host, &track);
            }
            EngineEvent::Playing(playing) => {
                self.state.playback.status = if playing {
                    PlaybackStatus::Playing
                } else {
                    PlaybackStatus::Paused
                };
                self.session.set_playback(self.state.playback.status);
            }
            EngineEvent::Position { position_secs } => {
                self.state.playback.position_ms = (position_secs * 1000.0) as u64;
                self.session
                    .set_position_ms(self.state.playback.position_ms);
            }
        }
    }

    /// Handle one asynchronous answer from the host.
    pub fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::PickerResult(kind, None) => {
                tracing::debug!(?kind, "picker dismissed");
                self.state.pending_picker = None;
            }
            HostEvent::PickerResult(kind, Some(raw)) => {
                self.state.pending_picker = None;
                match picker::resolve_selection(&raw, &self.volumes) {
                    Ok(path) => match kind {
                        PickerKind::Directory => self.engine.directory_selected(&path),
                        PickerKind::File => self.engine.file_selected(&path),
                    },
                    Err(e) => tracing::warn!("ignoring picker selection: {e}"),
                }
            }
            HostEvent::PermissionsResult(results) => {
                let read_audio = results
                    .iter()
                    .any(|&(kind, granted)| kind == PermissionKind::ReadAudio && granted);
                if read_audio {
                    if let Some(kind) = self.state.pending_picker {
                        self.host.open_picker(kind);
                    }
                } else if self.state.pending_picker.take().is_some() {
                    tracing::debug!("storage permission denied, abandoning picker");
                }
            }
        }
    }

    pub fn request_directory(&mut self) {
        self.request_picker(PickerKind::Directory);
    }

    pub fn request_file(&mut self) {
        self.request_picker(PickerKind::File);
    }

    fn request_picker(&mut self, kind: PickerKind) {
        if self.state.pending_picker.is_some() {
            tracing::debug!(?kind, "picker request ignored, one already outstanding");
            return;
        }
        self.state.pending_picker = Some(kind);
        if permissions::allows(&self.host, PermissionKind::ReadAudio) {
            self.host.open_picker(kind);
        } else {
            permissions::request_all(&self.host);
        }
    }

    pub fn poll_engine(&mut self) {
        self.engine.poll();
    }

    pub fn shutdown(&mut self) {
        self.host.clear_notification();
    }
}
