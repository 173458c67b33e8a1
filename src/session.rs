//! Media session bridge: the OS-facing transport-control surface.
//!
//! Served as an MPRIS player over the session bus. Inbound transport
//! methods are forwarded to the relay as [`ControlCmd`]s; outbound state is
//! mirrored into a [`SharedState`] through a [`SessionHandle`] and emitted
//! as property-change signals by the service thread.
//!
//! Unit contract: D-Bus positions are microseconds; they are converted to
//! milliseconds at this edge so the relay's contract stays in milliseconds
//! (the engine, in turn, takes seconds).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::state::{PlaybackStatus, TrackMetadata};

/// Transport commands flowing from the session surface into the relay.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
    /// Absolute seek, milliseconds.
    SeekTo(u64),
    /// Relative seek, milliseconds.
    SeekBy(i64),
}

#[derive(Debug)]
pub(crate) struct SharedState {
    pub(crate) playback: PlaybackStatus,
    pub(crate) position_ms: u64,
    pub(crate) rate: f64,
    pub(crate) title: Option<String>,
    pub(crate) artist: Vec<String>,
    pub(crate) length_ms: Option<u64>,
    pub(crate) art_path: Option<PathBuf>,
    pub(crate) track_id: Option<OwnedObjectPath>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            playback: PlaybackStatus::default(),
            position_ms: 0,
            rate: 1.0,
            title: None,
            artist: Vec::new(),
            length_ms: None,
            art_path: None,
            track_id: None,
        }
    }
}

/// Relay-side handle to the session surface.
pub struct SessionHandle {
    pub(crate) state: Arc<Mutex<SharedState>>,
    pub(crate) notify: Sender<()>,
}

impl SessionHandle {
    pub fn set_playback(&self, playback: PlaybackStatus) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
        self.nudge();
    }

    pub fn set_position_ms(&self, position_ms: u64) {
        if let Ok(mut s) = self.state.lock() {
            s.position_ms = position_ms;
        }
        self.nudge();
    }

    pub fn set_track_metadata(&self, serial: Option<u64>, track: Option<&TrackMetadata>) {
        if let Ok(mut s) = self.state.lock() {
            match track {
                Some(track) => {
                    s.title = Some(track.title.clone());
                    s.artist = if track.artist.trim().is_empty() {
                        Vec::new()
                    } else {
                        vec![track.artist.clone()]
                    };
                    s.length_ms = Some(track.duration_ms);
                    s.art_path = track.cover_path.clone();
                    s.track_id = serial.and_then(|i| {
                        ObjectPath::try_from(format!("/org/mpris/MediaPlayer2/track/{i}"))
                            .ok()
                            .map(OwnedObjectPath::from)
                    });
                }
                None => {
                    s.title = None;
                    s.artist = Vec::new();
                    s.length_ms = None;
                    s.art_path = None;
                    s.track_id = None;
                }
            }
        }
        self.nudge();
    }

    fn nudge(&self) {
        let _ = self.notify.send(());
    }
}

struct RootIface {
    identity: String,
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No window to raise.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        &self.identity
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    fn seek(&self, offset_us: i64) {
        let _ = self.tx.send(ControlCmd::SeekBy(offset_us / 1000));
    }

    fn set_position(&self, _track_id: ObjectPath<'_>, position_us: i64) {
        let position_ms = (position_us / 1000).max(0) as u64;
        let _ = self.tx.send(ControlCmd::SeekTo(position_ms));
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Paused";
        };
        match s.playback {
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state
            .lock()
            .map(|s| (s.position_ms as i64) * 1000)
            .unwrap_or(0)
    }

    #[zbus(property)]
    fn rate(&self) -> f64 {
        self.state.lock().map(|s| s.rate).unwrap_or(1.0)
    }

    #[zbus(property)]
    fn minimum_rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn maximum_rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(id) = &s.track_id {
            insert(&mut map, "mpris:trackid", Value::ObjectPath(id.clone().into()));
        }
        if let Some(title) = &s.title {
            insert(&mut map, "xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            insert(&mut map, "xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(length_ms) = s.length_ms {
            insert(&mut map, "mpris:length", Value::from((length_ms as i64) * 1000));
        }
        if let Some(art_path) = &s.art_path {
            insert(
                &mut map,
                "mpris:artUrl",
                Value::from(format!("file://{}", art_path.display())),
            );
        }
        map
    }
}

fn insert(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    if let Ok(value) = OwnedValue::try_from(value) {
        map.insert(key.to_string(), value);
    }
}

/// Register the session surface on the bus. The service thread keeps
/// serving until the process exits; state pushes from the returned handle
/// wake it to emit property-change signals.
pub fn spawn_session(identity: String, tx: Sender<ControlCmd>) -> SessionHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = std::sync::mpsc::channel::<()>();

    let state_for_thread = state.clone();
    let bus_identity = identity.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("session: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection
                .request_name(format!("org.mpris.MediaPlayer2.{bus_identity}"))
                .await
            {
                tracing::warn!("session: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(
                    path,
                    RootIface {
                        identity,
                        tx: tx.clone(),
                    },
                )
                .await
            {
                tracing::warn!("session: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                tracing::warn!("session: failed to register player iface: {e}");
                return;
            }

            let iface_ref = match object_server.interface::<_, PlayerIface>(path).await {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("session: player iface lookup failed: {e}");
                    return;
                }
            };

            loop {
                Timer::after(Duration::from_millis(100)).await;

                let mut dirty = false;
                loop {
                    match notify_rx.try_recv() {
                        Ok(()) => dirty = true,
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => return,
                    }
                }
                if dirty {
                    let iface = iface_ref.get().await;
                    let emitter = iface_ref.signal_emitter();
                    let _ = iface.playback_status_changed(emitter).await;
                    let _ = iface.metadata_changed(emitter).await;
                }
            }
        });
    });

    SessionHandle {
        state,
        notify: notify_tx,
    }
}

#[cfg(test)]
mod tests;
