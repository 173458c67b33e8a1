use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/nbridge/config.toml` or `~/.config/nbridge/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `NBRIDGE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub session: SessionSettings,
    pub notifications: NotificationSettings,
    pub poller: PollerSettings,
    pub storage: StorageSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session: SessionSettings::default(),
            notifications: NotificationSettings::default(),
            poller: PollerSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Last segment of the bus name the session surface registers under.
    pub identity: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            identity: "nbridge".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Whether the now-playing notification is posted at all.
    pub enabled: bool,
    /// Covers larger than this edge (pixels) are scaled down before
    /// presentation.
    pub max_art_edge: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_art_edge: 512,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollerSettings {
    /// Whether to drive `Engine::poll` on a timer. Only needed for engines
    /// without event callbacks.
    pub enabled: bool,
    /// Tick interval in milliseconds.
    pub interval_ms: u64,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Document-tree volume name to mount point, used to resolve
    /// `/tree/<volume>:<relative>` picker selections.
    pub volumes: HashMap<String, PathBuf>,
    /// Whether to open the directory picker right after startup.
    pub ask_directory_on_start: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let mut volumes = HashMap::new();
        volumes.insert("primary".to_string(), PathBuf::from("/storage/emulated/0"));
        Self {
            volumes,
            ask_directory_on_start: true,
        }
    }
}
