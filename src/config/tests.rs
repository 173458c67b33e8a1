use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_nbridge_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("NBRIDGE_CONFIG_PATH", "/tmp/nbridge-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/nbridge-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/xdg-config-home")
            .join("nbridge")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("nbridge")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[session]
identity = "nbridge_test"

[notifications]
enabled = false
max_art_edge = 128

[poller]
enabled = true
interval_ms = 200

[storage]
ask_directory_on_start = false

[storage.volumes]
primary = "/storage/emulated/0"
sdcard = "/mnt/media/sdcard"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("NBRIDGE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("NBRIDGE__POLLER__INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.session.identity, "nbridge_test");
    assert!(!s.notifications.enabled);
    assert_eq!(s.notifications.max_art_edge, 128);
    assert!(s.poller.enabled);
    assert_eq!(s.poller.interval_ms, 200);
    assert!(!s.storage.ask_directory_on_start);
    assert_eq!(
        s.storage.volumes.get("sdcard"),
        Some(&PathBuf::from("/mnt/media/sdcard"))
    );
    assert_eq!(
        s.storage.volumes.get("primary"),
        Some(&PathBuf::from("/storage/emulated/0"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[poller]
interval_ms = 200
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("NBRIDGE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("NBRIDGE__POLLER__INTERVAL_MS", "50");

    let s = Settings::load().unwrap();
    assert_eq!(s.poller.interval_ms, 50);
}

#[test]
fn defaults_carry_the_primary_volume() {
    let s = Settings::default();
    assert_eq!(
        s.storage.volumes.get("primary"),
        Some(&PathBuf::from("/storage/emulated/0"))
    );
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.session.identity = "has spaces".to_string();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.poller.enabled = true;
    s.poller.interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.notifications.max_art_edge = 0;
    assert!(s.validate().is_err());
}
