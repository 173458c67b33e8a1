//! Desktop host: native file dialogs, freedesktop notifications, and a
//! permission model where everything is granted.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use std::thread;

use zvariant::Value;

use crate::host::{Host, HostEvent};
use crate::notify::NowPlayingCard;
use crate::state::{PermissionKind, PickerKind};

const NOTIFY_DEST: &str = "org.freedesktop.Notifications";
const NOTIFY_PATH: &str = "/org/freedesktop/Notifications";

pub struct DesktopHost {
    events: Sender<HostEvent>,
    bus: Option<zbus::blocking::Connection>,
    /// Server-assigned notification id, reused on every post so the shell
    /// replaces the card instead of stacking a new one.
    notification_id: Mutex<u32>,
}

impl DesktopHost {
    pub fn new(events: Sender<HostEvent>) -> Self {
        let bus = match zbus::blocking::Connection::session() {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!("notifications unavailable, no session bus: {e}");
                None
            }
        };
        Self {
            events,
            bus,
            notification_id: Mutex::new(0),
        }
    }
}

impl Host for DesktopHost {
    fn query_permission(&self, _kind: PermissionKind) -> bool {
        // Desktop shells have no runtime permission gate.
        true
    }

    fn request_permissions(&self, kinds: &[PermissionKind]) {
        let granted = kinds.iter().map(|&k| (k, true)).collect();
        let _ = self.events.send(HostEvent::PermissionsResult(granted));
    }

    fn open_picker(&self, kind: PickerKind) {
        // rfd blocks until the user answers; run it off the relay thread so
        // control keeps flowing while the dialog is up.
        let tx = self.events.clone();
        thread::spawn(move || {
            let picked = match kind {
                PickerKind::Directory => rfd::FileDialog::new().pick_folder(),
                PickerKind::File => rfd::FileDialog::new().pick_file(),
            };
            let raw = picked.map(|p| p.to_string_lossy().into_owned());
            let _ = tx.send(HostEvent::PickerResult(kind, raw));
        });
    }

    fn post_notification(&self, card: &NowPlayingCard) {
        let Some(bus) = &self.bus else {
            tracing::debug!("skipping notification post, no session bus");
            return;
        };

        let mut hints: HashMap<&str, Value<'_>> = HashMap::new();
        if let Some(art) = &card.artwork {
            hints.insert(
                "image-path",
                Value::from(art.path.to_string_lossy().into_owned()),
            );
        }

        let mut id = match self.notification_id.lock() {
            Ok(id) => id,
            Err(_) => return,
        };
        let reply = bus.call_method(
            Some(NOTIFY_DEST),
            NOTIFY_PATH,
            Some(NOTIFY_DEST),
            "Notify",
            &(
                "nbridge",
                *id,
                "",
                card.title.as_str(),
                card.artist.as_str(),
                Vec::<String>::new(),
                hints,
                0i32,
            ),
        );
        match reply {
            Ok(message) => {
                if let Ok(new_id) = message.body().deserialize::<u32>() {
                    *id = new_id;
                }
            }
            Err(e) => tracing::debug!("notification post failed: {e}"),
        }
    }

    fn clear_notification(&self) {
        let Some(bus) = &self.bus else {
            return;
        };
        let id = match self.notification_id.lock() {
            Ok(id) => *id,
            Err(_) => return,
        };
        if id == 0 {
            return;
        }
        if let Err(e) = bus.call_method(
            Some(NOTIFY_DEST),
            NOTIFY_PATH,
            Some(NOTIFY_DEST),
            "CloseNotification",
            &(id,),
        ) {
            tracing::debug!("closing notification failed: {e}");
        }
    }
}
