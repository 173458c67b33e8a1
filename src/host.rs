//! The boundary with the host platform.
//!
//! The host owns pickers, runtime permissions and the notification surface.
//! It is injected as a trait so the relay never reaches for a global: every
//! asynchronous request returns immediately and the answer arrives later as
//! a [`HostEvent`] on the relay's channel. Requests cannot be cancelled;
//! once issued the relay simply waits for the host to answer or never.

use crate::notify::NowPlayingCard;
use crate::state::{PermissionKind, PickerKind};

mod desktop;

pub use desktop::DesktopHost;

/// Answers delivered by the host after an asynchronous request.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    /// Granted/denied flag per requested permission kind.
    PermissionsResult(Vec<(PermissionKind, bool)>),
    /// The raw selection of a picker dialog, `None` on dismissal.
    PickerResult(PickerKind, Option<String>),
}

pub trait Host {
    /// Current answer for one permission. Callers re-query instead of
    /// caching; the user can revoke at any time.
    fn query_permission(&self, kind: PermissionKind) -> bool;
    /// Prompt for the given permissions. The outcome arrives later as
    /// [`HostEvent::PermissionsResult`].
    fn request_permissions(&self, kinds: &[PermissionKind]);
    /// Open a chooser dialog. The outcome arrives later as
    /// [`HostEvent::PickerResult`].
    fn open_picker(&self, kind: PickerKind);
    /// Post or replace the ongoing now-playing notification.
    fn post_notification(&self, card: &NowPlayingCard);
    /// Remove the ongoing notification, if any.
    fn clear_notification(&self);
}
