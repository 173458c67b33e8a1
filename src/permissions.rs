//! Permission gate.
//!
//! Directory and file access are gated on the read-audio permission;
//! posting notifications on its own permission. Denial abandons the gated
//! action; there is no automatic retry.

use crate::host::Host;
use crate::state::{PermissionKind, PermissionState};

/// Fresh snapshot of the host's answers. Deliberately not cached.
pub fn snapshot<H: Host>(host: &H) -> PermissionState {
    PermissionState {
        read_audio: host.query_permission(PermissionKind::ReadAudio),
        post_notifications: host.query_permission(PermissionKind::PostNotifications),
    }
}

pub fn allows<H: Host>(host: &H, kind: PermissionKind) -> bool {
    host.query_permission(kind)
}

/// Prompt for every permission the relay can need. Both kinds go out in one
/// request, matching the single prompt flow users see.
pub fn request_all<H: Host>(host: &H) {
    host.request_permissions(&[PermissionKind::ReadAudio, PermissionKind::PostNotifications]);
}
