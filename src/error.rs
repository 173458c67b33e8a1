use std::path::PathBuf;

use thiserror::Error;

use crate::state::PermissionKind;

/// Failures in the relay layer.
///
/// None of these surface to the user as a crash: denied permissions abandon
/// the gated action, cancelled pickers are no-ops and artwork problems
/// degrade to a text-only notification.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("required permission denied: {0:?}")]
    PermissionDenied(PermissionKind),

    #[error("picker dismissed without a selection")]
    PickerCancelled,

    #[error("selection references unknown storage volume {0:?}")]
    UnknownVolume(String),

    #[error("malformed document-tree selection {0:?}")]
    MalformedSelection(String),

    #[error("failed to decode artwork at {path:?}")]
    ArtworkDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
