//! Picker relay helpers.
//!
//! Hosts hand back either a plain filesystem path (desktop dialogs) or a
//! document-tree selection of the form `/tree/<volume>:<relative>`. Tree
//! selections resolve through a configured volume map; an unknown volume is
//! an explicit error rather than a silently wrong path.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::RelayError;

const TREE_PREFIX: &str = "/tree/";

/// Normalize a raw picker selection into a filesystem path.
pub fn resolve_selection(
    raw: &str,
    volumes: &HashMap<String, PathBuf>,
) -> Result<PathBuf, RelayError> {
    let Some(rest) = raw.strip_prefix(TREE_PREFIX) else {
        if raw.is_empty() {
            return Err(RelayError::MalformedSelection(raw.to_string()));
        }
        return Ok(PathBuf::from(raw));
    };

    let Some((volume, relative)) = rest.split_once(':') else {
        return Err(RelayError::MalformedSelection(raw.to_string()));
    };

    let mount = volumes
        .get(volume)
        .ok_or_else(|| RelayError::UnknownVolume(volume.to_string()))?;
    Ok(mount.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volumes() -> HashMap<String, PathBuf> {
        let mut v = HashMap::new();
        v.insert("primary".to_string(), PathBuf::from("/storage/emulated/0"));
        v.insert("sdcard".to_string(), PathBuf::from("/mnt/media/sdcard"));
        v
    }

    #[test]
    fn tree_selection_resolves_through_volume_map() {
        let path = resolve_selection("/tree/primary:Music", &volumes()).unwrap();
        assert_eq!(path, PathBuf::from("/storage/emulated/0/Music"));

        let path = resolve_selection("/tree/sdcard:Albums/Live", &volumes()).unwrap();
        assert_eq!(path, PathBuf::from("/mnt/media/sdcard/Albums/Live"));
    }

    #[test]
    fn plain_paths_pass_through() {
        let path = resolve_selection("/home/user/Music", &volumes()).unwrap();
        assert_eq!(path, PathBuf::from("/home/user/Music"));
    }

    #[test]
    fn unknown_volume_is_an_error_not_a_guess() {
        let err = resolve_selection("/tree/usb0:Music", &volumes()).unwrap_err();
        assert!(matches!(err, RelayError::UnknownVolume(v) if v == "usb0"));
    }

    #[test]
    fn malformed_selections_are_rejected() {
        assert!(matches!(
            resolve_selection("/tree/primaryMusic", &volumes()),
            Err(RelayError::MalformedSelection(_))
        ));
        assert!(matches!(
            resolve_selection("", &volumes()),
            Err(RelayError::MalformedSelection(_))
        ));
    }
}
