//! Notification presenter.
//!
//! Builds the now-playing card posted to the host's notification surface.
//! Artwork decoding failures degrade to a text-only card; a missing
//! post-notification permission skips the post entirely, and the next
//! metadata update is the only retry.

use std::path::{Path, PathBuf};

use crate::config::NotificationSettings;
use crate::error::RelayError;
use crate::host::Host;
use crate::state::{PermissionKind, TrackMetadata};

/// Decoded, size-bounded artwork ready for presentation.
#[derive(Clone, Debug, PartialEq)]
pub struct Artwork {
    /// File the host should present. Either the original cover or a scaled
    /// copy when the original exceeded the configured edge.
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NowPlayingCard {
    pub title: String,
    pub artist: String,
    pub duration_ms: u64,
    pub artwork: Option<Artwork>,
}

pub struct Presenter {
    enabled: bool,
    max_art_edge: u32,
    /// Scratch file for scaled-down covers, one per process.
    scaled_art_path: PathBuf,
}

impl Presenter {
    pub fn new(settings: &NotificationSettings) -> Self {
        Self {
            enabled: settings.enabled,
            max_art_edge: settings.max_art_edge,
            scaled_art_path: std::env::temp_dir()
                .join(format!("nbridge-art-{}.png", std::process::id())),
        }
    }

    /// Build the card for `track`, decoding artwork if a cover is present.
    pub fn build_card(&self, track: &TrackMetadata) -> NowPlayingCard {
        let artwork = track.cover_path.as_deref().and_then(|path| {
            match decode_artwork(path, self.max_art_edge, &self.scaled_art_path) {
                Ok(artwork) => Some(artwork),
                Err(e) => {
                    tracing::debug!("artwork unavailable: {e}");
                    None
                }
            }
        });

        NowPlayingCard {
            title: track.title.clone(),
            artist: track.artist.clone(),
            duration_ms: track.duration_ms,
            artwork,
        }
    }

    /// Post (or replace) the ongoing notification for `track`, if the host
    /// currently permits posting.
    pub fn present<H: Host>(&self, host: &H, track: &TrackMetadata) {
        if !self.enabled {
            return;
        }
        if !host.query_permission(PermissionKind::PostNotifications) {
            tracing::debug!("notification permission missing, skipping post");
            return;
        }
        host.post_notification(&self.build_card(track));
    }
}

fn decode_artwork(path: &Path, max_edge: u32, scaled_path: &Path) -> Result<Artwork, RelayError> {
    let img = image::open(path).map_err(|source| RelayError::ArtworkDecode {
        path: path.to_path_buf(),
        source,
    })?;

    if img.width().max(img.height()) <= max_edge {
        return Ok(Artwork {
            path: path.to_path_buf(),
            width: img.width(),
            height: img.height(),
        });
    }

    let scaled = img.thumbnail(max_edge, max_edge);
    match scaled.save(scaled_path) {
        Ok(()) => Ok(Artwork {
            path: scaled_path.to_path_buf(),
            width: scaled.width(),
            height: scaled.height(),
        }),
        Err(e) => {
            // Presenting the oversized original beats dropping the art.
            tracing::debug!("can't write scaled artwork: {e}");
            Ok(Artwork {
                path: path.to_path_buf(),
                width: img.width(),
                height: img.height(),
            })
        }
    }
}
