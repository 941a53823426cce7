use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{AccountId, AccountProfileId};

/// Per-account profile, created lazily on the first picture upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: AccountProfileId,
    pub account_id: AccountId,
    pub picture: Option<PictureRef>,
    pub updated_at: DateTime<Utc>,
}

/// Where a stored picture lives and how to hand it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureRef {
    /// Storage key relative to the media root, e.g. `profile_pics/<uuid>-me.png`.
    pub path: String,
    pub filename: String,
    pub content_type: String,
}

/// A picture as received from a client.
#[derive(Debug, Clone)]
pub struct PictureUpload {
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// A stored picture ready to be sent to a client.
#[derive(Debug, Clone)]
pub struct PictureDownload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

pub const PICTURE_DIRECTORY: &str = "profile_pics";
const FALLBACK_FILENAME: &str = "picture";
const MAX_FILENAME_LEN: usize = 100;

/// Reduce a client-supplied filename to a safe basename.
///
/// Path components are dropped and anything outside `[A-Za-z0-9._-]` becomes
/// `_`. Leading dots are stripped so the result can never be hidden or `..`.
pub fn sanitize_filename(raw: Option<&str>) -> String {
    let base = raw
        .unwrap_or_default()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned.chars().take(MAX_FILENAME_LEN).collect()
    }
}
