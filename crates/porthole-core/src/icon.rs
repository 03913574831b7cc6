#![forbid(unsafe_code)]

//! Icon name lookup.
//!
//! Maps a content descriptor to the icon name the host should display.
//! Loading icon assets is the host's concern; this is the pure name mapping
//! only.

use crate::content::Content;
use crate::title::title_as_text;

/// Icon used when no section matches.
pub const DEFAULT_ICON: &str = "application";

/// Known section prefixes and their icon names.
const ICON_MAP: &[(&str, &str)] = &[
    ("overview", "dashboard"),
    ("workloads", "applications"),
    ("network", "network-globe"),
    ("config and storage", "storage"),
    ("custom resources", "file-group"),
    ("rbac", "assign-user"),
    ("events", "event"),
];

/// Resolve the icon name for a content set.
///
/// The first breadcrumb segment of the content title is matched
/// case-insensitively against the known sections; unmatched content gets
/// [`DEFAULT_ICON`].
#[must_use]
pub fn icon_for(content: &Content) -> String {
    let title = title_as_text(&content.title);
    let section = title
        .split(" / ")
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    ICON_MAP
        .iter()
        .find(|(name, _)| *name == section)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
        .to_owned()
}
