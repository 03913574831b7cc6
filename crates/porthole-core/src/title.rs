#![forbid(unsafe_code)]

//! Title helpers.
//!
//! Titles arrive as a breadcrumb of nested views (text views in practice).
//! These helpers flatten them to display strings; non-text components are
//! skipped.

use crate::view::{View, ViewConfig};

/// Separator between breadcrumb segments.
const TITLE_SEPARATOR: &str = " / ";

/// Flatten a title breadcrumb to a display string.
///
/// Text components are joined in order with `" / "`; components of any other
/// kind contribute nothing.
#[must_use]
pub fn title_as_text(title: &[View]) -> String {
    let parts: Vec<&str> = title
        .iter()
        .filter_map(|view| match &view.config {
            ViewConfig::Text(text) => Some(text.value.as_str()),
            _ => None,
        })
        .collect();
    parts.join(TITLE_SEPARATOR)
}

/// Flatten a view's own title breadcrumb to a display string.
#[must_use]
pub fn view_title_as_text(view: &View) -> String {
    title_as_text(&view.metadata.title)
}
