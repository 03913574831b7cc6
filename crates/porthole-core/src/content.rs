#![forbid(unsafe_code)]

//! The content envelope pushed over a channel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::view::View;

/// Query parameters, ordered so equality comparison is deterministic.
pub type Params = BTreeMap<String, Vec<String>>;

/// The body of a content push: the views to display plus a title breadcrumb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Views to display. Zero means "not yet loaded"; one means single-view
    /// mode; more than one means tabbed mode.
    pub view_components: Vec<View>,
    /// Title breadcrumb for the whole content set.
    #[serde(default)]
    pub title: Vec<View>,
}

/// The envelope around [`Content`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentResponse {
    /// The pushed content.
    pub content: Content,
}

impl ContentResponse {
    /// The "nothing loaded yet" response: no views, no title.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            content: Content {
                view_components: Vec::new(),
                title: Vec::new(),
            },
        }
    }

    /// Whether this response carries any views at all.
    #[must_use]
    pub fn has_views(&self) -> bool {
        !self.content.view_components.is_empty()
    }
}

impl Default for ContentResponse {
    fn default() -> Self {
        Self::empty()
    }
}
