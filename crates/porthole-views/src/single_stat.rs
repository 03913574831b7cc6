#![forbid(unsafe_code)]

//! Single-stat renderer: one headline number with a title and a color.

use porthole_core::view::{SingleStatConfig, ViewConfig};
use porthole_core::View;

use crate::ViewRenderer;

/// Single-stat display model.
#[derive(Debug, Clone, Default)]
pub struct SingleStatDisplay {
    config: Option<SingleStatConfig>,
}

impl SingleStatDisplay {
    /// Create an empty single-stat display.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a view. A non-single-stat view clears the display.
    pub fn set_view(&mut self, view: &View) {
        self.config = match &view.config {
            ViewConfig::SingleStat(config) => Some(config.clone()),
            _ => None,
        };
    }

    /// Tile title, empty when no view is applied.
    #[must_use]
    pub fn title(&self) -> &str {
        self.config.as_ref().map_or("", |c| c.title.as_str())
    }

    /// Statistic text, empty when no view is applied.
    #[must_use]
    pub fn value_text(&self) -> &str {
        self.config.as_ref().map_or("", |c| c.value.text.as_str())
    }

    /// Statistic color name, empty when no view is applied.
    #[must_use]
    pub fn color(&self) -> &str {
        self.config.as_ref().map_or("", |c| c.value.color.as_str())
    }
}

impl ViewRenderer for SingleStatDisplay {
    fn apply(&mut self, view: &View) {
        self.set_view(view);
    }
}
