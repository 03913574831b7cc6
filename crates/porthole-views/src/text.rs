#![forbid(unsafe_code)]

//! Text renderer.

use porthole_core::view::ViewConfig;
use porthole_core::View;

use crate::ViewRenderer;

/// Text display model: the value plus its markdown flag.
///
/// Markdown rendering itself is the host's concern; the flag only tells the
/// host which path to take.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDisplay {
    value: String,
    is_markdown: bool,
}

impl TextDisplay {
    /// Create an empty text display.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a view. A non-text view clears the display.
    pub fn set_view(&mut self, view: &View) {
        match &view.config {
            ViewConfig::Text(config) => {
                self.value = config.value.clone();
                self.is_markdown = config.is_markdown;
            }
            _ => {
                self.value.clear();
                self.is_markdown = false;
            }
        }
    }

    /// The text value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the value is markdown source.
    #[must_use]
    pub fn is_markdown(&self) -> bool {
        self.is_markdown
    }
}

impl ViewRenderer for TextDisplay {
    fn apply(&mut self, view: &View) {
        self.set_view(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use porthole_core::view::TextConfig;

    #[test]
    fn copies_value_and_flag() {
        let view = View::new(ViewConfig::Text(TextConfig {
            value: "# heading".into(),
            is_markdown: true,
        }));
        let mut text = TextDisplay::new();
        text.set_view(&view);
        assert_eq!(text.value(), "# heading");
        assert!(text.is_markdown());
    }

    #[test]
    fn non_text_view_clears() {
        let mut text = TextDisplay::new();
        text.set_view(&View::text("hello"));
        text.set_view(&View::new(ViewConfig::Opaque {
            tag: "mystery".into(),
            config: serde_json::Value::Null,
        }));
        assert_eq!(text.value(), "");
        assert!(!text.is_markdown());
    }
}
