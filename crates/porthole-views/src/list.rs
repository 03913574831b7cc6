#![forbid(unsafe_code)]

//! List renderer.
//!
//! A list view nests arbitrary item views; this model derives the header
//! title and icon name and exposes a stable per-item key for keyed
//! re-rendering of the item set.

use porthole_core::view::ViewConfig;
use porthole_core::{title_as_text, view_title_as_text, View};

use crate::ViewRenderer;

/// List display model.
#[derive(Debug, Clone, Default)]
pub struct ListDisplay {
    title: String,
    icon_name: String,
    items: Vec<View>,
}

impl ListDisplay {
    /// Create an empty list display.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a view. A non-list view clears the display.
    pub fn update(&mut self, view: &View) {
        match &view.config {
            ViewConfig::List(config) => {
                self.title = view_title_as_text(view);
                self.icon_name = config.icon_name.clone().unwrap_or_default();
                self.items = config.items.clone();
            }
            _ => {
                self.title.clear();
                self.icon_name.clear();
                self.items.clear();
            }
        }
    }

    /// Derived header title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Derived header icon name, empty when the list declares none.
    #[must_use]
    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    /// Item views.
    #[must_use]
    pub fn items(&self) -> &[View] {
        &self.items
    }

    /// Stable identity for an item: its title text.
    #[must_use]
    pub fn item_key(item: &View) -> String {
        title_as_text(&item.metadata.title)
    }
}

impl ViewRenderer for ListDisplay {
    fn apply(&mut self, view: &View) {
        self.update(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use porthole_core::view::ListConfig;

    fn list_view(items: Vec<View>, icon: Option<&str>) -> View {
        View::new(ViewConfig::List(ListConfig {
            items,
            icon_name: icon.map(Into::into),
        }))
        .with_title(vec![View::text("Deployments")])
    }

    #[test]
    fn derives_title_icon_and_items() {
        let items = vec![View::text("a").with_title(vec![View::text("item a")])];
        let mut list = ListDisplay::new();
        list.update(&list_view(items, Some("applications")));

        assert_eq!(list.title(), "Deployments");
        assert_eq!(list.icon_name(), "applications");
        assert_eq!(list.items().len(), 1);
        assert_eq!(ListDisplay::item_key(&list.items()[0]), "item a");
    }

    #[test]
    fn missing_icon_is_empty() {
        let mut list = ListDisplay::new();
        list.update(&list_view(Vec::new(), None));
        assert_eq!(list.icon_name(), "");
    }

    #[test]
    fn non_list_view_clears() {
        let mut list = ListDisplay::new();
        list.update(&list_view(vec![View::text("x")], Some("icon")));
        list.update(&View::text("plain"));
        assert_eq!(list.title(), "");
        assert!(list.items().is_empty());
    }
}
