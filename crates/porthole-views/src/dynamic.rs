#![forbid(unsafe_code)]

//! Dynamic view dispatcher.
//!
//! Resolves a view's type tag to the matching renderer and manages the
//! mounted instance: mount on first view, update in place on subsequent
//! views, remount when the tag changes, dispose exactly once on teardown.
//!
//! The checksum rule is load-bearing for correctness under reordered
//! pushes: a view whose checksum equals the previously applied one is a
//! no-op, including the case where both checksums are absent.

use porthole_core::View;

use crate::donut::DonutChart;
use crate::graph::GraphDisplay;
use crate::list::ListDisplay;
use crate::single_stat::SingleStatDisplay;
use crate::text::TextDisplay;
use crate::ViewRenderer;

/// Fallback renderer for unrecognized tags: a pretty-printed JSON
/// passthrough of the whole view payload.
#[derive(Debug, Clone, Default)]
pub struct JsonPassthrough {
    pretty: String,
}

impl JsonPassthrough {
    /// Create an empty passthrough.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The pretty-printed payload.
    #[must_use]
    pub fn pretty(&self) -> &str {
        &self.pretty
    }
}

impl ViewRenderer for JsonPassthrough {
    fn apply(&mut self, view: &View) {
        self.pretty = serde_json::to_string_pretty(view).unwrap_or_default();
    }
}

/// A mounted renderer, one variant per recognized tag plus the fallback.
#[derive(Debug, Clone)]
pub enum RendererInstance {
    /// Donut chart renderer.
    Donut(DonutChart),
    /// Graph renderer.
    Graph(GraphDisplay),
    /// List renderer.
    List(ListDisplay),
    /// Text renderer.
    Text(TextDisplay),
    /// Single-stat renderer.
    SingleStat(SingleStatDisplay),
    /// JSON passthrough for unrecognized tags.
    Fallback(JsonPassthrough),
}

impl RendererInstance {
    /// Resolve and mount the renderer for a view's tag.
    fn mount_for(view: &View) -> Self {
        use porthole_core::view::ViewConfig;

        let mut instance = match &view.config {
            ViewConfig::DonutChart(_) => Self::Donut(DonutChart::new()),
            ViewConfig::Graph(_) => Self::Graph(GraphDisplay::new()),
            ViewConfig::List(_) => Self::List(ListDisplay::new()),
            ViewConfig::Text(_) => Self::Text(TextDisplay::new()),
            ViewConfig::SingleStat(_) => Self::SingleStat(SingleStatDisplay::new()),
            ViewConfig::Opaque { .. } => Self::Fallback(JsonPassthrough::new()),
        };
        instance.apply(view);
        instance
    }

    /// Whether this instance renders views of the given view's kind.
    fn matches(&self, view: &View) -> bool {
        use porthole_core::view::ViewConfig;

        matches!(
            (self, &view.config),
            (Self::Donut(_), ViewConfig::DonutChart(_))
                | (Self::Graph(_), ViewConfig::Graph(_))
                | (Self::List(_), ViewConfig::List(_))
                | (Self::Text(_), ViewConfig::Text(_))
                | (Self::SingleStat(_), ViewConfig::SingleStat(_))
                | (Self::Fallback(_), ViewConfig::Opaque { .. })
        )
    }

    fn apply(&mut self, view: &View) {
        match self {
            Self::Donut(r) => r.apply(view),
            Self::Graph(r) => r.apply(view),
            Self::List(r) => r.apply(view),
            Self::Text(r) => r.apply(view),
            Self::SingleStat(r) => r.apply(view),
            Self::Fallback(r) => r.apply(view),
        }
    }
}

/// The dispatcher: a two-state machine over a mounted renderer.
///
/// States are *no instance* and *instance mounted*; the terminal transition
/// is [`dispose`](Self::dispose), taken exactly once.
#[derive(Debug, Clone, Default)]
pub struct DynamicView {
    instance: Option<RendererInstance>,
    last_checksum: Option<Option<String>>,
    render_count: u64,
    disposed: bool,
}

impl DynamicView {
    /// Create a dispatcher with no mounted instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a new view to the dispatcher.
    ///
    /// No-ops when the dispatcher has been disposed, or when the view's
    /// checksum equals the previously applied view's checksum.
    pub fn on_view(&mut self, view: &View) {
        if self.disposed {
            return;
        }
        if let Some(previous) = &self.last_checksum {
            if *previous == view.metadata.checksum {
                #[cfg(feature = "tracing")]
                tracing::trace!(tag = view.type_tag(), "checksum unchanged, skipping render");
                return;
            }
        }

        self.instance = match self.instance.take() {
            Some(mut instance) if instance.matches(view) => {
                instance.apply(view);
                Some(instance)
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::debug!(tag = view.type_tag(), "mounting renderer");
                Some(RendererInstance::mount_for(view))
            }
        };

        self.last_checksum = Some(view.metadata.checksum.clone());
        self.render_count += 1;
    }

    /// The mounted instance, if any.
    #[must_use]
    pub fn instance(&self) -> Option<&RendererInstance> {
        self.instance.as_ref()
    }

    /// Whether an instance is currently mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.instance.is_some()
    }

    /// How many renders (mounts or in-place updates) have happened.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Tear the dispatcher down, dropping the mounted instance.
    ///
    /// Idempotent; only the first call does anything.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.instance = None;
    }

    /// Whether the dispatcher has been torn down.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use porthole_core::view::{DonutChartConfig, DonutLabels, ViewConfig};
    use serde_json::json;

    fn donut_view() -> View {
        View::new(ViewConfig::DonutChart(DonutChartConfig {
            segments: Vec::new(),
            labels: DonutLabels {
                plural: "items".into(),
                singular: "item".into(),
            },
        }))
    }

    fn opaque_view() -> View {
        View::new(ViewConfig::Opaque {
            tag: "flexLayout".into(),
            config: json!({ "sections": [] }),
        })
    }

    #[test]
    fn first_view_mounts_matching_renderer() {
        let mut dispatcher = DynamicView::new();
        dispatcher.on_view(&View::text("hi").with_checksum("a"));

        assert!(dispatcher.is_mounted());
        assert!(matches!(
            dispatcher.instance(),
            Some(RendererInstance::Text(_))
        ));
        assert_eq!(dispatcher.render_count(), 1);
    }

    #[test]
    fn equal_checksum_is_a_no_op() {
        let mut dispatcher = DynamicView::new();
        dispatcher.on_view(&View::text("hi").with_checksum("a"));
        dispatcher.on_view(&View::text("hi again").with_checksum("a"));
        assert_eq!(dispatcher.render_count(), 1);
    }

    #[test]
    fn absent_checksums_also_skip() {
        let mut dispatcher = DynamicView::new();
        dispatcher.on_view(&View::text("one"));
        dispatcher.on_view(&View::text("two"));
        assert_eq!(dispatcher.render_count(), 1);
    }

    #[test]
    fn changed_checksum_updates_in_place() {
        let mut dispatcher = DynamicView::new();
        dispatcher.on_view(&View::text("one").with_checksum("a"));
        dispatcher.on_view(&View::text("two").with_checksum("b"));
        assert_eq!(dispatcher.render_count(), 2);

        let Some(RendererInstance::Text(text)) = dispatcher.instance() else {
            panic!("expected text renderer");
        };
        assert_eq!(text.value(), "two");
    }

    #[test]
    fn unrecognized_tag_mounts_fallback() {
        let mut dispatcher = DynamicView::new();
        dispatcher.on_view(&opaque_view().with_checksum("a"));

        let Some(RendererInstance::Fallback(passthrough)) = dispatcher.instance() else {
            panic!("expected fallback renderer");
        };
        assert!(passthrough.pretty().contains("flexLayout"));
    }

    #[test]
    fn tag_change_remounts() {
        let mut dispatcher = DynamicView::new();
        dispatcher.on_view(&View::text("one").with_checksum("a"));
        dispatcher.on_view(&donut_view().with_checksum("b"));

        assert!(matches!(
            dispatcher.instance(),
            Some(RendererInstance::Donut(_))
        ));
        assert_eq!(dispatcher.render_count(), 2);
    }

    #[test]
    fn dispose_is_idempotent_and_terminal() {
        let mut dispatcher = DynamicView::new();
        dispatcher.on_view(&View::text("one").with_checksum("a"));

        dispatcher.dispose();
        assert!(dispatcher.is_disposed());
        assert!(!dispatcher.is_mounted());

        dispatcher.dispose();
        dispatcher.on_view(&View::text("two").with_checksum("b"));
        assert!(!dispatcher.is_mounted());
        assert_eq!(dispatcher.render_count(), 1);
    }
}
