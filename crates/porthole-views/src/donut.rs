#![forbid(unsafe_code)]

//! Donut chart renderer.
//!
//! Derives SVG-ready arc descriptors from a donut view: each status segment
//! becomes a `{sweep, offset, css_class}` triple, segments ordered ascending
//! by status with offsets accumulated left to right. The full set of sweeps
//! always adds up to the configured circumference when the total count is
//! positive.

use std::f64::consts::PI;

use porthole_core::view::{DonutChartConfig, ViewConfig};
use porthole_core::View;
use smallvec::SmallVec;

use crate::ViewRenderer;

/// Default circumference of the donut ring.
const DEFAULT_CIRCUMFERENCE: f64 = 100.0;

/// Default height of the viewport box.
const DEFAULT_HEIGHT: f64 = 42.0;

/// One arc of the donut ring.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDescriptor {
    /// Arc length along the ring.
    pub sweep: f64,
    /// Remainder of the ring after this arc.
    pub gap: f64,
    /// Accumulated start offset of this arc.
    pub offset: f64,
    /// CSS class, `"segment-" + status`.
    pub css_class: String,
}

impl SegmentDescriptor {
    /// Stroke dash-array value, `"sweep gap"`.
    #[must_use]
    pub fn dash_array(&self) -> String {
        format!("{} {}", self.sweep, self.gap)
    }

    /// Stable identity for keyed re-rendering.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.css_class
    }
}

/// Donut chart display model.
///
/// Built with display tuning, fed views via [`set_view`](Self::set_view) (or
/// [`ViewRenderer::apply`]). All getters degrade to empty output when no view
/// has been applied.
#[derive(Debug, Clone)]
pub struct DonutChart {
    config: Option<DonutChartConfig>,
    circumference: f64,
    height: f64,
}

impl DonutChart {
    /// Create an empty donut renderer with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: None,
            circumference: DEFAULT_CIRCUMFERENCE,
            height: DEFAULT_HEIGHT,
        }
    }

    /// Set the ring circumference.
    #[must_use]
    pub fn circumference(mut self, circumference: f64) -> Self {
        self.circumference = circumference;
        self
    }

    /// Set the viewport height.
    #[must_use]
    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Apply a view. A non-donut view clears the display.
    pub fn set_view(&mut self, view: &View) {
        self.config = match &view.config {
            ViewConfig::DonutChart(config) => Some(config.clone()),
            _ => None,
        };
    }

    /// Ring radius derived from the circumference.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.circumference / (2.0 * PI)
    }

    /// SVG viewBox string for the configured height.
    #[must_use]
    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.height, self.height)
    }

    /// Center coordinate of the viewport.
    #[must_use]
    pub fn center(&self) -> f64 {
        self.height / 2.0
    }

    /// Total item count across all segments.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.config
            .as_ref()
            .map_or(0, |c| c.segments.iter().map(|s| s.count).sum())
    }

    /// Caption label: singular for a count of zero or one, plural otherwise.
    ///
    /// Empty string when no view has been applied.
    #[must_use]
    pub fn item_label(&self) -> &str {
        let Some(config) = &self.config else {
            return "";
        };
        if self.item_count() > 1 {
            &config.labels.plural
        } else {
            &config.labels.singular
        }
    }

    /// Arc descriptors, ordered ascending by status.
    ///
    /// Empty when no view is applied or the total count is zero. Sweeps are
    /// proportional to segment counts; offsets accumulate the preceding
    /// `(circumference - sweep)` gaps so arcs sit end to end.
    #[must_use]
    pub fn descriptors(&self) -> SmallVec<[SegmentDescriptor; 4]> {
        let Some(config) = &self.config else {
            return SmallVec::new();
        };
        let total = self.item_count();
        if total == 0 {
            return SmallVec::new();
        }

        let mut segments = config.segments.clone();
        segments.sort_by(|a, b| a.status.cmp(&b.status));

        let mut offset = 0.0;
        segments
            .iter()
            .map(|segment| {
                let sweep = segment.count as f64 / total as f64 * self.circumference;
                let descriptor = SegmentDescriptor {
                    sweep,
                    gap: self.circumference - sweep,
                    offset,
                    css_class: format!("segment-{}", segment.status),
                };
                offset += self.circumference - sweep;
                descriptor
            })
            .collect()
    }
}

impl Default for DonutChart {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRenderer for DonutChart {
    fn apply(&mut self, view: &View) {
        self.set_view(view);
    }
}
