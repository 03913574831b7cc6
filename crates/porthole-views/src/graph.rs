#![forbid(unsafe_code)]

//! Graph renderer.
//!
//! Keeps derived node and edge lists, recomputing them only when the
//! incoming config actually differs from the last one applied — graph
//! redraws are the most expensive in the layer, so unchanged pushes must not
//! touch the lists. Node colors resolve against an explicit theme mode
//! supplied by the host.

use porthole_core::view::{GraphConfig, GraphData, GraphEdge, GraphNode, ViewConfig};
use porthole_core::View;
use smallvec::SmallVec;

use crate::ViewRenderer;

/// Line height for multi-line node labels, in `em`.
const LABEL_LINE_HEIGHT_EM: usize = 1;

/// Host theme mode used to pick palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
}

/// Resolved node colors for the current theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeColor {
    /// Foreground color.
    pub fg: String,
    /// Background color.
    pub bg: String,
}

/// One line of a split node label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLine {
    /// Vertical offset, e.g. `"0em"`, `"1em"`.
    pub y_em: String,
    /// The line text.
    pub line: String,
}

/// Graph display model with change-gated node/edge lists.
#[derive(Debug, Clone, Default)]
pub struct GraphDisplay {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    last_config: Option<GraphConfig>,
    recompute_count: u64,
}

impl GraphDisplay {
    /// Create an empty graph display.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a view, recomputing the lists only when the config changed.
    ///
    /// A non-graph view is ignored. The config is cloned into the display so
    /// later mutation of caller-held data cannot alias the lists.
    pub fn update(&mut self, view: &View) {
        let ViewConfig::Graph(config) = &view.config else {
            return;
        };
        if self.last_config.as_ref() == Some(config) {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = config.nodes.len(),
            edges = config.edges.len(),
            "graph updated"
        );

        self.nodes = config.nodes.clone();
        self.edges = config.edges.clone();
        self.last_config = Some(config.clone());
        self.recompute_count += 1;
    }

    /// Derived node list.
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Derived edge list.
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// How many times the lists have been recomputed.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Resolve a node's palette against the given theme mode.
    #[must_use]
    pub fn node_color(data: &GraphData, mode: ThemeMode) -> NodeColor {
        match mode {
            ThemeMode::Light => NodeColor {
                fg: data.palette.light_fg.clone(),
                bg: data.palette.light_bg.clone(),
            },
            ThemeMode::Dark => NodeColor {
                fg: data.palette.dark_fg.clone(),
                bg: data.palette.dark_bg.clone(),
            },
        }
    }

    /// Split a label on newlines into positioned lines.
    #[must_use]
    pub fn label_lines(label: &str) -> SmallVec<[LabelLine; 2]> {
        label
            .split('\n')
            .enumerate()
            .map(|(index, line)| LabelLine {
                y_em: format!("{}em", index * LABEL_LINE_HEIGHT_EM),
                line: line.to_owned(),
            })
            .collect()
    }
}

impl ViewRenderer for GraphDisplay {
    fn apply(&mut self, view: &View) {
        self.update(view);
    }
}
