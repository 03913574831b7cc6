#![forbid(unsafe_code)]

//! View renderers for Porthole.
//!
//! Each renderer takes an immutable [`View`](porthole_core::View) and derives
//! presentation-only display fields from it: arc descriptors for donut
//! charts, node/edge lists for graphs, pluralized captions, tab titles.
//! Renderers never mutate their input and degrade to empty output when no
//! view has been supplied.
//!
//! [`dynamic::DynamicView`] is the dispatcher: it resolves a view's type tag
//! to the matching renderer, short-circuits on unchanged checksums, and falls
//! back to a JSON passthrough for unrecognized tags.

pub mod donut;
pub mod dynamic;
pub mod graph;
pub mod list;
pub mod single_stat;
pub mod text;

pub use donut::{DonutChart, SegmentDescriptor};
pub use dynamic::{DynamicView, JsonPassthrough, RendererInstance};
pub use graph::{GraphDisplay, LabelLine, NodeColor, ThemeMode};
pub use list::ListDisplay;
pub use single_stat::SingleStatDisplay;
pub use text::TextDisplay;

use porthole_core::View;

/// The rendering capability shared by every concrete renderer.
///
/// `apply` feeds a new view value to the renderer, which recomputes whatever
/// derived fields it exposes. Implementations must tolerate views whose tag
/// does not match their expected kind by degrading to empty output.
pub trait ViewRenderer {
    /// Apply a new view value.
    fn apply(&mut self, view: &View);
}
