#![forbid(unsafe_code)]

//! Porthole public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports the view model, the renderers, and the streaming runtime, and
//! offers a lightweight prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use porthole_core::{
    icon_for, title_as_text, view_title_as_text, ColorPalette, Content, ContentResponse,
    DonutChartConfig, DonutLabels, DonutSegment, GraphConfig, GraphData, GraphEdge, GraphNode,
    ListConfig, Params, SingleStatConfig, SingleStatValue, TextConfig, View, ViewConfig,
    ViewMetadata,
};

// --- View re-exports -------------------------------------------------------

pub use porthole_views::{
    DonutChart, DynamicView, GraphDisplay, JsonPassthrough, LabelLine, ListDisplay, NodeColor,
    RendererInstance, SegmentDescriptor, SingleStatDisplay, TextDisplay, ThemeMode, ViewRenderer,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use porthole_runtime::{
    CancelHandle, CancelSignal, ContentService, ContentServiceConfig, ContentState, ContentStream,
    DisplayMode, MessageHandler, Navigator, OverviewController, OverviewEvent, PushTransport,
    TransportError, ValueCell, WatcherId,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for porthole hosts.
#[derive(Debug)]
pub enum Error {
    /// The push transport failed.
    #[cfg(feature = "runtime")]
    Transport(porthole_runtime::TransportError),
    /// A content payload could not be used.
    Content(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "runtime")]
            Self::Transport(err) => write!(f, "{err}"),
            Self::Content(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(feature = "runtime")]
impl From<porthole_runtime::TransportError> for Error {
    fn from(err: porthole_runtime::TransportError) -> Self {
        Self::Transport(err)
    }
}

/// Commonly used types, for glob import.
pub mod prelude {
    pub use crate::{
        ContentResponse, DonutChart, DynamicView, GraphDisplay, Params, ThemeMode, View,
        ViewConfig, ViewRenderer,
    };
    #[cfg(feature = "runtime")]
    pub use crate::{
        CancelSignal, ContentService, ContentServiceConfig, ContentState, OverviewController,
        OverviewEvent,
    };
}
