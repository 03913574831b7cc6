#![forbid(unsafe_code)]

//! Core data model for Porthole.
//!
//! This crate defines the server-supplied "view" documents the rest of the
//! workspace renders and streams: the tagged [`View`] union, the
//! [`ContentResponse`] envelope, and the pure title/icon helpers. Everything
//! here is plain data — no collaborators, no I/O.
//!
//! # Design Notes
//!
//! - Views are immutable once received; updates replace them wholesale.
//! - The wire format is JSON with the type tag carried in `metadata.type`.
//!   Unrecognized tags deserialize into [`ViewConfig::Opaque`] with the raw
//!   config preserved, so unknown view kinds still flow through the system
//!   and reach the fallback renderer.
//! - `metadata.checksum` is an opaque value-equality marker. Consumers
//!   compare it to skip redundant work; this crate never interprets it.

pub mod content;
pub mod icon;
pub mod title;
pub mod view;

pub use content::{Content, ContentResponse, Params};
pub use icon::icon_for;
pub use title::{title_as_text, view_title_as_text};
pub use view::{
    ColorPalette, DonutChartConfig, DonutLabels, DonutSegment, GraphConfig, GraphData, GraphEdge,
    GraphNode, ListConfig, SingleStatConfig, SingleStatValue, TextConfig, View, ViewConfig,
    ViewMetadata,
};
