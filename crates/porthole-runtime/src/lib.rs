#![forbid(unsafe_code)]

//! Content streaming runtime for Porthole.
//!
//! This crate keeps the displayed view set synchronized with a backend push
//! channel as the user navigates:
//!
//! 1. The [`OverviewController`] reacts to location changes and reconnects,
//!    resolves the content path, and asks the [`ContentService`] for a
//!    stream.
//! 2. The service opens a logical channel (a `createContentStream` control
//!    message keyed by channel id) over the [`PushTransport`] collaborator
//!    and forwards matching `channelContent` pushes to the caller.
//! 3. A per-navigation [`CancelSignal`] tears the channel down again with a
//!    single `destroyContentStream` message.
//!
//! All collaborators (transport, navigator, namespace selector) are traits
//! or shared value cells implemented by the host; mocks for both ship here
//! for tests.

pub mod cancel;
pub mod content;
pub mod error;
pub mod navigator;
pub mod overview;
pub mod transport;
pub mod value_cell;

pub use cancel::{CancelHandle, CancelSignal};
pub use content::{ContentService, ContentServiceConfig, ContentStream};
pub use error::TransportError;
pub use navigator::{MockNavigator, Navigator};
pub use overview::{ContentState, DisplayMode, OverviewController, OverviewEvent};
pub use transport::{
    ChannelContent, ChannelDestroy, CreateContentStream, DestroyContentStream, MessageHandler,
    MockTransport, PushTransport, MSG_CHANNEL_CONTENT, MSG_CHANNEL_DESTROY,
    MSG_CREATE_CONTENT_STREAM, MSG_DESTROY_CONTENT_STREAM,
};
pub use value_cell::{ValueCell, WatcherId};
