#![forbid(unsafe_code)]

//! The overview controller.
//!
//! Reacts to location changes and backend reconnects, requests content for
//! the resolved path, and swaps the displayed view set. All transitions go
//! through one explicit [`dispatch`](OverviewController::dispatch) function;
//! the host pumps arrived responses with [`poll`](OverviewController::poll)
//! once per cycle.
//!
//! Content states: `NoContent` (nothing requested), `Loading` (requested,
//! nothing displayable yet), `Loaded` (a view set is displayed). A response
//! with zero view components leaves the controller in `Loading` — the
//! screen keeps its loading state rather than swapping to nothing.

use porthole_core::{icon_for, title_as_text, ContentResponse, Params, View};
use tracing::debug;

use crate::cancel::{CancelHandle, CancelSignal};
use crate::content::{ContentService, ContentStream};

/// Events the host feeds into the controller.
#[derive(Debug, Clone)]
pub enum OverviewEvent {
    /// The route, query parameters, fragment, or backend context changed.
    LocationChanged {
        /// Path segments of the current route.
        segments: Vec<String>,
        /// Current query parameters.
        params: Params,
        /// Current URL fragment.
        fragment: String,
        /// Selected backend context; an empty context suppresses handling.
        context: String,
    },
    /// The backend connection came back; re-fetch even for an unchanged path.
    Reconnected,
    /// A navigation finished; the in-flight request is cancelled.
    NavigationEnded,
    /// The controller's host is going away.
    TornDown,
}

/// How the current view set is displayed.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayMode {
    /// Exactly one view component.
    Single(View),
    /// More than one view component, shown as named tabs.
    Tabbed {
        /// The tab views.
        views: Vec<View>,
        /// Title derived from the content title breadcrumb.
        title: String,
    },
}

/// Content display state.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentState {
    /// Nothing requested yet.
    NoContent,
    /// A request is in flight; nothing displayable has arrived.
    Loading,
    /// A view set is displayed.
    Loaded(DisplayMode),
}

/// Route/reconnect driven controller over the content service.
pub struct OverviewController {
    service: ContentService,
    state: ContentState,
    icon_name: String,
    has_received_content: bool,
    scroll_requested: bool,
    previous_path: String,
    previous_params: Option<Params>,
    last_location: Option<(Vec<String>, Params)>,
    cancel: Option<CancelHandle>,
    stream: Option<ContentStream>,
}

impl OverviewController {
    /// Create a controller over a content service.
    #[must_use]
    pub fn new(service: ContentService) -> Self {
        Self {
            service,
            state: ContentState::NoContent,
            icon_name: String::new(),
            has_received_content: false,
            scroll_requested: false,
            previous_path: String::new(),
            previous_params: None,
            last_location: None,
            cancel: None,
            stream: None,
        }
    }

    /// Feed one event into the controller.
    pub fn dispatch(&mut self, event: OverviewEvent) {
        match event {
            OverviewEvent::LocationChanged {
                segments,
                params,
                context,
                ..
            } => {
                if context.is_empty() {
                    return;
                }
                self.last_location = Some((segments.clone(), params.clone()));
                self.handle_path_change(&segments, params, false);
            }
            OverviewEvent::Reconnected => {
                if let Some((segments, params)) = self.last_location.clone() {
                    debug!("reconnected, forcing content re-fetch");
                    self.handle_path_change(&segments, params, true);
                }
            }
            OverviewEvent::NavigationEnded => {
                if let Some(cancel) = &self.cancel {
                    cancel.fire();
                }
            }
            OverviewEvent::TornDown => {
                self.reset_view();
                if let Some(cancel) = self.cancel.take() {
                    cancel.fire();
                }
                self.stream = None;
            }
        }
    }

    /// Drain the content stream and apply every arrived response.
    ///
    /// Returns how many responses were applied.
    pub fn poll(&mut self) -> usize {
        let Some(stream) = &self.stream else {
            return 0;
        };
        let responses = stream.drain();
        let applied = responses.len();
        for response in responses {
            self.set_content(response);
        }
        applied
    }

    /// Current content state.
    #[must_use]
    pub fn state(&self) -> &ContentState {
        &self.state
    }

    /// Whether displayable content has been received for the current path.
    #[must_use]
    pub fn has_received_content(&self) -> bool {
        self.has_received_content
    }

    /// Whether the current display is tabbed.
    #[must_use]
    pub fn has_tabs(&self) -> bool {
        matches!(self.state, ContentState::Loaded(DisplayMode::Tabbed { .. }))
    }

    /// The single displayed view, if in single-view mode.
    #[must_use]
    pub fn single_view(&self) -> Option<&View> {
        match &self.state {
            ContentState::Loaded(DisplayMode::Single(view)) => Some(view),
            _ => None,
        }
    }

    /// The tab views, if in tabbed mode.
    #[must_use]
    pub fn views(&self) -> Option<&[View]> {
        match &self.state {
            ContentState::Loaded(DisplayMode::Tabbed { views, .. }) => Some(views),
            _ => None,
        }
    }

    /// The tabbed-mode title, if in tabbed mode.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match &self.state {
            ContentState::Loaded(DisplayMode::Tabbed { title, .. }) => Some(title),
            _ => None,
        }
    }

    /// Icon name for the displayed content.
    #[must_use]
    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    /// Consume a pending scroll-to-top request.
    ///
    /// Set on every applied path change; the host scrolls and the flag
    /// resets.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    fn handle_path_change(&mut self, segments: &[String], params: Params, force: bool) {
        let url_path = segments.join("/");
        let current_path = if url_path.is_empty() {
            self.service.default_path().get()
        } else {
            url_path
        };

        let unchanged = current_path == self.previous_path
            && self.previous_params.as_ref() == Some(&params);
        if !force && unchanged {
            return;
        }

        debug!(path = %current_path, force, "path changed, requesting content");
        self.reset_view();
        self.previous_path = current_path.clone();
        self.previous_params = Some(params.clone());
        self.scroll_requested = true;

        let (signal, handle) = CancelSignal::new();
        self.cancel = Some(handle);
        self.stream = self.service.content_for(&current_path, params, &signal);
        if self.stream.is_some() {
            self.state = ContentState::Loading;
        }
    }

    fn reset_view(&mut self) {
        self.state = ContentState::NoContent;
        self.icon_name.clear();
        self.has_received_content = false;
    }

    fn set_content(&mut self, response: ContentResponse) {
        let views = &response.content.view_components;
        if views.is_empty() {
            self.has_received_content = false;
            return;
        }

        self.state = if views.len() > 1 {
            ContentState::Loaded(DisplayMode::Tabbed {
                views: views.clone(),
                title: title_as_text(&response.content.title),
            })
        } else {
            ContentState::Loaded(DisplayMode::Single(views[0].clone()))
        };
        self.has_received_content = true;
        self.icon_name = icon_for(&response.content);
    }
}
