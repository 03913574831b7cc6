#![forbid(unsafe_code)]

//! The content service.
//!
//! Owns the mapping from logical channels (keyed by content path) to
//! subscriber streams, bridges backend pushes to those streams, and issues
//! the `createContentStream`/`destroyContentStream` control messages.
//!
//! # Lifecycle
//!
//! 1. `content_for` opens a channel: one create message, one registered
//!    subscriber, one namespace watch.
//! 2. Inbound `channelContent` pushes are forwarded only to subscribers of
//!    the matching channel, in arrival order.
//! 3. A namespace change cycles the backend stream: destroy, then create
//!    with the new namespace. The channel id is unchanged, so subscribers
//!    keep their registration.
//! 4. The cancel signal fires once: the namespace watch is dropped, the
//!    subscriber is unregistered, and exactly one destroy message goes out.
//! 5. A `channelDestroy` acknowledgement closes the remaining subscriber
//!    streams for that channel, so callers can observe teardown completion.

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use porthole_core::{ContentResponse, Params};
use serde::Serialize;
use tracing::{debug, warn};

use crate::cancel::CancelSignal;
use crate::navigator::Navigator;
use crate::transport::{
    ChannelContent, ChannelDestroy, CreateContentStream, DestroyContentStream, PushTransport,
    MSG_CHANNEL_CONTENT, MSG_CHANNEL_DESTROY, MSG_CREATE_CONTENT_STREAM,
    MSG_DESTROY_CONTENT_STREAM,
};
use crate::value_cell::ValueCell;

/// Content service tuning.
#[derive(Debug, Clone)]
pub struct ContentServiceConfig {
    /// Namespace used when the shared cell holds an empty value.
    pub default_namespace: String,
}

impl Default for ContentServiceConfig {
    fn default() -> Self {
        Self {
            default_namespace: "default".to_owned(),
        }
    }
}

struct ChannelSub {
    id: u64,
    sender: mpsc::Sender<ContentResponse>,
}

#[derive(Default)]
struct ServiceState {
    previous_content_path: String,
    channels: HashMap<String, Vec<ChannelSub>>,
    next_sub_id: u64,
}

struct ServiceInner {
    transport: Arc<dyn PushTransport>,
    navigator: Arc<dyn Navigator>,
    namespace: ValueCell<String>,
    default_path: ValueCell<String>,
    current: ValueCell<ContentResponse>,
    config: ContentServiceConfig,
    state: Mutex<ServiceState>,
}

/// A cold subscriber stream for one channel.
///
/// Responses arrive in push order; the caller drains them on its own cadence
/// (the controller does so once per poll cycle). The stream disconnects when
/// the backend acknowledges channel destruction.
pub struct ContentStream {
    channel_id: String,
    receiver: mpsc::Receiver<ContentResponse>,
}

impl ContentStream {
    /// The channel this stream is scoped to.
    #[must_use]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Drain all pending responses.
    #[must_use]
    pub fn drain(&self) -> Vec<ContentResponse> {
        self.receiver.try_iter().collect()
    }

    /// Take the next pending response without blocking.
    pub fn try_next(&self) -> Result<ContentResponse, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Wait up to `timeout` for the next response.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<ContentResponse, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// The content service. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ContentService {
    inner: Arc<ServiceInner>,
}

impl ContentService {
    /// Create a service over its collaborators and register the inbound
    /// message handlers.
    #[must_use]
    pub fn new(
        transport: Arc<dyn PushTransport>,
        navigator: Arc<dyn Navigator>,
        namespace: ValueCell<String>,
        config: ContentServiceConfig,
    ) -> Self {
        let inner = Arc::new(ServiceInner {
            transport,
            navigator,
            namespace,
            default_path: ValueCell::new(String::new()),
            current: ValueCell::new(ContentResponse::empty()),
            config,
            state: Mutex::new(ServiceState::default()),
        });

        let weak = Arc::downgrade(&inner);
        inner.transport.register_handler(
            MSG_CHANNEL_CONTENT,
            Arc::new(move |payload| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                match serde_json::from_value::<ChannelContent>(payload.clone()) {
                    Ok(update) => inner.handle_channel_content(update),
                    Err(err) => warn!(%err, "dropping malformed channelContent payload"),
                }
            }),
        );

        let weak = Arc::downgrade(&inner);
        inner.transport.register_handler(
            MSG_CHANNEL_DESTROY,
            Arc::new(move |payload| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                match serde_json::from_value::<ChannelDestroy>(payload.clone()) {
                    Ok(update) => inner.handle_channel_destroy(update),
                    Err(err) => warn!(%err, "dropping malformed channelDestroy payload"),
                }
            }),
        );

        Self { inner }
    }

    /// Open a content stream for a path.
    ///
    /// Returns `None` for an empty path. Otherwise the channel id is the
    /// path itself: a create message goes out, and the returned stream
    /// receives every matching `channelContent` push until `cancel` fires.
    #[must_use]
    pub fn content_for(
        &self,
        content_path: &str,
        params: Params,
        cancel: &CancelSignal,
    ) -> Option<ContentStream> {
        if content_path.is_empty() {
            return None;
        }
        let channel_id = content_path.to_owned();
        let mut namespace = self.inner.namespace.get();
        if namespace.is_empty() {
            namespace = self.inner.config.default_namespace.clone();
        }

        debug!(channel_id = %channel_id, namespace = %namespace, "starting content stream");
        self.inner
            .create_content_stream(content_path, &channel_id, &params, &namespace);

        let (sender, receiver) = mpsc::channel();
        let sub_id = {
            let mut state = self.inner.state.lock().unwrap();
            let id = state.next_sub_id;
            state.next_sub_id += 1;
            state
                .channels
                .entry(channel_id.clone())
                .or_default()
                .push(ChannelSub { id, sender });
            id
        };

        // Namespace watch: the backend stream is namespace-scoped, so a
        // namespace move cycles it under the same channel id.
        let weak = Arc::downgrade(&self.inner);
        let last_namespace = Arc::new(Mutex::new(namespace));
        let watch_path = content_path.to_owned();
        let watch_channel = channel_id.clone();
        let watch_params = params.clone();
        let watcher_id = self.inner.namespace.subscribe(move |new_namespace: &String| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut last = last_namespace.lock().unwrap();
            if *last == *new_namespace {
                return;
            }
            debug!(
                old = %last,
                new = %new_namespace,
                channel_id = %watch_channel,
                "namespace changed, cycling content stream"
            );
            inner.destroy_content_stream(&watch_channel);
            inner.create_content_stream(&watch_path, &watch_channel, &watch_params, new_namespace);
            *last = new_namespace.clone();
        });

        let weak = Arc::downgrade(&self.inner);
        let cancel_channel = channel_id.clone();
        cancel.on_fire(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            debug!(channel_id = %cancel_channel, "cancelling content stream");
            inner.namespace.unsubscribe(watcher_id);
            inner.remove_subscription(&cancel_channel, sub_id);
            inner.destroy_content_stream(&cancel_channel);
        });

        Some(ContentStream {
            channel_id,
            receiver,
        })
    }

    /// The shared active-namespace cell.
    #[must_use]
    pub fn namespace(&self) -> ValueCell<String> {
        self.inner.namespace.clone()
    }

    /// The default content path used when navigation yields an empty path.
    #[must_use]
    pub fn default_path(&self) -> ValueCell<String> {
        self.inner.default_path.clone()
    }

    /// The most recently pushed content response.
    #[must_use]
    pub fn current(&self) -> ValueCell<ContentResponse> {
        self.inner.current.clone()
    }
}

impl ServiceInner {
    fn create_content_stream(
        &self,
        content_path: &str,
        channel_id: &str,
        params: &Params,
        namespace: &str,
    ) {
        let payload = CreateContentStream {
            content_path: content_path.to_owned(),
            channel_id: channel_id.to_owned(),
            params: params.clone(),
            namespace: namespace.to_owned(),
        };
        self.send(MSG_CREATE_CONTENT_STREAM, &payload);
    }

    fn destroy_content_stream(&self, channel_id: &str) {
        let payload = DestroyContentStream {
            channel_id: channel_id.to_owned(),
        };
        self.send(MSG_DESTROY_CONTENT_STREAM, &payload);
    }

    fn send<T: Serialize>(&self, kind: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => {
                if let Err(err) = self.transport.send_message(kind, value) {
                    warn!(%err, kind, "transport send failed");
                }
            }
            Err(err) => warn!(%err, kind, "payload encoding failed"),
        }
    }

    fn handle_channel_content(&self, update: ChannelContent) {
        let ChannelContent {
            content,
            namespace,
            content_path,
            channel_id,
            query_params,
        } = update;
        let response = ContentResponse { content };

        {
            let state = self.state.lock().unwrap();
            if let Some(subs) = state.channels.get(&channel_id) {
                for sub in subs {
                    let _ = sub.sender.send(response.clone());
                }
            }
        }

        self.current.set(response);
        self.namespace.set(namespace);

        if content_path.is_empty() {
            return;
        }
        let path_moved = {
            let mut state = self.state.lock().unwrap();
            let moved = !state.previous_content_path.is_empty()
                && state.previous_content_path != content_path;
            state.previous_content_path = content_path.clone();
            moved
        };
        if path_moved {
            debug!(path = %content_path, "content path moved, navigating");
            let segments: Vec<String> = content_path.split('/').map(str::to_owned).collect();
            self.navigator.navigate(&segments, &query_params);
        }
    }

    fn handle_channel_destroy(&self, update: ChannelDestroy) {
        let removed = self
            .state
            .lock()
            .unwrap()
            .channels
            .remove(&update.channel_id);
        match removed {
            Some(subs) => {
                debug!(
                    channel_id = %update.channel_id,
                    subscribers = subs.len(),
                    "channel destroyed, closing subscriber streams"
                );
                // Dropping the senders disconnects the receivers.
            }
            None => debug!(channel_id = %update.channel_id, "channel destroyed, no subscribers"),
        }
    }

    fn remove_subscription(&self, channel_id: &str, sub_id: u64) {
        let mut state = self.state.lock().unwrap();
        if let Some(subs) = state.channels.get_mut(channel_id) {
            subs.retain(|sub| sub.id != sub_id);
            if subs.is_empty() {
                state.channels.remove(channel_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::MockNavigator;
    use crate::transport::MockTransport;
    use porthole_core::View;
    use serde_json::json;
    use std::sync::mpsc::TryRecvError;

    fn setup() -> (Arc<MockTransport>, Arc<MockNavigator>, ContentService) {
        let transport = Arc::new(MockTransport::new());
        let navigator = Arc::new(MockNavigator::new());
        let service = ContentService::new(
            transport.clone(),
            navigator.clone(),
            ValueCell::new(String::new()),
            ContentServiceConfig::default(),
        );
        (transport, navigator, service)
    }

    fn content_push(channel_id: &str, path: &str, values: &[&str]) -> serde_json::Value {
        let views: Vec<serde_json::Value> = values
            .iter()
            .map(|v| serde_json::to_value(View::text(*v)).unwrap())
            .collect();
        json!({
            "content": { "viewComponents": views },
            "namespace": "default",
            "contentPath": path,
            "channelID": channel_id,
            "queryParams": {},
        })
    }

    #[test]
    fn empty_path_yields_no_stream() {
        let (transport, _, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        assert!(service.content_for("", Params::new(), &signal).is_none());
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn create_message_carries_the_request() {
        let (transport, _, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        let mut params = Params::new();
        params.insert("filter".into(), vec!["app:nginx".into()]);

        let stream = service
            .content_for("overview/pods", params, &signal)
            .expect("non-empty path yields a stream");
        assert_eq!(stream.channel_id(), "overview/pods");

        let sent = transport.sent_of_kind(MSG_CREATE_CONTENT_STREAM);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["contentPath"], "overview/pods");
        assert_eq!(sent[0]["channelID"], "overview/pods");
        assert_eq!(sent[0]["namespace"], "default");
        assert_eq!(sent[0]["params"]["filter"][0], "app:nginx");
    }

    #[test]
    fn active_namespace_wins_over_default() {
        let (transport, _, service) = setup();
        service.namespace().set("kube-system".to_owned());
        let (signal, _handle) = CancelSignal::new();
        let _stream = service.content_for("/pods", Params::new(), &signal);

        let sent = transport.sent_of_kind(MSG_CREATE_CONTENT_STREAM);
        assert_eq!(sent[0]["namespace"], "kube-system");
    }

    #[test]
    fn matching_channel_content_is_forwarded() {
        let (transport, _, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        let stream = service.content_for("/pods", Params::new(), &signal).unwrap();

        transport.push(MSG_CHANNEL_CONTENT, content_push("/pods", "", &["hi"]));

        let responses = stream.drain();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].content.view_components.len(), 1);
    }

    #[test]
    fn non_matching_channel_is_filtered() {
        let (transport, _, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        let stream = service.content_for("/pods", Params::new(), &signal).unwrap();

        transport.push(MSG_CHANNEL_CONTENT, content_push("/services", "", &["x"]));
        assert!(stream.drain().is_empty());
    }

    #[test]
    fn cancel_sends_exactly_one_destroy_and_stops_forwarding() {
        let (transport, _, service) = setup();
        let (signal, handle) = CancelSignal::new();
        let stream = service.content_for("/pods", Params::new(), &signal).unwrap();

        handle.fire();
        handle.fire();

        let destroys = transport.sent_of_kind(MSG_DESTROY_CONTENT_STREAM);
        assert_eq!(destroys.len(), 1);
        assert_eq!(destroys[0]["channelID"], "/pods");

        transport.push(MSG_CHANNEL_CONTENT, content_push("/pods", "", &["late"]));
        assert!(stream.drain().is_empty());
    }

    #[test]
    fn namespace_change_cycles_the_stream() {
        let (transport, _, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        let _stream = service.content_for("/pods", Params::new(), &signal).unwrap();

        service.namespace().set("monitoring".to_owned());

        let kinds: Vec<String> = transport.sent().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                MSG_CREATE_CONTENT_STREAM,
                MSG_DESTROY_CONTENT_STREAM,
                MSG_CREATE_CONTENT_STREAM,
            ]
        );
        let creates = transport.sent_of_kind(MSG_CREATE_CONTENT_STREAM);
        assert_eq!(creates[1]["namespace"], "monitoring");
        assert_eq!(creates[1]["channelID"], "/pods");
    }

    #[test]
    fn unchanged_namespace_does_not_cycle() {
        let (transport, _, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        let _stream = service.content_for("/pods", Params::new(), &signal).unwrap();

        // The stream opened under the fallback namespace; setting the cell
        // to the same value must not cycle.
        service.namespace().set("default".to_owned());
        assert!(transport.sent_of_kind(MSG_DESTROY_CONTENT_STREAM).is_empty());
        assert_eq!(transport.sent_of_kind(MSG_CREATE_CONTENT_STREAM).len(), 1);
    }

    #[test]
    fn content_update_sets_namespace_and_current() {
        let (transport, _, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        let _stream = service.content_for("/pods", Params::new(), &signal).unwrap();

        transport.push(MSG_CHANNEL_CONTENT, {
            let mut push = content_push("/pods", "", &["v"]);
            push["namespace"] = json!("kube-system");
            push
        });

        assert_eq!(service.namespace().get(), "kube-system");
        assert!(service.current().get().has_views());
    }

    #[test]
    fn content_path_move_triggers_navigation() {
        let (transport, navigator, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        let _stream = service.content_for("/pods", Params::new(), &signal).unwrap();

        transport.push(
            MSG_CHANNEL_CONTENT,
            content_push("/pods", "overview/pods", &["v"]),
        );
        assert!(navigator.recorded().is_empty());

        transport.push(
            MSG_CHANNEL_CONTENT,
            content_push("/pods", "overview/deployments", &["v"]),
        );
        let recorded = navigator.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, vec!["overview", "deployments"]);
    }

    #[test]
    fn same_content_path_does_not_navigate() {
        let (transport, navigator, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        let _stream = service.content_for("/pods", Params::new(), &signal).unwrap();

        transport.push(
            MSG_CHANNEL_CONTENT,
            content_push("/pods", "overview/pods", &["v"]),
        );
        transport.push(
            MSG_CHANNEL_CONTENT,
            content_push("/pods", "overview/pods", &["v"]),
        );
        assert!(navigator.recorded().is_empty());
    }

    #[test]
    fn destroy_ack_closes_subscriber_streams() {
        let (transport, _, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        let stream = service.content_for("/pods", Params::new(), &signal).unwrap();

        transport.push(MSG_CHANNEL_DESTROY, json!({ "channelID": "/pods" }));

        assert_eq!(stream.try_next(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn destroy_ack_for_other_channel_leaves_stream_open() {
        let (transport, _, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        let stream = service.content_for("/pods", Params::new(), &signal).unwrap();

        transport.push(MSG_CHANNEL_DESTROY, json!({ "channelID": "/services" }));

        assert_eq!(stream.try_next(), Err(TryRecvError::Empty));
    }

    #[test]
    fn malformed_payloads_are_dropped() {
        let (transport, _, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        let stream = service.content_for("/pods", Params::new(), &signal).unwrap();

        transport.push(MSG_CHANNEL_CONTENT, json!({ "bogus": true }));
        transport.push(MSG_CHANNEL_DESTROY, json!("nope"));

        assert_eq!(stream.try_next(), Err(TryRecvError::Empty));
    }

    #[test]
    fn dropped_service_ignores_pushes() {
        let (transport, _, service) = setup();
        drop(service);
        // Handlers hold only weak references; this must be a no-op.
        transport.push(MSG_CHANNEL_CONTENT, content_push("/pods", "", &["v"]));
    }

    #[test]
    fn forwarding_preserves_push_order() {
        let (transport, _, service) = setup();
        let (signal, _handle) = CancelSignal::new();
        let stream = service.content_for("/pods", Params::new(), &signal).unwrap();

        transport.push(MSG_CHANNEL_CONTENT, content_push("/pods", "", &["one"]));
        transport.push(MSG_CHANNEL_CONTENT, content_push("/pods", "", &["two"]));

        let responses = stream.drain();
        assert_eq!(responses.len(), 2);
        let first = &responses[0].content.view_components[0];
        assert_eq!(first, &View::text("one"));
    }
}
