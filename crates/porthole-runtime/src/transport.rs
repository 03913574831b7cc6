#![forbid(unsafe_code)]

//! Push/subscribe transport contract and wire payloads.
//!
//! The transport is an opaque collaborator: it delivers JSON payloads for
//! registered message kinds and accepts outbound messages. Delivery is
//! at-least-once with no ordering guarantee across message kinds; everything
//! downstream must stay idempotent under duplicates and reordering.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use porthole_core::{Content, Params};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;

/// Outbound: open a logical content stream.
pub const MSG_CREATE_CONTENT_STREAM: &str = "createContentStream";
/// Outbound: tear a logical content stream down.
pub const MSG_DESTROY_CONTENT_STREAM: &str = "destroyContentStream";
/// Inbound: a content update for one channel.
pub const MSG_CHANNEL_CONTENT: &str = "channelContent";
/// Inbound: acknowledgement that a channel was destroyed.
pub const MSG_CHANNEL_DESTROY: &str = "channelDestroy";

/// Callback invoked for each inbound message of a registered kind.
pub type MessageHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// The push/subscribe transport collaborator.
pub trait PushTransport: Send + Sync {
    /// Register a handler for one inbound message kind.
    ///
    /// Multiple handlers per kind are allowed; all of them fire.
    fn register_handler(&self, kind: &str, handler: MessageHandler);

    /// Send one outbound message.
    fn send_message(&self, kind: &str, payload: Value) -> Result<(), TransportError>;
}

/// `createContentStream` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentStream {
    /// Content path the stream should serve.
    pub content_path: String,
    /// Channel id scoping the pushes back to this requester.
    #[serde(rename = "channelID")]
    pub channel_id: String,
    /// Query parameters for the request.
    pub params: Params,
    /// Namespace variant to serve.
    pub namespace: String,
}

/// `destroyContentStream` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestroyContentStream {
    /// Channel id of the stream to destroy.
    #[serde(rename = "channelID")]
    pub channel_id: String,
}

/// Inbound `channelContent` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContent {
    /// The pushed content body.
    pub content: Content,
    /// Namespace the content was generated in.
    #[serde(default)]
    pub namespace: String,
    /// Path the content belongs to; may differ from the requested one when
    /// the backend redirects.
    #[serde(default)]
    pub content_path: String,
    /// Channel the push is scoped to.
    #[serde(rename = "channelID")]
    pub channel_id: String,
    /// Query parameters the backend resolved.
    #[serde(default)]
    pub query_params: Params,
}

/// Inbound `channelDestroy` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDestroy {
    /// Channel that was destroyed.
    #[serde(rename = "channelID")]
    pub channel_id: String,
}

#[derive(Default)]
struct MockState {
    handlers: HashMap<String, Vec<MessageHandler>>,
    sent: Vec<(String, Value)>,
}

/// In-memory transport double.
///
/// Records every outbound message and lets tests inject inbound pushes.
/// Handlers run synchronously on the injecting thread, outside the internal
/// lock so they may send messages back through the same transport.
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    /// Create an empty mock transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject an inbound message, firing all handlers for its kind.
    pub fn push(&self, kind: &str, payload: Value) {
        let handlers: Vec<MessageHandler> = {
            let state = self.state.lock().unwrap();
            state.handlers.get(kind).cloned().unwrap_or_default()
        };
        for handler in handlers {
            handler(&payload);
        }
    }

    /// All outbound messages, in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Outbound payloads of one kind, in send order.
    #[must_use]
    pub fn sent_of_kind(&self, kind: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .sent
            .iter()
            .filter(|(k, _)| k == kind)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

impl PushTransport for MockTransport {
    fn register_handler(&self, kind: &str, handler: MessageHandler) {
        self.state
            .lock()
            .unwrap()
            .handlers
            .entry(kind.to_owned())
            .or_default()
            .push(handler);
    }

    fn send_message(&self, kind: &str, payload: Value) -> Result<(), TransportError> {
        self.state
            .lock()
            .unwrap()
            .sent
            .push((kind.to_owned(), payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn records_sent_messages_in_order() {
        let transport = MockTransport::new();
        transport
            .send_message("a", json!({ "n": 1 }))
            .expect("mock send never fails");
        transport.send_message("b", json!({ "n": 2 })).unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "a");
        assert_eq!(sent[1].1["n"], 2);
        assert_eq!(transport.sent_of_kind("a").len(), 1);
    }

    #[test]
    fn push_fires_registered_handlers() {
        let transport = MockTransport::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        transport.register_handler(
            "tick",
            Arc::new(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        transport.push("tick", json!({}));
        transport.push("other", json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handler_may_send_through_the_same_transport() {
        let transport = Arc::new(MockTransport::new());
        let inner = transport.clone();
        transport.register_handler(
            "ping",
            Arc::new(move |_| {
                inner.send_message("pong", json!({})).unwrap();
            }),
        );

        transport.push("ping", json!({}));
        assert_eq!(transport.sent_of_kind("pong").len(), 1);
    }

    #[test]
    fn create_payload_wire_shape() {
        let payload = CreateContentStream {
            content_path: "overview/pods".into(),
            channel_id: "overview/pods".into(),
            params: Params::new(),
            namespace: "default".into(),
        };
        let encoded = serde_json::to_value(&payload).unwrap();
        assert_eq!(encoded["contentPath"], "overview/pods");
        assert_eq!(encoded["channelID"], "overview/pods");
        assert_eq!(encoded["namespace"], "default");
    }

    #[test]
    fn channel_content_parses_with_defaults() {
        let decoded: ChannelContent = serde_json::from_value(json!({
            "content": { "viewComponents": [] },
            "channelID": "/pods",
        }))
        .unwrap();
        assert_eq!(decoded.channel_id, "/pods");
        assert_eq!(decoded.namespace, "");
        assert!(decoded.query_params.is_empty());
    }
}
