//! Channel trait seam.
//!
//! # Responsibilities
//! - Define the operations the tap can intercept on a request/reply channel
//!   and a publish/subscribe channel
//! - Keep the channel's calling convention intact so a tapped implementation
//!   is indistinguishable from the real one at the call site
//!
//! # Design Decisions
//! - Callers depend on these traits, never on a concrete channel type, so the
//!   tap is an alternate implementation chosen at construction time
//! - Auxiliary call arguments are carried as an ordered, opaque mapping; the
//!   tap copies them into envelope headers without interpreting them

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::future::BoxFuture;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by a channel implementation.
///
/// The tap never produces these; it only passes them through from the inner
/// channel, unchanged.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Transport-level failure (connect, send, receive).
    #[error("transport error: {0}")]
    Transport(String),

    /// Message could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Channel has been closed and accepts no further operations.
    #[error("channel closed")]
    Closed,
}

/// Per-message handler registered on a publish/subscribe channel.
///
/// The channel invokes the handler once per message, awaiting each call
/// before dispatching the next, which is what preserves arrival order.
pub type MessageHandler = Arc<dyn Fn(Bytes) -> BoxFuture<'static, ()> + Send + Sync>;

/// Request/reply channel operations the tap can intercept.
#[async_trait]
pub trait RequestChannel: Send + Sync {
    /// Send a request payload and wait for the reply.
    async fn send(&self, load: Bytes, args: CallArgs) -> Result<Bytes, ChannelError>;

    /// Transfer an encrypted payload and decode one entry from the reply.
    async fn decode_crypted_entry(&self, load: Bytes, args: CallArgs)
        -> Result<Bytes, ChannelError>;
}

/// Publish/subscribe channel operations the tap can intercept.
#[async_trait]
pub trait SubscribeChannel: Send + Sync {
    /// Register the handler invoked for every received message.
    async fn on_recv(&self, handler: MessageHandler) -> Result<(), ChannelError>;
}

/// Ordered auxiliary call arguments, opaque to the tap.
///
/// Serialized as a JSON object whose key order matches insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs(Vec<(String, Value)>);

impl CallArgs {
    /// An empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument, preserving insertion order.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for CallArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CallArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ArgsVisitor;

        impl<'de> Visitor<'de> for ArgsVisitor {
            type Value = CallArgs;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of auxiliary call arguments")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    entries.push((key, value));
                }
                Ok(CallArgs(entries))
            }
        }

        deserializer.deserialize_map(ArgsVisitor)
    }
}
