//! Shared utilities for integration testing.

// Each test binary uses a subset of these helpers.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use wiretap::{
    CallArgs, ChannelError, EventEnvelope, MessageHandler, RequestChannel, SubscribeChannel,
};

/// Start a collector listener that parses one NDJSON envelope per connection
/// and forwards it on the returned channel.
///
/// Connections are handled sequentially, matching the tap's one-delivery-at-
/// a-time behavior, so envelope order on the channel is arrival order.
pub async fn start_mock_collector() -> (std::net::SocketAddr, mpsc::UnboundedReceiver<EventEnvelope>)
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).await.unwrap_or(0) > 0 {
                if let Ok(envelope) = serde_json::from_str::<EventEnvelope>(&line) {
                    if tx.send(envelope).is_err() {
                        return;
                    }
                }
                line.clear();
            }
        }
    });

    (addr, rx)
}

/// An address on loopback that refuses connections.
pub async fn unreachable_addr() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Request/reply channel that replies with a transformed copy of the load
/// and records every load it was handed, for byte-identity checks.
#[derive(Default)]
pub struct EchoChannel {
    pub seen_loads: Mutex<Vec<Bytes>>,
}

#[async_trait]
impl RequestChannel for EchoChannel {
    async fn send(&self, load: Bytes, _args: CallArgs) -> Result<Bytes, ChannelError> {
        self.seen_loads.lock().unwrap().push(load.clone());
        let mut reply = b"reply:".to_vec();
        reply.extend_from_slice(&load);
        Ok(Bytes::from(reply))
    }

    async fn decode_crypted_entry(
        &self,
        load: Bytes,
        _args: CallArgs,
    ) -> Result<Bytes, ChannelError> {
        self.seen_loads.lock().unwrap().push(load.clone());
        let mut decoded = b"decoded:".to_vec();
        decoded.extend_from_slice(&load);
        Ok(Bytes::from(decoded))
    }
}

/// Request/reply channel whose operations always fail.
pub struct FailingChannel;

#[async_trait]
impl RequestChannel for FailingChannel {
    async fn send(&self, _load: Bytes, _args: CallArgs) -> Result<Bytes, ChannelError> {
        Err(ChannelError::Transport("backend down".to_string()))
    }

    async fn decode_crypted_entry(
        &self,
        _load: Bytes,
        _args: CallArgs,
    ) -> Result<Bytes, ChannelError> {
        Err(ChannelError::Decode("bad entry".to_string()))
    }
}

/// Publish/subscribe channel driven by the test: `publish` dispatches one
/// message to the registered handler and awaits its completion, which is
/// exactly the per-message ordering a real subscription loop provides.
#[derive(Default)]
pub struct ScriptedPubChannel {
    handler: tokio::sync::Mutex<Option<MessageHandler>>,
}

impl ScriptedPubChannel {
    pub async fn publish(&self, load: Bytes) {
        let handler = self
            .handler
            .lock()
            .await
            .clone()
            .expect("no handler registered");
        handler(load).await;
    }
}

#[async_trait]
impl SubscribeChannel for ScriptedPubChannel {
    async fn on_recv(&self, handler: MessageHandler) -> Result<(), ChannelError> {
        *self.handler.lock().await = Some(handler);
        Ok(())
    }
}

/// Collect handler-observed payloads into a shared list.
pub fn collecting_handler(seen: Arc<Mutex<Vec<Bytes>>>) -> MessageHandler {
    Arc::new(move |load: Bytes| {
        let seen = Arc::clone(&seen);
        Box::pin(async move {
            seen.lock().unwrap().push(load);
        })
    })
}
