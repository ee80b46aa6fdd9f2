//! Best-effort delivery of captured envelopes.
//!
//! # Responsibilities
//! - Define the delivery seam the tap records through
//! - Ship one envelope per attempt to the local collector
//!
//! # Design Decisions
//! - Each delivery is independent and bounded; failures never leave state
//!   behind that a later delivery could trip over
//! - No retry, no queuing, no backpressure toward the channel

pub mod collector;

use async_trait::async_trait;
use thiserror::Error;

use crate::envelope::EventEnvelope;

pub use collector::CollectorSink;

/// Errors terminal to a single delivery attempt.
///
/// The recorder absorbs these; they never reach the channel's caller.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Envelope could not be serialized.
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Could not connect to the collector.
    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    /// Sending or flushing the serialized envelope failed.
    #[error("send failed: {0}")]
    Send(#[from] std::io::Error),

    /// Connect or send exceeded its configured bound.
    #[error("{phase} timed out after {millis}ms")]
    Timeout { phase: &'static str, millis: u64 },
}

/// Destination for captured envelopes.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Attempt to deliver one envelope.
    ///
    /// Exactly one attempt; the outcome is final either way.
    async fn deliver(&self, envelope: &EventEnvelope) -> Result<(), SinkError>;
}
