//! Event envelope construction.
//!
//! # Responsibilities
//! - Define the header-plus-payload record produced for each observed message
//! - Stamp headers with process id and wall-clock time from an injected
//!   source so construction is deterministic under test
//!
//! # Design Decisions
//! - Construction is pure and infallible; the payload is opaque and never
//!   validated or examined
//! - Payload is held as `Bytes`: cloning copies a handle, not content, which
//!   is what keeps the captured bytes bit-identical to the caller's input

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::channel::CallArgs;

/// Which channel flavor produced a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Request/reply traffic.
    Request,
    /// Publish/subscribe traffic.
    Publish,
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelKind::Request => f.write_str("request"),
            ChannelKind::Publish => f.write_str("publish"),
        }
    }
}

/// Metadata describing one intercepted call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeHeader {
    /// Unique id for this capture.
    pub capture_id: Uuid,

    /// Channel flavor the call was observed on.
    pub channel: ChannelKind,

    /// Capture time, milliseconds since the Unix epoch.
    pub captured_at_ms: u64,

    /// Process id of the observed agent.
    pub pid: u32,

    /// Name of the intercepted operation (e.g. "send", "on_recv").
    pub operation: String,

    /// Auxiliary call arguments, opaque to the tap.
    #[serde(default, skip_serializing_if = "CallArgs::is_empty")]
    pub args: CallArgs,
}

/// One observed message: header plus the unmodified payload bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub header: EnvelopeHeader,
    pub payload: Bytes,
}

/// Source of the process id and timestamps stamped into envelope headers.
///
/// Production code uses [`CaptureSource::host`]; tests inject a fixed source
/// to make envelope construction deterministic.
#[derive(Clone)]
pub struct CaptureSource {
    pid: u32,
    now_ms: Arc<dyn Fn() -> u64 + Send + Sync>,
}

impl CaptureSource {
    /// Read pid and wall-clock time from the host OS at capture time.
    pub fn host() -> Self {
        Self {
            pid: std::process::id(),
            now_ms: Arc::new(|| {
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_millis() as u64)
                    .unwrap_or(0)
            }),
        }
    }

    /// A source returning a fixed pid and timestamp.
    pub fn fixed(pid: u32, timestamp_ms: u64) -> Self {
        Self {
            pid,
            now_ms: Arc::new(move || timestamp_ms),
        }
    }

    /// Build an envelope for one intercepted call.
    ///
    /// Always succeeds. The payload handle is cloned as-is; content is never
    /// read or altered.
    pub fn envelope(
        &self,
        channel: ChannelKind,
        operation: &str,
        args: CallArgs,
        payload: &Bytes,
    ) -> EventEnvelope {
        EventEnvelope {
            header: EnvelopeHeader {
                capture_id: Uuid::new_v4(),
                channel,
                captured_at_ms: (self.now_ms)(),
                pid: self.pid,
                operation: operation.to_string(),
                args,
            },
            payload: payload.clone(),
        }
    }
}

impl std::fmt::Debug for CaptureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSource").field("pid", &self.pid).finish()
    }
}
