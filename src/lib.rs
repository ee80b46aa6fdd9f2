//! Transparent message-channel tap.
//!
//! Observes every message an agent sends or receives over its control
//! channels and ships a copy of each to a local collector, without altering
//! the channels' behavior, timing, or failure modes.
//!
//! ```text
//!                 ┌───────────────────────────────────────────┐
//!                 │                  wiretap                   │
//!   caller        │  ┌───────────┐   ┌──────────┐              │
//!   ──────────────┼─▶│ tapped    │──▶│ recorder │──┐           │
//!                 │  │ channel   │   └──────────┘  │ envelope  │
//!                 │  └─────┬─────┘                 ▼           │
//!                 │        │ delegate        ┌──────────┐      │
//!   inner channel ◀────────┘                 │   sink   │──────┼──▶ collector
//!                 │                          └──────────┘      │    (NDJSON)
//!                 └───────────────────────────────────────────┘
//! ```
//!
//! Capture is fail-open: a dead, slow, or absent collector costs at most the
//! configured delivery timeout and a warning log line; the wrapped call's
//! result is never affected.

pub mod channel;
pub mod config;
pub mod envelope;
pub mod observability;
pub mod sink;
pub mod tap;

pub use channel::{CallArgs, ChannelError, MessageHandler, RequestChannel, SubscribeChannel};
pub use config::TapConfig;
pub use envelope::{CaptureSource, ChannelKind, EnvelopeHeader, EventEnvelope};
pub use sink::{CollectorSink, EventSink, SinkError};
pub use tap::{Tap, TapError, TappedRequestChannel, TappedSubscribeChannel};
