//! The interception layer.
//!
//! # Responsibilities
//! - Wrap a request/reply channel's `send` and `decode_crypted_entry` and a
//!   publish/subscribe channel's `on_recv` with capturing variants
//! - Preserve the wrapped operation's inputs, outputs, errors, and
//!   completion ordering exactly
//!
//! # Design Decisions
//! - The tap is composition, not mutation: `TappedRequestChannel` and
//!   `TappedSubscribeChannel` implement the channel traits and delegate to
//!   the real channel after the capture attempt
//! - Capture runs to completion (success or logged failure) before the
//!   inner operation is invoked, so the copy reflects the exact pre-call
//!   state and nothing dangles across the inner await

pub mod attach;
pub mod recorder;
pub mod request;
pub mod subscribe;

pub use attach::{Tap, TapError};
pub use recorder::Recorder;
pub use request::TappedRequestChannel;
pub use subscribe::TappedSubscribeChannel;
