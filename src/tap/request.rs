//! Tapped request/reply channel.

use async_trait::async_trait;
use bytes::Bytes;

use crate::channel::{CallArgs, ChannelError, RequestChannel};
use crate::tap::Recorder;

/// A [`RequestChannel`] that captures each call before delegating.
///
/// The inner channel receives the caller's arguments untouched and its
/// return value or error is passed back verbatim. Capture happens before
/// delegation, so exactly one delivery attempt is made per call even when
/// the inner operation fails.
pub struct TappedRequestChannel<C> {
    inner: C,
    recorder: Recorder,
}

impl<C> TappedRequestChannel<C> {
    pub(crate) fn new(inner: C, recorder: Recorder) -> Self {
        Self { inner, recorder }
    }

    /// The wrapped channel.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: RequestChannel> RequestChannel for TappedRequestChannel<C> {
    async fn send(&self, load: Bytes, args: CallArgs) -> Result<Bytes, ChannelError> {
        self.recorder.record("send", &args, &load).await;
        self.inner.send(load, args).await
    }

    async fn decode_crypted_entry(
        &self,
        load: Bytes,
        args: CallArgs,
    ) -> Result<Bytes, ChannelError> {
        self.recorder.record("decode_crypted_entry", &args, &load).await;
        self.inner.decode_crypted_entry(load, args).await
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for TappedRequestChannel<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TappedRequestChannel")
            .field("inner", &self.inner)
            .finish()
    }
}
