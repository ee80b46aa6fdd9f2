//! Tapped publish/subscribe channel.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::channel::{CallArgs, ChannelError, MessageHandler, SubscribeChannel};
use crate::tap::Recorder;

/// A [`SubscribeChannel`] that captures each received message before the
/// user's handler runs.
///
/// The registered handler is wrapped so that, for every message N, the
/// capture attempt for N completes before the user handler processes N and
/// after the capture attempt for N−1. The user handler still receives every
/// message exactly once, unmodified, in arrival order.
pub struct TappedSubscribeChannel<C> {
    inner: C,
    recorder: Recorder,
}

impl<C> TappedSubscribeChannel<C> {
    pub(crate) fn new(inner: C, recorder: Recorder) -> Self {
        Self { inner, recorder }
    }

    /// The wrapped channel.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: SubscribeChannel> SubscribeChannel for TappedSubscribeChannel<C> {
    async fn on_recv(&self, handler: MessageHandler) -> Result<(), ChannelError> {
        let recorder = self.recorder.clone();

        let wrapped: MessageHandler = Arc::new(move |load: Bytes| {
            let recorder = recorder.clone();
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                recorder.record("on_recv", &CallArgs::new(), &load).await;
                handler(load).await;
            })
        });

        self.inner.on_recv(wrapped).await
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for TappedSubscribeChannel<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TappedSubscribeChannel")
            .field("inner", &self.inner)
            .finish()
    }
}
