//! Envelope capture and fail-open delivery.

use std::sync::Arc;

use bytes::Bytes;

use crate::channel::CallArgs;
use crate::envelope::{CaptureSource, ChannelKind};
use crate::observability::metrics::{EVENTS_CAPTURED, EVENTS_DROPPED};
use crate::sink::EventSink;

/// Builds one envelope per intercepted call and hands it to the sink.
///
/// Every failure on this path is terminal to the single delivery attempt:
/// logged, counted, and fully absorbed. `record` cannot fail, which is what
/// keeps tap errors from ever reaching the channel's caller.
#[derive(Clone)]
pub struct Recorder {
    kind: ChannelKind,
    source: CaptureSource,
    sink: Arc<dyn EventSink>,
}

impl Recorder {
    pub fn new(kind: ChannelKind, source: CaptureSource, sink: Arc<dyn EventSink>) -> Self {
        Self { kind, source, sink }
    }

    /// Capture one intercepted call: build the envelope and attempt delivery.
    ///
    /// Runs to completion before the caller invokes the inner operation.
    /// The payload handle is cloned; content is never read or mutated.
    pub async fn record(&self, operation: &str, args: &CallArgs, payload: &Bytes) {
        let envelope = self
            .source
            .envelope(self.kind, operation, args.clone(), payload);

        match self.sink.deliver(&envelope).await {
            Ok(()) => {
                metrics::counter!(EVENTS_CAPTURED).increment(1);
                tracing::trace!(
                    capture_id = %envelope.header.capture_id,
                    channel = %self.kind,
                    operation,
                    "Captured event delivered"
                );
            }
            Err(e) => {
                metrics::counter!(EVENTS_DROPPED).increment(1);
                tracing::warn!(
                    capture_id = %envelope.header.capture_id,
                    channel = %self.kind,
                    operation,
                    payload_len = envelope.payload.len(),
                    error = %e,
                    "Dropped captured event"
                );
            }
        }
    }
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder").field("kind", &self.kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EventEnvelope;
    use crate::sink::SinkError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Sink that records delivered envelopes, optionally failing every call.
    struct ProbeSink {
        delivered: Mutex<Vec<EventEnvelope>>,
        fail: bool,
    }

    impl ProbeSink {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                delivered: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    #[async_trait]
    impl EventSink for ProbeSink {
        async fn deliver(&self, envelope: &EventEnvelope) -> Result<(), SinkError> {
            self.delivered.lock().unwrap().push(envelope.clone());
            if self.fail {
                Err(SinkError::Timeout {
                    phase: "connect",
                    millis: 1,
                })
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn record_builds_one_envelope_per_call() {
        let sink = ProbeSink::new(false);
        let recorder = Recorder::new(
            ChannelKind::Request,
            CaptureSource::fixed(1, 42),
            sink.clone(),
        );

        recorder
            .record("send", &CallArgs::new(), &Bytes::from_static(b"a"))
            .await;
        recorder
            .record("send", &CallArgs::new(), &Bytes::from_static(b"b"))
            .await;

        let delivered = sink.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].payload, Bytes::from_static(b"a"));
        assert_eq!(delivered[1].payload, Bytes::from_static(b"b"));
    }

    #[tokio::test]
    async fn sink_failure_is_absorbed() {
        let sink = ProbeSink::new(true);
        let recorder = Recorder::new(
            ChannelKind::Publish,
            CaptureSource::fixed(1, 42),
            sink.clone(),
        );

        // Must not panic or propagate anything.
        recorder
            .record("on_recv", &CallArgs::new(), &Bytes::from_static(b"x"))
            .await;

        assert_eq!(sink.delivered.lock().unwrap().len(), 1);
    }
}
