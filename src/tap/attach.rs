//! One-time tap installation.

use std::sync::Arc;

use thiserror::Error;

use crate::channel::{RequestChannel, SubscribeChannel};
use crate::config::loader::ConfigError;
use crate::config::TapConfig;
use crate::envelope::{CaptureSource, ChannelKind};
use crate::sink::{CollectorSink, EventSink};
use crate::tap::recorder::Recorder;
use crate::tap::{TappedRequestChannel, TappedSubscribeChannel};

/// Errors fatal to tap installation.
///
/// The only errors the tap ever surfaces to the operator. Everything past
/// installation is fail-open.
#[derive(Debug, Error)]
pub enum TapError {
    /// Collector address in the config cannot be used.
    #[error("invalid collector address '{addr}': {source}")]
    CollectorAddress {
        addr: String,
        source: std::net::AddrParseError,
    },

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Installer wiring capture into a pair of channels.
///
/// `attach` consumes the installer and returns tapped implementations of the
/// channel traits. Because installation is construction rather than rewiring
/// of live objects, re-running it on already-tapped channels would require
/// deliberately nesting tapped types, so accidental double-capture cannot
/// happen.
pub struct Tap {
    source: CaptureSource,
    sink: Arc<dyn EventSink>,
}

impl Tap {
    /// Build a tap targeting the configured collector.
    pub fn new(config: &TapConfig) -> Result<Self, TapError> {
        let sink =
            CollectorSink::from_config(&config.collector).map_err(|source| {
                TapError::CollectorAddress {
                    addr: config.collector.address.clone(),
                    source,
                }
            })?;
        Ok(Self::with_sink(CaptureSource::host(), Arc::new(sink)))
    }

    /// Build a tap with an explicit capture source and sink.
    ///
    /// Used by tests to inject a deterministic clock and an in-process sink.
    pub fn with_sink(source: CaptureSource, sink: Arc<dyn EventSink>) -> Self {
        Self { source, sink }
    }

    /// Install the tap: wrap a request/reply channel and a publish/subscribe
    /// channel.
    ///
    /// Consumes the installer; one `Tap` installs exactly once.
    pub fn attach<R, S>(
        self,
        request: R,
        subscribe: S,
    ) -> (TappedRequestChannel<R>, TappedSubscribeChannel<S>)
    where
        R: RequestChannel,
        S: SubscribeChannel,
    {
        let request_recorder = Recorder::new(
            ChannelKind::Request,
            self.source.clone(),
            Arc::clone(&self.sink),
        );
        let publish_recorder = Recorder::new(ChannelKind::Publish, self.source, self.sink);

        (
            TappedRequestChannel::new(request, request_recorder),
            TappedSubscribeChannel::new(subscribe, publish_recorder),
        )
    }
}

impl std::fmt::Debug for Tap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tap").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unusable_collector_address() {
        let mut config = TapConfig::default();
        config.collector.address = "not-an-address".to_string();

        let err = Tap::new(&config).unwrap_err();
        assert!(matches!(err, TapError::CollectorAddress { .. }));
    }

    #[test]
    fn builds_from_default_config() {
        assert!(Tap::new(&TapConfig::default()).is_ok());
    }
}
