//! Forwarding sink targeting the local collector.
//!
//! # Responsibilities
//! - Open a short-lived connection per delivery, write one newline-delimited
//!   JSON envelope, flush, close
//! - Enforce connect and send timeouts so a dead or wedged collector can
//!   never stall the wrapped channel
//!
//! # Design Decisions
//! - Per-call connections keep the sink stateless: an absent collector
//!   cannot corrupt anything a later delivery depends on
//! - The tap is a one-way producer; nothing is ever read back

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::CollectorConfig;
use crate::envelope::EventEnvelope;
use crate::sink::{EventSink, SinkError};

/// Ephemeral-connection sink for the collector endpoint.
#[derive(Debug, Clone)]
pub struct CollectorSink {
    addr: SocketAddr,
    connect_timeout: Duration,
    send_timeout: Duration,
}

impl CollectorSink {
    /// Create a sink for the given collector address and timeout bounds.
    pub fn new(addr: SocketAddr, connect_timeout: Duration, send_timeout: Duration) -> Self {
        Self {
            addr,
            connect_timeout,
            send_timeout,
        }
    }

    /// Build a sink from validated configuration.
    ///
    /// The address must already have been validated; an unparsable address
    /// here is a config bug, surfaced as an error rather than a panic.
    pub fn from_config(config: &CollectorConfig) -> Result<Self, std::net::AddrParseError> {
        let addr: SocketAddr = config.address.parse()?;
        Ok(Self::new(
            addr,
            Duration::from_millis(config.connect_timeout_ms),
            Duration::from_millis(config.send_timeout_ms),
        ))
    }

    /// The collector address this sink targets.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

#[async_trait]
impl EventSink for CollectorSink {
    async fn deliver(&self, envelope: &EventEnvelope) -> Result<(), SinkError> {
        // One newline-terminated JSON document per connection.
        let mut frame = serde_json::to_vec(envelope)?;
        frame.push(b'\n');

        let mut stream = timeout(self.connect_timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| SinkError::Timeout {
                phase: "connect",
                millis: self.connect_timeout.as_millis() as u64,
            })?
            .map_err(|source| SinkError::Connect {
                addr: self.addr,
                source,
            })?;

        timeout(self.send_timeout, async {
            stream.write_all(&frame).await?;
            stream.flush().await?;
            stream.shutdown().await
        })
        .await
        .map_err(|_| SinkError::Timeout {
            phase: "send",
            millis: self.send_timeout.as_millis() as u64,
        })??;

        Ok(())
    }
}
