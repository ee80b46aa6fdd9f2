//! Minimal collector: accepts the tap's push stream and logs envelope
//! headers. One newline-delimited JSON envelope per connection.

use std::net::SocketAddr;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;

use wiretap::observability::logging::init_logging;
use wiretap::EventEnvelope;

#[derive(Parser, Debug)]
#[command(name = "collector", about = "Receive and log captured envelopes")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:4519")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("info");
    let args = Args::parse();

    let listener = TcpListener::bind(args.listen).await?;
    tracing::info!(address = %args.listen, "Collector listening");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "Accept failed");
                continue;
            }
        };

        tokio::spawn(async move {
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break,
                    Ok(_) => match serde_json::from_str::<EventEnvelope>(&line) {
                        Ok(envelope) => {
                            tracing::info!(
                                capture_id = %envelope.header.capture_id,
                                channel = %envelope.header.channel,
                                operation = %envelope.header.operation,
                                pid = envelope.header.pid,
                                captured_at_ms = envelope.header.captured_at_ms,
                                payload_len = envelope.payload.len(),
                                "Envelope received"
                            );
                        }
                        Err(e) => {
                            // Partial or duplicate streams are expected from a
                            // best-effort producer.
                            tracing::warn!(peer = %peer, error = %e, "Unparsable envelope");
                        }
                    },
                    Err(e) => {
                        tracing::warn!(peer = %peer, error = %e, "Read failed");
                        break;
                    }
                }
            }
        });
    }
}
