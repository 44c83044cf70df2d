use common::{FuturesEnvironment, ReconnectBackoff};
use connector_core::{EventSender, FeedConfig, FeedError};
use futures_util::{SinkExt, StreamExt};
use metrics::SharedMetrics;
use model::MarketEvent;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::parser::{parse_message, ParsedMessage};

/// Connection that survived this long resets the backoff.
const STABLE_CONNECTION_THRESHOLD: Duration = Duration::from_secs(300);

/// Timeout for WebSocket connection attempts.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(15);

/// Builds the combined stream URL for one symbol: depth deltas plus the
/// mark price stream.
fn build_stream_url(symbol: &str, environment: FuturesEnvironment) -> String {
    let sym = symbol.to_lowercase();
    format!(
        "{}/stream?streams={}@depth/{}@markPrice",
        environment.ws_base_url(),
        sym,
        sym
    )
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

enum ConnectOutcome {
    Connected(Box<WsStream>),
    Shutdown,
    Failed(FeedError),
}

async fn connect_with_timeout(
    url: &str,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> ConnectOutcome {
    tokio::select! {
        biased;

        _ = shutdown_rx.changed() => {
            if *shutdown_rx.borrow() {
                ConnectOutcome::Shutdown
            } else {
                // Spurious wakeup; the outer loop will retry.
                ConnectOutcome::Failed(FeedError::WebSocket("connection interrupted".to_string()))
            }
        }

        result = tokio::time::timeout(CONNECTION_TIMEOUT, connect_async(url)) => {
            match result {
                Ok(Ok((stream, _))) => ConnectOutcome::Connected(Box::new(stream)),
                Ok(Err(e)) => ConnectOutcome::Failed(FeedError::WebSocket(e.to_string())),
                Err(_) => ConnectOutcome::Failed(FeedError::WebSocket("connection timeout".to_string())),
            }
        }
    }
}

enum SessionEnd {
    /// Shutdown was requested while the session ran.
    Shutdown,
    /// The session connected and later ended with an error.
    Ended { duration: Duration, error: FeedError },
    /// The connection attempt itself failed.
    ConnectFailed(FeedError),
}

/// Runs a single WebSocket session: connect, then pump messages into the
/// event channel until the connection dies or shutdown is requested.
async fn run_session(
    url: &str,
    sender: &EventSender,
    shutdown_rx: &mut watch::Receiver<bool>,
    metrics: &SharedMetrics,
) -> SessionEnd {
    info!(url = %url, "connecting to Binance futures stream");

    let ws_stream = match connect_with_timeout(url, shutdown_rx).await {
        ConnectOutcome::Connected(stream) => *stream,
        ConnectOutcome::Shutdown => return SessionEnd::Shutdown,
        ConnectOutcome::Failed(e) => return SessionEnd::ConnectFailed(e),
    };

    info!("connected");
    let connected_at = Instant::now();
    let (mut write, mut read) = ws_stream.split();

    let ended = |error: FeedError| SessionEnd::Ended {
        duration: connected_at.elapsed(),
        error,
    };

    loop {
        tokio::select! {
            biased;

            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    info!("shutdown signal received, closing connection");
                    let _ = write.close().await;
                    return SessionEnd::Shutdown;
                }
            }

            msg_opt = read.next() => {
                let msg = match msg_opt {
                    Some(Ok(m)) => m,
                    Some(Err(e)) => {
                        error!(error = %e, "websocket error");
                        metrics.inc_websocket_errors();
                        return ended(FeedError::WebSocket(e.to_string()));
                    }
                    None => {
                        info!("websocket stream ended");
                        return ended(FeedError::ConnectionClosed);
                    }
                };

                match msg {
                    Message::Text(text) => {
                        metrics.inc_messages_received();
                        let event = match parse_message(&text) {
                            Ok(ParsedMessage::Depth(depth)) => {
                                metrics.inc_depth_updates();
                                Some(MarketEvent::Depth(depth))
                            }
                            Ok(ParsedMessage::MarkPrice(mark)) => {
                                metrics.inc_mark_price_updates();
                                Some(MarketEvent::MarkPrice(mark))
                            }
                            Ok(ParsedMessage::Unknown) => None,
                            Err(e) => {
                                metrics.inc_parse_errors();
                                warn!(error = %e, "failed to parse message");
                                None
                            }
                        };

                        if let Some(event) = event {
                            if sender.send(event).await.is_err() {
                                info!("receiver dropped, stopping feed");
                                return ended(FeedError::ChannelClosed);
                            }
                        }
                    }
                    Message::Ping(data) => {
                        debug!("received ping, answering");
                        if let Err(e) = write.send(Message::Pong(data)).await {
                            warn!(error = %e, "failed to send pong");
                            metrics.inc_websocket_errors();
                            return ended(FeedError::WebSocket(e.to_string()));
                        }
                    }
                    Message::Close(_) => {
                        info!("websocket closed by server");
                        return ended(FeedError::ConnectionClosed);
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Runs the feed with automatic reconnection.
///
/// Reconnects on errors with jittered exponential backoff; a connection
/// that stays up past [`STABLE_CONNECTION_THRESHOLD`] resets the backoff.
/// Returns only when the event receiver is dropped or shutdown is
/// signalled.
pub async fn run_feed(
    config: FeedConfig,
    sender: EventSender,
    mut shutdown_rx: watch::Receiver<bool>,
    metrics: SharedMetrics,
) -> Result<(), FeedError> {
    let url = build_stream_url(&config.symbol, config.environment);
    let mut backoff = ReconnectBackoff::default();
    // True once a session has ended: the next successful connect is a
    // reconnect.
    let mut reconnecting = false;

    loop {
        if *shutdown_rx.borrow() {
            info!("shutdown requested, exiting feed");
            return Ok(());
        }

        let error = match run_session(&url, &sender, &mut shutdown_rx, &metrics).await {
            SessionEnd::Shutdown => {
                info!("feed shutdown complete");
                return Ok(());
            }
            SessionEnd::Ended { duration, error } => {
                // Ended means the connect itself succeeded.
                if reconnecting {
                    metrics.inc_reconnect_successes();
                }
                if duration >= STABLE_CONNECTION_THRESHOLD {
                    backoff.reset();
                }
                if matches!(error, FeedError::ChannelClosed) {
                    // Nobody is listening; reconnecting would be pointless.
                    return Err(error);
                }
                error
            }
            SessionEnd::ConnectFailed(e) => e,
        };

        reconnecting = true;
        metrics.inc_reconnect_attempts();
        let delay = backoff.next_delay();
        warn!(
            error = %error,
            attempt = backoff.failures(),
            delay_secs = delay.as_secs_f64(),
            "reconnecting after error"
        );

        tokio::select! {
            biased;
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    info!("shutdown requested during backoff");
                    return Ok(());
                }
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url_combines_depth_and_mark_price() {
        let url = build_stream_url("BTCUSDT", FuturesEnvironment::Mainnet);
        assert_eq!(
            url,
            "wss://fstream.binance.com/stream?streams=btcusdt@depth/btcusdt@markPrice"
        );
    }

    #[test]
    fn test_stream_url_testnet() {
        let url = build_stream_url("ethusdt", FuturesEnvironment::Testnet);
        assert!(url.starts_with("wss://stream.binancefuture.com/stream?streams="));
        assert!(url.contains("ethusdt@depth"));
    }
}
