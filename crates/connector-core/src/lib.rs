use common::FuturesEnvironment;
use model::MarketEvent;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("websocket error: {0}")]
    WebSocket(String),

    #[error("event channel closed")]
    ChannelClosed,

    #[error("connection closed by server")]
    ConnectionClosed,
}

/// Configuration for the market data feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Symbol to subscribe to, e.g. "BTCUSDT".
    pub symbol: String,
    /// Event channel buffer capacity.
    pub channel_capacity: usize,
    /// Futures environment (mainnet or testnet).
    pub environment: FuturesEnvironment,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            channel_capacity: 1024,
            environment: FuturesEnvironment::default(),
        }
    }
}

pub type EventSender = mpsc::Sender<MarketEvent>;
pub type EventReceiver = mpsc::Receiver<MarketEvent>;

pub fn create_event_channel(capacity: usize) -> (EventSender, EventReceiver) {
    mpsc::channel(capacity)
}
