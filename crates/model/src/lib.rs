use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exchange {
    BinanceFutures,
}

/// One `(price, volume)` pair from a depth message. Volume zero means the
/// level no longer exists.
pub type PriceLevelUpdate = (Decimal, Decimal);

/// Incremental depth message: the new aggregate volume at each reported
/// price, per side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthUpdate {
    pub exchange: Exchange,
    pub symbol: String,
    pub bids: Vec<PriceLevelUpdate>,
    pub asks: Vec<PriceLevelUpdate>,
    pub event_time_ms: i64,
}

/// Mark price message from the funding stream (emitted every few seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkPriceUpdate {
    pub exchange: Exchange,
    pub symbol: String,
    pub mark_price: Decimal,
    /// Absent for products without funding.
    pub funding_rate: Option<Decimal>,
    pub next_funding_time_ms: i64,
    pub event_time_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MarketEvent {
    Depth(DepthUpdate),
    MarkPrice(MarkPriceUpdate),
}
