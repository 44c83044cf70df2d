//! Shared publication of the book between the feed writer and readers.

use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::book::{ApplyReport, OrderBook};
use crate::level::{PriceLevel, Side};

/// Cloneable handle to an [`OrderBook`] shared between one writer (the
/// feed) and any number of readers (the display tick).
///
/// The write lock is held for the duration of one batch apply and the
/// read lock for one query, so every query observes the book as it stood
/// between two batches: slightly stale or slightly newer tick to tick,
/// but never torn.
#[derive(Debug, Clone)]
pub struct SharedBook {
    inner: Arc<RwLock<OrderBook>>,
}

impl SharedBook {
    /// Creates a shared handle around a new empty book.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(OrderBook::new(symbol))),
        }
    }

    /// Applies one batch of deltas to `side` under the write lock.
    pub fn apply(&self, side: Side, levels: &[(Decimal, Decimal)]) -> ApplyReport {
        self.inner.write().apply(side, levels)
    }

    /// Applies both sides of a depth message under a single write lock,
    /// so no reader sees the bids applied but not the asks.
    pub fn apply_depth(
        &self,
        bids: &[(Decimal, Decimal)],
        asks: &[(Decimal, Decimal)],
    ) -> ApplyReport {
        let mut book = self.inner.write();
        let bid_report = book.apply(Side::Bid, bids);
        let ask_report = book.apply(Side::Ask, asks);
        bid_report.merge(ask_report)
    }

    /// Returns the best level of each side.
    pub fn best_bid_ask(&self) -> (Option<PriceLevel>, Option<PriceLevel>) {
        self.inner.read().best_bid_ask()
    }

    /// Returns an owned copy of the top `n` levels per side, best first.
    pub fn depth_snapshot(&self, n: usize) -> DepthSnapshot {
        let book = self.inner.read();
        DepthSnapshot {
            bids: book.top_levels(Side::Bid, n).collect(),
            asks: book.top_levels(Side::Ask, n).collect(),
        }
    }

    /// Cumulative count of rejected level updates.
    pub fn rejected_updates(&self) -> u64 {
        self.inner.read().rejected_updates()
    }
}

/// Point-in-time copy of the displayed depth. Both sides are ordered
/// best first: bids descending by price, asks ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthSnapshot {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl DepthSnapshot {
    /// Returns whether the snapshot holds no levels on either side.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
