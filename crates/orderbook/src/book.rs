//! Two-sided book with fail-soft delta application.

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::BookError;
use crate::level::{PriceLevel, Side};
use crate::store::{LevelStore, TopLevels};

/// Outcome of applying one batch of deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Levels inserted, replaced or removed.
    pub applied: usize,
    /// Levels skipped because price or volume was invalid.
    pub rejected: usize,
}

impl ApplyReport {
    /// Combines the reports of two batches.
    pub fn merge(self, other: ApplyReport) -> ApplyReport {
        ApplyReport {
            applied: self.applied + other.applied,
            rejected: self.rejected + other.rejected,
        }
    }
}

/// Depth-limited view of a two-sided market, fed by incremental updates.
///
/// Owns one ordered [`LevelStore`] per side. Created empty at process
/// start and retained for the process lifetime; there is no snapshot or
/// checkpoint concept; a full resend from the feed arrives as ordinary
/// upserts. The book does not enforce or repair a crossed state: it
/// reflects whatever the feed reports.
#[derive(Debug, Clone)]
pub struct OrderBook {
    symbol: String,
    bids: LevelStore,
    asks: LevelStore,
    /// Cumulative count of rejected level updates since creation.
    rejected_total: u64,
}

impl OrderBook {
    /// Creates a new empty order book for the given symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: LevelStore::new(Side::Bid),
            asks: LevelStore::new(Side::Ask),
            rejected_total: 0,
        }
    }

    /// Returns the symbol this book tracks.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Applies one batch of `(price, volume)` deltas to `side`.
    ///
    /// Entries apply sequentially, so a price repeated within the batch
    /// resolves to its last entry. Zero volume removes the level. An
    /// invalid entry is skipped with a warning and the rest of the batch
    /// still applies; nothing here ever aborts the feed.
    pub fn apply(&mut self, side: Side, levels: &[(Decimal, Decimal)]) -> ApplyReport {
        let mut report = ApplyReport::default();
        let store = match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };

        for &(price, volume) in levels {
            if let Err(e) = validate(price, volume) {
                warn!(symbol = %self.symbol, side = ?side, error = %e, "rejected level update");
                report.rejected += 1;
                continue;
            }
            store.upsert(price, volume);
            report.applied += 1;
        }

        self.rejected_total += report.rejected as u64;
        report
    }

    /// Returns the best (highest) bid level.
    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.bids.best()
    }

    /// Returns the best (lowest) ask level.
    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.asks.best()
    }

    /// Returns the best level of each side; `None` for an empty side.
    pub fn best_bid_ask(&self) -> (Option<PriceLevel>, Option<PriceLevel>) {
        (self.best_bid(), self.best_ask())
    }

    /// Returns up to `n` levels of `side` in priority order, best first.
    pub fn top_levels(&self, side: Side, n: usize) -> TopLevels<'_> {
        match side {
            Side::Bid => self.bids.top_n(n),
            Side::Ask => self.asks.top_n(n),
        }
    }

    /// Number of distinct price levels held on `side`.
    pub fn depth(&self, side: Side) -> usize {
        match side {
            Side::Bid => self.bids.len(),
            Side::Ask => self.asks.len(),
        }
    }

    /// Returns whether both sides hold zero levels.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Cumulative count of rejected level updates since creation.
    pub fn rejected_updates(&self) -> u64 {
        self.rejected_total
    }

    /// Drops all levels on both sides. The rejected counter survives.
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
    }
}

fn validate(price: Decimal, volume: Decimal) -> Result<(), BookError> {
    if price <= Decimal::ZERO {
        return Err(BookError::InvalidPrice { price });
    }
    if volume < Decimal::ZERO {
        return Err(BookError::InvalidVolume { price, volume });
    }
    Ok(())
}
