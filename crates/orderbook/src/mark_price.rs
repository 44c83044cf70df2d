//! Mark price tracking from the funding stream.

use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;

/// Direction of the last mark price move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceDirection {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Default)]
struct MarkPriceState {
    current: Option<Decimal>,
    previous: Option<Decimal>,
    funding_rate: Option<Decimal>,
}

/// Latest and previous mark price with the derived move direction.
///
/// Deliberately independent of the order book: two scalars behind their
/// own lock, updated by their own stream, no ordering structure.
#[derive(Debug, Default)]
pub struct MarkPriceTracker {
    inner: RwLock<MarkPriceState>,
}

/// Shared handle to the tracker.
pub type SharedMarkPrice = Arc<MarkPriceTracker>;

impl MarkPriceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new mark price, retiring the current one to `previous`.
    ///
    /// A `None` funding rate leaves the last known rate in place.
    pub fn update(&self, mark_price: Decimal, funding_rate: Option<Decimal>) {
        let mut state = self.inner.write();
        state.previous = state.current;
        state.current = Some(mark_price);
        if funding_rate.is_some() {
            state.funding_rate = funding_rate;
        }
    }

    /// Returns a point-in-time view of the tracker.
    pub fn snapshot(&self) -> MarkPriceSnapshot {
        let state = self.inner.read();
        MarkPriceSnapshot {
            current: state.current,
            previous: state.previous,
            funding_rate: state.funding_rate,
        }
    }
}

/// Point-in-time view of the mark price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkPriceSnapshot {
    pub current: Option<Decimal>,
    pub previous: Option<Decimal>,
    pub funding_rate: Option<Decimal>,
}

impl MarkPriceSnapshot {
    /// `Up` if the price rose, `Down` if it fell, `Flat` otherwise
    /// (including before two prices have been seen).
    pub fn direction(&self) -> PriceDirection {
        match (self.previous, self.current) {
            (Some(prev), Some(curr)) if curr > prev => PriceDirection::Up,
            (Some(prev), Some(curr)) if curr < prev => PriceDirection::Down,
            _ => PriceDirection::Flat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_tracker_is_flat() {
        let tracker = MarkPriceTracker::new();
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.current, None);
        assert_eq!(snapshot.direction(), PriceDirection::Flat);
    }

    #[test]
    fn test_single_update_is_flat() {
        let tracker = MarkPriceTracker::new();
        tracker.update(dec!(50000), None);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.current, Some(dec!(50000)));
        assert_eq!(snapshot.previous, None);
        assert_eq!(snapshot.direction(), PriceDirection::Flat);
    }

    #[test]
    fn test_direction_follows_moves() {
        let tracker = MarkPriceTracker::new();
        tracker.update(dec!(50000), None);

        tracker.update(dec!(50100), None);
        assert_eq!(tracker.snapshot().direction(), PriceDirection::Up);

        tracker.update(dec!(50050), None);
        assert_eq!(tracker.snapshot().direction(), PriceDirection::Down);

        tracker.update(dec!(50050), None);
        assert_eq!(tracker.snapshot().direction(), PriceDirection::Flat);
    }

    #[test]
    fn test_funding_rate_is_sticky() {
        let tracker = MarkPriceTracker::new();
        tracker.update(dec!(50000), Some(dec!(0.0001)));
        tracker.update(dec!(50100), None);

        assert_eq!(tracker.snapshot().funding_rate, Some(dec!(0.0001)));
    }
}
