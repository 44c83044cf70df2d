//! Ordered price-level storage for one side of the book.

use std::collections::btree_map;
use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::level::{PriceLevel, Side};

/// The set of price levels for a single side, ordered by price.
///
/// Backed by a `BTreeMap` keyed on `Decimal` price, so priority order is
/// maintained at write time: asks iterate ascending from the front, bids
/// descending from the back, and a top-N query is a prefix walk rather
/// than a sort. Upsert and remove are O(log k) in the number of levels
/// held.
///
/// Invariant: a level with zero volume is never stored. An upsert with
/// zero volume removes the level instead.
#[derive(Debug, Clone)]
pub struct LevelStore {
    side: Side,
    levels: BTreeMap<Decimal, Decimal>,
}

impl LevelStore {
    /// Creates an empty store for the given side.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// Returns the side this store holds.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Inserts a level or replaces the volume of an existing one.
    ///
    /// Zero volume removes the level (no-op if absent). Price is the sole
    /// ordering key, so a pure volume change never moves a level.
    pub fn upsert(&mut self, price: Decimal, volume: Decimal) {
        if volume.is_zero() {
            self.levels.remove(&price);
        } else {
            self.levels.insert(price, volume);
        }
    }

    /// Removes the level at `price` if present; silently does nothing
    /// otherwise.
    pub fn remove(&mut self, price: Decimal) {
        self.levels.remove(&price);
    }

    /// Returns the volume resting at `price`, if a level exists there.
    pub fn volume_at(&self, price: Decimal) -> Option<Decimal> {
        self.levels.get(&price).copied()
    }

    /// Returns the best level on this side (highest bid / lowest ask).
    pub fn best(&self) -> Option<PriceLevel> {
        self.top_n(1).next()
    }

    /// Returns up to `n` levels in priority order, best first.
    ///
    /// Lazy and restartable: each call walks a fresh view of the map. If
    /// fewer than `n` levels exist, all of them are yielded, never
    /// placeholders.
    pub fn top_n(&self, n: usize) -> TopLevels<'_> {
        TopLevels {
            inner: self.levels.iter(),
            from_back: matches!(self.side, Side::Bid),
            remaining: n,
        }
    }

    /// Number of distinct price levels currently held.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns whether the store holds no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Drops all levels.
    pub fn clear(&mut self) {
        self.levels.clear();
    }
}

/// Iterator over the best levels of one side, best price first.
#[derive(Debug)]
pub struct TopLevels<'a> {
    inner: btree_map::Iter<'a, Decimal, Decimal>,
    // Bids live at the back of the map (highest price last).
    from_back: bool,
    remaining: usize,
}

impl Iterator for TopLevels<'_> {
    type Item = PriceLevel;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (price, volume) = if self.from_back {
            self.inner.next_back()?
        } else {
            self.inner.next()?
        };
        self.remaining -= 1;
        Some(PriceLevel::new(*price, *volume))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.inner.len().min(self.remaining);
        (left, Some(left))
    }
}

impl ExactSizeIterator for TopLevels<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn prices(store: &LevelStore, n: usize) -> Vec<Decimal> {
        store.top_n(n).map(|l| l.price).collect()
    }

    #[test]
    fn test_ask_order_is_ascending() {
        let mut store = LevelStore::new(Side::Ask);
        store.upsert(dec!(100.50), dec!(2.0));
        store.upsert(dec!(99.50), dec!(0.5));
        store.upsert(dec!(100.00), dec!(1.5));

        assert_eq!(
            prices(&store, 10),
            vec![dec!(99.50), dec!(100.00), dec!(100.50)]
        );
        assert_eq!(store.best().unwrap().price, dec!(99.50));
    }

    #[test]
    fn test_bid_order_is_descending() {
        let mut store = LevelStore::new(Side::Bid);
        store.upsert(dec!(50000), dec!(1));
        store.upsert(dec!(50010), dec!(2));
        store.upsert(dec!(50005), dec!(1));

        assert_eq!(
            prices(&store, 10),
            vec![dec!(50010), dec!(50005), dec!(50000)]
        );
        assert_eq!(store.best().unwrap().price, dec!(50010));
    }

    #[test]
    fn test_zero_volume_upsert_removes() {
        let mut store = LevelStore::new(Side::Ask);
        store.upsert(dec!(99.50), dec!(0.5));
        store.upsert(dec!(100.00), dec!(1.5));

        store.upsert(dec!(99.50), dec!(0));

        assert_eq!(store.len(), 1);
        assert!(prices(&store, 10).iter().all(|p| *p != dec!(99.50)));
    }

    #[test]
    fn test_remove_absent_price_is_noop() {
        let mut store = LevelStore::new(Side::Bid);
        store.upsert(dec!(100), dec!(1));

        store.remove(dec!(200));
        store.upsert(dec!(300), dec!(0));

        assert_eq!(store.len(), 1);
        assert_eq!(store.volume_at(dec!(100)), Some(dec!(1)));
    }

    #[test]
    fn test_upsert_replaces_volume_in_place() {
        let mut store = LevelStore::new(Side::Ask);
        store.upsert(dec!(100), dec!(1));
        store.upsert(dec!(101), dec!(2));

        store.upsert(dec!(100), dec!(5));

        assert_eq!(store.len(), 2);
        assert_eq!(store.volume_at(dec!(100)), Some(dec!(5)));
        // Position unchanged: still the best ask.
        assert_eq!(store.best().unwrap().price, dec!(100));
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut once = LevelStore::new(Side::Bid);
        once.upsert(dec!(100), dec!(3));

        let mut twice = LevelStore::new(Side::Bid);
        twice.upsert(dec!(100), dec!(3));
        twice.upsert(dec!(100), dec!(3));

        assert_eq!(once.len(), twice.len());
        assert_eq!(once.volume_at(dec!(100)), twice.volume_at(dec!(100)));
    }

    #[test]
    fn test_top_n_truncates_and_never_pads() {
        let mut store = LevelStore::new(Side::Ask);
        for i in 0..5 {
            store.upsert(Decimal::from(100 + i), dec!(1));
        }

        assert_eq!(store.top_n(3).count(), 3);
        assert_eq!(store.top_n(10).count(), 5);
        assert_eq!(store.top_n(0).count(), 0);
    }

    #[test]
    fn test_top_n_is_restartable() {
        let mut store = LevelStore::new(Side::Ask);
        store.upsert(dec!(100), dec!(1));
        store.upsert(dec!(101), dec!(2));

        let first: Vec<_> = store.top_n(2).collect();
        let second: Vec<_> = store.top_n(2).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_n_strictly_monotonic_no_duplicates() {
        let mut store = LevelStore::new(Side::Bid);
        for i in 0..20 {
            store.upsert(Decimal::from(1000 + i * 3), dec!(1));
        }

        let top = prices(&store, 20);
        for pair in top.windows(2) {
            assert!(pair[0] > pair[1], "bids must descend: {:?}", pair);
        }
    }
}
