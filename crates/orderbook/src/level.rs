//! Price level representation.

use rust_decimal::Decimal;

/// Side of the order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Buy interest. Best bid is the highest price.
    Bid,
    /// Sell interest. Best ask is the lowest price.
    Ask,
}

/// An aggregated resting volume at one exact price.
///
/// This is a price-level book, not an order-by-order book: there is no
/// order identity, only the total size at each price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevel {
    /// The price at this level. Unique within a side.
    pub price: Decimal,
    /// The aggregate volume resting at this price. Never zero: a level
    /// with zero volume does not exist.
    pub volume: Decimal,
}

impl PriceLevel {
    /// Creates a new price level.
    pub fn new(price: Decimal, volume: Decimal) -> Self {
        Self { price, volume }
    }
}
