//! Live order book maintenance for an incremental depth feed.
//!
//! Price levels are kept in sorted `BTreeMap` structures keyed by
//! `Decimal` price, so the best levels of each side are a prefix walk,
//! not a per-query sort. Updates with zero volume delete their level.
//!
//! # Example
//!
//! ```rust
//! use orderbook::{OrderBook, Side};
//! use rust_decimal_macros::dec;
//!
//! let mut book = OrderBook::new("BTCUSDT");
//!
//! book.apply(Side::Ask, &[(dec!(100.00), dec!(1.5)), (dec!(99.50), dec!(0.5))]);
//! book.apply(Side::Bid, &[(dec!(99.00), dec!(2.0))]);
//!
//! let best_ask = book.best_ask().unwrap();
//! assert_eq!(best_ask.price, dec!(99.50));
//!
//! // Zero volume removes the level.
//! book.apply(Side::Ask, &[(dec!(99.50), dec!(0))]);
//! assert_eq!(book.best_ask().unwrap().price, dec!(100.00));
//! ```

mod book;
mod error;
mod level;
mod mark_price;
mod shared;
mod store;

pub use book::{ApplyReport, OrderBook};
pub use error::BookError;
pub use level::{PriceLevel, Side};
pub use mark_price::{MarkPriceSnapshot, MarkPriceTracker, PriceDirection, SharedMarkPrice};
pub use shared::{DepthSnapshot, SharedBook};
pub use store::{LevelStore, TopLevels};
