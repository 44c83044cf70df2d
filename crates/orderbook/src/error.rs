//! Order book error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while validating incoming level updates.
///
/// These never abort a batch: the offending level is skipped and counted,
/// and the remaining entries still apply. Removing an absent price is not
/// an error at all; the feed may report zero volume for levels outside
/// the depth this process ever held.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BookError {
    /// Price is zero or negative.
    #[error("invalid price {price}")]
    InvalidPrice { price: Decimal },

    /// Volume is negative.
    #[error("invalid volume {volume} at price {price}")]
    InvalidVolume { price: Decimal, volume: Decimal },
}
