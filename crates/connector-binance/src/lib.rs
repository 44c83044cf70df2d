//! Binance USD-M futures WebSocket feed: combined depth and mark price
//! streams with automatic reconnection.

mod client;
mod parser;

pub use client::run_feed;
pub use parser::{parse_message, ParsedMessage};
