use model::{DepthUpdate, Exchange, MarkPriceUpdate, PriceLevelUpdate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Raw futures depth event (`e` = "depthUpdate").
///
/// Sequence fields (`U`, `u`, `pu`) are intentionally not mapped: the
/// book treats every delta as an ordinary upsert.
#[derive(Debug, Deserialize)]
pub struct FuturesDepthRaw {
    #[serde(rename = "e")]
    pub event_type: String,
    #[serde(rename = "E")]
    pub event_time: i64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "b")]
    pub bids: Vec<(String, String)>,
    #[serde(rename = "a")]
    pub asks: Vec<(String, String)>,
}

/// Raw mark price event (`e` = "markPriceUpdate").
#[derive(Debug, Deserialize)]
pub struct MarkPriceRaw {
    #[serde(rename = "e")]
    pub event_type: String,
    #[serde(rename = "E")]
    pub event_time: i64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "p")]
    pub mark_price: Decimal,
    /// Funding rate, empty string for products without funding.
    #[serde(rename = "r", default)]
    pub funding_rate: String,
    #[serde(rename = "T", default)]
    pub next_funding_time: i64,
}

/// Combined stream wrapper holding generic event data.
#[derive(Debug, Deserialize)]
pub struct CombinedStreamWrapper {
    pub stream: String,
    pub data: serde_json::Value,
}

pub enum ParsedMessage {
    Depth(DepthUpdate),
    MarkPrice(MarkPriceUpdate),
    Unknown,
}

/// Parses string price/volume pairs into Decimal tuples.
///
/// Rows that fail to parse are dropped: a malformed row must not take
/// down the rest of the message.
fn parse_price_levels(levels: &[(String, String)]) -> Vec<PriceLevelUpdate> {
    levels
        .iter()
        .filter_map(|(price, volume)| {
            let p = Decimal::from_str(price).ok()?;
            let v = Decimal::from_str(volume).ok()?;
            Some((p, v))
        })
        .collect()
}

impl From<FuturesDepthRaw> for DepthUpdate {
    fn from(raw: FuturesDepthRaw) -> Self {
        DepthUpdate {
            exchange: Exchange::BinanceFutures,
            symbol: raw.symbol,
            bids: parse_price_levels(&raw.bids),
            asks: parse_price_levels(&raw.asks),
            event_time_ms: raw.event_time,
        }
    }
}

impl From<MarkPriceRaw> for MarkPriceUpdate {
    fn from(raw: MarkPriceRaw) -> Self {
        MarkPriceUpdate {
            exchange: Exchange::BinanceFutures,
            symbol: raw.symbol,
            mark_price: raw.mark_price,
            funding_rate: Decimal::from_str(&raw.funding_rate).ok(),
            next_funding_time_ms: raw.next_funding_time,
            event_time_ms: raw.event_time,
        }
    }
}

fn dispatch(data: serde_json::Value) -> Result<ParsedMessage, serde_json::Error> {
    match data.get("e").and_then(|v| v.as_str()) {
        Some("depthUpdate") => {
            let raw: FuturesDepthRaw = serde_json::from_value(data)?;
            Ok(ParsedMessage::Depth(raw.into()))
        }
        Some("markPriceUpdate") => {
            let raw: MarkPriceRaw = serde_json::from_value(data)?;
            Ok(ParsedMessage::MarkPrice(raw.into()))
        }
        _ => Ok(ParsedMessage::Unknown),
    }
}

pub fn parse_message(text: &str) -> Result<ParsedMessage, serde_json::Error> {
    // Combined stream format: {"stream": "...", "data": {...}}
    if text.contains("\"stream\"") {
        let wrapper: CombinedStreamWrapper = serde_json::from_str(text)?;
        return dispatch(wrapper.data);
    }

    // Raw single-stream format.
    let raw: serde_json::Value = serde_json::from_str(text)?;
    dispatch(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_combined_depth_update() {
        let json = r#"{
            "stream": "btcusdt@depth",
            "data": {
                "e": "depthUpdate",
                "E": 1672515782136,
                "T": 1672515782130,
                "s": "BTCUSDT",
                "U": 157,
                "u": 160,
                "pu": 149,
                "b": [
                    ["23450.00", "1.5"],
                    ["23449.50", "0"]
                ],
                "a": [
                    ["23455.00", "0.8"]
                ]
            }
        }"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Depth(depth) => {
                assert_eq!(depth.symbol, "BTCUSDT");
                assert_eq!(depth.event_time_ms, 1672515782136);
                assert_eq!(depth.bids.len(), 2);
                assert_eq!(depth.bids[0], (dec!(23450.00), dec!(1.5)));
                // Zero volume rows survive parsing; they drive removals.
                assert_eq!(depth.bids[1], (dec!(23449.50), dec!(0)));
                assert_eq!(depth.asks, vec![(dec!(23455.00), dec!(0.8))]);
            }
            _ => panic!("expected Depth"),
        }
    }

    #[test]
    fn test_parse_combined_mark_price() {
        let json = r#"{
            "stream": "btcusdt@markPrice",
            "data": {
                "e": "markPriceUpdate",
                "E": 1672515782000,
                "s": "BTCUSDT",
                "p": "23456.78000000",
                "i": "23456.50000000",
                "P": "23460.00000000",
                "r": "0.00038167",
                "T": 1672531200000
            }
        }"#;

        match parse_message(json).unwrap() {
            ParsedMessage::MarkPrice(mark) => {
                assert_eq!(mark.symbol, "BTCUSDT");
                assert_eq!(mark.mark_price, dec!(23456.78000000));
                assert_eq!(mark.funding_rate, Some(dec!(0.00038167)));
                assert_eq!(mark.next_funding_time_ms, 1672531200000);
            }
            _ => panic!("expected MarkPrice"),
        }
    }

    #[test]
    fn test_parse_raw_mark_price() {
        let json = r#"{
            "e": "markPriceUpdate",
            "E": 1672515782000,
            "s": "BTCUSDT",
            "p": "23456.78",
            "r": "",
            "T": 0
        }"#;

        match parse_message(json).unwrap() {
            ParsedMessage::MarkPrice(mark) => {
                assert_eq!(mark.mark_price, dec!(23456.78));
                // Empty funding rate maps to None rather than an error.
                assert_eq!(mark.funding_rate, None);
            }
            _ => panic!("expected MarkPrice"),
        }
    }

    #[test]
    fn test_unknown_event_ignored() {
        let json = r#"{"e": "aggTrade", "s": "BTCUSDT", "p": "1.0"}"#;
        assert!(matches!(
            parse_message(json).unwrap(),
            ParsedMessage::Unknown
        ));
    }

    #[test]
    fn test_malformed_rows_dropped() {
        let json = r#"{
            "e": "depthUpdate",
            "E": 1,
            "s": "BTCUSDT",
            "b": [["not-a-price", "1.0"], ["100.0", "2.0"]],
            "a": []
        }"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Depth(depth) => {
                assert_eq!(depth.bids, vec![(dec!(100.0), dec!(2.0))]);
            }
            _ => panic!("expected Depth"),
        }
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(parse_message("not json").is_err());
    }
}
