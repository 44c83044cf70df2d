//! Binance USD-M futures environment selection.

use std::fmt;
use std::str::FromStr;

/// Futures environment (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FuturesEnvironment {
    /// Live futures market data.
    #[default]
    Mainnet,
    /// Futures testnet.
    Testnet,
}

impl FuturesEnvironment {
    /// WebSocket base URL for futures market data streams.
    pub fn ws_base_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "wss://fstream.binance.com",
            Self::Testnet => "wss://stream.binancefuture.com",
        }
    }

    /// Loads the environment from `BINANCE_FUTURES_ENVIRONMENT`.
    ///
    /// Returns `Mainnet` when unset or invalid.
    pub fn from_env() -> Self {
        std::env::var("BINANCE_FUTURES_ENVIRONMENT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for FuturesEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for FuturesEnvironment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" | "prod" | "production" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

/// Error parsing an environment string.
#[derive(Debug, Clone)]
pub struct ParseEnvironmentError(String);

impl fmt::Display for ParseEnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid environment '{}', expected 'mainnet' or 'testnet'",
            self.0
        )
    }
}

impl std::error::Error for ParseEnvironmentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_urls() {
        assert_eq!(
            FuturesEnvironment::Mainnet.ws_base_url(),
            "wss://fstream.binance.com"
        );
        assert_eq!(
            FuturesEnvironment::Testnet.ws_base_url(),
            "wss://stream.binancefuture.com"
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "mainnet".parse::<FuturesEnvironment>().unwrap(),
            FuturesEnvironment::Mainnet
        );
        assert_eq!(
            "PROD".parse::<FuturesEnvironment>().unwrap(),
            FuturesEnvironment::Mainnet
        );
        assert_eq!(
            "testnet".parse::<FuturesEnvironment>().unwrap(),
            FuturesEnvironment::Testnet
        );
        assert!("staging".parse::<FuturesEnvironment>().is_err());
    }

    #[test]
    fn test_default_is_mainnet() {
        assert_eq!(FuturesEnvironment::default(), FuturesEnvironment::Mainnet);
        assert_eq!(FuturesEnvironment::Mainnet.to_string(), "mainnet");
    }
}
