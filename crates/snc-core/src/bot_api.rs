use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Controller state as of the last successful `/status` fetch.
///
/// `network` is kept as the raw wire string; the controller owns the set of
/// valid values and the console only needs to display and toggle it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BotStatus {
    pub is_running: bool,
    pub network: String,
    pub wallet_balance: f64,
    pub tokens_scanned: u64,
    pub active_trades: u64,
}

/// One row of the `/tokens` listing. The sequence is server-ordered and
/// replaced wholesale each cycle; `address` is the only stable key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenSummary {
    pub address: String,
    pub symbol: String,
    pub price: f64,
    pub volume_24h: f64,
    pub price_change_1h: f64,
}

/// One row of the `/trades` listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeRecord {
    pub token_address: String,
    #[serde(rename = "type")]
    pub side: String,
    pub amount: f64,
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown network '{0}'")]
pub struct UnknownNetwork(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Devnet,
}

impl Network {
    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Devnet => "devnet",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Network::Mainnet => Network::Devnet,
            Network::Devnet => Network::Mainnet,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Network::Mainnet),
            "devnet" => Ok(Network::Devnet),
            other => Err(UnknownNetwork(other.to_string())),
        }
    }
}
