//! Credentials and campaign identifiers, read once from the environment.
//!
//! Every leaf function takes these structs explicitly; nothing below the
//! entry point touches ambient environment state.

use crate::error::{Result, SyncError};

/// Ozon seller API credentials
#[derive(Debug, Clone)]
pub struct OzonConfig {
    pub client_id: String,
    pub api_key: String,
}

impl OzonConfig {
    /// Read credentials from `CLIENT_ID` and `SELLER_TOKEN`
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: require("CLIENT_ID")?,
            api_key: require("SELLER_TOKEN")?,
        })
    }
}

/// Yandex Market token plus the FBS and DBS campaign/warehouse pairs
#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub token: String,
    pub fbs_campaign_id: String,
    pub dbs_campaign_id: String,
    pub fbs_warehouse_id: String,
    pub dbs_warehouse_id: String,
}

impl MarketConfig {
    /// Read credentials from `MARKET_TOKEN`, `FBS_ID`, `DBS_ID`,
    /// `WAREHOUSE_FBS_ID` and `WAREHOUSE_DBS_ID`
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            token: require("MARKET_TOKEN")?,
            fbs_campaign_id: require("FBS_ID")?,
            dbs_campaign_id: require("DBS_ID")?,
            fbs_warehouse_id: require("WAREHOUSE_FBS_ID")?,
            dbs_warehouse_id: require("WAREHOUSE_DBS_ID")?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| SyncError::MissingEnv(name.to_string()))
}
