//! Ozon seller API client: product listing, stock and price updates.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::OzonConfig;
use crate::error::{Result, SyncError};
use crate::feed::SupplierRow;
use crate::reconcile::{reconcile, PriceLevel, StockLevel};

const OZON_BASE_URL: &str = "https://api-seller.ozon.ru";

/// Page size of the product listing endpoint
const PAGE_LIMIT: u32 = 1000;

/// Maximum records per stock update call
pub const STOCK_BATCH_SIZE: usize = 100;

/// Maximum records per price update call
pub const PRICE_BATCH_SIZE: usize = 1000;

/// One stock record of the import/stocks payload
#[derive(Debug, Serialize)]
pub struct StockUpdate {
    pub offer_id: String,
    pub stock: u32,
}

/// One price record of the import/prices payload
#[derive(Debug, Serialize)]
pub struct PriceUpdate {
    pub auto_action_enabled: &'static str,
    pub currency_code: &'static str,
    pub offer_id: String,
    pub old_price: &'static str,
    pub price: String,
}

impl From<PriceLevel> for PriceUpdate {
    fn from(level: PriceLevel) -> Self {
        Self {
            auto_action_enabled: "UNKNOWN",
            currency_code: "RUB",
            offer_id: level.offer_id,
            old_price: "0",
            price: level.price,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProductListResponse {
    result: ProductListPage,
}

/// One page of the paginated product listing
#[derive(Debug, Deserialize)]
pub struct ProductListPage {
    pub items: Vec<ProductItem>,
    pub total: u64,
    pub last_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductItem {
    pub offer_id: String,
}

/// Ozon seller API client (Client-Id / Api-Key header auth)
pub struct OzonApi {
    client: reqwest::blocking::Client,
    client_id: String,
    api_key: String,
    base_url: String,
}

impl OzonApi {
    pub fn new(config: &OzonConfig) -> Self {
        Self::with_base_url(config, OZON_BASE_URL)
    }

    /// Client against a non-default base URL (for testing with mock servers)
    pub fn with_base_url(config: &OzonConfig, base_url: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            client_id: config.client_id.clone(),
            api_key: config.api_key.clone(),
            base_url: base_url.to_string(),
        }
    }

    fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()?;

        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }

        Ok(response.json()?)
    }

    /// Fetch one product listing page starting after `last_id`
    pub fn product_list(&self, last_id: &str) -> Result<ProductListPage> {
        let body = serde_json::json!({
            "filter": { "visibility": "ALL" },
            "last_id": last_id,
            "limit": PAGE_LIMIT,
        });
        let response: ProductListResponse = self.post("/v2/product/list", &body)?;
        Ok(response.result)
    }

    /// Collect every registered offer identifier.
    ///
    /// Pages until the accumulated item count reaches the reported total; an
    /// empty page also terminates so a stale total cannot loop forever.
    pub fn offer_ids(&self) -> Result<HashSet<String>> {
        let mut offer_ids = HashSet::new();
        let mut last_id = String::new();
        let mut seen: u64 = 0;

        loop {
            let page = self.product_list(&last_id)?;
            let page_len = page.items.len() as u64;
            for item in page.items {
                offer_ids.insert(item.offer_id);
            }
            seen += page_len;
            last_id = page.last_id;
            if page_len == 0 || seen >= page.total {
                break;
            }
        }

        Ok(offer_ids)
    }

    /// Submit one batch of stock records
    pub fn update_stocks(&self, stocks: &[StockUpdate]) -> Result<serde_json::Value> {
        self.post(
            "/v1/product/import/stocks",
            &serde_json::json!({ "stocks": stocks }),
        )
    }

    /// Submit one batch of price records
    pub fn update_prices(&self, prices: &[PriceUpdate]) -> Result<serde_json::Value> {
        self.post(
            "/v1/product/import/prices",
            &serde_json::json!({ "prices": prices }),
        )
    }
}

/// Full Ozon synchronization: resolve offers, reconcile the feed against
/// them, then submit stock and price updates in platform-sized batches.
/// Returns the number of stock and price records sent.
pub fn sync(api: &OzonApi, rows: &[SupplierRow]) -> Result<(usize, usize)> {
    let offer_ids = api.offer_ids()?;
    log::info!("Ozon: {} offers registered", offer_ids.len());

    let (stock_levels, price_levels) = reconcile(rows, offer_ids);

    let stocks: Vec<StockUpdate> = stock_levels
        .into_iter()
        .map(|StockLevel { offer_id, count }| StockUpdate {
            offer_id,
            stock: count,
        })
        .collect();
    for batch in stocks.chunks(STOCK_BATCH_SIZE) {
        api.update_stocks(batch)?;
    }

    let prices: Vec<PriceUpdate> = price_levels.into_iter().map(PriceUpdate::from).collect();
    for batch in prices.chunks(PRICE_BATCH_SIZE) {
        api.update_prices(batch)?;
    }

    log::info!(
        "Ozon: sent {} stock and {} price updates",
        stocks.len(),
        prices.len()
    );
    Ok((stocks.len(), prices.len()))
}

#[cfg(test)]
#[path = "ozon_tests.rs"]
mod tests;
