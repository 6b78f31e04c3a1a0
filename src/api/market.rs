//! Yandex Market partner API client: offer mappings, stock and price updates.
//!
//! The shop runs two campaigns (FBS and DBS), each with its own campaign and
//! warehouse id; the same token covers both.

use std::collections::HashSet;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::MarketConfig;
use crate::error::{Result, SyncError};
use crate::feed::SupplierRow;
use crate::reconcile::{reconcile, PriceLevel, StockLevel};

const MARKET_BASE_URL: &str = "https://api.partner.market.yandex.ru";

/// Page size of the offer-mapping listing endpoint
const PAGE_LIMIT: &str = "200";

/// Maximum records per stock update call
pub const STOCK_BATCH_SIZE: usize = 2000;

/// Maximum records per price update call
pub const PRICE_BATCH_SIZE: usize = 500;

/// One sku record of the offers/stocks payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuStock {
    pub sku: String,
    pub warehouse_id: String,
    pub items: Vec<StockItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub count: u32,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub updated_at: String,
}

/// One offer record of the offer-prices/updates payload
#[derive(Debug, Serialize)]
pub struct OfferPrice {
    pub id: String,
    pub price: PriceValue,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceValue {
    pub value: u64,
    pub currency_id: &'static str,
}

#[derive(Debug, Deserialize)]
struct OfferMappingsResponse {
    result: OfferMappingsPage,
}

/// One page of the paginated offer-mapping listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferMappingsPage {
    pub offer_mapping_entries: Vec<OfferMappingEntry>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Debug, Deserialize)]
pub struct OfferMappingEntry {
    pub offer: Offer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub shop_sku: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Yandex Market partner API client (Bearer-token auth)
pub struct MarketApi {
    client: reqwest::blocking::Client,
    token: String,
    base_url: String,
}

impl MarketApi {
    pub fn new(config: &MarketConfig) -> Self {
        Self::with_base_url(config, MARKET_BASE_URL)
    }

    /// Client against a non-default base URL (for testing with mock servers)
    pub fn with_base_url(config: &MarketConfig, base_url: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            token: config.token.clone(),
            base_url: base_url.to_string(),
        }
    }

    fn parse<R: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<R> {
        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }
        Ok(response.json()?)
    }

    /// Fetch one offer-mapping page of a campaign
    pub fn product_list(&self, page_token: &str, campaign_id: &str) -> Result<OfferMappingsPage> {
        let url = format!(
            "{}/campaigns/{}/offer-mapping-entries",
            self.base_url, campaign_id
        );
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .query(&[("page_token", page_token), ("limit", PAGE_LIMIT)])
            .send()?;

        let parsed: OfferMappingsResponse = Self::parse(response)?;
        Ok(parsed.result)
    }

    /// Collect every shop sku of a campaign, paging until the listing stops
    /// returning a next-page token.
    pub fn offer_ids(&self, campaign_id: &str) -> Result<HashSet<String>> {
        let mut offer_ids = HashSet::new();
        let mut page_token = String::new();

        loop {
            let page = self.product_list(&page_token, campaign_id)?;
            for entry in page.offer_mapping_entries {
                offer_ids.insert(entry.offer.shop_sku);
            }
            match page.paging.next_page_token {
                Some(token) if !token.is_empty() => page_token = token,
                _ => break,
            }
        }

        Ok(offer_ids)
    }

    /// Submit one batch of sku stock records to a campaign
    pub fn update_stocks(
        &self,
        campaign_id: &str,
        skus: &[SkuStock],
    ) -> Result<serde_json::Value> {
        let url = format!("{}/campaigns/{}/offers/stocks", self.base_url, campaign_id);
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .json(&serde_json::json!({ "skus": skus }))
            .send()?;
        Self::parse(response)
    }

    /// Submit one batch of offer price records to a campaign
    pub fn update_prices(
        &self,
        campaign_id: &str,
        offers: &[OfferPrice],
    ) -> Result<serde_json::Value> {
        let url = format!(
            "{}/campaigns/{}/offer-prices/updates",
            self.base_url, campaign_id
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .json(&serde_json::json!({ "offers": offers }))
            .send()?;
        Self::parse(response)
    }
}

/// Map reconciled stock levels onto sku stock records for one warehouse.
/// `updated_at` is stamped once per reconciliation, not per record.
pub fn to_sku_stocks(
    levels: Vec<StockLevel>,
    warehouse_id: &str,
    updated_at: &str,
) -> Vec<SkuStock> {
    levels
        .into_iter()
        .map(|StockLevel { offer_id, count }| SkuStock {
            sku: offer_id,
            warehouse_id: warehouse_id.to_string(),
            items: vec![StockItem {
                count,
                kind: "FIT",
                updated_at: updated_at.to_string(),
            }],
        })
        .collect()
}

/// Map reconciled price levels onto offer price records. The converted price
/// must parse as integer minor units; anything else propagates as an error.
pub fn to_offer_prices(levels: Vec<PriceLevel>) -> Result<Vec<OfferPrice>> {
    levels
        .into_iter()
        .map(|level| {
            let value: u64 = level
                .price
                .parse()
                .map_err(|_| SyncError::Price(level.price.clone()))?;
            Ok(OfferPrice {
                id: level.offer_id,
                price: PriceValue {
                    value,
                    currency_id: "RUR",
                },
            })
        })
        .collect()
}

/// ISO-8601 UTC timestamp with second precision, as the stocks endpoint expects
fn stock_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Full synchronization of one campaign: resolve offers, reconcile the feed
/// against them, then submit stock and price updates in platform-sized
/// batches. Returns the number of stock and price records sent.
pub fn sync_campaign(
    api: &MarketApi,
    campaign_id: &str,
    warehouse_id: &str,
    rows: &[SupplierRow],
) -> Result<(usize, usize)> {
    let offer_ids = api.offer_ids(campaign_id)?;
    log::info!(
        "Yandex Market campaign {}: {} offers registered",
        campaign_id,
        offer_ids.len()
    );

    let (stock_levels, price_levels) = reconcile(rows, offer_ids);

    let stocks = to_sku_stocks(stock_levels, warehouse_id, &stock_timestamp());
    for batch in stocks.chunks(STOCK_BATCH_SIZE) {
        api.update_stocks(campaign_id, batch)?;
    }

    let prices = to_offer_prices(price_levels)?;
    for batch in prices.chunks(PRICE_BATCH_SIZE) {
        api.update_prices(campaign_id, batch)?;
    }

    log::info!(
        "Yandex Market campaign {}: sent {} stock and {} price updates",
        campaign_id,
        stocks.len(),
        prices.len()
    );
    Ok((stocks.len(), prices.len()))
}

#[cfg(test)]
#[path = "market_tests.rs"]
mod tests;
