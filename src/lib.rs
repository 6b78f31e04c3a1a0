//! Watch Sync - marketplace stock & price synchronization
//!
//! Downloads the supplier's stock feed and pushes reconciled stock and price
//! updates to Ozon and to the two Yandex Market campaigns (FBS, DBS).

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod reconcile;

pub use api::{MarketApi, OzonApi};
pub use config::{MarketConfig, OzonConfig};
pub use error::{Result, SyncError};
pub use feed::SupplierRow;
