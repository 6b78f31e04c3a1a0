//! API clients for the two marketplaces (Ozon seller API, Yandex Market)

pub mod market;
pub mod ozon;

pub use market::MarketApi;
pub use ozon::OzonApi;
