//! Market data module - price oracle trait, providers, and refresh service.

mod market_data_service;
mod market_data_traits;
pub mod providers;

#[cfg(test)]
mod market_data_service_tests;

pub use market_data_service::MarketDataService;
pub use market_data_traits::{MarketDataServiceTrait, PriceProviderTrait};
pub use providers::simulated::SimulatedPriceProvider;
