//! FX module - display-currency models, registry service, and traits.

mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;

#[cfg(test)]
mod fx_service_tests;

pub use fx_errors::FxError;
pub use fx_model::{Currency, DisplayContext, DisplayPreference};
pub use fx_service::FxService;
pub use fx_traits::{CurrencyRepositoryTrait, FxServiceTrait};
