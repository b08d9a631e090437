//! Market asset catalog - domain models, service, and traits.

mod assets_errors;
mod assets_model;
mod assets_service;
mod assets_traits;

#[cfg(test)]
mod assets_model_tests;

pub use assets_errors::AssetError;
pub use assets_model::{Asset, AssetCategory, NewAsset, PriceUpdate, RiskLevel};
pub use assets_service::AssetService;
pub use assets_traits::{AssetRepositoryTrait, AssetServiceTrait};
