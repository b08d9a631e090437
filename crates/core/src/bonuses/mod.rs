//! Bonus issuance module - promotional credits into the wallet ledger.

mod bonuses_errors;
mod bonuses_model;
mod bonuses_service;
mod bonuses_traits;

#[cfg(test)]
mod bonuses_service_tests;

pub use bonuses_errors::BonusError;
pub use bonuses_model::{Bonus, BonusType, NewBonus};
pub use bonuses_service::BonusService;
pub use bonuses_traits::{BonusRepositoryTrait, BonusServiceTrait};
