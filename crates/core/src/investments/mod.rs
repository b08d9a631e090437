//! Investment engine module - state machine, settlement, and traits.

mod investments_errors;
mod investments_model;
mod investments_service;
mod investments_traits;
mod outcome;

#[cfg(test)]
mod investments_service_tests;

pub use investments_errors::InvestmentError;
pub use investments_model::{
    Investment, InvestmentRequest, InvestmentStatus, SettlementReason, SettlementRecord,
    SweepSummary,
};
pub use investments_service::InvestmentService;
pub use investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
pub use outcome::{FixedOutcome, SettlementOutcomeTrait, UniformOutcome};
