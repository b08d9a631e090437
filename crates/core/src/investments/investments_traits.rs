//! Investment repository and service traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::investments_model::{
    Investment, InvestmentRequest, InvestmentStatus, SettlementRecord, SweepSummary,
};
use crate::errors::Result;
use crate::fx::DisplayContext;

/// Trait defining the contract for investment repository operations.
#[async_trait]
pub trait InvestmentRepositoryTrait: Send + Sync {
    async fn insert(&self, investment: Investment) -> Result<Investment>;

    fn get_by_id(&self, investment_id: &str) -> Result<Investment>;

    fn list_by_user(
        &self,
        user_id: &str,
        status: Option<InvestmentStatus>,
    ) -> Result<Vec<Investment>>;

    /// Active investments whose `end_time` has passed.
    fn list_matured(&self, now: DateTime<Utc>) -> Result<Vec<Investment>>;

    /// Sum of `invested_amount` over a user's open (active or settling)
    /// investments, for reconciliation against the locked balance.
    fn sum_open_invested(&self, user_id: &str) -> Result<Decimal>;

    /// Atomically claims an active investment for settlement by flipping
    /// `active -> settling`. `Ok(None)` when the row is not active (already
    /// claimed, completed, or cancelled).
    async fn claim_for_settlement(&self, investment_id: &str) -> Result<Option<Investment>>;

    /// Returns a claimed investment to `active` after a failed fund release.
    async fn release_claim(&self, investment_id: &str) -> Result<()>;

    async fn mark_settled(
        &self,
        investment_id: &str,
        record: SettlementRecord,
    ) -> Result<Investment>;

    async fn mark_cancelled(
        &self,
        investment_id: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<Investment>;
}

/// Trait defining the contract for the investment engine.
#[async_trait]
pub trait InvestmentServiceTrait: Send + Sync {
    /// Opens a time-boxed investment from a display-currency amount.
    async fn open(&self, request: InvestmentRequest, ctx: &DisplayContext) -> Result<Investment>;

    fn is_matured(&self, investment: &Investment, now: DateTime<Utc>) -> bool;

    /// Settles an investment at maturity. Returns the realized profit/loss.
    async fn settle(&self, investment_id: &str) -> Result<Decimal>;

    /// Early/manual exit; same settlement path with a different reason tag.
    async fn withdraw_early(&self, investment_id: &str) -> Result<Decimal>;

    /// Operator-approved exit; same settlement path.
    async fn approve_close(&self, investment_id: &str) -> Result<Decimal>;

    /// Releases locked funds with zero profit/loss.
    async fn cancel(&self, investment_id: &str) -> Result<()>;

    /// Settles every matured investment. Safe to run from concurrent
    /// workers.
    async fn sweep_matured(&self, now: DateTime<Utc>) -> Result<SweepSummary>;

    fn list_active(&self, user_id: &str) -> Result<Vec<Investment>>;

    fn list_history(&self, user_id: &str) -> Result<Vec<Investment>>;

    /// Sum of open invested amounts, for locked-balance reconciliation.
    fn total_open_invested(&self, user_id: &str) -> Result<Decimal>;
}
