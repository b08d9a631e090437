//! Bonus repository and service traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::bonuses_model::{Bonus, NewBonus};
use crate::errors::Result;
use crate::wallets::Transaction;

/// Trait defining the contract for bonus repository operations.
#[async_trait]
pub trait BonusRepositoryTrait: Send + Sync {
    async fn insert(&self, bonus: Bonus) -> Result<Bonus>;

    fn get_by_id(&self, bonus_id: &str) -> Result<Bonus>;

    fn list_unclaimed(&self, user_id: &str) -> Result<Vec<Bonus>>;

    fn total_claimed(&self, user_id: &str) -> Result<Decimal>;

    /// Atomically flips an unclaimed bonus for this user to claimed.
    /// `Ok(None)` when already claimed or owned by someone else.
    async fn claim(
        &self,
        bonus_id: &str,
        user_id: &str,
        claimed_at: DateTime<Utc>,
    ) -> Result<Option<Bonus>>;

    /// Returns a bonus to unclaimed after a failed wallet credit.
    async fn release_claim(&self, bonus_id: &str) -> Result<()>;
}

/// Trait defining the contract for the bonus issuance service.
#[async_trait]
pub trait BonusServiceTrait: Send + Sync {
    async fn grant(&self, new_bonus: NewBonus) -> Result<Bonus>;

    /// Claims a bonus and credits the owner's wallet. Exactly-once: a second
    /// claim fails without touching balances.
    async fn claim(&self, user_id: &str, bonus_id: &str) -> Result<Transaction>;

    fn list_available(&self, user_id: &str) -> Result<Vec<Bonus>>;

    fn total_claimed(&self, user_id: &str) -> Result<Decimal>;
}
