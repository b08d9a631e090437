use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use super::bonuses_errors::BonusError;
use super::bonuses_model::{Bonus, NewBonus};
use super::bonuses_traits::{BonusRepositoryTrait, BonusServiceTrait};
use crate::errors::Result;
use crate::wallets::{Transaction, WalletServiceTrait};

/// Service for granting and claiming promotional bonuses.
pub struct BonusService {
    repository: Arc<dyn BonusRepositoryTrait>,
    wallets: Arc<dyn WalletServiceTrait>,
}

impl BonusService {
    pub fn new(repository: Arc<dyn BonusRepositoryTrait>, wallets: Arc<dyn WalletServiceTrait>) -> Self {
        Self { repository, wallets }
    }
}

#[async_trait]
impl BonusServiceTrait for BonusService {
    async fn grant(&self, new_bonus: NewBonus) -> Result<Bonus> {
        new_bonus.validate()?;
        let bonus = new_bonus.into_bonus(Utc::now());
        self.repository.insert(bonus).await
    }

    async fn claim(&self, user_id: &str, bonus_id: &str) -> Result<Transaction> {
        let now = Utc::now();

        let bonus = self.repository.get_by_id(bonus_id)?;
        if bonus.is_expired(now) {
            return Err(BonusError::Expired(bonus_id.to_string()).into());
        }

        let claimed = match self.repository.claim(bonus_id, user_id, now).await? {
            Some(bonus) => bonus,
            None => return Err(BonusError::AlreadyClaimed(bonus_id.to_string()).into()),
        };

        match self
            .wallets
            .credit_bonus(user_id, claimed.amount, &claimed.title)
            .await
        {
            Ok(transaction) => Ok(transaction),
            Err(e) => {
                // The claim flip committed; undo it so the bonus stays
                // claimable.
                log::warn!(
                    "Wallet credit for bonus {} failed, releasing claim: {}",
                    claimed.id,
                    e
                );
                if let Err(release_err) = self.repository.release_claim(&claimed.id).await {
                    log::error!(
                        "Bonus {} stuck claimed without credit: {}",
                        claimed.id,
                        release_err
                    );
                }
                Err(e)
            }
        }
    }

    fn list_available(&self, user_id: &str) -> Result<Vec<Bonus>> {
        let now = Utc::now();
        let bonuses = self.repository.list_unclaimed(user_id)?;
        Ok(bonuses.into_iter().filter(|b| !b.is_expired(now)).collect())
    }

    fn total_claimed(&self, user_id: &str) -> Result<Decimal> {
        self.repository.total_claimed(user_id)
    }
}
