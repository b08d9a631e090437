use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use super::investments_errors::InvestmentError;
use super::investments_model::{
    Investment, InvestmentRequest, InvestmentStatus, SettlementReason, SettlementRecord,
    SweepSummary,
};
use super::investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
use super::outcome::SettlementOutcomeTrait;
use crate::assets::{AssetError, AssetServiceTrait};
use crate::errors::{Error, Result};
use crate::fx::DisplayContext;
use crate::wallets::{LedgerError, WalletServiceTrait};

/// The investment engine: opens, matures, and settles time-boxed positions
/// against the wallet ledger and asset catalog.
pub struct InvestmentService {
    investments: Arc<dyn InvestmentRepositoryTrait>,
    assets: Arc<dyn AssetServiceTrait>,
    wallets: Arc<dyn WalletServiceTrait>,
    outcome: Arc<dyn SettlementOutcomeTrait>,
}

impl InvestmentService {
    pub fn new(
        investments: Arc<dyn InvestmentRepositoryTrait>,
        assets: Arc<dyn AssetServiceTrait>,
        wallets: Arc<dyn WalletServiceTrait>,
        outcome: Arc<dyn SettlementOutcomeTrait>,
    ) -> Self {
        Self {
            investments,
            assets,
            wallets,
            outcome,
        }
    }

    fn asset_label(&self, asset_id: &str) -> String {
        self.assets
            .get_asset(asset_id)
            .map(|a| a.name)
            .unwrap_or_else(|_| asset_id.to_string())
    }

    fn not_active_error(&self, investment_id: &str) -> Error {
        let status = self
            .investments
            .get_by_id(investment_id)
            .map(|i| i.status.as_str().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        InvestmentError::NotActive {
            id: investment_id.to_string(),
            status,
        }
        .into()
    }

    /// The single fund-release path for every terminal transition except
    /// cancellation. Claims the investment, realizes the outcome, credits
    /// the wallet, and records the settlement.
    async fn release_funds(&self, investment_id: &str, reason: SettlementReason) -> Result<Decimal> {
        let investment = match self.investments.claim_for_settlement(investment_id).await? {
            Some(investment) => investment,
            None => return Err(self.not_active_error(investment_id)),
        };

        let expected = investment.expected_profit();
        let actual = self.outcome.realize(expected);
        let description = format!(
            "Profit from {} investment",
            self.asset_label(&investment.asset_id)
        );

        if let Err(e) = self
            .wallets
            .unlock_and_credit(
                &investment.user_id,
                investment.invested_amount,
                actual,
                description,
            )
            .await
        {
            log::warn!(
                "Fund release for investment {} failed, returning claim: {}",
                investment.id,
                e
            );
            if let Err(release_err) = self.investments.release_claim(&investment.id).await {
                log::error!(
                    "Investment {} stuck in settling after failed release: {}",
                    investment.id,
                    release_err
                );
            }
            return Err(e);
        }

        let record = SettlementRecord {
            profit_loss: actual,
            reason,
            completed_at: Utc::now(),
        };
        match self.investments.mark_settled(&investment.id, record).await {
            Ok(_) => {
                log::debug!(
                    "Settled investment {} ({}) with profit/loss {}",
                    investment.id,
                    reason.as_str(),
                    actual
                );
                Ok(actual)
            }
            Err(e) => {
                // Funds are already credited; failing to record the terminal
                // state is an integrity violation, not a retryable outcome.
                let details = format!(
                    "funds released (principal {}, profit {}) but settlement not recorded: {}",
                    investment.invested_amount, actual, e
                );
                log::error!(
                    "Ledger integrity violation for investment {} (user {}): {}",
                    investment.id,
                    investment.user_id,
                    details
                );
                Err(LedgerError::InconsistentLedgerState {
                    wallet_id: investment.user_id.clone(),
                    details,
                }
                .into())
            }
        }
    }
}

#[async_trait]
impl InvestmentServiceTrait for InvestmentService {
    async fn open(&self, request: InvestmentRequest, ctx: &DisplayContext) -> Result<Investment> {
        let asset = self.assets.get_asset(&request.asset_id)?;
        if !asset.is_active {
            return Err(AssetError::Inactive(asset.symbol.clone()).into());
        }
        if !asset.allowed_durations.contains(&request.duration_hours) {
            return Err(InvestmentError::InvalidDuration {
                symbol: asset.symbol.clone(),
                duration_hours: request.duration_hours,
            }
            .into());
        }

        let amount_base = ctx.to_base(request.amount);
        if amount_base < asset.min_investment {
            return Err(InvestmentError::BelowMinimum {
                minimum: ctx.to_display(asset.min_investment),
                currency: ctx.currency().code.clone(),
            }
            .into());
        }
        if amount_base > asset.max_investment {
            return Err(InvestmentError::AboveMaximum {
                maximum: ctx.to_display(asset.max_investment),
                currency: ctx.currency().code.clone(),
            }
            .into());
        }

        let lock_entry = self
            .wallets
            .lock(
                &request.user_id,
                amount_base,
                format!(
                    "Invested in {} for {} hours",
                    asset.name, request.duration_hours
                ),
            )
            .await?;

        let now = Utc::now();
        let investment = Investment {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: request.user_id.clone(),
            asset_id: asset.id.clone(),
            invested_amount: amount_base,
            entry_price: asset.current_price,
            duration_hours: request.duration_hours,
            start_time: now,
            end_time: now + Duration::hours(i64::from(request.duration_hours)),
            status: InvestmentStatus::Active,
            expected_return_rate: asset.get_return_rate(request.duration_hours),
            profit_loss: Decimal::ZERO,
            settlement_reason: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        match self.investments.insert(investment).await {
            Ok(investment) => Ok(investment),
            Err(e) => {
                // The lock already committed; compensate before surfacing.
                log::warn!(
                    "Investment insert for user {} failed after lock {}, rolling back: {}",
                    request.user_id,
                    lock_entry.reference,
                    e
                );
                if let Err(rollback_err) = self
                    .wallets
                    .release_lock(
                        &request.user_id,
                        amount_base,
                        format!("Reversal of investment lock {}", lock_entry.reference),
                    )
                    .await
                {
                    log::error!(
                        "Failed to roll back lock {} for user {}: {}",
                        lock_entry.reference,
                        request.user_id,
                        rollback_err
                    );
                }
                Err(e)
            }
        }
    }

    fn is_matured(&self, investment: &Investment, now: DateTime<Utc>) -> bool {
        investment.is_matured(now)
    }

    async fn settle(&self, investment_id: &str) -> Result<Decimal> {
        self.release_funds(investment_id, SettlementReason::Matured)
            .await
    }

    async fn withdraw_early(&self, investment_id: &str) -> Result<Decimal> {
        self.release_funds(investment_id, SettlementReason::Manual)
            .await
    }

    async fn approve_close(&self, investment_id: &str) -> Result<Decimal> {
        self.release_funds(investment_id, SettlementReason::AdminApproved)
            .await
    }

    async fn cancel(&self, investment_id: &str) -> Result<()> {
        let investment = match self.investments.claim_for_settlement(investment_id).await? {
            Some(investment) => investment,
            None => return Err(self.not_active_error(investment_id)),
        };

        if let Err(e) = self
            .wallets
            .release_lock(
                &investment.user_id,
                investment.invested_amount,
                format!("Cancelled investment {}", investment.id),
            )
            .await
        {
            if let Err(release_err) = self.investments.release_claim(&investment.id).await {
                log::error!(
                    "Investment {} stuck in settling after failed cancel: {}",
                    investment.id,
                    release_err
                );
            }
            return Err(e);
        }

        self.investments
            .mark_cancelled(&investment.id, Utc::now())
            .await?;
        Ok(())
    }

    async fn sweep_matured(&self, now: DateTime<Utc>) -> Result<SweepSummary> {
        let matured = self.investments.list_matured(now)?;
        let mut summary = SweepSummary::default();

        for investment in matured {
            match self.release_funds(&investment.id, SettlementReason::Matured).await {
                Ok(_) => summary.settled += 1,
                // Another worker claimed it between the listing and our claim.
                Err(Error::Investment(InvestmentError::NotActive { .. })) => {
                    summary.skipped += 1;
                }
                Err(e) => {
                    log::error!("Failed to settle investment {}: {}", investment.id, e);
                    summary.failed += 1;
                }
            }
        }

        log::debug!(
            "Maturation sweep: {} settled, {} skipped, {} failed",
            summary.settled,
            summary.skipped,
            summary.failed
        );
        Ok(summary)
    }

    fn list_active(&self, user_id: &str) -> Result<Vec<Investment>> {
        self.investments
            .list_by_user(user_id, Some(InvestmentStatus::Active))
    }

    fn list_history(&self, user_id: &str) -> Result<Vec<Investment>> {
        let investments = self.investments.list_by_user(user_id, None)?;
        Ok(investments
            .into_iter()
            .filter(|i| {
                matches!(
                    i.status,
                    InvestmentStatus::Completed | InvestmentStatus::Cancelled
                )
            })
            .collect())
    }

    fn total_open_invested(&self, user_id: &str) -> Result<Decimal> {
        self.investments.sum_open_invested(user_id)
    }
}
