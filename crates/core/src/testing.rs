//! In-memory repository implementations shared by the service unit tests.
//!
//! These mirror the storage-layer guarantees the services rely on: the
//! wallet repository applies balance deltas and appends entries as one unit
//! while re-checking the bucket invariants, and the investment/bonus
//! repositories implement the conditional claim flips.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::assets::{Asset, AssetRepositoryTrait, PriceUpdate};
use crate::bonuses::{Bonus, BonusRepositoryTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::investments::{
    Investment, InvestmentRepositoryTrait, InvestmentStatus, SettlementRecord,
};
use crate::wallets::{
    generate_reference, BalanceDelta, LedgerError, NewTransactionEntry, Transaction,
    TransactionStatus, TransactionType, Wallet, WalletRepositoryTrait,
};

// --- Wallets ---

#[derive(Default)]
pub struct InMemoryWalletRepository {
    state: Mutex<WalletState>,
}

#[derive(Default)]
struct WalletState {
    wallets: HashMap<String, Wallet>,
    transactions: Vec<Transaction>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().transactions.clone()
    }

    pub fn transaction_count(&self) -> usize {
        self.state.lock().unwrap().transactions.len()
    }
}

#[async_trait]
impl WalletRepositoryTrait for InMemoryWalletRepository {
    fn get_by_user_id(&self, user_id: &str) -> Result<Option<Wallet>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .wallets
            .values()
            .find(|w| w.user_id == user_id)
            .cloned())
    }

    fn get_by_id(&self, wallet_id: &str) -> Result<Wallet> {
        self.state
            .lock()
            .unwrap()
            .wallets
            .get(wallet_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(wallet_id.to_string())))
    }

    async fn get_or_create(&self, user_id: &str) -> Result<Wallet> {
        let mut state = self.state.lock().unwrap();
        if let Some(wallet) = state.wallets.values().find(|w| w.user_id == user_id) {
            return Ok(wallet.clone());
        }
        let wallet = Wallet::new_for_user(user_id, Utc::now());
        state.wallets.insert(wallet.id.clone(), wallet.clone());
        Ok(wallet)
    }

    async fn set_display_currency(&self, user_id: &str, code: &str) -> Result<Wallet> {
        let mut state = self.state.lock().unwrap();
        let wallet = state
            .wallets
            .values_mut()
            .find(|w| w.user_id == user_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(user_id.to_string())))?;
        wallet.currency = code.to_string();
        wallet.updated_at = Utc::now();
        Ok(wallet.clone())
    }

    async fn apply_entry(
        &self,
        wallet_id: &str,
        delta: BalanceDelta,
        entry: NewTransactionEntry,
    ) -> Result<(Wallet, Transaction)> {
        let mut state = self.state.lock().unwrap();
        let wallet = state
            .wallets
            .get(wallet_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(wallet_id.to_string())))?;

        let next_available = wallet.available + delta.available;
        let next_locked = wallet.locked + delta.locked;
        let next_bonus = wallet.bonus + delta.bonus;

        if next_available < Decimal::ZERO {
            if delta.available < Decimal::ZERO {
                return Err(LedgerError::InsufficientFunds {
                    available: wallet.available,
                    requested: -delta.available,
                }
                .into());
            }
            return Err(LedgerError::InconsistentLedgerState {
                wallet_id: wallet_id.to_string(),
                details: format!("available would become {}", next_available),
            }
            .into());
        }
        if next_locked < Decimal::ZERO {
            return Err(LedgerError::InconsistentLedgerState {
                wallet_id: wallet_id.to_string(),
                details: format!(
                    "locked would become {} (locked {}, delta {})",
                    next_locked, wallet.locked, delta.locked
                ),
            }
            .into());
        }
        if next_bonus < Decimal::ZERO {
            return Err(LedgerError::InconsistentLedgerState {
                wallet_id: wallet_id.to_string(),
                details: format!("bonus would become {}", next_bonus),
            }
            .into());
        }

        let now = Utc::now();
        let mut updated = wallet;
        updated.available = next_available;
        updated.locked = next_locked;
        updated.bonus = next_bonus;
        updated.bonus_claimed += delta.bonus_claimed;
        updated.updated_at = now;

        let transaction = Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: updated.user_id.clone(),
            wallet_id: updated.id.clone(),
            transaction_type: entry.transaction_type,
            payment_method: entry.payment_method,
            amount: entry.amount,
            status: entry.status,
            reference: generate_reference(),
            description: entry.description,
            created_at: now,
            updated_at: now,
        };

        state.wallets.insert(updated.id.clone(), updated.clone());
        state.transactions.push(transaction.clone());
        Ok((updated, transaction))
    }

    fn list_transactions(
        &self,
        user_id: &str,
        transaction_type: Option<TransactionType>,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>> {
        let state = self.state.lock().unwrap();
        let mut transactions: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter(|t| transaction_type.is_none_or(|tt| t.transaction_type == tt))
            .cloned()
            .collect();
        transactions.reverse();
        if let Some(limit) = limit {
            transactions.truncate(limit as usize);
        }
        Ok(transactions)
    }

    fn get_transaction_by_reference(&self, reference: &str) -> Result<Transaction> {
        self.state
            .lock()
            .unwrap()
            .transactions
            .iter()
            .find(|t| t.reference == reference)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(reference.to_string())))
    }

    async fn update_transaction_status(
        &self,
        reference: &str,
        status: TransactionStatus,
    ) -> Result<Transaction> {
        let mut state = self.state.lock().unwrap();
        let transaction = state
            .transactions
            .iter_mut()
            .find(|t| t.reference == reference)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(reference.to_string())))?;
        if !transaction.status.can_transition_to(status) {
            return Err(LedgerError::InvalidStatusTransition {
                from: transaction.status.as_str().to_string(),
                to: status.as_str().to_string(),
            }
            .into());
        }
        transaction.status = status;
        transaction.updated_at = Utc::now();
        Ok(transaction.clone())
    }

    async fn reject_withdrawal(&self, reference: &str) -> Result<(Wallet, Transaction)> {
        let (wallet_id, amount) = {
            let mut state = self.state.lock().unwrap();
            let transaction = state
                .transactions
                .iter_mut()
                .find(|t| t.reference == reference)
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(reference.to_string())))?;
            if transaction.transaction_type != TransactionType::Withdrawal
                || transaction.status != TransactionStatus::Pending
            {
                return Err(LedgerError::NotAPendingWithdrawal {
                    reference: reference.to_string(),
                }
                .into());
            }
            transaction.status = TransactionStatus::Rejected;
            transaction.updated_at = Utc::now();
            (transaction.wallet_id.clone(), transaction.amount.abs())
        };

        self.apply_entry(
            &wallet_id,
            BalanceDelta {
                available: amount,
                ..Default::default()
            },
            NewTransactionEntry {
                transaction_type: TransactionType::Adjustment,
                payment_method: crate::wallets::PaymentMethod::System,
                amount,
                status: TransactionStatus::Completed,
                description: format!("Reversal of rejected withdrawal {}", reference),
            },
        )
        .await
    }
}

// --- Assets ---

#[derive(Default)]
pub struct InMemoryAssetRepository {
    assets: Mutex<Vec<Asset>>,
}

impl InMemoryAssetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(assets: Vec<Asset>) -> Self {
        Self {
            assets: Mutex::new(assets),
        }
    }
}

#[async_trait]
impl AssetRepositoryTrait for InMemoryAssetRepository {
    fn get_by_id(&self, asset_id: &str) -> Result<Asset> {
        self.assets
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == asset_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(asset_id.to_string())))
    }

    fn get_by_symbol(&self, symbol: &str) -> Result<Asset> {
        self.assets
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.symbol == symbol)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(symbol.to_string())))
    }

    fn list(&self, active_only: bool) -> Result<Vec<Asset>> {
        Ok(self
            .assets
            .lock()
            .unwrap()
            .iter()
            .filter(|a| !active_only || a.is_active)
            .cloned()
            .collect())
    }

    async fn insert(&self, asset: Asset) -> Result<Asset> {
        let mut assets = self.assets.lock().unwrap();
        if assets.iter().any(|a| a.symbol == asset.symbol) {
            return Err(Error::Database(DatabaseError::UniqueViolation(
                asset.symbol.clone(),
            )));
        }
        assets.push(asset.clone());
        Ok(asset)
    }

    async fn update_price(&self, asset_id: &str, update: PriceUpdate) -> Result<Asset> {
        let mut assets = self.assets.lock().unwrap();
        let asset = assets
            .iter_mut()
            .find(|a| a.id == asset_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(asset_id.to_string())))?;
        asset.current_price = update.current_price;
        asset.previous_price = update.previous_price;
        asset.change_percentage = update.change_percentage;
        asset.last_price_update = update.last_price_update;
        asset.updated_at = update.last_price_update;
        Ok(asset.clone())
    }
}

// --- Investments ---

#[derive(Default)]
pub struct InMemoryInvestmentRepository {
    investments: Mutex<Vec<Investment>>,
    fail_inserts: Mutex<bool>,
}

impl InMemoryInvestmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent inserts fail, to exercise open-rollback paths.
    pub fn fail_next_inserts(&self, fail: bool) {
        *self.fail_inserts.lock().unwrap() = fail;
    }
}

#[async_trait]
impl InvestmentRepositoryTrait for InMemoryInvestmentRepository {
    async fn insert(&self, investment: Investment) -> Result<Investment> {
        if *self.fail_inserts.lock().unwrap() {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "injected insert failure".to_string(),
            )));
        }
        self.investments.lock().unwrap().push(investment.clone());
        Ok(investment)
    }

    fn get_by_id(&self, investment_id: &str) -> Result<Investment> {
        self.investments
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == investment_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(investment_id.to_string())))
    }

    fn list_by_user(
        &self,
        user_id: &str,
        status: Option<InvestmentStatus>,
    ) -> Result<Vec<Investment>> {
        Ok(self
            .investments
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .filter(|i| status.is_none_or(|s| i.status == s))
            .cloned()
            .collect())
    }

    fn list_matured(&self, now: DateTime<Utc>) -> Result<Vec<Investment>> {
        Ok(self
            .investments
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.status == InvestmentStatus::Active && now >= i.end_time)
            .cloned()
            .collect())
    }

    fn sum_open_invested(&self, user_id: &str) -> Result<Decimal> {
        Ok(self
            .investments
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .filter(|i| {
                matches!(
                    i.status,
                    InvestmentStatus::Active | InvestmentStatus::Settling
                )
            })
            .map(|i| i.invested_amount)
            .sum())
    }

    async fn claim_for_settlement(&self, investment_id: &str) -> Result<Option<Investment>> {
        let mut investments = self.investments.lock().unwrap();
        match investments
            .iter_mut()
            .find(|i| i.id == investment_id && i.status == InvestmentStatus::Active)
        {
            Some(investment) => {
                investment.status = InvestmentStatus::Settling;
                investment.updated_at = Utc::now();
                Ok(Some(investment.clone()))
            }
            None => Ok(None),
        }
    }

    async fn release_claim(&self, investment_id: &str) -> Result<()> {
        let mut investments = self.investments.lock().unwrap();
        if let Some(investment) = investments
            .iter_mut()
            .find(|i| i.id == investment_id && i.status == InvestmentStatus::Settling)
        {
            investment.status = InvestmentStatus::Active;
            investment.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn mark_settled(
        &self,
        investment_id: &str,
        record: SettlementRecord,
    ) -> Result<Investment> {
        let mut investments = self.investments.lock().unwrap();
        let investment = investments
            .iter_mut()
            .find(|i| i.id == investment_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(investment_id.to_string())))?;
        investment.status = InvestmentStatus::Completed;
        investment.profit_loss = record.profit_loss;
        investment.settlement_reason = Some(record.reason);
        investment.completed_at = Some(record.completed_at);
        investment.updated_at = record.completed_at;
        Ok(investment.clone())
    }

    async fn mark_cancelled(
        &self,
        investment_id: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<Investment> {
        let mut investments = self.investments.lock().unwrap();
        let investment = investments
            .iter_mut()
            .find(|i| i.id == investment_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(investment_id.to_string())))?;
        investment.status = InvestmentStatus::Cancelled;
        investment.completed_at = Some(completed_at);
        investment.updated_at = completed_at;
        Ok(investment.clone())
    }
}

// --- Bonuses ---

#[derive(Default)]
pub struct InMemoryBonusRepository {
    bonuses: Mutex<Vec<Bonus>>,
}

impl InMemoryBonusRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BonusRepositoryTrait for InMemoryBonusRepository {
    async fn insert(&self, bonus: Bonus) -> Result<Bonus> {
        self.bonuses.lock().unwrap().push(bonus.clone());
        Ok(bonus)
    }

    fn get_by_id(&self, bonus_id: &str) -> Result<Bonus> {
        self.bonuses
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == bonus_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(bonus_id.to_string())))
    }

    fn list_unclaimed(&self, user_id: &str) -> Result<Vec<Bonus>> {
        Ok(self
            .bonuses
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id && !b.is_claimed)
            .cloned()
            .collect())
    }

    fn total_claimed(&self, user_id: &str) -> Result<Decimal> {
        Ok(self
            .bonuses
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id && b.is_claimed)
            .map(|b| b.amount)
            .sum())
    }

    async fn claim(
        &self,
        bonus_id: &str,
        user_id: &str,
        claimed_at: DateTime<Utc>,
    ) -> Result<Option<Bonus>> {
        let mut bonuses = self.bonuses.lock().unwrap();
        match bonuses
            .iter_mut()
            .find(|b| b.id == bonus_id && b.user_id == user_id && !b.is_claimed)
        {
            Some(bonus) => {
                bonus.is_claimed = true;
                bonus.claimed_at = Some(claimed_at);
                Ok(Some(bonus.clone()))
            }
            None => Ok(None),
        }
    }

    async fn release_claim(&self, bonus_id: &str) -> Result<()> {
        let mut bonuses = self.bonuses.lock().unwrap();
        if let Some(bonus) = bonuses.iter_mut().find(|b| b.id == bonus_id) {
            bonus.is_claimed = false;
            bonus.claimed_at = None;
        }
        Ok(())
    }
}
