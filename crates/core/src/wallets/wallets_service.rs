use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::wallets_errors::LedgerError;
use super::wallets_model::{
    BalanceDelta, NewTransactionEntry, PaymentMethod, Transaction, TransactionStatus,
    TransactionType, Wallet, WalletDisplay,
};
use super::wallets_traits::{WalletRepositoryTrait, WalletServiceTrait};
use crate::errors::{Error, Result};
use crate::fx::DisplayContext;

/// Service for the wallet ledger.
///
/// Validates inputs and shapes every mutation as a `BalanceDelta` plus its
/// ledger entry; the repository applies the pair atomically.
pub struct WalletService {
    repository: Arc<dyn WalletRepositoryTrait>,
}

impl WalletService {
    pub fn new(repository: Arc<dyn WalletRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn require_positive(amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount).into());
        }
        Ok(())
    }

    async fn apply(
        &self,
        user_id: &str,
        delta: BalanceDelta,
        entry: NewTransactionEntry,
    ) -> Result<Transaction> {
        let wallet = self.repository.get_or_create(user_id).await?;
        match self.repository.apply_entry(&wallet.id, delta, entry).await {
            Ok((_, transaction)) => Ok(transaction),
            Err(e) => {
                if let Error::Ledger(LedgerError::InconsistentLedgerState { wallet_id, details }) =
                    &e
                {
                    log::error!(
                        "Ledger integrity violation on wallet {} (user {}): {}",
                        wallet_id,
                        user_id,
                        details
                    );
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl WalletServiceTrait for WalletService {
    async fn get_or_create_wallet(&self, user_id: &str) -> Result<Wallet> {
        self.repository.get_or_create(user_id).await
    }

    fn get_wallet(&self, user_id: &str) -> Result<Option<Wallet>> {
        self.repository.get_by_user_id(user_id)
    }

    async fn set_display_currency(&self, user_id: &str, code: &str) -> Result<Wallet> {
        self.repository.get_or_create(user_id).await?;
        self.repository.set_display_currency(user_id, code).await
    }

    async fn deposit(
        &self,
        user_id: &str,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<Transaction> {
        Self::require_positive(amount)?;

        let delta = BalanceDelta {
            available: amount,
            ..Default::default()
        };
        let entry = NewTransactionEntry {
            transaction_type: TransactionType::Deposit,
            payment_method: method,
            amount,
            status: TransactionStatus::Completed,
            description: format!("Deposit via {}", method.as_str()),
        };
        self.apply(user_id, delta, entry).await
    }

    async fn withdraw(
        &self,
        user_id: &str,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<Transaction> {
        Self::require_positive(amount)?;

        let delta = BalanceDelta {
            available: -amount,
            ..Default::default()
        };
        let status = if method.is_external() {
            TransactionStatus::Pending
        } else {
            TransactionStatus::Completed
        };
        let entry = NewTransactionEntry {
            transaction_type: TransactionType::Withdrawal,
            payment_method: method,
            amount: -amount,
            status,
            description: format!("Withdrawal via {}", method.as_str()),
        };
        self.apply(user_id, delta, entry).await
    }

    async fn lock(
        &self,
        user_id: &str,
        amount: Decimal,
        description: String,
    ) -> Result<Transaction> {
        Self::require_positive(amount)?;

        let delta = BalanceDelta {
            available: -amount,
            locked: amount,
            ..Default::default()
        };
        let entry = NewTransactionEntry {
            transaction_type: TransactionType::Investment,
            payment_method: PaymentMethod::Wallet,
            amount: -amount,
            status: TransactionStatus::Completed,
            description,
        };
        self.apply(user_id, delta, entry).await
    }

    async fn release_lock(
        &self,
        user_id: &str,
        amount: Decimal,
        description: String,
    ) -> Result<Transaction> {
        Self::require_positive(amount)?;

        let delta = BalanceDelta {
            available: amount,
            locked: -amount,
            ..Default::default()
        };
        let entry = NewTransactionEntry {
            transaction_type: TransactionType::Adjustment,
            payment_method: PaymentMethod::System,
            amount,
            status: TransactionStatus::Completed,
            description,
        };
        self.apply(user_id, delta, entry).await
    }

    async fn unlock_and_credit(
        &self,
        user_id: &str,
        locked_amount: Decimal,
        profit_loss: Decimal,
        description: String,
    ) -> Result<Transaction> {
        if locked_amount < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(locked_amount).into());
        }

        let delta = BalanceDelta {
            available: locked_amount + profit_loss,
            locked: -locked_amount,
            ..Default::default()
        };
        // A zero profit still produces an entry: every settlement leaves an
        // audit record.
        let entry = NewTransactionEntry {
            transaction_type: TransactionType::Profit,
            payment_method: PaymentMethod::System,
            amount: profit_loss,
            status: TransactionStatus::Completed,
            description,
        };
        self.apply(user_id, delta, entry).await
    }

    async fn credit_bonus(
        &self,
        user_id: &str,
        amount: Decimal,
        title: &str,
    ) -> Result<Transaction> {
        Self::require_positive(amount)?;

        // Bonuses are spendable immediately: they credit `available`, and
        // `bonus_claimed` keeps the running total.
        let delta = BalanceDelta {
            available: amount,
            bonus_claimed: amount,
            ..Default::default()
        };
        let entry = NewTransactionEntry {
            transaction_type: TransactionType::Bonus,
            payment_method: PaymentMethod::System,
            amount,
            status: TransactionStatus::Completed,
            description: format!("Claimed bonus: {}", title),
        };
        self.apply(user_id, delta, entry).await
    }

    async fn confirm_withdrawal(&self, reference: &str) -> Result<Transaction> {
        let transaction = self.repository.get_transaction_by_reference(reference)?;
        if transaction.transaction_type != TransactionType::Withdrawal
            || transaction.status != TransactionStatus::Pending
        {
            return Err(LedgerError::NotAPendingWithdrawal {
                reference: reference.to_string(),
            }
            .into());
        }
        self.repository
            .update_transaction_status(reference, TransactionStatus::Completed)
            .await
    }

    async fn reject_withdrawal(&self, reference: &str) -> Result<Transaction> {
        let (_, transaction) = self.repository.reject_withdrawal(reference).await?;
        log::debug!(
            "Rejected withdrawal {}, funds restored to wallet {}",
            reference,
            transaction.wallet_id
        );
        Ok(transaction)
    }

    fn list_transactions(
        &self,
        user_id: &str,
        transaction_type: Option<TransactionType>,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>> {
        self.repository
            .list_transactions(user_id, transaction_type, limit)
    }

    fn display_balances(&self, wallet: &Wallet, ctx: &DisplayContext) -> WalletDisplay {
        WalletDisplay::from_wallet(wallet, ctx)
    }
}
