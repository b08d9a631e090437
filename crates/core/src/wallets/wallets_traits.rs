//! Wallet ledger repository and service traits.
//!
//! These traits define the contract for wallet operations without any
//! database-specific types. The repository owns atomicity: the one operation
//! that mutates balances also appends the audit entry, in a single exclusive
//! transaction, and re-checks the bucket invariants against the committed row.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::wallets_model::{
    BalanceDelta, NewTransactionEntry, PaymentMethod, Transaction, TransactionStatus,
    TransactionType, Wallet, WalletDisplay,
};
use crate::errors::Result;
use crate::fx::DisplayContext;

/// Trait defining the contract for wallet repository operations.
#[async_trait]
pub trait WalletRepositoryTrait: Send + Sync {
    fn get_by_user_id(&self, user_id: &str) -> Result<Option<Wallet>>;

    fn get_by_id(&self, wallet_id: &str) -> Result<Wallet>;

    /// Idempotent create: returns the existing wallet or a fresh zero-balance
    /// one.
    async fn get_or_create(&self, user_id: &str) -> Result<Wallet>;

    async fn set_display_currency(&self, user_id: &str, code: &str) -> Result<Wallet>;

    /// Applies the delta and appends the entry as one atomic unit.
    ///
    /// Serialized per wallet: the read-modify-write of the balance fields and
    /// the entry insert commit together or not at all. A delta that would
    /// drive `available` negative fails with `InsufficientFunds`; one that
    /// would drive `locked` or `bonus` negative fails with
    /// `InconsistentLedgerState`. On failure nothing is written.
    async fn apply_entry(
        &self,
        wallet_id: &str,
        delta: BalanceDelta,
        entry: NewTransactionEntry,
    ) -> Result<(Wallet, Transaction)>;

    fn list_transactions(
        &self,
        user_id: &str,
        transaction_type: Option<TransactionType>,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>>;

    fn get_transaction_by_reference(&self, reference: &str) -> Result<Transaction>;

    /// Applies a status transition. Invalid transitions fail with
    /// `InvalidStatusTransition`.
    async fn update_transaction_status(
        &self,
        reference: &str,
        status: TransactionStatus,
    ) -> Result<Transaction>;

    /// Rejects a pending withdrawal and restores the held funds, appending
    /// the compensating `adjustment` entry, all in one transaction.
    async fn reject_withdrawal(&self, reference: &str) -> Result<(Wallet, Transaction)>;
}

/// Trait defining the contract for the wallet ledger service.
#[async_trait]
pub trait WalletServiceTrait: Send + Sync {
    async fn get_or_create_wallet(&self, user_id: &str) -> Result<Wallet>;

    fn get_wallet(&self, user_id: &str) -> Result<Option<Wallet>>;

    async fn set_display_currency(&self, user_id: &str, code: &str) -> Result<Wallet>;

    /// Credits `available` and records a `deposit` entry.
    async fn deposit(
        &self,
        user_id: &str,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<Transaction>;

    /// Debits `available` and records a `withdrawal` entry. External payment
    /// methods start `pending`; internal ones complete immediately.
    async fn withdraw(
        &self,
        user_id: &str,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<Transaction>;

    /// Moves funds from `available` to `locked`, recording the `investment`
    /// entry in the same atomic unit.
    async fn lock(&self, user_id: &str, amount: Decimal, description: String)
        -> Result<Transaction>;

    /// Compensating unlock: moves funds from `locked` back to `available`
    /// with zero profit/loss, recorded as an `adjustment` entry.
    async fn release_lock(
        &self,
        user_id: &str,
        amount: Decimal,
        description: String,
    ) -> Result<Transaction>;

    /// Releases locked principal and credits the signed profit/loss on top,
    /// recording a `profit` entry (also when the profit is zero).
    async fn unlock_and_credit(
        &self,
        user_id: &str,
        locked_amount: Decimal,
        profit_loss: Decimal,
        description: String,
    ) -> Result<Transaction>;

    /// Credits a claimed bonus to `available` and grows the `bonus_claimed`
    /// running total.
    async fn credit_bonus(&self, user_id: &str, amount: Decimal, title: &str)
        -> Result<Transaction>;

    /// Marks a pending withdrawal as settled by the external processor.
    async fn confirm_withdrawal(&self, reference: &str) -> Result<Transaction>;

    /// Rejects a pending withdrawal and restores the held funds.
    async fn reject_withdrawal(&self, reference: &str) -> Result<Transaction>;

    fn list_transactions(
        &self,
        user_id: &str,
        transaction_type: Option<TransactionType>,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>>;

    /// Converts a wallet's buckets for rendering in the given display context.
    fn display_balances(&self, wallet: &Wallet, ctx: &DisplayContext) -> WalletDisplay;
}
