//! SQLite repository for the wallet ledger.
//!
//! `apply_entry` is the only operation that can touch balance fields, and it
//! runs as one writer job: the balance read-modify-write, the invariant
//! checks, and the ledger-entry insert commit together or roll back together.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use primevest_core::errors::{DatabaseError, Error, Result};
use primevest_core::wallets::{
    generate_reference, BalanceDelta, LedgerError, NewTransactionEntry, Transaction,
    TransactionStatus, TransactionType, Wallet, WalletRepositoryTrait,
};

use super::model::{TransactionDB, WalletDB};
use crate::db::{get_connection, DbConnection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{transactions, wallets};

/// Repository for managing wallet and transaction data in the database.
pub struct WalletRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl WalletRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_wallet(conn: &mut SqliteConnection, wallet_id: &str) -> Result<Wallet> {
    wallets::table
        .find(wallet_id)
        .first::<WalletDB>(conn)
        .map_err(|e| match e {
            DieselError::NotFound => Error::Database(DatabaseError::NotFound(format!(
                "Wallet with id {} not found",
                wallet_id
            ))),
            e => StorageError::from(e).into(),
        })?
        .into_domain()
}

fn load_transaction_by_reference(conn: &mut SqliteConnection, reference: &str) -> Result<Transaction> {
    transactions::table
        .filter(transactions::reference.eq(reference))
        .first::<TransactionDB>(conn)
        .map_err(|e| match e {
            DieselError::NotFound => Error::Database(DatabaseError::NotFound(format!(
                "Transaction with reference {} not found",
                reference
            ))),
            e => StorageError::from(e).into(),
        })?
        .into_domain()
}

/// Applies a delta and appends its entry on the writer's connection. Shared
/// by `apply_entry` and the rejection path.
fn apply_entry_on(
    conn: &mut SqliteConnection,
    wallet_id: &str,
    delta: BalanceDelta,
    entry: NewTransactionEntry,
) -> Result<(Wallet, Transaction)> {
    let mut wallet = load_wallet(conn, wallet_id)?;

    let available = wallet.available + delta.available;
    if available < Decimal::ZERO {
        return Err(LedgerError::InsufficientFunds {
            available: wallet.available,
            requested: -delta.available,
        }
        .into());
    }
    let locked = wallet.locked + delta.locked;
    if locked < Decimal::ZERO {
        return Err(LedgerError::InconsistentLedgerState {
            wallet_id: wallet.id.clone(),
            details: format!(
                "releasing {} from a locked balance of {}",
                -delta.locked,
                wallet.locked
            ),
        }
        .into());
    }
    let bonus = wallet.bonus + delta.bonus;
    if bonus < Decimal::ZERO {
        return Err(LedgerError::InconsistentLedgerState {
            wallet_id: wallet.id.clone(),
            details: format!(
                "debiting {} from a bonus balance of {}",
                -delta.bonus,
                wallet.bonus
            ),
        }
        .into());
    }

    let now = Utc::now();
    wallet.available = available;
    wallet.locked = locked;
    wallet.bonus = bonus;
    wallet.bonus_claimed += delta.bonus_claimed;
    wallet.updated_at = now;

    diesel::update(wallets::table.find(&wallet.id))
        .set((
            wallets::available.eq(wallet.available.to_string()),
            wallets::locked.eq(wallet.locked.to_string()),
            wallets::bonus.eq(wallet.bonus.to_string()),
            wallets::bonus_claimed.eq(wallet.bonus_claimed.to_string()),
            wallets::updated_at.eq(now.naive_utc()),
        ))
        .execute(conn)
        .into_core()?;

    let transaction = Transaction {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: wallet.user_id.clone(),
        wallet_id: wallet.id.clone(),
        transaction_type: entry.transaction_type,
        payment_method: entry.payment_method,
        amount: entry.amount,
        status: entry.status,
        reference: generate_reference(),
        description: entry.description,
        created_at: now,
        updated_at: now,
    };
    diesel::insert_into(transactions::table)
        .values(TransactionDB::from(&transaction))
        .execute(conn)
        .into_core()?;

    Ok((wallet, transaction))
}

#[async_trait]
impl WalletRepositoryTrait for WalletRepository {
    fn get_by_user_id(&self, user_id: &str) -> Result<Option<Wallet>> {
        let mut conn = get_connection(&self.pool)?;

        let row = wallets::table
            .filter(wallets::user_id.eq(user_id))
            .first::<WalletDB>(&mut conn)
            .optional()
            .into_core()?;

        row.map(WalletDB::into_domain).transpose()
    }

    fn get_by_id(&self, wallet_id: &str) -> Result<Wallet> {
        let mut conn: DbConnection = get_connection(&self.pool)?;
        load_wallet(&mut conn, wallet_id)
    }

    async fn get_or_create(&self, user_id: &str) -> Result<Wallet> {
        if let Some(wallet) = self.get_by_user_id(user_id)? {
            return Ok(wallet);
        }

        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| {
                // Re-check inside the transaction: a concurrent call may have
                // created the wallet since the unlocked read above.
                if let Some(row) = wallets::table
                    .filter(wallets::user_id.eq(&user_id))
                    .first::<WalletDB>(conn)
                    .optional()
                    .into_core()?
                {
                    return row.into_domain();
                }

                let wallet = Wallet::new_for_user(&user_id, Utc::now());
                diesel::insert_into(wallets::table)
                    .values(WalletDB::from(&wallet))
                    .execute(conn)
                    .into_core()?;
                Ok(wallet)
            })
            .await
    }

    async fn set_display_currency(&self, user_id: &str, code: &str) -> Result<Wallet> {
        let user_id = user_id.to_string();
        let code = code.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(
                    wallets::table.filter(wallets::user_id.eq(&user_id)),
                )
                .set((
                    wallets::currency.eq(&code),
                    wallets::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "Wallet for user {} not found",
                        user_id
                    ))));
                }

                wallets::table
                    .filter(wallets::user_id.eq(&user_id))
                    .first::<WalletDB>(conn)
                    .into_core()?
                    .into_domain()
            })
            .await
    }

    async fn apply_entry(
        &self,
        wallet_id: &str,
        delta: BalanceDelta,
        entry: NewTransactionEntry,
    ) -> Result<(Wallet, Transaction)> {
        let wallet_id = wallet_id.to_string();
        self.writer
            .exec(move |conn| apply_entry_on(conn, &wallet_id, delta, entry))
            .await
    }

    fn list_transactions(
        &self,
        user_id: &str,
        transaction_type: Option<TransactionType>,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .into_boxed();
        if let Some(transaction_type) = transaction_type {
            query = query.filter(transactions::transaction_type.eq(transaction_type.as_str()));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows = query
            .order(transactions::created_at.desc())
            .load::<TransactionDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(TransactionDB::into_domain).collect()
    }

    fn get_transaction_by_reference(&self, reference: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        load_transaction_by_reference(&mut conn, reference)
    }

    async fn update_transaction_status(
        &self,
        reference: &str,
        status: TransactionStatus,
    ) -> Result<Transaction> {
        let reference = reference.to_string();
        self.writer
            .exec(move |conn| {
                let mut transaction = load_transaction_by_reference(conn, &reference)?;
                if !transaction.status.can_transition_to(status) {
                    return Err(LedgerError::InvalidStatusTransition {
                        from: transaction.status.as_str().to_string(),
                        to: status.as_str().to_string(),
                    }
                    .into());
                }

                let now = Utc::now();
                diesel::update(transactions::table.find(&transaction.id))
                    .set((
                        transactions::status.eq(status.as_str()),
                        transactions::updated_at.eq(now.naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;

                transaction.status = status;
                transaction.updated_at = now;
                Ok(transaction)
            })
            .await
    }

    async fn reject_withdrawal(&self, reference: &str) -> Result<(Wallet, Transaction)> {
        let reference = reference.to_string();
        self.writer
            .exec(move |conn| {
                let mut transaction = load_transaction_by_reference(conn, &reference)?;
                if transaction.transaction_type != TransactionType::Withdrawal
                    || transaction.status != TransactionStatus::Pending
                {
                    return Err(LedgerError::NotAPendingWithdrawal {
                        reference: reference.clone(),
                    }
                    .into());
                }

                let now = Utc::now();
                diesel::update(transactions::table.find(&transaction.id))
                    .set((
                        transactions::status.eq(TransactionStatus::Rejected.as_str()),
                        transactions::updated_at.eq(now.naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                transaction.status = TransactionStatus::Rejected;
                transaction.updated_at = now;

                // The withdrawal amount is negative; restoring it credits
                // `available` by the same magnitude.
                let restored = -transaction.amount;
                let delta = BalanceDelta {
                    available: restored,
                    ..Default::default()
                };
                let entry = NewTransactionEntry {
                    transaction_type: TransactionType::Adjustment,
                    payment_method: transaction.payment_method,
                    amount: restored,
                    status: TransactionStatus::Completed,
                    description: format!("Reversal of rejected withdrawal {}", reference),
                };
                let (wallet, _) = apply_entry_on(conn, &transaction.wallet_id, delta, entry)?;

                Ok((wallet, transaction))
            })
            .await
    }
}
