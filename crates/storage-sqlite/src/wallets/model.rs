//! Database models for wallets and ledger transactions.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use primevest_core::errors::Result;
use primevest_core::wallets::{
    PaymentMethod, Transaction, TransactionStatus, TransactionType, Wallet,
};

use crate::utils::{corrupt_column, parse_decimal, to_naive, to_utc};

/// Database model for wallets
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::wallets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletDB {
    pub id: String,
    pub user_id: String,
    pub available: String,
    pub locked: String,
    pub bonus: String,
    pub bonus_claimed: String,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl WalletDB {
    pub fn into_domain(self) -> Result<Wallet> {
        Ok(Wallet {
            available: parse_decimal(&self.available, "wallets.available")?,
            locked: parse_decimal(&self.locked, "wallets.locked")?,
            bonus: parse_decimal(&self.bonus, "wallets.bonus")?,
            bonus_claimed: parse_decimal(&self.bonus_claimed, "wallets.bonus_claimed")?,
            id: self.id,
            user_id: self.user_id,
            currency: self.currency,
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        })
    }
}

impl From<&Wallet> for WalletDB {
    fn from(domain: &Wallet) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            available: domain.available.to_string(),
            locked: domain.locked.to_string(),
            bonus: domain.bonus.to_string(),
            bonus_claimed: domain.bonus_claimed.to_string(),
            currency: domain.currency.clone(),
            created_at: to_naive(domain.created_at),
            updated_at: to_naive(domain.updated_at),
        }
    }
}

/// Database model for ledger transactions
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub wallet_id: String,
    pub transaction_type: String,
    pub payment_method: String,
    pub amount: String,
    pub status: String,
    pub reference: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TransactionDB {
    pub fn into_domain(self) -> Result<Transaction> {
        let transaction_type = TransactionType::from_str(&self.transaction_type).ok_or_else(|| {
            corrupt_column("transactions.transaction_type", &self.transaction_type)
        })?;
        let payment_method = PaymentMethod::from_str(&self.payment_method)
            .ok_or_else(|| corrupt_column("transactions.payment_method", &self.payment_method))?;
        let status = TransactionStatus::from_str(&self.status)
            .ok_or_else(|| corrupt_column("transactions.status", &self.status))?;

        Ok(Transaction {
            amount: parse_decimal(&self.amount, "transactions.amount")?,
            transaction_type,
            payment_method,
            status,
            id: self.id,
            user_id: self.user_id,
            wallet_id: self.wallet_id,
            reference: self.reference,
            description: self.description,
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        })
    }
}

impl From<&Transaction> for TransactionDB {
    fn from(domain: &Transaction) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            wallet_id: domain.wallet_id.clone(),
            transaction_type: domain.transaction_type.as_str().to_string(),
            payment_method: domain.payment_method.as_str().to_string(),
            amount: domain.amount.to_string(),
            status: domain.status.as_str().to_string(),
            reference: domain.reference.clone(),
            description: domain.description.clone(),
            created_at: to_naive(domain.created_at),
            updated_at: to_naive(domain.updated_at),
        }
    }
}
