//! Wallet and transaction domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{BASE_CURRENCY, TRANSACTION_REFERENCE_PREFIX};
use crate::fx::DisplayContext;

/// Per-user wallet with three balance buckets, all in the base currency.
///
/// `currency` is only the display preference; it never affects storage.
/// Invariants: every bucket stays non-negative, and `bonus_claimed` only
/// grows (running total of claimed bonus amounts).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub user_id: String,
    pub available: Decimal,
    pub locked: Decimal,
    pub bonus: Decimal,
    pub bonus_claimed: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Fresh zero-balance wallet for a user, display currency at the base.
    pub fn new_for_user(user_id: &str, now: DateTime<Utc>) -> Self {
        Wallet {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            available: Decimal::ZERO,
            locked: Decimal::ZERO,
            bonus: Decimal::ZERO,
            bonus_claimed: Decimal::ZERO,
            currency: BASE_CURRENCY.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn total_balance(&self) -> Decimal {
        self.available + self.locked + self.bonus
    }
}

/// Ledger transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Investment,
    Profit,
    Bonus,
    Adjustment,
}

impl TransactionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Investment => "investment",
            TransactionType::Profit => "profit",
            TransactionType::Bonus => "bonus",
            TransactionType::Adjustment => "adjustment",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "deposit" => Some(TransactionType::Deposit),
            "withdrawal" => Some(TransactionType::Withdrawal),
            "investment" => Some(TransactionType::Investment),
            "profit" => Some(TransactionType::Profit),
            "bonus" => Some(TransactionType::Bonus),
            "adjustment" => Some(TransactionType::Adjustment),
            _ => None,
        }
    }
}

/// How money moved, for deposit/withdrawal paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Mpesa,
    Card,
    Bank,
    Wallet,
    System,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Mpesa => "mpesa",
            PaymentMethod::Card => "card",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "mpesa" => Some(PaymentMethod::Mpesa),
            "card" => Some(PaymentMethod::Card),
            "bank" => Some(PaymentMethod::Bank),
            "wallet" => Some(PaymentMethod::Wallet),
            "system" => Some(PaymentMethod::System),
            _ => None,
        }
    }

    /// External methods move real money and settle asynchronously.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            PaymentMethod::Mpesa | PaymentMethod::Card | PaymentMethod::Bank
        )
    }
}

/// Transaction lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl TransactionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Rejected => "rejected",
            TransactionStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TransactionStatus::Pending),
            "approved" => Some(TransactionStatus::Approved),
            "rejected" => Some(TransactionStatus::Rejected),
            "completed" => Some(TransactionStatus::Completed),
            _ => None,
        }
    }

    /// Entries are immutable except for these transitions.
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (TransactionStatus::Pending, TransactionStatus::Approved)
                | (TransactionStatus::Pending, TransactionStatus::Completed)
                | (TransactionStatus::Pending, TransactionStatus::Rejected)
                | (TransactionStatus::Approved, TransactionStatus::Completed)
        )
    }
}

/// Immutable ledger entry. The amount sign encodes the available-balance
/// direction of the mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub wallet_id: String,
    pub transaction_type: TransactionType,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub reference: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generates a unique ledger reference, e.g. `TX1A2B3C4D`.
pub fn generate_reference() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}{}",
        TRANSACTION_REFERENCE_PREFIX,
        hex[..8].to_uppercase()
    )
}

/// Ledger entry to append alongside a balance mutation. Identity fields and
/// the reference are assigned by the repository when the entry is persisted.
#[derive(Debug, Clone)]
pub struct NewTransactionEntry {
    pub transaction_type: TransactionType,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub description: String,
}

/// Signed bucket deltas applied to a wallet as one atomic mutation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceDelta {
    pub available: Decimal,
    pub locked: Decimal,
    pub bonus: Decimal,
    pub bonus_claimed: Decimal,
}

/// Wallet bucket snapshot converted to the display currency for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDisplay {
    pub available: Decimal,
    pub locked: Decimal,
    pub bonus: Decimal,
    pub total: Decimal,
    pub bonus_claimed: Decimal,
    pub currency_code: String,
    pub currency_symbol: String,
}

impl WalletDisplay {
    pub fn from_wallet(wallet: &Wallet, ctx: &DisplayContext) -> Self {
        WalletDisplay {
            available: ctx.to_display(wallet.available),
            locked: ctx.to_display(wallet.locked),
            bonus: ctx.to_display(wallet.bonus),
            total: ctx.to_display(wallet.total_balance()),
            bonus_claimed: ctx.to_display(wallet.bonus_claimed),
            currency_code: ctx.currency().code.clone(),
            currency_symbol: ctx.currency().symbol.clone(),
        }
    }
}
