//! Investment domain models.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Investment lifecycle status.
///
/// `Settling` is a transient claim: a worker flips `active -> settling`
/// atomically before computing the payout, so concurrent sweeps cannot
/// double-settle. Terminal states are reached only through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    Active,
    Settling,
    Completed,
    Cancelled,
}

impl InvestmentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            InvestmentStatus::Active => "active",
            InvestmentStatus::Settling => "settling",
            InvestmentStatus::Completed => "completed",
            InvestmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(InvestmentStatus::Active),
            "settling" => Some(InvestmentStatus::Settling),
            "completed" => Some(InvestmentStatus::Completed),
            "cancelled" => Some(InvestmentStatus::Cancelled),
            _ => None,
        }
    }
}

/// Why a settlement released funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementReason {
    Matured,
    Manual,
    AdminApproved,
}

impl SettlementReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SettlementReason::Matured => "matured",
            SettlementReason::Manual => "manual",
            SettlementReason::AdminApproved => "admin_approved",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "matured" => Some(SettlementReason::Matured),
            "manual" => Some(SettlementReason::Manual),
            "admin_approved" => Some(SettlementReason::AdminApproved),
            _ => None,
        }
    }
}

/// A time-boxed position against a catalog asset.
///
/// While active, `invested_amount` is reflected in the owner's locked
/// balance; the sum over a user's open investments reconciles with it after
/// every settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub user_id: String,
    pub asset_id: String,
    pub invested_amount: Decimal,
    pub entry_price: Decimal,
    pub duration_hours: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: InvestmentStatus,
    pub expected_return_rate: Decimal,
    pub profit_loss: Decimal,
    pub settlement_reason: Option<SettlementReason>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Investment {
    pub fn is_matured(&self, now: DateTime<Utc>) -> bool {
        self.status == InvestmentStatus::Active && now >= self.end_time
    }

    /// Profit implied by the locked-in return rate, before the market
    /// outcome perturbation.
    pub fn expected_profit(&self) -> Decimal {
        self.invested_amount * self.expected_return_rate / Decimal::ONE_HUNDRED
    }

    /// Time left until maturity; zero once matured or no longer active.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        if self.status != InvestmentStatus::Active || now >= self.end_time {
            return Duration::zero();
        }
        self.end_time - now
    }
}

/// Caller input for opening an investment. `amount` is denominated in the
/// request's display currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRequest {
    pub user_id: String,
    pub asset_id: String,
    pub amount: Decimal,
    pub duration_hours: u32,
}

/// Terminal settlement data persisted when an investment completes.
#[derive(Debug, Clone)]
pub struct SettlementRecord {
    pub profit_loss: Decimal,
    pub reason: SettlementReason,
    pub completed_at: DateTime<Utc>,
}

/// Result of one maturation sweep.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSummary {
    pub settled: usize,
    pub skipped: usize,
    pub failed: usize,
}
