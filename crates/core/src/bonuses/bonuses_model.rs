//! Bonus domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::Error;

/// Promotional bonus category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BonusType {
    Welcome,
    Deposit,
    Referral,
    #[default]
    Promotion,
}

impl BonusType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BonusType::Welcome => "welcome",
            BonusType::Deposit => "deposit",
            BonusType::Referral => "referral",
            BonusType::Promotion => "promotion",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "welcome" => Some(BonusType::Welcome),
            "deposit" => Some(BonusType::Deposit),
            "referral" => Some(BonusType::Referral),
            "promotion" => Some(BonusType::Promotion),
            _ => None,
        }
    }
}

/// A granted bonus. Claiming it credits the owner's wallet once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bonus {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub amount: Decimal,
    pub bonus_type: BonusType,
    pub is_claimed: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Bonus {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| now >= expires)
    }
}

/// Input model for granting a new bonus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBonus {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub amount: Decimal,
    pub bonus_type: BonusType,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewBonus {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Bonus title cannot be empty".to_string(),
            )));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Bonus amount must be positive, got {}",
                self.amount
            ))));
        }
        Ok(())
    }

    pub fn into_bonus(self, now: DateTime<Utc>) -> Bonus {
        Bonus {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            amount: self.amount,
            bonus_type: self.bonus_type,
            is_claimed: false,
            expires_at: self.expires_at,
            claimed_at: None,
            created_at: now,
        }
    }
}
