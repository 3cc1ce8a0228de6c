//! Quota and credit arithmetic for metered generation.
//!
//! A request for `n` units is funded entirely from one source: the monthly
//! subscription quota when its remaining headroom covers `n`, otherwise the
//! credit balance when that covers `n`. There is no split funding.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Point-in-time view of a user's quota and credit counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Monthly allotment of an active subscription (0 without one).
    pub monthly_quota: i32,
    /// Units already consumed in the current period.
    pub used_quota: i32,
    /// Purchased credits still available.
    pub credit_balance: i32,
}

impl LedgerSnapshot {
    /// Remaining monthly headroom, never negative.
    pub fn quota_remaining(&self) -> i32 {
        (self.monthly_quota - self.used_quota).max(0)
    }

    /// Credit balance, never negative.
    pub fn credits_available(&self) -> i32 {
        self.credit_balance.max(0)
    }
}

/// Which counter pays for a generation. Stored on every generation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundingSource {
    /// Monthly subscription quota.
    Subscription,
    /// Purchased credits.
    Credits,
}

impl FundingSource {
    /// Database `cost_type` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::Credits => "credits",
        }
    }

    /// Parse the database `cost_type` value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "subscription" => Ok(Self::Subscription),
            "credits" => Ok(Self::Credits),
            other => Err(CoreError::Internal(format!("Unknown cost type '{other}'"))),
        }
    }
}

/// Transaction type written for credit consumption.
pub const CREDIT_TX_USAGE: &str = "usage";

/// Decide how `required` units are funded, or reject with `PaymentRequired`.
///
/// Rejects only when neither the remaining quota nor the credit balance
/// alone covers the request.
pub fn choose_funding(snapshot: &LedgerSnapshot, required: i32) -> Result<FundingSource, CoreError> {
    if snapshot.quota_remaining() >= required {
        Ok(FundingSource::Subscription)
    } else if snapshot.credits_available() >= required {
        Ok(FundingSource::Credits)
    } else {
        Err(CoreError::PaymentRequired {
            required,
            available_quota: snapshot.quota_remaining(),
            available_credits: snapshot.credits_available(),
        })
    }
}

/// Units of a reservation that were not consumed and must be returned.
pub fn unused_units(reserved: i32, produced: i32) -> i32 {
    (reserved - produced).max(0)
}

/// Running balances for the per-unit credit transaction rows.
///
/// `final_balance` is the balance after all `used` units are gone. Rows are
/// written in insertion order, so the first row records the balance after
/// the first unit (`final + used - 1`) and the last records `final_balance`.
pub fn credit_balances_after(final_balance: i32, used: i32) -> Vec<i32> {
    (0..used.max(0)).rev().map(|i| final_balance + i).collect()
}
