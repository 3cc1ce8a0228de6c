//! Subscription quota, credit balance and credit transaction rows.

use serde::Serialize;
use sqlx::FromRow;
use colorbook_core::billing::LedgerSnapshot;
use colorbook_core::types::{DbId, Timestamp};

/// A row from the `user_subscriptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSubscription {
    pub id: DbId,
    pub user_id: DbId,
    pub tier: String,
    pub status: String,
    pub monthly_quota: i32,
    pub used_quota: i32,
    pub period_start: Timestamp,
    pub period_end: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `user_credits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserCredits {
    pub id: DbId,
    pub user_id: DbId,
    pub balance: i32,
    pub total_used: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `credit_transactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTransaction {
    pub id: DbId,
    pub user_id: DbId,
    pub amount: i32,
    pub transaction_type: String,
    pub description: Option<String>,
    pub balance_after: i32,
    pub created_at: Timestamp,
}

/// Input for one credit ledger entry.
#[derive(Debug, Clone)]
pub struct CreateCreditTransaction {
    pub user_id: DbId,
    pub amount: i32,
    pub transaction_type: String,
    pub description: Option<String>,
    pub balance_after: i32,
}

/// Quota and credit counters for one user, as read for a usage report or
/// a reservation. Missing rows read as zero.
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct LedgerCounters {
    pub monthly_quota: i32,
    pub used_quota: i32,
    pub credit_balance: i32,
    pub total_credits_used: i32,
}

impl LedgerCounters {
    /// The subset of counters the funding decision looks at.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            monthly_quota: self.monthly_quota,
            used_quota: self.used_quota,
            credit_balance: self.credit_balance,
        }
    }
}
