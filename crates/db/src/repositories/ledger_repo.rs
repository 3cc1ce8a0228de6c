//! Repository for quota and credit counters (`user_subscriptions`,
//! `user_credits`) and the `credit_transactions` ledger.
//!
//! The mutating methods take `&mut PgConnection` so the pipeline can lock,
//! check and adjust counters inside one transaction.

use sqlx::{PgConnection, PgPool};
use colorbook_core::types::DbId;

use crate::models::ledger::{CreateCreditTransaction, CreditTransaction, LedgerCounters};

/// Column list for credit_transactions queries.
const TX_COLUMNS: &str =
    "id, user_id, amount, transaction_type, description, balance_after, created_at";

/// Subscription status that grants monthly quota.
const ACTIVE_SUBSCRIPTION: &str = "active";

/// Reads and adjusts a user's quota and credit counters.
pub struct LedgerRepo;

impl LedgerRepo {
    /// Read counters without locking. Missing rows read as zero; an inactive
    /// subscription contributes no quota.
    pub async fn read_counters(pool: &PgPool, user_id: DbId) -> Result<LedgerCounters, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::fetch_counters(&mut *conn, user_id, false).await
    }

    /// Read counters and lock both rows until the surrounding transaction ends.
    pub async fn lock_counters(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<LedgerCounters, sqlx::Error> {
        Self::fetch_counters(conn, user_id, true).await
    }

    async fn fetch_counters(
        conn: &mut PgConnection,
        user_id: DbId,
        for_update: bool,
    ) -> Result<LedgerCounters, sqlx::Error> {
        let lock = if for_update { " FOR UPDATE" } else { "" };

        let subscription: Option<(i32, i32)> = sqlx::query_as(&format!(
            "SELECT monthly_quota, used_quota FROM user_subscriptions
             WHERE user_id = $1 AND status = $2{lock}"
        ))
        .bind(user_id)
        .bind(ACTIVE_SUBSCRIPTION)
        .fetch_optional(&mut *conn)
        .await?;

        let credits: Option<(i32, i32)> = sqlx::query_as(&format!(
            "SELECT balance, total_used FROM user_credits WHERE user_id = $1{lock}"
        ))
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        let (monthly_quota, used_quota) = subscription.unwrap_or((0, 0));
        let (credit_balance, total_credits_used) = credits.unwrap_or((0, 0));
        Ok(LedgerCounters {
            monthly_quota,
            used_quota,
            credit_balance,
            total_credits_used,
        })
    }

    /// Add `delta` (may be negative) to the active subscription's `used_quota`,
    /// clamped at zero. Returns the new value, or `None` without an active
    /// subscription.
    pub async fn add_used_quota(
        conn: &mut PgConnection,
        user_id: DbId,
        delta: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            "UPDATE user_subscriptions
             SET used_quota = GREATEST(used_quota + $2, 0), updated_at = now()
             WHERE user_id = $1 AND status = $3
             RETURNING used_quota",
        )
        .bind(user_id)
        .bind(delta)
        .bind(ACTIVE_SUBSCRIPTION)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Add `balance_delta` to the credit balance and `used_delta` to
    /// `total_used`. Returns the new balance, or `None` without a credits row.
    pub async fn adjust_credits(
        conn: &mut PgConnection,
        user_id: DbId,
        balance_delta: i32,
        used_delta: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            "UPDATE user_credits
             SET balance = balance + $2, total_used = total_used + $3, updated_at = now()
             WHERE user_id = $1
             RETURNING balance",
        )
        .bind(user_id)
        .bind(balance_delta)
        .bind(used_delta)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Append one credit ledger entry.
    pub async fn insert_transaction(
        conn: &mut PgConnection,
        input: &CreateCreditTransaction,
    ) -> Result<CreditTransaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO credit_transactions
                (user_id, amount, transaction_type, description, balance_after)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TX_COLUMNS}"
        );
        sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(input.user_id)
            .bind(input.amount)
            .bind(&input.transaction_type)
            .bind(&input.description)
            .bind(input.balance_after)
            .fetch_one(&mut *conn)
            .await
    }

    /// List a user's credit transactions in insertion order.
    pub async fn list_transactions(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CreditTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {TX_COLUMNS} FROM credit_transactions
             WHERE user_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
