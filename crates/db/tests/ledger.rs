//! Integration tests for quota and credit counters.

use sqlx::PgPool;
use colorbook_db::models::ledger::CreateCreditTransaction;
use colorbook_db::repositories::LedgerRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_subscription(pool: &PgPool, user_id: i64, status: &str, quota: i32, used: i32) {
    sqlx::query(
        "INSERT INTO user_subscriptions (user_id, status, monthly_quota, used_quota)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(status)
    .bind(quota)
    .bind(used)
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_credits(pool: &PgPool, user_id: i64, balance: i32) {
    sqlx::query("INSERT INTO user_credits (user_id, balance) VALUES ($1, $2)")
        .bind(user_id)
        .bind(balance)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn missing_rows_read_as_zero(pool: PgPool) {
    let counters = LedgerRepo::read_counters(&pool, 404).await.unwrap();
    assert_eq!(counters.monthly_quota, 0);
    assert_eq!(counters.used_quota, 0);
    assert_eq!(counters.credit_balance, 0);
    assert_eq!(counters.total_credits_used, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn inactive_subscription_grants_no_quota(pool: PgPool) {
    seed_subscription(&pool, 1, "canceled", 10, 0).await;
    seed_credits(&pool, 1, 4).await;

    let counters = LedgerRepo::read_counters(&pool, 1).await.unwrap();
    assert_eq!(counters.monthly_quota, 0);
    assert_eq!(counters.credit_balance, 4);
}

#[sqlx::test(migrations = "./migrations")]
async fn lock_counters_inside_transaction(pool: PgPool) {
    seed_subscription(&pool, 2, "active", 10, 3).await;

    let mut tx = pool.begin().await.unwrap();
    let counters = LedgerRepo::lock_counters(&mut tx, 2).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(counters.monthly_quota, 10);
    assert_eq!(counters.used_quota, 3);
}

// ---------------------------------------------------------------------------
// Adjustments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn used_quota_adjusts_and_clamps(pool: PgPool) {
    seed_subscription(&pool, 3, "active", 10, 3).await;
    let mut conn = pool.acquire().await.unwrap();

    assert_eq!(LedgerRepo::add_used_quota(&mut conn, 3, 5).await.unwrap(), Some(8));
    assert_eq!(LedgerRepo::add_used_quota(&mut conn, 3, -20).await.unwrap(), Some(0));
    assert_eq!(LedgerRepo::add_used_quota(&mut conn, 99, 1).await.unwrap(), None);
}

#[sqlx::test(migrations = "./migrations")]
async fn credit_adjustment_and_ledger_entries(pool: PgPool) {
    seed_credits(&pool, 4, 10).await;
    let mut conn = pool.acquire().await.unwrap();

    let balance = LedgerRepo::adjust_credits(&mut conn, 4, -3, 3).await.unwrap();
    assert_eq!(balance, Some(7));

    for balance_after in [9, 8, 7] {
        LedgerRepo::insert_transaction(
            &mut conn,
            &CreateCreditTransaction {
                user_id: 4,
                amount: -1,
                transaction_type: "usage".to_string(),
                description: Some("test".to_string()),
                balance_after,
            },
        )
        .await
        .unwrap();
    }
    drop(conn);

    let txs = LedgerRepo::list_transactions(&pool, 4).await.unwrap();
    let balances: Vec<i32> = txs.iter().map(|t| t.balance_after).collect();
    assert_eq!(balances, vec![9, 8, 7]);

    let counters = LedgerRepo::read_counters(&pool, 4).await.unwrap();
    assert_eq!(counters.credit_balance, 7);
    assert_eq!(counters.total_credits_used, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn credit_balance_cannot_go_negative(pool: PgPool) {
    seed_credits(&pool, 5, 1).await;
    let mut conn = pool.acquire().await.unwrap();

    let result = LedgerRepo::adjust_credits(&mut conn, 5, -2, 0).await;
    assert!(result.is_err(), "CHECK (balance >= 0) must reject overdraft");
}
