//! Reservation and settlement of metered generation units.
//!
//! A request first reserves its full requested size from one funding source
//! inside a transaction that holds row locks on the user's counters, so two
//! concurrent requests cannot both pass the sufficiency check against the
//! same balance. After generation the reservation is settled: unused units
//! go back, and credit consumption is written to the ledger one row per
//! produced unit.

use sqlx::PgPool;

use colorbook_core::billing::{
    choose_funding, credit_balances_after, unused_units, FundingSource, CREDIT_TX_USAGE,
};
use colorbook_core::types::DbId;
use colorbook_db::models::ledger::CreateCreditTransaction;
use colorbook_db::repositories::LedgerRepo;

use crate::error::PipelineError;

/// Units held against a user's quota or credits for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub user_id: DbId,
    pub source: FundingSource,
    pub units: i32,
}

/// Check sufficiency and reserve `units` for `user_id`.
///
/// Fails with `CoreError::PaymentRequired` when neither the remaining quota
/// nor the credit balance alone covers the request.
pub async fn reserve(pool: &PgPool, user_id: DbId, units: i32) -> Result<Reservation, PipelineError> {
    let mut tx = pool.begin().await?;

    let counters = LedgerRepo::lock_counters(&mut *tx, user_id).await?;
    let source = choose_funding(&counters.snapshot(), units)?;

    let applied = match source {
        FundingSource::Subscription => LedgerRepo::add_used_quota(&mut *tx, user_id, units).await?,
        FundingSource::Credits => LedgerRepo::adjust_credits(&mut *tx, user_id, -units, 0).await?,
    };
    if applied.is_none() {
        return Err(PipelineError::Billing(format!(
            "No {} row to reserve from for user {user_id}",
            source.as_str()
        )));
    }

    tx.commit().await?;

    tracing::debug!(user_id, units, source = source.as_str(), "Reserved generation units");
    Ok(Reservation {
        user_id,
        source,
        units,
    })
}

/// Settle a reservation after `produced` units were delivered.
///
/// Unused units are returned. For credit funding, `total_used` grows by
/// `produced` and one `usage` transaction per unit is appended.
pub async fn settle(
    pool: &PgPool,
    reservation: &Reservation,
    produced: i32,
    description: &str,
) -> Result<(), PipelineError> {
    let Reservation {
        user_id,
        source,
        units,
    } = *reservation;
    let produced = produced.clamp(0, units);
    let unused = unused_units(units, produced);

    let mut tx = pool.begin().await?;

    match source {
        FundingSource::Subscription => {
            if unused > 0 {
                LedgerRepo::add_used_quota(&mut *tx, user_id, -unused).await?;
            }
        }
        FundingSource::Credits => {
            let final_balance = LedgerRepo::adjust_credits(&mut *tx, user_id, unused, produced)
                .await?
                .ok_or_else(|| {
                    PipelineError::Billing(format!("Credits row for user {user_id} disappeared"))
                })?;

            for balance_after in credit_balances_after(final_balance, produced) {
                LedgerRepo::insert_transaction(
                    &mut *tx,
                    &CreateCreditTransaction {
                        user_id,
                        amount: -1,
                        transaction_type: CREDIT_TX_USAGE.to_string(),
                        description: Some(description.to_string()),
                        balance_after,
                    },
                )
                .await?;
            }
        }
    }

    tx.commit().await?;

    tracing::info!(
        user_id,
        reserved = units,
        produced,
        released = unused,
        source = source.as_str(),
        "Settled generation units",
    );
    Ok(())
}

/// Return a whole reservation after a fatal error.
///
/// Failures are logged, not returned: the caller is already propagating
/// the error that caused the release.
pub async fn release(pool: &PgPool, reservation: &Reservation) {
    if let Err(e) = settle(pool, reservation, 0, "released").await {
        tracing::error!(
            user_id = reservation.user_id,
            units = reservation.units,
            error = %e,
            "Failed to release generation reservation",
        );
    }
}
