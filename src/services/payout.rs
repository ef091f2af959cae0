use bigdecimal::BigDecimal;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{PayoutMethodRecord, Withdrawal};
use crate::db::{queries, with_read_retry};
use crate::domain::PayoutMethod;
use crate::error::AppError;
use crate::validation;

pub const WITHDRAWAL_STATUS_PROCESSING: &str = "processing";

/// Chef payout management: saved payout destinations and balance
/// withdrawals. The withdrawal debit runs under a row lock on the chef's
/// profile so the balance can never go negative.
#[derive(Clone)]
pub struct PayoutService {
    pool: PgPool,
}

impl PayoutService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn add_method(
        &self,
        chef_id: Uuid,
        method: PayoutMethod,
        country: String,
    ) -> Result<PayoutMethodRecord, AppError> {
        validation::validate_required("country", &country)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validation::validate_max_len("country", &country, validation::COUNTRY_CODE_MAX_LEN)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // FK failure surfaces as a storage error otherwise; check first for a
        // clean not-found.
        queries::get_chef(&self.pool, chef_id).await.map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound(format!("Chef {} not found", chef_id)),
            other => AppError::Database(other),
        })?;

        let record = PayoutMethodRecord {
            id: Uuid::new_v4(),
            chef_id,
            method: sqlx::types::Json(method),
            country,
            created_at: Utc::now(),
        };

        let inserted = queries::insert_payout_method(&self.pool, &record).await?;
        tracing::info!("Chef {} saved payout method {}", chef_id, inserted.method.label());

        Ok(inserted)
    }

    pub async fn list_methods(&self, chef_id: Uuid) -> Result<Vec<PayoutMethodRecord>, AppError> {
        let methods = with_read_retry(|| queries::list_payout_methods(&self.pool, chef_id)).await?;
        Ok(methods)
    }

    /// Debit the chef's balance and append a processing withdrawal record in
    /// one transaction. Withdrawals never leave `processing`; settlement is
    /// out of scope.
    pub async fn request_withdrawal(
        &self,
        chef_id: Uuid,
        amount: BigDecimal,
        payout_method_id: Uuid,
    ) -> Result<Withdrawal, AppError> {
        validation::validate_positive_amount("amount", &amount)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut tx = self.pool.begin().await?;

        let chef = queries::get_chef_for_update(&mut tx, chef_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Chef {} not found", chef_id)))?;

        let saved = queries::count_payout_methods_in_tx(&mut tx, chef_id).await?;
        if saved == 0 {
            return Err(AppError::NoPayoutMethod(
                "add a payout method before requesting a withdrawal".to_string(),
            ));
        }

        let method = queries::get_payout_method_in_tx(&mut tx, payout_method_id, chef_id)
            .await?
            .ok_or_else(|| {
                AppError::NoPayoutMethod(format!(
                    "payout method {} is not saved for this chef",
                    payout_method_id
                ))
            })?;

        if amount > chef.available_balance {
            return Err(AppError::InsufficientFunds(format!(
                "available balance is {}",
                chef.available_balance
            )));
        }

        queries::debit_chef_balance(&mut tx, chef_id, &amount).await?;

        let withdrawal = Withdrawal {
            id: Uuid::new_v4(),
            chef_id,
            payout_method_id: method.id,
            amount,
            status: WITHDRAWAL_STATUS_PROCESSING.to_string(),
            requested_at: Utc::now(),
        };
        let inserted = queries::insert_withdrawal(&mut tx, &withdrawal).await?;

        tx.commit().await?;

        tracing::info!(
            "Chef {} requested withdrawal {} of {}",
            chef_id,
            inserted.id,
            inserted.amount
        );

        Ok(inserted)
    }

    pub async fn list_withdrawals(&self, chef_id: Uuid) -> Result<Vec<Withdrawal>, AppError> {
        let withdrawals = with_read_retry(|| queries::list_withdrawals(&self.pool, chef_id)).await?;
        Ok(withdrawals)
    }
}
