use bigdecimal::BigDecimal;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::ChefProfile;
use crate::db::{queries, with_read_retry};
use crate::error::AppError;
use crate::validation;

/// Chef profile management. Rate changes never touch existing bookings'
/// price-locked amounts.
#[derive(Clone)]
pub struct ChefService {
    pool: PgPool,
}

impl ChefService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        display_name: String,
        hourly_rate: BigDecimal,
    ) -> Result<ChefProfile, AppError> {
        let display_name = validation::sanitize_string(&display_name);
        validation::validate_required("display_name", &display_name)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validation::validate_max_len(
            "display_name",
            &display_name,
            validation::DISPLAY_NAME_MAX_LEN,
        )
        .map_err(|e| AppError::Validation(e.to_string()))?;
        validation::validate_positive_amount("hourly_rate", &hourly_rate)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let now = Utc::now();
        let chef = ChefProfile {
            id: Uuid::new_v4(),
            display_name,
            hourly_rate,
            available_balance: BigDecimal::from(0),
            created_at: now,
            updated_at: now,
        };

        let inserted = queries::insert_chef(&self.pool, &chef).await?;
        tracing::info!("Chef profile {} created", inserted.id);

        Ok(inserted)
    }

    pub async fn get(&self, chef_id: Uuid) -> Result<ChefProfile, AppError> {
        with_read_retry(|| queries::get_chef(&self.pool, chef_id))
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    AppError::NotFound(format!("Chef {} not found", chef_id))
                }
                other => AppError::Database(other),
            })
    }

    pub async fn update_rate(
        &self,
        chef_id: Uuid,
        hourly_rate: BigDecimal,
    ) -> Result<ChefProfile, AppError> {
        validation::validate_positive_amount("hourly_rate", &hourly_rate)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        queries::update_chef_rate(&self.pool, chef_id, &hourly_rate)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    AppError::NotFound(format!("Chef {} not found", chef_id))
                }
                other => AppError::Database(other),
            })
    }
}
