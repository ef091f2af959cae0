use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::{BigDecimal, Json};
use uuid::Uuid;
use utoipa::ToSchema;

use crate::domain::{BookingStatus, PayoutMethod};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct ChefProfile {
    pub id: Uuid,
    pub display_name: String,
    #[schema(value_type = String)]
    pub hourly_rate: BigDecimal,
    #[schema(value_type = String)]
    pub available_balance: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub chef_id: Uuid,
    pub customer_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i32,
    pub number_of_guests: i32,
    #[schema(value_type = String)]
    pub total_amount: BigDecimal,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A saved payout destination. The variant payload lives in the `method`
/// JSONB column and deserializes into [`PayoutMethod`].
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct PayoutMethodRecord {
    pub id: Uuid,
    pub chef_id: Uuid,
    #[schema(value_type = PayoutMethod)]
    pub method: Json<PayoutMethod>,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Withdrawal {
    pub id: Uuid,
    pub chef_id: Uuid,
    pub payout_method_id: Uuid,
    #[schema(value_type = String)]
    pub amount: BigDecimal,
    pub status: String,
    pub requested_at: DateTime<Utc>,
}
