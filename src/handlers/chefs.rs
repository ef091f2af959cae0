use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::middleware::auth::ActorId;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateChefRequest {
    pub display_name: String,
    #[schema(value_type = String)]
    pub hourly_rate: BigDecimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRateRequest {
    #[schema(value_type = String)]
    pub hourly_rate: BigDecimal,
}

pub async fn create_chef(
    State(state): State<AppState>,
    Json(payload): Json<CreateChefRequest>,
) -> Result<impl IntoResponse, AppError> {
    let chef = state
        .chefs
        .create(payload.display_name, payload.hourly_rate)
        .await?;

    Ok((StatusCode::CREATED, Json(chef)))
}

pub async fn get_chef(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let chef = state.chefs.get(id).await?;
    Ok(Json(chef))
}

/// Rate changes apply to future bookings only; existing bookings keep their
/// price-locked amounts.
pub async fn update_chef_rate(
    State(state): State<AppState>,
    actor: ActorId,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRateRequest>,
) -> Result<impl IntoResponse, AppError> {
    if actor.0 != id {
        return Err(AppError::Forbidden(
            "only the chef can change their rate".to_string(),
        ));
    }

    let chef = state.chefs.update_rate(id, payload.hourly_rate).await?;
    Ok(Json(chef))
}
