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
use crate::domain::PayoutMethod;
use crate::error::AppError;
use crate::middleware::auth::ActorId;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddPayoutMethodRequest {
    pub method: PayoutMethod,
    pub country: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawalRequest {
    #[schema(value_type = String)]
    pub amount: BigDecimal,
    pub payout_method_id: Uuid,
}

fn require_chef(actor: ActorId, chef_id: Uuid) -> Result<(), AppError> {
    if actor.0 != chef_id {
        return Err(AppError::Forbidden(
            "only the chef can manage their payouts".to_string(),
        ));
    }

    Ok(())
}

pub async fn add_payout_method(
    State(state): State<AppState>,
    actor: ActorId,
    Path(chef_id): Path<Uuid>,
    Json(payload): Json<AddPayoutMethodRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_chef(actor, chef_id)?;

    let record = state
        .payouts
        .add_method(chef_id, payload.method, payload.country)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_payout_methods(
    State(state): State<AppState>,
    actor: ActorId,
    Path(chef_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    require_chef(actor, chef_id)?;

    let methods = state.payouts.list_methods(chef_id).await?;
    Ok(Json(methods))
}

#[utoipa::path(
    post,
    path = "/chefs/{chef_id}/withdrawals",
    request_body = WithdrawalRequest,
    responses(
        (status = 201, description = "Withdrawal accepted for processing"),
        (status = 422, description = "Insufficient balance or no payout method")
    ),
    tag = "Payouts"
)]
pub async fn request_withdrawal(
    State(state): State<AppState>,
    actor: ActorId,
    Path(chef_id): Path<Uuid>,
    Json(payload): Json<WithdrawalRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_chef(actor, chef_id)?;

    let withdrawal = state
        .payouts
        .request_withdrawal(chef_id, payload.amount, payload.payout_method_id)
        .await?;

    Ok((StatusCode::CREATED, Json(withdrawal)))
}

pub async fn list_withdrawals(
    State(state): State<AppState>,
    actor: ActorId,
    Path(chef_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    require_chef(actor, chef_id)?;

    let withdrawals = state.payouts.list_withdrawals(chef_id).await?;
    Ok(Json(withdrawals))
}
