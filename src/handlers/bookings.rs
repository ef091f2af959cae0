use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::AppState;
use crate::domain::BookingStatus;
use crate::error::AppError;
use crate::middleware::auth::ActorId;
use crate::services::{BookingFilter, CreateBookingInput, RescheduleInput};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub chef_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i32,
    pub number_of_guests: i32,
    pub special_requests: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RescheduleRequest {
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i32,
    pub number_of_guests: i32,
    pub special_requests: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub chef_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created in pending status"),
        (status = 409, description = "Requested slot overlaps an open booking"),
        (status = 400, description = "Invalid booking fields")
    ),
    tag = "Bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    actor: ActorId,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .bookings
        .create(
            actor.0,
            CreateBookingInput {
                chef_id: payload.chef_id,
                booking_date: payload.booking_date,
                start_time: payload.start_time,
                duration_hours: payload.duration_hours,
                number_of_guests: payload.number_of_guests,
                special_requests: payload.special_requests,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.bookings.get(id).await?;
    Ok(Json(booking))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state
        .bookings
        .list(BookingFilter {
            chef_id: params.chef_id,
            customer_id: params.customer_id,
            status: params.status,
            limit: params.limit.unwrap_or(20),
            offset: params.offset.unwrap_or(0),
        })
        .await?;

    Ok(Json(bookings))
}

pub async fn accept_booking(
    State(state): State<AppState>,
    actor: ActorId,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.bookings.accept(actor.0, id).await?;
    Ok(Json(booking))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    actor: ActorId,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.bookings.cancel(actor.0, id).await?;
    Ok(Json(booking))
}

#[utoipa::path(
    post,
    path = "/bookings/{id}/complete",
    responses(
        (status = 200, description = "Booking completed, chef balance credited once"),
        (status = 409, description = "Booking is not in confirmed status")
    ),
    tag = "Bookings"
)]
pub async fn complete_booking(
    State(state): State<AppState>,
    actor: ActorId,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.bookings.complete(actor.0, id).await?;
    Ok(Json(booking))
}

pub async fn reschedule_booking(
    State(state): State<AppState>,
    actor: ActorId,
    Path(id): Path<Uuid>,
    Json(payload): Json<RescheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .bookings
        .reschedule(
            actor.0,
            id,
            RescheduleInput {
                booking_date: payload.booking_date,
                start_time: payload.start_time,
                duration_hours: payload.duration_hours,
                number_of_guests: payload.number_of_guests,
                special_requests: payload.special_requests,
            },
        )
        .await?;

    Ok(Json(booking))
}
