pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod startup;
pub mod validation;

use axum::{
    Router,
    routing::{get, post, put},
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::events::EventSender;
use crate::services::{BookingService, ChefService, PayoutService};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub events: EventSender,
    pub bookings: BookingService,
    pub chefs: ChefService,
    pub payouts: PayoutService,
}

impl AppState {
    pub fn new(db: PgPool, events: EventSender) -> Self {
        Self {
            bookings: BookingService::new(db.clone(), events.clone()),
            chefs: ChefService::new(db.clone()),
            payouts: PayoutService::new(db.clone()),
            db,
            events,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::bookings::create_booking,
        handlers::bookings::complete_booking,
        handlers::payouts::request_withdrawal,
    ),
    components(schemas(
        handlers::HealthStatus,
        handlers::DbPoolStats,
        handlers::bookings::CreateBookingRequest,
        handlers::bookings::RescheduleRequest,
        handlers::chefs::CreateChefRequest,
        handlers::chefs::UpdateRateRequest,
        handlers::payouts::AddPayoutMethodRequest,
        handlers::payouts::WithdrawalRequest,
        db::models::Booking,
        db::models::ChefProfile,
        db::models::PayoutMethodRecord,
        db::models::Withdrawal,
        domain::BookingStatus,
        domain::PayoutMethod,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Bookings", description = "Booking lifecycle"),
        (name = "Payouts", description = "Chef balance and withdrawals")
    )
)]
pub struct ApiDoc;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health))
        .route(
            "/bookings",
            post(handlers::bookings::create_booking).get(handlers::bookings::list_bookings),
        )
        .route("/bookings/:id", get(handlers::bookings::get_booking))
        .route("/bookings/:id/accept", post(handlers::bookings::accept_booking))
        .route("/bookings/:id/cancel", post(handlers::bookings::cancel_booking))
        .route("/bookings/:id/complete", post(handlers::bookings::complete_booking))
        .route("/bookings/:id/reschedule", put(handlers::bookings::reschedule_booking))
        .route("/chefs", post(handlers::chefs::create_chef))
        .route("/chefs/:id", get(handlers::chefs::get_chef))
        .route("/chefs/:id/rate", put(handlers::chefs::update_chef_rate))
        .route(
            "/chefs/:id/payout-methods",
            post(handlers::payouts::add_payout_method).get(handlers::payouts::list_payout_methods),
        )
        .route(
            "/chefs/:id/withdrawals",
            post(handlers::payouts::request_withdrawal).get(handlers::payouts::list_withdrawals),
        )
        .route("/ws", get(handlers::ws::ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
