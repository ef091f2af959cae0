use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Booking;
use crate::db::{queries, with_read_retry};
use crate::domain::{BookingSlot, BookingStatus};
use crate::error::AppError;
use crate::events::{self, BookingEvent, BookingEventKind, EventSender};
use crate::validation;

#[derive(Debug, Clone)]
pub struct CreateBookingInput {
    pub chef_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i32,
    pub number_of_guests: i32,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RescheduleInput {
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i32,
    pub number_of_guests: i32,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub chef_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
    pub limit: i64,
    pub offset: i64,
}

/// Owns the booking state machine: creation with conflict checking, status
/// transitions via compare-and-swap, and the completion credit to the chef's
/// balance. Every successful mutation publishes a [`BookingEvent`].
#[derive(Clone)]
pub struct BookingService {
    pool: PgPool,
    events: EventSender,
}

impl BookingService {
    pub fn new(pool: PgPool, events: EventSender) -> Self {
        Self { pool, events }
    }

    pub async fn create(
        &self,
        customer_id: Uuid,
        input: CreateBookingInput,
    ) -> Result<Booking, AppError> {
        validation::validate_positive("duration_hours", input.duration_hours)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validation::validate_positive("number_of_guests", input.number_of_guests)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if let Some(requests) = &input.special_requests {
            validation::validate_max_len(
                "special_requests",
                requests,
                validation::SPECIAL_REQUESTS_MAX_LEN,
            )
            .map_err(|e| AppError::Validation(e.to_string()))?;
        }

        let slot = Self::validated_slot(input.booking_date, input.start_time, input.duration_hours)?;

        let mut tx = self.pool.begin().await?;

        queries::acquire_chef_slot_lock(&mut tx, input.chef_id).await?;

        let chef = queries::get_chef_in_tx(&mut tx, input.chef_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Chef {} not found", input.chef_id)))?;

        let open = queries::overlapping_open_bookings(&mut tx, input.chef_id, &slot, None).await?;
        if !open.is_empty() {
            return Err(AppError::Conflict(
                "that slot is already booked for this chef".to_string(),
            ));
        }

        // Price lock: the rate is read once here and never again for this
        // booking, except through an explicit reschedule.
        let total_amount = &chef.hourly_rate * BigDecimal::from(input.duration_hours);

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            chef_id: input.chef_id,
            customer_id,
            booking_date: input.booking_date,
            start_time: input.start_time,
            duration_hours: input.duration_hours,
            number_of_guests: input.number_of_guests,
            total_amount,
            special_requests: input.special_requests,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let inserted = queries::insert_booking(&mut tx, &booking).await?;
        tx.commit().await?;

        tracing::info!(
            "Booking {} created for chef {} on {} at {}",
            inserted.id,
            inserted.chef_id,
            inserted.booking_date,
            inserted.start_time
        );
        events::publish(
            &self.events,
            BookingEvent::from_booking(BookingEventKind::Created, &inserted),
        );

        Ok(inserted)
    }

    /// Chef accepts a pending booking.
    pub async fn accept(&self, actor_id: Uuid, booking_id: Uuid) -> Result<Booking, AppError> {
        self.transition(actor_id, booking_id, BookingStatus::Confirmed, ActorRole::Chef)
            .await
    }

    /// Either party cancels while the booking is still open. No balance
    /// effect: nothing was credited before completion.
    pub async fn cancel(&self, actor_id: Uuid, booking_id: Uuid) -> Result<Booking, AppError> {
        self.transition(actor_id, booking_id, BookingStatus::Cancelled, ActorRole::ChefOrCustomer)
            .await
    }

    /// Chef marks a confirmed booking as done. The status write and the
    /// balance credit commit together, and the compare-and-swap guarantees
    /// the credit is applied at most once per booking.
    pub async fn complete(&self, actor_id: Uuid, booking_id: Uuid) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = queries::get_booking_in_tx(&mut tx, booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;

        if actor_id != current.chef_id {
            return Err(AppError::Forbidden(
                "only the chef can complete a booking".to_string(),
            ));
        }
        if !current.status.allows(BookingStatus::Completed) {
            return Err(AppError::InvalidTransition(format!(
                "cannot complete a {} booking",
                current.status
            )));
        }

        let updated =
            queries::cas_booking_status(&mut tx, booking_id, BookingStatus::Confirmed, BookingStatus::Completed)
                .await?
                .ok_or_else(|| {
                    AppError::ConcurrentModification(format!(
                        "booking {} changed status during completion",
                        booking_id
                    ))
                })?;

        queries::credit_chef_balance(&mut tx, updated.chef_id, &updated.total_amount).await?;
        tx.commit().await?;

        tracing::info!(
            "Booking {} completed, credited {} to chef {}",
            updated.id,
            updated.total_amount,
            updated.chef_id
        );
        events::publish(
            &self.events,
            BookingEvent::from_booking(BookingEventKind::StatusChanged, &updated),
        );

        Ok(updated)
    }

    /// Customer moves a pending booking to a new slot. The amount is
    /// recomputed from the chef's current rate and the booking stays pending,
    /// so the chef must accept again.
    pub async fn reschedule(
        &self,
        actor_id: Uuid,
        booking_id: Uuid,
        input: RescheduleInput,
    ) -> Result<Booking, AppError> {
        validation::validate_positive("duration_hours", input.duration_hours)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validation::validate_positive("number_of_guests", input.number_of_guests)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if let Some(requests) = &input.special_requests {
            validation::validate_max_len(
                "special_requests",
                requests,
                validation::SPECIAL_REQUESTS_MAX_LEN,
            )
            .map_err(|e| AppError::Validation(e.to_string()))?;
        }

        let slot = Self::validated_slot(input.booking_date, input.start_time, input.duration_hours)?;

        let mut tx = self.pool.begin().await?;

        let current = queries::get_booking_in_tx(&mut tx, booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;

        if actor_id != current.customer_id {
            return Err(AppError::Forbidden(
                "only the customer can reschedule a booking".to_string(),
            ));
        }
        if current.status != BookingStatus::Pending {
            return Err(AppError::InvalidTransition(format!(
                "cannot reschedule a {} booking",
                current.status
            )));
        }

        queries::acquire_chef_slot_lock(&mut tx, current.chef_id).await?;

        let chef = queries::get_chef_in_tx(&mut tx, current.chef_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Chef {} not found", current.chef_id)))?;

        let open =
            queries::overlapping_open_bookings(&mut tx, current.chef_id, &slot, Some(booking_id))
                .await?;
        if !open.is_empty() {
            return Err(AppError::Conflict(
                "that slot is already booked for this chef".to_string(),
            ));
        }

        let total_amount = &chef.hourly_rate * BigDecimal::from(input.duration_hours);

        let updated = queries::update_booking_schedule(
            &mut tx,
            booking_id,
            input.booking_date,
            input.start_time,
            input.duration_hours,
            input.number_of_guests,
            &total_amount,
            input.special_requests.as_deref(),
        )
        .await?
        .ok_or_else(|| {
            AppError::ConcurrentModification(format!(
                "booking {} changed status during reschedule",
                booking_id
            ))
        })?;

        tx.commit().await?;

        tracing::info!("Booking {} rescheduled to {} {}", updated.id, updated.booking_date, updated.start_time);
        events::publish(
            &self.events,
            BookingEvent::from_booking(BookingEventKind::Rescheduled, &updated),
        );

        Ok(updated)
    }

    pub async fn get(&self, booking_id: Uuid) -> Result<Booking, AppError> {
        with_read_retry(|| queries::get_booking(&self.pool, booking_id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))
    }

    pub async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>, AppError> {
        let bookings = with_read_retry(|| {
            queries::list_bookings(
                &self.pool,
                filter.chef_id,
                filter.customer_id,
                filter.status,
                filter.limit,
                filter.offset,
            )
        })
        .await?;

        Ok(bookings)
    }

    fn validated_slot(
        date: NaiveDate,
        start_time: NaiveTime,
        duration_hours: i32,
    ) -> Result<BookingSlot, AppError> {
        let slot = BookingSlot::new(date, start_time, duration_hours).ok_or_else(|| {
            AppError::Validation(
                "booking_date/duration_hours: interval is out of range".to_string(),
            )
        })?;
        if slot.start < Utc::now().naive_utc() {
            return Err(AppError::Validation(
                "booking_date/start_time: must not be in the past".to_string(),
            ));
        }

        Ok(slot)
    }

    async fn transition(
        &self,
        actor_id: Uuid,
        booking_id: Uuid,
        next: BookingStatus,
        role: ActorRole,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = queries::get_booking_in_tx(&mut tx, booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;

        let authorized = match role {
            ActorRole::Chef => actor_id == current.chef_id,
            ActorRole::ChefOrCustomer => {
                actor_id == current.chef_id || actor_id == current.customer_id
            }
        };
        if !authorized {
            return Err(AppError::Forbidden(
                "actor is not a party to this booking".to_string(),
            ));
        }

        if !current.status.allows(next) {
            return Err(AppError::InvalidTransition(format!(
                "cannot move a {} booking to {}",
                current.status, next
            )));
        }

        let updated = queries::cas_booking_status(&mut tx, booking_id, current.status, next)
            .await?
            .ok_or_else(|| {
                AppError::ConcurrentModification(format!(
                    "booking {} changed status during transition",
                    booking_id
                ))
            })?;

        tx.commit().await?;

        tracing::info!("Booking {} moved to {}", updated.id, updated.status);
        events::publish(
            &self.events,
            BookingEvent::from_booking(BookingEventKind::StatusChanged, &updated),
        );

        Ok(updated)
    }
}

enum ActorRole {
    Chef,
    ChefOrCustomer,
}
