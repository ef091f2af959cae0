use sqlx::{PgPool, Postgres, Result, Transaction as SqlxTransaction};
use crate::db::models::{Booking, ChefProfile, PayoutMethodRecord, Withdrawal};
use crate::domain::{BookingSlot, BookingStatus};
use chrono::NaiveDate;
use sqlx::types::BigDecimal;
use uuid::Uuid;

// --- Chef profile queries ---

pub async fn insert_chef(pool: &PgPool, chef: &ChefProfile) -> Result<ChefProfile> {
    sqlx::query_as::<_, ChefProfile>(
        r#"
        INSERT INTO chef_profiles (
            id, display_name, hourly_rate, available_balance, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(chef.id)
    .bind(&chef.display_name)
    .bind(&chef.hourly_rate)
    .bind(&chef.available_balance)
    .bind(chef.created_at)
    .bind(chef.updated_at)
    .fetch_one(pool)
    .await
}

pub async fn get_chef(pool: &PgPool, id: Uuid) -> Result<ChefProfile> {
    sqlx::query_as::<_, ChefProfile>("SELECT * FROM chef_profiles WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn update_chef_rate(pool: &PgPool, id: Uuid, rate: &BigDecimal) -> Result<ChefProfile> {
    sqlx::query_as::<_, ChefProfile>(
        "UPDATE chef_profiles SET hourly_rate = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(rate)
    .fetch_one(pool)
    .await
}

pub async fn get_chef_in_tx(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<ChefProfile>> {
    sqlx::query_as::<_, ChefProfile>("SELECT * FROM chef_profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **executor)
        .await
}

/// Lock the chef's profile row for the remainder of the transaction.
pub async fn get_chef_for_update(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<ChefProfile>> {
    sqlx::query_as::<_, ChefProfile>("SELECT * FROM chef_profiles WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **executor)
        .await
}

pub async fn credit_chef_balance(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
    amount: &BigDecimal,
) -> Result<()> {
    sqlx::query(
        "UPDATE chef_profiles SET available_balance = available_balance + $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(amount)
    .execute(&mut **executor)
    .await?;

    Ok(())
}

pub async fn debit_chef_balance(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
    amount: &BigDecimal,
) -> Result<()> {
    sqlx::query(
        "UPDATE chef_profiles SET available_balance = available_balance - $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(amount)
    .execute(&mut **executor)
    .await?;

    Ok(())
}

// --- Booking queries ---

/// Serialize create/reschedule per chef. Advisory locks exclude concurrent
/// inserts, which row locks on existing bookings cannot.
pub async fn acquire_chef_slot_lock(
    executor: &mut SqlxTransaction<'_, Postgres>,
    chef_id: Uuid,
) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind(chef_id)
        .execute(&mut **executor)
        .await?;

    Ok(())
}

pub async fn insert_booking(
    executor: &mut SqlxTransaction<'_, Postgres>,
    booking: &Booking,
) -> Result<Booking> {
    sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (
            id, chef_id, customer_id, booking_date, start_time, duration_hours,
            number_of_guests, total_amount, special_requests, status, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(booking.id)
    .bind(booking.chef_id)
    .bind(booking.customer_id)
    .bind(booking.booking_date)
    .bind(booking.start_time)
    .bind(booking.duration_hours)
    .bind(booking.number_of_guests)
    .bind(&booking.total_amount)
    .bind(&booking.special_requests)
    .bind(booking.status)
    .bind(booking.created_at)
    .bind(booking.updated_at)
    .fetch_one(&mut **executor)
    .await
}

pub async fn get_booking(pool: &PgPool, id: Uuid) -> Result<Option<Booking>> {
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_booking_in_tx(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Booking>> {
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **executor)
        .await
}

pub async fn list_bookings(
    pool: &PgPool,
    chef_id: Option<Uuid>,
    customer_id: Option<Uuid>,
    status: Option<BookingStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Booking>> {
    sqlx::query_as::<_, Booking>(
        r#"
        SELECT * FROM bookings
        WHERE ($1::uuid IS NULL OR chef_id = $1)
        AND ($2::uuid IS NULL OR customer_id = $2)
        AND ($3::booking_status IS NULL OR status = $3)
        ORDER BY created_at DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(chef_id)
    .bind(customer_id)
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Fetch the chef's slot-holding bookings whose occupied interval overlaps
/// the half-open candidate interval. Bounds are computed from the stored
/// `booking_date + start_time`, so intervals spanning any number of days are
/// caught.
pub async fn overlapping_open_bookings(
    executor: &mut SqlxTransaction<'_, Postgres>,
    chef_id: Uuid,
    slot: &BookingSlot,
    exclude: Option<Uuid>,
) -> Result<Vec<Booking>> {
    sqlx::query_as::<_, Booking>(
        r#"
        SELECT * FROM bookings
        WHERE chef_id = $1
        AND status IN ('pending', 'confirmed')
        AND booking_date + start_time < $3
        AND booking_date + start_time + make_interval(hours => duration_hours) > $2
        AND ($4::uuid IS NULL OR id <> $4)
        "#,
    )
    .bind(chef_id)
    .bind(slot.start)
    .bind(slot.end)
    .bind(exclude)
    .fetch_all(&mut **executor)
    .await
}

/// Compare-and-swap on status. Returns `None` when the row no longer carries
/// the expected status (or does not exist); callers re-read to diagnose.
pub async fn cas_booking_status(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
    expected: BookingStatus,
    next: BookingStatus,
) -> Result<Option<Booking>> {
    sqlx::query_as::<_, Booking>(
        r#"
        UPDATE bookings SET status = $3, updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(expected)
    .bind(next)
    .fetch_optional(&mut **executor)
    .await
}

/// Rewrite a pending booking's slot and price-locked amount in place.
/// Conditioned on `status = 'pending'` so a concurrent accept/cancel wins.
#[allow(clippy::too_many_arguments)]
pub async fn update_booking_schedule(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
    booking_date: NaiveDate,
    start_time: chrono::NaiveTime,
    duration_hours: i32,
    number_of_guests: i32,
    total_amount: &BigDecimal,
    special_requests: Option<&str>,
) -> Result<Option<Booking>> {
    sqlx::query_as::<_, Booking>(
        r#"
        UPDATE bookings SET
            booking_date = $2,
            start_time = $3,
            duration_hours = $4,
            number_of_guests = $5,
            total_amount = $6,
            special_requests = $7,
            updated_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(booking_date)
    .bind(start_time)
    .bind(duration_hours)
    .bind(number_of_guests)
    .bind(total_amount)
    .bind(special_requests)
    .fetch_optional(&mut **executor)
    .await
}

// --- Payout queries ---

pub async fn insert_payout_method(
    pool: &PgPool,
    record: &PayoutMethodRecord,
) -> Result<PayoutMethodRecord> {
    sqlx::query_as::<_, PayoutMethodRecord>(
        r#"
        INSERT INTO payout_methods (id, chef_id, method, country, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(record.id)
    .bind(record.chef_id)
    .bind(&record.method)
    .bind(&record.country)
    .bind(record.created_at)
    .fetch_one(pool)
    .await
}

pub async fn list_payout_methods(pool: &PgPool, chef_id: Uuid) -> Result<Vec<PayoutMethodRecord>> {
    sqlx::query_as::<_, PayoutMethodRecord>(
        "SELECT * FROM payout_methods WHERE chef_id = $1 ORDER BY created_at",
    )
    .bind(chef_id)
    .fetch_all(pool)
    .await
}

pub async fn get_payout_method_in_tx(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
    chef_id: Uuid,
) -> Result<Option<PayoutMethodRecord>> {
    sqlx::query_as::<_, PayoutMethodRecord>(
        "SELECT * FROM payout_methods WHERE id = $1 AND chef_id = $2",
    )
    .bind(id)
    .bind(chef_id)
    .fetch_optional(&mut **executor)
    .await
}

pub async fn count_payout_methods_in_tx(
    executor: &mut SqlxTransaction<'_, Postgres>,
    chef_id: Uuid,
) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM payout_methods WHERE chef_id = $1")
        .bind(chef_id)
        .fetch_one(&mut **executor)
        .await
}

pub async fn insert_withdrawal(
    executor: &mut SqlxTransaction<'_, Postgres>,
    withdrawal: &Withdrawal,
) -> Result<Withdrawal> {
    sqlx::query_as::<_, Withdrawal>(
        r#"
        INSERT INTO withdrawals (id, chef_id, payout_method_id, amount, status, requested_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(withdrawal.id)
    .bind(withdrawal.chef_id)
    .bind(withdrawal.payout_method_id)
    .bind(&withdrawal.amount)
    .bind(&withdrawal.status)
    .bind(withdrawal.requested_at)
    .fetch_one(&mut **executor)
    .await
}

pub async fn list_withdrawals(pool: &PgPool, chef_id: Uuid) -> Result<Vec<Withdrawal>> {
    sqlx::query_as::<_, Withdrawal>(
        "SELECT * FROM withdrawals WHERE chef_id = $1 ORDER BY requested_at DESC",
    )
    .bind(chef_id)
    .fetch_all(pool)
    .await
}
