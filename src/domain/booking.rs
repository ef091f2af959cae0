//! Booking domain rules.
//! Status state machine and time-slot arithmetic, independent of storage.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Completed and cancelled bookings admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Statuses that occupy the chef's calendar for conflict checking.
    pub fn holds_slot(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Whether the state machine defines an edge from `self` to `next`.
    pub fn allows(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) | (Confirmed, Completed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open interval `[start, start + duration)` occupied by a booking.
/// A late start with a long duration may cross midnight, so the interval is
/// held as full datetimes rather than a date plus two times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BookingSlot {
    /// Returns `None` when the end of the interval is not representable,
    /// which only happens for absurd date/duration combinations.
    pub fn new(date: NaiveDate, start_time: NaiveTime, duration_hours: i32) -> Option<Self> {
        let start = date.and_time(start_time);
        let end = start.checked_add_signed(Duration::hours(duration_hours as i64))?;
        Some(Self { start, end })
    }

    pub fn overlaps(&self, other: &BookingSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(date: &str, time: &str, hours: i32) -> BookingSlot {
        BookingSlot::new(
            date.parse::<NaiveDate>().unwrap(),
            time.parse::<NaiveTime>().unwrap(),
            hours,
        )
        .unwrap()
    }

    #[test]
    fn test_overlapping_slots_detected() {
        // 18:00-20:00 vs 19:00-21:00 overlap for one hour
        let a = slot("2024-06-01", "18:00:00", 2);
        let b = slot("2024-06-01", "19:00:00", 2);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_back_to_back_slots_do_not_overlap() {
        // Half-open intervals: [18,20) and [20,22) share only the boundary
        let a = slot("2024-06-01", "18:00:00", 2);
        let b = slot("2024-06-01", "20:00:00", 2);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_contained_slot_overlaps() {
        let outer = slot("2024-06-01", "17:00:00", 6);
        let inner = slot("2024-06-01", "19:00:00", 1);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_cross_midnight_overlap() {
        // 23:00 + 3h runs into the next day and collides with 01:00 next day
        let late = slot("2024-06-01", "23:00:00", 3);
        let next_morning = slot("2024-06-02", "01:00:00", 2);
        assert!(late.overlaps(&next_morning));
    }

    #[test]
    fn test_multi_day_slot_overlaps_later_date() {
        // 72h from June 1 midnight occupies through June 4 midnight
        let long = slot("2024-06-01", "00:00:00", 72);
        let inside = slot("2024-06-03", "12:00:00", 2);
        assert!(long.overlaps(&inside));
        let after = slot("2024-06-04", "00:00:00", 2);
        assert!(!long.overlaps(&after));
    }

    #[test]
    fn test_unrepresentable_interval_yields_none() {
        let start = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        assert!(BookingSlot::new(NaiveDate::MAX, start, i32::MAX).is_none());
        assert!(BookingSlot::new(NaiveDate::MAX, start, 2).is_none());
    }

    #[test]
    fn test_different_days_do_not_overlap() {
        let a = slot("2024-06-01", "18:00:00", 2);
        let b = slot("2024-06-02", "18:00:00", 2);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
    }

    #[test]
    fn test_slot_holding_statuses() {
        assert!(BookingStatus::Pending.holds_slot());
        assert!(BookingStatus::Confirmed.holds_slot());
        assert!(!BookingStatus::Completed.holds_slot());
        assert!(!BookingStatus::Cancelled.holds_slot());
    }

    #[test]
    fn test_transition_edges() {
        use BookingStatus::*;
        assert!(Pending.allows(Confirmed));
        assert!(Pending.allows(Cancelled));
        assert!(Confirmed.allows(Cancelled));
        assert!(Confirmed.allows(Completed));

        assert!(!Pending.allows(Completed));
        assert!(!Confirmed.allows(Confirmed));
        assert!(!Completed.allows(Cancelled));
        assert!(!Cancelled.allows(Pending));
    }
}
