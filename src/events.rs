//! Change-notification contract for booking consumers.
//! The core publishes on a broadcast channel; dashboards subscribe over
//! WebSocket or ignore the stream and poll. Delivery is best-effort.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::db::models::Booking;
use crate::domain::BookingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingEventKind {
    Created,
    StatusChanged,
    Rescheduled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEvent {
    pub kind: BookingEventKind,
    pub booking_id: Uuid,
    pub chef_id: Uuid,
    pub customer_id: Uuid,
    pub status: BookingStatus,
    pub updated_at: DateTime<Utc>,
}

impl BookingEvent {
    pub fn from_booking(kind: BookingEventKind, booking: &Booking) -> Self {
        Self {
            kind,
            booking_id: booking.id,
            chef_id: booking.chef_id,
            customer_id: booking.customer_id,
            status: booking.status,
            updated_at: booking.updated_at,
        }
    }
}

pub type EventSender = broadcast::Sender<BookingEvent>;

pub fn channel(capacity: usize) -> (EventSender, broadcast::Receiver<BookingEvent>) {
    broadcast::channel(capacity)
}

/// Publish without failing the mutation: a send error only means nobody is
/// listening right now.
pub fn publish(sender: &EventSender, event: BookingEvent) {
    if let Err(err) = sender.send(event) {
        tracing::debug!("No subscribers for booking event: {}", err);
    }
}
