pub mod booking;
pub mod payout;

pub use booking::{BookingSlot, BookingStatus};
pub use payout::PayoutMethod;
