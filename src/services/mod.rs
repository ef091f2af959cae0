pub mod booking;
pub mod chef;
pub mod payout;

pub use booking::{BookingFilter, BookingService, CreateBookingInput, RescheduleInput};
pub use chef::ChefService;
pub use payout::PayoutService;
