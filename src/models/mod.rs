pub mod booking;
pub mod order;
pub mod user;

pub use booking::{Booking, BookingStatus, Feedback, PaymentStatus, RefundStatus};
pub use order::{CartItem, Order, OrderStatus};
pub use user::User;
