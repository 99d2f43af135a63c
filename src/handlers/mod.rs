pub mod auth;
pub mod bookings;
pub mod email;
pub mod health;
pub mod orders;
pub mod payments;
