pub mod email;
pub mod identity;
pub mod lifecycle;
pub mod payments;
