//! Booking lifecycle state machine.
//!
//! States move one-directionally: `locked -> confirmed -> completed`, with
//! `locked`/`confirmed -> cancelled`. Terminal states accept no further
//! transitions. Every function here is pure over the record plus an
//! injected wall-clock instant, so callers decide when "now" is and the
//! tests pin it exactly.

use chrono::NaiveDateTime;

use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, Feedback, PaymentStatus, RefundStatus};

/// Cancellations are accepted up to (and including) this many hours before
/// the scheduled service time.
pub const CANCELLATION_CUTOFF_HOURS: f64 = 6.0;

/// Deposit required to lock a booking: 10% of the total, rounded to the
/// nearest rupee. Fixed at creation, never recomputed.
pub fn locking_amount(total_amount: i64) -> i64 {
    (total_amount as f64 * 0.10).round() as i64
}

/// Hours remaining until the scheduled time, computed over millisecond
/// epoch timestamps so the 6-hour boundary is exact.
pub fn hours_until(scheduled_at: NaiveDateTime, now: NaiveDateTime) -> f64 {
    let delta_ms = scheduled_at.and_utc().timestamp_millis() - now.and_utc().timestamp_millis();
    delta_ms as f64 / 3_600_000.0
}

/// Outcome of a payment confirmation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The booking moved `locked -> confirmed` on this call.
    Applied,
    /// The booking was already confirmed and paid; nothing changed. Callers
    /// must not re-run side effects such as the confirmation email.
    AlreadyConfirmed,
}

/// Apply a verified deposit payment. Signature validation happens at the
/// payment collaborator boundary; by the time this runs the payment is
/// trusted.
pub fn confirm_payment(booking: &mut Booking) -> Result<Confirmation, AppError> {
    match booking.status {
        BookingStatus::Confirmed if booking.payment_status == PaymentStatus::Paid => {
            Ok(Confirmation::AlreadyConfirmed)
        }
        BookingStatus::Locked => {
            booking.status = BookingStatus::Confirmed;
            booking.payment_status = PaymentStatus::Paid;
            Ok(Confirmation::Applied)
        }
        _ => Err(AppError::InvalidState(format!(
            "cannot confirm payment for a {} booking",
            booking.status.as_str()
        ))),
    }
}

/// Cancel a booking, subject to the 6-hour cutoff. The record is untouched
/// on rejection. The refund itself is settled outside this system; we only
/// flag the record.
pub fn cancel(booking: &mut Booking, now: NaiveDateTime) -> Result<(), AppError> {
    match booking.status {
        BookingStatus::Locked | BookingStatus::Confirmed => {}
        _ => {
            return Err(AppError::InvalidState(format!(
                "cannot cancel a {} booking",
                booking.status.as_str()
            )))
        }
    }

    if hours_until(booking.scheduled_at, now) < CANCELLATION_CUTOFF_HOURS {
        return Err(AppError::TooLateToCancel);
    }

    booking.status = BookingStatus::Cancelled;
    booking.cancelled_at = Some(now);
    booking.refund_status = RefundStatus::Processing;
    booking.payment_status = PaymentStatus::Refunded;
    Ok(())
}

/// Operator action, trusted beyond the state check.
pub fn mark_completed(booking: &mut Booking, now: NaiveDateTime) -> Result<(), AppError> {
    if booking.status != BookingStatus::Confirmed {
        return Err(AppError::InvalidState(format!(
            "cannot complete a {} booking",
            booking.status.as_str()
        )));
    }

    booking.status = BookingStatus::Completed;
    booking.completed_at = Some(now);
    Ok(())
}

/// Attach feedback to a completed booking. At most once; rating in [1,5].
pub fn submit_feedback(
    booking: &mut Booking,
    rating: i32,
    comments: &str,
    now: NaiveDateTime,
) -> Result<(), AppError> {
    if booking.status != BookingStatus::Completed {
        return Err(AppError::InvalidState(format!(
            "feedback requires a completed booking, not {}",
            booking.status.as_str()
        )));
    }
    if booking.feedback.is_some() {
        return Err(AppError::AlreadyHasFeedback);
    }
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    booking.feedback = Some(Feedback {
        rating,
        comments: comments.to_string(),
        created_at: now,
    });
    Ok(())
}
