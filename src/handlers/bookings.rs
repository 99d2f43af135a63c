use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, PaymentStatus, RefundStatus};
use crate::services::lifecycle;
use crate::state::AppState;

// POST /bookings
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub service_id: String,
    pub service_name: String,
    pub package_id: String,
    pub package_name: String,
    /// YYYY-MM-DD
    pub preferred_date: String,
    /// HH:MM
    pub preferred_time: String,
    pub total_amount: i64,
    pub phone: String,
    pub city: String,
    pub pincode: String,
    pub notes: Option<String>,
}

fn parse_scheduled_at(date: &str, time: &str) -> Result<NaiveDateTime, AppError> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("preferredDate must be YYYY-MM-DD".to_string()))?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::Validation("preferredTime must be HH:MM".to_string()))?;
    Ok(date.and_time(time))
}

fn validate_create(req: &CreateBookingRequest) -> Result<(), AppError> {
    let required = [
        ("serviceId", &req.service_id),
        ("packageId", &req.package_id),
        ("phone", &req.phone),
        ("city", &req.city),
        ("pincode", &req.pincode),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }
    if req.total_amount <= 0 {
        return Err(AppError::Validation(
            "totalAmount must be positive".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateBookingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = auth::require_user(&headers, &state.config.jwt_secret)?;
    validate_create(&body)?;
    let scheduled_at = parse_scheduled_at(&body.preferred_date, &body.preferred_time)?;

    // The deposit is always computed server-side; a client-supplied value
    // is ignored.
    let locking_amount = lifecycle::locking_amount(body.total_amount);

    let mut booking = Booking {
        id: format!("BKG{}", Uuid::new_v4().simple()),
        service_id: body.service_id,
        service_name: body.service_name,
        package_id: body.package_id,
        package_name: body.package_name,
        user_id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        phone: body.phone,
        city: body.city,
        pincode: body.pincode,
        notes: body.notes,
        scheduled_at,
        total_amount: body.total_amount,
        locking_amount,
        status: BookingStatus::Locked,
        payment_status: PaymentStatus::Pending,
        refund_status: RefundStatus::None,
        payment_order_id: None,
        feedback: None,
        created_at: Utc::now().naive_utc(),
        cancelled_at: None,
        completed_at: None,
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_booking(&db, &booking)?;
    }
    tracing::info!(booking_id = %booking.id, user_id = %user.id, "booking created");

    // Gateway order for the deposit, in paise. The booking record is
    // authoritative: a gateway failure is surfaced but never rolls it back.
    let order = state
        .payments
        .create_order(
            locking_amount * 100,
            &booking.id,
            serde_json::json!({ "bookingId": booking.id, "type": "booking_lock" }),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, booking_id = %booking.id, "payment order creation failed");
            AppError::Upstream("failed to create payment order".to_string())
        })?;

    booking.payment_order_id = Some(order.id.clone());
    {
        let db = state.db.lock().unwrap();
        queries::update_booking(&db, &booking)?;
    }

    Ok(Json(serde_json::json!({
        "bookingId": booking.id,
        "booking": booking,
        "razorpayOrder": order,
    })))
}

// GET /bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = auth::require_user(&headers, &state.config.jwt_secret)?;

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::bookings_for_user(&db, &user.id)?
    };

    Ok(Json(serde_json::json!({ "bookings": bookings })))
}

// POST /bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = auth::require_user(&headers, &state.config.jwt_secret)?;
    let now = Utc::now().naive_utc();

    // Read-check-write under one lock acquisition so two racing cancel (or
    // cancel vs. verify) calls cannot interleave.
    let booking = {
        let db = state.db.lock().unwrap();
        let mut booking = queries::get_booking(&db, &id)?
            .filter(|b| b.user_id == user.id)
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?;

        lifecycle::cancel(&mut booking, now)?;
        queries::update_booking(&db, &booking)?;
        booking
    };

    tracing::info!(booking_id = %booking.id, "booking cancelled");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Booking cancelled successfully. 100% refund will be processed within 5-7 business days",
        "booking": booking,
    })))
}

// POST /bookings/:id/complete — operator action
pub async fn complete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::require_operator(&headers, &state.config.admin_token)?;
    let now = Utc::now().naive_utc();

    let booking = {
        let db = state.db.lock().unwrap();
        let mut booking = queries::get_booking(&db, &id)?
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?;

        lifecycle::mark_completed(&mut booking, now)?;
        queries::update_booking(&db, &booking)?;
        booking
    };

    tracing::info!(booking_id = %booking.id, "booking marked completed");

    Ok(Json(serde_json::json!({ "success": true, "booking": booking })))
}

// POST /bookings/:id/feedback
#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub rating: i32,
    #[serde(default)]
    pub comments: String,
}

pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<FeedbackRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = auth::require_user(&headers, &state.config.jwt_secret)?;
    let now = Utc::now().naive_utc();

    let booking = {
        let db = state.db.lock().unwrap();
        let mut booking = queries::get_booking(&db, &id)?
            .filter(|b| b.user_id == user.id)
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?;

        lifecycle::submit_feedback(&mut booking, body.rating, &body.comments, now)?;
        queries::update_booking(&db, &booking)?;
        booking
    };

    Ok(Json(serde_json::json!({ "success": true, "booking": booking })))
}
