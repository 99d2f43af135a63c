use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::auth;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Order, OrderStatus, PaymentStatus};
use crate::services::email::templates;
use crate::services::lifecycle::{self, Confirmation};
use crate::state::AppState;

// POST /payments/verify
#[derive(Deserialize)]
pub struct VerifyRequest {
    #[serde(rename = "bookingId")]
    pub booking_id: Option<String>,
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::require_user(&headers, &state.config.jwt_secret)?;

    if !state.payments.verify_signature(
        &body.razorpay_order_id,
        &body.razorpay_payment_id,
        &body.razorpay_signature,
    ) {
        return Err(AppError::InvalidSignature);
    }

    if let Some(booking_id) = &body.booking_id {
        let (booking, outcome) = confirm_booking(&state, booking_id)?;

        // Re-verification of an already-confirmed booking is a no-op and
        // must not resend the confirmation email.
        if outcome == Confirmation::Applied {
            send_best_effort(&state, templates::booking_confirmation(&booking)).await;
        }

        return Ok(Json(serde_json::json!({
            "success": true,
            "message": "Booking payment verified",
            "bookingId": booking_id,
        })));
    }

    if let Some(order_id) = &body.order_id {
        let (order, applied) = confirm_order(&state, order_id)?;

        if applied {
            send_best_effort(&state, templates::order_confirmation(&order)).await;
        }

        return Ok(Json(serde_json::json!({
            "success": true,
            "message": "Order payment verified",
            "orderId": order_id,
        })));
    }

    Err(AppError::Validation(
        "Missing bookingId or orderId".to_string(),
    ))
}

// POST /payments/webhook
//
// The gateway signs the raw body; whichever of webhook and checkout
// verification lands first confirms the record, the other is a no-op.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let signature = headers
        .get("x-razorpay-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !state.payments.verify_webhook(&body, signature) {
        tracing::warn!("webhook signature mismatch");
        return Err(AppError::InvalidSignature);
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|_| AppError::Validation("malformed webhook payload".to_string()))?;

    if event.event == "payment.captured" {
        let notes = event
            .payload
            .as_ref()
            .and_then(|p| p.payment.as_ref())
            .map(|p| &p.entity.notes);

        if let Some(notes) = notes {
            if let Some(booking_id) = &notes.booking_id {
                let (booking, outcome) = confirm_booking(&state, booking_id)?;
                if outcome == Confirmation::Applied {
                    send_best_effort(&state, templates::booking_confirmation(&booking)).await;
                }
            } else if let Some(order_id) = &notes.order_id {
                let (order, applied) = confirm_order(&state, order_id)?;
                if applied {
                    send_best_effort(&state, templates::order_confirmation(&order)).await;
                }
            }
        }
    } else {
        tracing::info!(event = %event.event, "ignoring webhook event");
    }

    Ok(Json(serde_json::json!({ "status": "ok" })))
}

#[derive(Deserialize)]
struct WebhookEvent {
    event: String,
    payload: Option<WebhookPayload>,
}

#[derive(Deserialize)]
struct WebhookPayload {
    payment: Option<WebhookPayment>,
}

#[derive(Deserialize)]
struct WebhookPayment {
    entity: WebhookPaymentEntity,
}

#[derive(Deserialize)]
struct WebhookPaymentEntity {
    #[serde(default)]
    notes: WebhookNotes,
}

#[derive(Deserialize, Default)]
struct WebhookNotes {
    #[serde(rename = "bookingId")]
    booking_id: Option<String>,
    #[serde(rename = "orderId")]
    order_id: Option<String>,
}

fn confirm_booking(
    state: &AppState,
    booking_id: &str,
) -> Result<(crate::models::Booking, Confirmation), AppError> {
    let db = state.db.lock().unwrap();
    let mut booking = queries::get_booking(&db, booking_id)?
        .ok_or_else(|| AppError::NotFound("booking".to_string()))?;

    let outcome = lifecycle::confirm_payment(&mut booking)?;
    if outcome == Confirmation::Applied {
        queries::update_booking(&db, &booking)?;
        tracing::info!(booking_id = %booking.id, "booking payment confirmed");
    }
    Ok((booking, outcome))
}

fn confirm_order(state: &AppState, order_id: &str) -> Result<(Order, bool), AppError> {
    let db = state.db.lock().unwrap();
    let mut order =
        queries::get_order(&db, order_id)?.ok_or_else(|| AppError::NotFound("order".to_string()))?;

    if order.status == OrderStatus::Confirmed && order.payment_status == PaymentStatus::Paid {
        return Ok((order, false));
    }

    order.status = OrderStatus::Confirmed;
    order.payment_status = PaymentStatus::Paid;
    queries::update_order(&db, &order)?;
    tracing::info!(order_id = %order.id, "order payment confirmed");
    Ok((order, true))
}

/// Confirmation mail is best-effort: the confirmed record is already
/// durable, so a send failure is logged and never fails the request.
async fn send_best_effort(state: &AppState, message: crate::services::email::EmailMessage) {
    if let Err(e) = state.email.send(&message).await {
        tracing::error!(error = %e, to = %message.to, "failed to send confirmation email");
    }
}
