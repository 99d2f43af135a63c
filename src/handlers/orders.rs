use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{CartItem, Order, OrderStatus, PaymentStatus};
use crate::state::AppState;

// POST /orders
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub cart_items: Vec<CartItem>,
    pub total_amount: i64,
    #[serde(default)]
    pub shipping: i64,
    pub address: String,
}

pub async fn create_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateOrderRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = auth::require_user(&headers, &state.config.jwt_secret)?;

    if body.cart_items.is_empty() {
        return Err(AppError::Validation("cartItems must not be empty".to_string()));
    }
    if body.total_amount <= 0 {
        return Err(AppError::Validation("totalAmount must be positive".to_string()));
    }
    if body.address.trim().is_empty() {
        return Err(AppError::Validation("address is required".to_string()));
    }

    let mut order = Order {
        id: format!("ORD{}", Uuid::new_v4().simple()),
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        user_email: user.email.clone(),
        items: body.cart_items,
        total_amount: body.total_amount,
        shipping: body.shipping,
        address: body.address,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        payment_order_id: None,
        created_at: Utc::now().naive_utc(),
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_order(&db, &order)?;
    }
    tracing::info!(order_id = %order.id, user_id = %user.id, "order created");

    // Product orders are charged in full up front, in paise.
    let gateway_order = state
        .payments
        .create_order(
            order.total_amount * 100,
            &order.id,
            serde_json::json!({ "orderId": order.id, "type": "product_order" }),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, order_id = %order.id, "payment order creation failed");
            AppError::Upstream("failed to create payment order".to_string())
        })?;

    order.payment_order_id = Some(gateway_order.id.clone());
    {
        let db = state.db.lock().unwrap();
        queries::update_order(&db, &order)?;
    }

    Ok(Json(serde_json::json!({
        "orderId": order.id,
        "order": order,
        "razorpayOrder": gateway_order,
    })))
}

// GET /orders
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = auth::require_user(&headers, &state.config.jwt_secret)?;

    let orders = {
        let db = state.db.lock().unwrap();
        queries::orders_for_user(&db, &user.id)?
    };

    Ok(Json(serde_json::json!({ "orders": orders })))
}
