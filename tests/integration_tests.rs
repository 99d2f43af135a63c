use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower::ServiceExt;

use anandayojan::auth;
use anandayojan::config::AppConfig;
use anandayojan::db;
use anandayojan::handlers;
use anandayojan::services::email::mock::MockEmailProvider;
use anandayojan::services::email::EmailMessage;
use anandayojan::services::identity::mock::MockIdentityProvider;
use anandayojan::services::payments::mock::MockPaymentProvider;
use anandayojan::state::AppState;

const RAZORPAY_SECRET: &str = "test-razorpay-secret";
const WEBHOOK_SECRET: &str = "test-webhook-secret";

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3001,
        database_url: ":memory:".to_string(),
        jwt_secret: "test-jwt-secret".to_string(),
        admin_token: "test-admin-token".to_string(),
        frontend_base_url: "http://localhost:5173".to_string(),
        razorpay_key_id: "rzp_test".to_string(),
        razorpay_key_secret: RAZORPAY_SECRET.to_string(),
        razorpay_webhook_secret: WEBHOOK_SECRET.to_string(),
        sendgrid_api_key: String::new(),
        sendgrid_from_email: "noreply@anandayojan.com".to_string(),
        google_client_id: String::new(),
        use_mock: true,
    }
}

fn test_state() -> (Arc<AppState>, Arc<Mutex<Vec<EmailMessage>>>) {
    let config = test_config();
    let conn = db::init_db(":memory:").unwrap();
    let email = MockEmailProvider::new();
    let sent = email.sent_handle();

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config,
        payments: Box::new(MockPaymentProvider::new(
            RAZORPAY_SECRET.to_string(),
            WEBHOOK_SECRET.to_string(),
        )),
        email: Box::new(email),
        identity: Box::new(MockIdentityProvider),
    });
    (state, sent)
}

fn test_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/auth/google", post(handlers::auth::google))
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        .route("/bookings", post(handlers::bookings::create_booking))
        .route("/bookings", get(handlers::bookings::list_bookings))
        .route("/bookings/:id/cancel", post(handlers::bookings::cancel_booking))
        .route(
            "/bookings/:id/complete",
            post(handlers::bookings::complete_booking),
        )
        .route(
            "/bookings/:id/feedback",
            post(handlers::bookings::submit_feedback),
        )
        .route("/orders", post(handlers::orders::create_order))
        .route("/orders", get(handlers::orders::list_orders))
        .route("/payments/verify", post(handlers::payments::verify_payment))
        .route("/payments/webhook", post(handlers::payments::webhook))
        .route("/email/send", post(handlers::email::send_email))
        .with_state(state)
}

fn user_token(id: &str, email: &str, name: &str) -> String {
    auth::issue_token(id, email, name, "test-jwt-secret").unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn sign(secret: &str, message: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn booking_request(total_amount: i64, scheduled: chrono::NaiveDateTime) -> serde_json::Value {
    serde_json::json!({
        "serviceId": "mehndi",
        "serviceName": "Mehndi Artist",
        "packageId": "mehndi-bridal",
        "packageName": "Bridal",
        "preferredDate": scheduled.format("%Y-%m-%d").to_string(),
        "preferredTime": scheduled.format("%H:%M").to_string(),
        "totalAmount": total_amount,
        "phone": "+91 98765 43210",
        "city": "Mumbai",
        "pincode": "400001",
        "notes": "ground floor venue"
    })
}

/// Create a booking through the API and return (bookingId, gateway order id).
async fn create_booking(
    app: &Router,
    token: &str,
    total_amount: i64,
    hours_ahead: i64,
) -> (String, String) {
    let scheduled = Utc::now().naive_utc() + Duration::hours(hours_ahead);
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/bookings",
            Some(token),
            booking_request(total_amount, scheduled),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    (
        json["bookingId"].as_str().unwrap().to_string(),
        json["razorpayOrder"]["id"].as_str().unwrap().to_string(),
    )
}

async fn verify_payment(app: &Router, token: &str, booking_id: &str, order_id: &str) -> StatusCode {
    let signature = sign(RAZORPAY_SECRET, &format!("{order_id}|pay_test1"));
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/payments/verify",
            Some(token),
            serde_json::json!({
                "bookingId": booking_id,
                "razorpay_order_id": order_id,
                "razorpay_payment_id": "pay_test1",
                "razorpay_signature": signature,
            }),
        ))
        .await
        .unwrap();
    res.status()
}

async fn fetch_booking(app: &Router, token: &str, booking_id: &str) -> serde_json::Value {
    let res = app.clone().oneshot(get_request("/bookings", Some(token))).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    json["bookings"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["id"] == booking_id)
        .cloned()
        .expect("booking not in listing")
}

// ── Health & auth ──

#[tokio::test]
async fn health_reports_mock_mode() {
    let (state, _) = test_state();
    let app = test_app(state);

    let res = app.oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["mockMode"], true);
}

#[tokio::test]
async fn bookings_require_auth() {
    let (state, _) = test_state();
    let app = test_app(state);

    let res = app.clone().oneshot(get_request("/bookings", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .oneshot(get_request("/bookings", Some("not-a-valid-jwt")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_then_login() {
    let (state, _) = test_state();
    let app = test_app(state);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/signup",
            None,
            serde_json::json!({"email": "priya@example.com", "password": "secret123", "name": "Priya"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert!(json["token"].as_str().is_some());

    // Duplicate signup rejected.
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/signup",
            None,
            serde_json::json!({"email": "priya@example.com", "password": "secret123", "name": "Priya"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            serde_json::json!({"email": "priya@example.com", "password": "secret123"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let token = json["token"].as_str().unwrap();

    let res = app
        .clone()
        .oneshot(get_request("/auth/me", Some(token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["user"]["email"], "priya@example.com");

    // Wrong password.
    let res = app
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            serde_json::json!({"email": "priya@example.com", "password": "wrong-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn google_auth_with_mock_provider() {
    let (state, _) = test_state();
    let app = test_app(state);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/google",
            None,
            serde_json::json!({"idToken": "mock:rahul@example.com:Rahul Verma"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["user"]["email"], "rahul@example.com");
    assert!(json["token"].as_str().is_some());

    let res = app
        .oneshot(json_request(
            "POST",
            "/auth/google",
            None,
            serde_json::json!({"idToken": "garbage"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

// ── Booking creation ──

#[tokio::test]
async fn create_booking_computes_deposit() {
    let (state, _) = test_state();
    let app = test_app(state);
    let token = user_token("user-1", "priya@example.com", "Priya");

    let scheduled = Utc::now().naive_utc() + Duration::days(30);
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/bookings",
            Some(&token),
            booking_request(5000, scheduled),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;

    assert_eq!(json["booking"]["lockingAmount"], 500);
    assert_eq!(json["booking"]["totalAmount"], 5000);
    assert_eq!(json["booking"]["status"], "locked");
    assert_eq!(json["booking"]["paymentStatus"], "pending");
    assert_eq!(json["booking"]["refundStatus"], "none");
    // Gateway order is for the deposit, in paise.
    assert_eq!(json["razorpayOrder"]["amount"], 50000);
    assert_eq!(json["razorpayOrder"]["currency"], "INR");
}

#[tokio::test]
async fn create_booking_rejects_malformed_input() {
    let (state, _) = test_state();
    let app = test_app(state);
    let token = user_token("user-1", "priya@example.com", "Priya");

    let scheduled = Utc::now().naive_utc() + Duration::days(30);

    let mut bad_date = booking_request(5000, scheduled);
    bad_date["preferredDate"] = serde_json::json!("15-10-2025");
    let res = app
        .clone()
        .oneshot(json_request("POST", "/bookings", Some(&token), bad_date))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut bad_amount = booking_request(5000, scheduled);
    bad_amount["totalAmount"] = serde_json::json!(0);
    let res = app
        .clone()
        .oneshot(json_request("POST", "/bookings", Some(&token), bad_amount))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut missing_city = booking_request(5000, scheduled);
    missing_city["city"] = serde_json::json!("");
    let res = app
        .oneshot(json_request("POST", "/bookings", Some(&token), missing_city))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_is_scoped_to_owner() {
    let (state, _) = test_state();
    let app = test_app(state);
    let token_a = user_token("user-a", "a@example.com", "A");
    let token_b = user_token("user-b", "b@example.com", "B");

    let (id_a, _) = create_booking(&app, &token_a, 5000, 48).await;
    create_booking(&app, &token_b, 9000, 48).await;

    let res = app.clone().oneshot(get_request("/bookings", Some(&token_a))).await.unwrap();
    let json = body_json(res).await;
    let bookings = json["bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["id"], id_a);
}

// ── Cancellation ──

#[tokio::test]
async fn cancel_inside_cutoff_is_rejected() {
    let (state, _) = test_state();
    let app = test_app(state);
    let token = user_token("user-1", "priya@example.com", "Priya");

    // 5h59m ahead: under the 6 hour cutoff.
    let scheduled = Utc::now().naive_utc() + Duration::minutes(5 * 60 + 59);
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/bookings",
            Some(&token),
            booking_request(5000, scheduled),
        ))
        .await
        .unwrap();
    let json = body_json(res).await;
    let id = json["bookingId"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/bookings/{id}/cancel"),
            Some(&token),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Record untouched.
    let booking = fetch_booking(&app, &token, &id).await;
    assert_eq!(booking["status"], "locked");
    assert_eq!(booking["refundStatus"], "none");
    assert_eq!(booking["paymentStatus"], "pending");
}

#[tokio::test]
async fn cancel_outside_cutoff_succeeds() {
    let (state, _) = test_state();
    let app = test_app(state);
    let token = user_token("user-1", "priya@example.com", "Priya");

    let (id, _) = create_booking(&app, &token, 5000, 7).await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/bookings/{id}/cancel"),
            Some(&token),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["booking"]["status"], "cancelled");
    assert_eq!(json["booking"]["refundStatus"], "processing");
    assert_eq!(json["booking"]["paymentStatus"], "refunded");
    assert!(json["booking"]["cancelledAt"].as_str().is_some());

    // Terminal: a second cancel is an invalid transition.
    let res = app
        .oneshot(json_request(
            "POST",
            &format!("/bookings/{id}/cancel"),
            Some(&token),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn cancel_requires_ownership() {
    let (state, _) = test_state();
    let app = test_app(state);
    let owner = user_token("user-a", "a@example.com", "A");
    let stranger = user_token("user-b", "b@example.com", "B");

    let (id, _) = create_booking(&app, &owner, 5000, 48).await;

    let res = app
        .oneshot(json_request(
            "POST",
            &format!("/bookings/{id}/cancel"),
            Some(&stranger),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// ── Payment verification ──

#[tokio::test]
async fn verify_payment_confirms_booking() {
    let (state, sent) = test_state();
    let app = test_app(state);
    let token = user_token("user-1", "priya@example.com", "Priya");

    let (id, order_id) = create_booking(&app, &token, 5000, 48).await;

    let status = verify_payment(&app, &token, &id, &order_id).await;
    assert_eq!(status, StatusCode::OK);

    let booking = fetch_booking(&app, &token, &id).await;
    assert_eq!(booking["status"], "confirmed");
    assert_eq!(booking["paymentStatus"], "paid");

    // Confirmation email went to the customer.
    let emails = sent.lock().unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].to, "priya@example.com");
    assert!(emails[0].subject.contains(&id));
}

#[tokio::test]
async fn verify_payment_rejects_bad_signature() {
    let (state, sent) = test_state();
    let app = test_app(state);
    let token = user_token("user-1", "priya@example.com", "Priya");

    let (id, order_id) = create_booking(&app, &token, 5000, 48).await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/payments/verify",
            Some(&token),
            serde_json::json!({
                "bookingId": id,
                "razorpay_order_id": order_id,
                "razorpay_payment_id": "pay_test1",
                "razorpay_signature": "deadbeef",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = body_json(res).await;
    // Generic message, no signature material echoed back.
    assert_eq!(json["error"], "Invalid payment signature");

    let booking = fetch_booking(&app, &token, &id).await;
    assert_eq!(booking["status"], "locked");
    assert_eq!(booking["paymentStatus"], "pending");
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn verify_payment_twice_is_idempotent() {
    let (state, sent) = test_state();
    let app = test_app(state);
    let token = user_token("user-1", "priya@example.com", "Priya");

    let (id, order_id) = create_booking(&app, &token, 5000, 48).await;

    assert_eq!(verify_payment(&app, &token, &id, &order_id).await, StatusCode::OK);
    assert_eq!(verify_payment(&app, &token, &id, &order_id).await, StatusCode::OK);

    let booking = fetch_booking(&app, &token, &id).await;
    assert_eq!(booking["status"], "confirmed");
    assert_eq!(booking["paymentStatus"], "paid");

    // No duplicate confirmation email.
    assert_eq!(sent.lock().unwrap().len(), 1);
}

// ── Completion & feedback ──

#[tokio::test]
async fn complete_then_feedback_once() {
    let (state, _) = test_state();
    let app = test_app(state);
    let token = user_token("user-1", "priya@example.com", "Priya");

    let (id, order_id) = create_booking(&app, &token, 5000, 48).await;
    verify_payment(&app, &token, &id, &order_id).await;

    // Completion is operator-only: a user JWT is not enough.
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/bookings/{id}/complete"),
            Some(&token),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/bookings/{id}/complete"),
            Some("test-admin-token"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["booking"]["status"], "completed");
    assert!(json["booking"]["completedAt"].as_str().is_some());

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/bookings/{id}/feedback"),
            Some(&token),
            serde_json::json!({"rating": 5, "comments": "great"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Second submission rejected, original preserved.
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/bookings/{id}/feedback"),
            Some(&token),
            serde_json::json!({"rating": 1, "comments": "changed my mind"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let booking = fetch_booking(&app, &token, &id).await;
    assert_eq!(booking["feedback"]["rating"], 5);
    assert_eq!(booking["feedback"]["comments"], "great");
}

#[tokio::test]
async fn feedback_requires_completed_booking() {
    let (state, _) = test_state();
    let app = test_app(state);
    let token = user_token("user-1", "priya@example.com", "Priya");

    let (id, _) = create_booking(&app, &token, 5000, 48).await;

    let res = app
        .oneshot(json_request(
            "POST",
            &format!("/bookings/{id}/feedback"),
            Some(&token),
            serde_json::json!({"rating": 5, "comments": "great"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

// ── Webhook ──

#[tokio::test]
async fn webhook_confirms_booking() {
    let (state, sent) = test_state();
    let app = test_app(state);
    let token = user_token("user-1", "priya@example.com", "Priya");

    let (id, _) = create_booking(&app, &token, 5000, 48).await;

    let payload = serde_json::json!({
        "event": "payment.captured",
        "payload": {
            "payment": {
                "entity": {
                    "id": "pay_webhook1",
                    "notes": { "bookingId": id, "type": "booking_lock" }
                }
            }
        }
    })
    .to_string();
    let signature = sign(WEBHOOK_SECRET, &payload);

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/payments/webhook")
                .header("Content-Type", "application/json")
                .header("x-razorpay-signature", signature)
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["status"], "ok");

    let booking = fetch_booking(&app, &token, &id).await;
    assert_eq!(booking["status"], "confirmed");
    assert_eq!(booking["paymentStatus"], "paid");
    assert_eq!(sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn webhook_rejects_bad_signature() {
    let (state, _) = test_state();
    let app = test_app(state);

    let payload = serde_json::json!({"event": "payment.captured"}).to_string();
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/payments/webhook")
                .header("Content-Type", "application/json")
                .header("x-razorpay-signature", "deadbeef")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

// ── Orders ──

#[tokio::test]
async fn order_create_verify_and_list() {
    let (state, sent) = test_state();
    let app = test_app(state);
    let token = user_token("user-1", "rahul@example.com", "Rahul");

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/orders",
            Some(&token),
            serde_json::json!({
                "cartItems": [
                    {"id": "diya-set", "name": "Brass Diya Set", "price": 799, "quantity": 2}
                ],
                "totalAmount": 1598,
                "shipping": 49,
                "address": "12 MG Road, Delhi"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let order_id = json["orderId"].as_str().unwrap().to_string();
    let gateway_order = json["razorpayOrder"]["id"].as_str().unwrap().to_string();
    assert_eq!(json["order"]["status"], "pending");
    // Full amount in paise.
    assert_eq!(json["razorpayOrder"]["amount"], 159_800);

    let signature = sign(RAZORPAY_SECRET, &format!("{gateway_order}|pay_test2"));
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/payments/verify",
            Some(&token),
            serde_json::json!({
                "orderId": order_id,
                "razorpay_order_id": gateway_order,
                "razorpay_payment_id": "pay_test2",
                "razorpay_signature": signature,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.clone().oneshot(get_request("/orders", Some(&token))).await.unwrap();
    let json = body_json(res).await;
    let orders = json["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["status"], "confirmed");
    assert_eq!(orders[0]["paymentStatus"], "paid");
    assert_eq!(sent.lock().unwrap().len(), 1);
}

// ── Email passthrough ──

#[tokio::test]
async fn email_send_requires_fields() {
    let (state, sent) = test_state();
    let app = test_app(state);
    let token = user_token("user-1", "priya@example.com", "Priya");

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/email/send",
            Some(&token),
            serde_json::json!({"to": "x@example.com", "subject": "", "html": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .oneshot(json_request(
            "POST",
            "/email/send",
            Some(&token),
            serde_json::json!({
                "to": "x@example.com",
                "subject": "Hello",
                "html": "<p>Hi</p>",
                "text": "Hi"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(sent.lock().unwrap().len(), 1);
}
