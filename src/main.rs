use std::sync::{Arc, Mutex};

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use anandayojan::config::AppConfig;
use anandayojan::db;
use anandayojan::handlers;
use anandayojan::services::email::mock::MockEmailProvider;
use anandayojan::services::email::sendgrid::SendGridProvider;
use anandayojan::services::email::EmailProvider;
use anandayojan::services::identity::google::GoogleIdentityProvider;
use anandayojan::services::identity::mock::MockIdentityProvider;
use anandayojan::services::identity::IdentityProvider;
use anandayojan::services::payments::mock::MockPaymentProvider;
use anandayojan::services::payments::razorpay::RazorpayProvider;
use anandayojan::services::payments::PaymentProvider;
use anandayojan::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let (payments, email, identity): (
        Box<dyn PaymentProvider>,
        Box<dyn EmailProvider>,
        Box<dyn IdentityProvider>,
    ) = if config.use_mock {
        tracing::info!("mock mode enabled, using deterministic fakes for all collaborators");
        (
            Box::new(MockPaymentProvider::new(
                config.razorpay_key_secret.clone(),
                config.razorpay_webhook_secret.clone(),
            )),
            Box::new(MockEmailProvider::new()),
            Box::new(MockIdentityProvider),
        )
    } else {
        anyhow::ensure!(
            !config.razorpay_key_id.is_empty() && !config.razorpay_key_secret.is_empty(),
            "RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET must be set when USE_MOCK is not true"
        );
        (
            Box::new(RazorpayProvider::new(
                config.razorpay_key_id.clone(),
                config.razorpay_key_secret.clone(),
                config.razorpay_webhook_secret.clone(),
            )),
            Box::new(SendGridProvider::new(
                config.sendgrid_api_key.clone(),
                config.sendgrid_from_email.clone(),
            )),
            Box::new(GoogleIdentityProvider::new(config.google_client_id.clone())),
        )
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        payments,
        email,
        identity,
    });

    let cors = CorsLayer::new()
        .allow_origin(config.frontend_base_url.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let app = Router::new()
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
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
