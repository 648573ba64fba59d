use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use enrollment_payments::config::AppConfig;
use enrollment_payments::gateways::stripe::StripeGateway;
use enrollment_payments::repo::courses_repo::CoursesRepo;
use enrollment_payments::repo::payments_repo::PaymentsRepo;
use enrollment_payments::service::enrollment_service::EnrollmentService;
use enrollment_payments::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    if cfg.stripe_secret_key.is_empty() {
        tracing::warn!("STRIPE_SECRET_KEY is empty; gateway calls will be rejected");
    }
    if cfg.webhook_signing_secret.is_empty() {
        tracing::warn!("STRIPE_WEBHOOK_SECRET is empty; all webhooks will be rejected");
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let courses_repo = CoursesRepo { pool: pool.clone() };
    let payments_repo = PaymentsRepo { pool: pool.clone() };
    let gateway = Arc::new(StripeGateway {
        base_url: cfg.stripe_base_url.clone(),
        secret_key: cfg.stripe_secret_key.clone(),
        timeout_ms: cfg.gateway_timeout_ms,
        client: reqwest::Client::new(),
    });

    let enrollment_service = EnrollmentService {
        courses_repo: Arc::new(courses_repo),
        payments_repo: Arc::new(payments_repo.clone()),
        gateway,
    };

    let state = AppState {
        enrollment_service,
        payments_repo,
        webhook_signing_secret: cfg.webhook_signing_secret.clone(),
        webhook_tolerance_seconds: cfg.webhook_tolerance_seconds,
    };

    let admin_key = cfg.internal_api_key.clone();
    let admin_routes = Router::new()
        .route(
            "/payments",
            get(enrollment_payments::http::handlers::payments::list_payments),
        )
        .route(
            "/payments/stats/overview",
            get(enrollment_payments::http::handlers::payments::stats_overview),
        )
        .route(
            "/payments/:payment_id",
            get(enrollment_payments::http::handlers::payments::get_payment),
        )
        .route(
            "/payments/:payment_id/refund",
            post(enrollment_payments::http::handlers::payments::refund_payment),
        )
        .layer(from_fn_with_state(
            admin_key,
            enrollment_payments::http::middleware::admin_auth::require_internal_api_key,
        ));

    let app = Router::new()
        .route("/health", get(enrollment_payments::http::handlers::payments::health))
        .route(
            "/payments/create-payment-intent",
            post(enrollment_payments::http::handlers::payments::create_payment_intent),
        )
        .route(
            "/payments/confirm-payment",
            post(enrollment_payments::http::handlers::payments::confirm_payment),
        )
        .route(
            "/payments/webhook",
            post(enrollment_payments::http::handlers::webhook::handle_gateway_webhook),
        )
        .merge(admin_routes)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
