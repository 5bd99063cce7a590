use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use redis::Client as RedisClient;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use messmate_api::{config::Config, db, middleware::auth::JwtSecret, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let redis_client = RedisClient::open(config.redis_url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_async_connection().await?;
    info!("Redis connected");

    let state = AppState {
        db: pool,
        redis: redis_conn,
        redis_client: redis_client.clone(),
        config: config.clone(),
    };

    // Build CORS: allow the configured app origin; localhost is always
    // allowed for local development.
    let base_url = config.app_base_url.clone();
    let cors_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
            return true;
        }
        o == base_url
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(cors_origin);

    let jwt_secret = JwtSecret(config.jwt_secret.clone());

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh_token))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me))
        // Menu
        .route("/menu", get(routes::menu::list_menu).post(routes::menu::create_menu_item))
        .route("/menu/{id}", put(routes::menu::update_menu_item).delete(routes::menu::delete_menu_item))
        // QR codes
        .route("/qr", post(routes::qr::issue_qr))
        .route("/qr/today", get(routes::qr::today_qr))
        // Attendance
        .route("/attendance", get(routes::attendance::list_all))
        .route("/attendance/scan", post(routes::attendance::scan))
        .route("/attendance/mine", get(routes::attendance::list_mine))
        .route("/attendance/summary", get(routes::attendance::summary))
        .route("/attendance/export", get(routes::attendance::export_csv))
        // Leave requests
        .route("/leaves", get(routes::leaves::list_all).post(routes::leaves::create_leave))
        .route("/leaves/mine", get(routes::leaves::list_mine))
        .route("/leaves/{id}/respond", post(routes::leaves::respond))
        // Feedback
        .route("/feedback", get(routes::feedback::list_all).post(routes::feedback::create_feedback))
        .route("/feedback/mine", get(routes::feedback::list_mine))
        .route("/feedback/{id}/respond", post(routes::feedback::respond))
        // Payments
        .route("/payments", get(routes::payments::list_all).post(routes::payments::submit_payment))
        .route("/payments/mine", get(routes::payments::list_mine))
        .route("/payments/{id}/verify", post(routes::payments::verify))
        // Users
        .route("/users", get(routes::users::list_users).post(routes::users::create_user))
        .route("/users/{id}", delete(routes::users::delete_user))
        // Stats
        .route("/stats/overview", get(routes::stats::overview))
        // Audit log
        .route("/audit", get(routes::audit_log::list_audit_log))
        // WebSocket live events
        .route("/ws", get(routes::events::ws_handler))
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("messmate API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
