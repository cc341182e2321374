use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use apostila_api::config::{self, AppConfig};
use apostila_api::database;
use apostila_api::error::ApiError;
use apostila_api::handlers::{apostilas, auth, me};
use apostila_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config::config();
    tracing::info!(environment = ?config.environment, "starting apostila api");

    // The health endpoint keeps reporting, so a late database is not fatal
    match database::health_check().await {
        Ok(()) => tracing::info!("database connection established"),
        Err(error) => tracing::warn!(%error, "database unavailable at startup"),
    }

    let app = app(config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("HTTP server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(config: &AppConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/v1/health", get(health))
        .merge(auth_routes())
        .merge(shared_routes())
        .merge(protected_routes())
        // Global middleware
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
}

fn auth_routes() -> Router {
    Router::new()
        .route("/v1/auth/register", post(auth::register))
        .route("/v1/auth/login", post(auth::login))
        .route("/v1/auth/logout", post(auth::logout))
}

/// Routes reachable without a token. Fetching a single apostila is public
/// so documents can be shared by link.
fn shared_routes() -> Router {
    Router::new().route("/v1/apostilas/:id", get(apostilas::show))
}

fn protected_routes() -> Router {
    Router::new()
        // Account management
        .route("/v1/me", get(me::show).delete(me::delete))
        .route("/v1/me/password", patch(me::change_password))
        // Apostila CRUD
        .route("/v1/apostilas", post(apostilas::create).get(apostilas::list))
        .route("/v1/apostilas/:id", delete(apostilas::delete))
        .route(
            "/v1/apostilas/:id/html",
            get(apostilas::html_show).put(apostilas::html_update),
        )
        // PDF export; render sits outside /v1/apostilas/ because a static
        // segment cannot share that position with the :id parameter
        .route("/v1/render", post(apostilas::render))
        .route("/v1/apostilas/:id/pdf", get(apostilas::pdf_export))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(300))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Apostila API",
            "version": version,
            "description": "Backend for the Apostilab educational document platform",
            "endpoints": {
                "health": "/v1/health (public)",
                "auth": "/v1/auth/register, /v1/auth/login, /v1/auth/logout (public)",
                "me": "/v1/me, /v1/me/password (protected)",
                "apostilas": "/v1/apostilas[/:id] (protected; GET /v1/apostilas/:id is public)",
                "export": "/v1/render, /v1/apostilas/:id/pdf (protected)",
            }
        }
    }))
}

async fn health() -> Response {
    let now = chrono::Utc::now();

    match database::health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        )
            .into_response(),
        Err(error) => {
            tracing::warn!(%error, "health check failed");
            ApiError::service_unavailable("database unavailable").into_response()
        }
    }
}
