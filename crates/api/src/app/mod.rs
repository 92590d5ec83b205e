//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the shared ledger and its file store
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::path::Path;
use std::sync::Arc;

use axum::{http::Method, routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> Router {
    let services = Arc::new(AppServices::from_config(config));
    router(services, config.static_dir.as_deref())
}

/// Router over already-built services; static files are served from
/// `static_dir` for every path no API route claims.
pub fn router(services: Arc<AppServices>, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .layer(Extension(services));

    if let Some(dir) = static_dir {
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "static directory does not exist; static requests will 404");
        }
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}
