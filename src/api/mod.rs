//! API layer - HTTP handlers and routing
//!
//! It includes:
//! - Root greeting
//! - Item endpoints (path, query and body binding, catalog shaping)
//! - Model name endpoint (enum-constrained path)
//! - Offer and user endpoints (nested bodies, output models)
//! - Login form endpoint
//! - File upload endpoints

pub mod auth;
pub mod common;
pub mod extract;
pub mod items;
pub mod middleware;
pub mod model_names;
pub mod offers;
pub mod root;
pub mod upload;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Uri},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{ConfigError, ServerConfig};

pub use extract::{ValidForm, ValidJson, ValidPath, ValidQuery};
pub use middleware::{ApiError, AppState, FieldError};

/// Build the API routes
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .merge(root::router())
        .merge(items::router())
        .merge(model_names::router())
        .merge(offers::router())
        .merge(users::router())
        .merge(auth::router())
        .merge(upload::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, server: &ServerConfig) -> Result<Router, ConfigError> {
    let origin = server.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ConfigError::ValidationError(format!(
            "Invalid CORS origin '{}': {}",
            server.cors_origin, e
        ))
    })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    let body_limit = state.upload_config.body_limit();

    Ok(build_api_router()
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state))
}

/// Unknown routes get the same error envelope as everything else
async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
