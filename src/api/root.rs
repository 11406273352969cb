//! Root endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::AppState;

pub const GREETING: &str = "Hello cold world!";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(root))
}

/// GET / - Static greeting
async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: GREETING.to_string(),
    })
}
