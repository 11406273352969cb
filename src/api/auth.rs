//! Login endpoint
//!
//! POST /login/ takes URL-encoded form credentials and echoes the username
//! with HTTP 201. No session is created.

use axum::{http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::extract::ValidForm;
use crate::api::middleware::AppState;

/// Form body for login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/login/", post(login))
}

/// POST /login/
async fn login(ValidForm(form): ValidForm<LoginForm>) -> (StatusCode, Json<LoginResponse>) {
    tracing::info!(username = %form.username, "Login form received");
    (
        StatusCode::CREATED,
        Json(LoginResponse {
            username: form.username,
        }),
    )
}
