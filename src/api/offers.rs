//! Offer endpoint

use axum::{routing::post, Json, Router};

use crate::api::extract::ValidJson;
use crate::api::middleware::AppState;
use crate::models::Offer;

pub fn router() -> Router<AppState> {
    Router::new().route("/offers/", post(create_offer))
}

/// POST /offers/ - Echo a validated offer with its nested items
async fn create_offer(ValidJson(offer): ValidJson<Offer>) -> Json<Offer> {
    tracing::info!(name = %offer.name, items = offer.items.len(), "Offer received");
    Json(offer)
}
