//! Model name endpoint
//!
//! GET /models/{model_name} only accepts members of `ModelName`; anything
//! else is rejected during path binding.

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::extract::ValidPath;
use crate::api::middleware::AppState;
use crate::models::ModelName;

#[derive(Debug, Deserialize, Validate)]
pub struct ModelNamePath {
    pub model_name: ModelName,
}

/// Response carrying a framework recommendation
#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub model_name: ModelName,
    pub message: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/models/{model_name}", get(get_model))
}

/// Framework recommendation for a language
pub fn recommendation(model_name: ModelName) -> &'static str {
    match model_name {
        ModelName::Java => "Java devs love Spring Boot",
        ModelName::Php => "PHP devs love Laravel",
        // Default branch
        ModelName::Python => "Pick any framework you like",
    }
}

/// GET /models/{model_name}
async fn get_model(ValidPath(path): ValidPath<ModelNamePath>) -> Json<ModelResponse> {
    Json(ModelResponse {
        model_name: path.model_name,
        message: recommendation(path.model_name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendations_are_distinct() {
        let java = recommendation(ModelName::Java);
        let php = recommendation(ModelName::Php);
        let python = recommendation(ModelName::Python);

        assert!(java.contains("Spring Boot"));
        assert!(php.contains("Laravel"));
        assert_ne!(python, java);
        assert_ne!(python, php);
    }
}
