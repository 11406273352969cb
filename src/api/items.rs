//! Item API endpoints
//!
//! Handles HTTP requests for items:
//! - GET /items/{item_id} - Echo an item id with optional query values
//! - GET /items/ - Query-validated search stub
//! - POST /items/ - Create an item, computing the taxed price
//! - PUT /items/{item_id} - Update an item by bounded integer id
//! - GET /items7/{item_id} - Catalog record, unset fields omitted
//! - GET /items8/{item_id}/name - Catalog record, name and description only
//! - GET /items8/{item_id}/public - Catalog record without tax

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::api::common::{deserialize_flag, non_empty};
use crate::api::extract::{ValidJson, ValidPath, ValidQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::models::Item;
use crate::services::ResponseShape;

/// Text appended to items unless the client asks for the short form
pub const LONG_DESCRIPTION: &str = "This is an amazing item that has a long description";

/// Word characters, spaces and dashes
static SEARCH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\- ]+$").expect("valid search pattern"));

/// Path parameters for item echo and catalog lookups
#[derive(Debug, Deserialize, Validate)]
pub struct ItemKeyPath {
    pub item_id: String,
}

/// Path parameters for item updates
#[derive(Debug, Deserialize, Validate)]
pub struct ItemIdPath {
    #[validate(range(min = 0, max = 1000))]
    pub item_id: i64,
}

/// Query parameters for reading a single item
#[derive(Debug, Deserialize, Validate)]
pub struct ReadItemQuery {
    #[serde(default)]
    pub q: Option<String>,
    /// If true, leave out the long description
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub short: bool,
}

/// Query parameters for the search stub
#[derive(Debug, Deserialize, Validate)]
pub struct SearchItemsQuery {
    #[serde(rename = "item-query", default)]
    #[validate(length(min = 3, max = 50), regex(path = *SEARCH_PATTERN))]
    pub q: Option<String>,
}

/// Query parameters for item updates
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Response for a single item echo
#[derive(Debug, Serialize)]
pub struct ReadItemResponse {
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Entry of the search stub
#[derive(Debug, Serialize)]
pub struct ItemRef {
    pub item_id: String,
}

/// Response for the search stub
#[derive(Debug, Serialize)]
pub struct SearchItemsResponse {
    pub items: Vec<ItemRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

/// Response for a created item
#[derive(Debug, Serialize)]
pub struct CreateItemResponse {
    #[serde(flatten)]
    pub item: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_with_tax: Option<f64>,
}

impl From<Item> for CreateItemResponse {
    fn from(item: Item) -> Self {
        Self {
            price_with_tax: item.price_with_tax(),
            item,
        }
    }
}

/// Response for an updated item
#[derive(Debug, Serialize)]
pub struct UpdateItemResponse {
    pub item_id: i64,
    #[serde(flatten)]
    pub item: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

/// Build the items router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items/", get(search_items).post(create_item))
        .route("/items/{item_id}", get(read_item).put(update_item))
        .route("/items7/{item_id}", get(read_item_unset_excluded))
        .route("/items8/{item_id}/name", get(read_item_name))
        .route("/items8/{item_id}/public", get(read_item_public))
}

/// GET /items/{item_id}
async fn read_item(
    ValidPath(path): ValidPath<ItemKeyPath>,
    ValidQuery(query): ValidQuery<ReadItemQuery>,
) -> Json<ReadItemResponse> {
    Json(ReadItemResponse {
        item_id: path.item_id,
        q: non_empty(query.q),
        description: (!query.short).then(|| LONG_DESCRIPTION.to_string()),
    })
}

/// GET /items/ - Search stub with a validated, renamed query parameter
async fn search_items(
    ValidQuery(query): ValidQuery<SearchItemsQuery>,
) -> Json<SearchItemsResponse> {
    let items = ["Foo", "Bar"]
        .into_iter()
        .map(|id| ItemRef { item_id: id.to_string() })
        .collect();

    Json(SearchItemsResponse {
        items,
        q: non_empty(query.q),
    })
}

/// POST /items/
async fn create_item(ValidJson(item): ValidJson<Item>) -> Json<CreateItemResponse> {
    tracing::info!(name = %item.name, price = item.price, "Item received");
    Json(CreateItemResponse::from(item))
}

/// PUT /items/{item_id}
async fn update_item(
    ValidPath(path): ValidPath<ItemIdPath>,
    ValidQuery(query): ValidQuery<UpdateItemQuery>,
    ValidJson(item): ValidJson<Item>,
) -> Json<UpdateItemResponse> {
    tracing::info!(item_id = path.item_id, name = %item.name, "Item updated");
    Json(UpdateItemResponse {
        item_id: path.item_id,
        item,
        q: non_empty(query.q),
    })
}

/// GET /items7/{item_id} - Only the fields the record actually sets
async fn read_item_unset_excluded(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<ItemKeyPath>,
) -> Result<Json<Value>, ApiError> {
    shaped_catalog_item(&state, &path.item_id, &ResponseShape::new().exclude_unset())
}

/// GET /items8/{item_id}/name
async fn read_item_name(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<ItemKeyPath>,
) -> Result<Json<Value>, ApiError> {
    shaped_catalog_item(
        &state,
        &path.item_id,
        &ResponseShape::new().include(["name", "description"]),
    )
}

/// GET /items8/{item_id}/public
async fn read_item_public(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<ItemKeyPath>,
) -> Result<Json<Value>, ApiError> {
    shaped_catalog_item(&state, &path.item_id, &ResponseShape::new().exclude(["tax"]))
}

fn shaped_catalog_item(
    state: &AppState,
    item_id: &str,
    shape: &ResponseShape,
) -> Result<Json<Value>, ApiError> {
    let item = state
        .catalog
        .get(item_id)
        .ok_or_else(|| ApiError::not_found(format!("Item not found: {}", item_id)))?;

    let value = shape
        .shape(item)
        .map_err(|e| ApiError::internal_error(format!("Failed to serialize item: {}", e)))?;

    Ok(Json(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_item_response_flattens_item() {
        let mut item = Item::new("A", 10.0);
        item.tax = Some(2.0);

        let value = serde_json::to_value(CreateItemResponse::from(item)).unwrap();

        assert_eq!(value["name"], "A");
        assert_eq!(value["price_with_tax"].as_f64(), Some(12.0));
    }

    #[test]
    fn test_create_item_response_without_tax() {
        let value = serde_json::to_value(CreateItemResponse::from(Item::new("A", 10.0))).unwrap();

        assert!(value.get("price_with_tax").is_none());
    }

    #[test]
    fn test_search_query_constraints() {
        let ok = SearchItemsQuery { q: Some("fixed query".to_string()) };
        assert!(ok.validate().is_ok());

        let short = SearchItemsQuery { q: Some("ab".to_string()) };
        assert!(short.validate().is_err());

        let symbols = SearchItemsQuery { q: Some("drop table;".to_string()) };
        assert!(symbols.validate().is_err());

        let absent = SearchItemsQuery { q: None };
        assert!(absent.validate().is_ok());
    }

    #[test]
    fn test_item_id_bounds() {
        assert!(ItemIdPath { item_id: 0 }.validate().is_ok());
        assert!(ItemIdPath { item_id: 1000 }.validate().is_ok());
        assert!(ItemIdPath { item_id: -1 }.validate().is_err());
        assert!(ItemIdPath { item_id: 1001 }.validate().is_err());
    }

    #[test]
    fn test_read_item_response_skips_empty_fields() {
        let value = serde_json::to_value(ReadItemResponse {
            item_id: "5".to_string(),
            q: None,
            description: None,
        })
        .unwrap();

        assert_eq!(value, json!({"item_id": "5"}));
    }
}
