//! Item catalog
//!
//! A fixed, read-only table of items keyed by id. Records go through the
//! same `Tracked<Item>` binding and validation as request bodies, so each
//! record remembers which fields it actually sets.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use validator::Validate;

use crate::models::{Item, Tracked};

/// Error types for catalog construction
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid catalog record '{id}': {message}")]
    InvalidRecord { id: String, message: String },
}

/// Read-only item table
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: BTreeMap<String, Tracked<Item>>,
}

impl ItemCatalog {
    /// Build a catalog from raw JSON records.
    pub fn from_records<I, S>(records: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut items = BTreeMap::new();
        for (id, raw) in records {
            let id = id.into();
            let tracked = Tracked::<Item>::from_json(raw).map_err(|e| CatalogError::InvalidRecord {
                id: id.clone(),
                message: e.to_string(),
            })?;
            tracked.validate().map_err(|e| CatalogError::InvalidRecord {
                id: id.clone(),
                message: e.to_string(),
            })?;
            items.insert(id, tracked);
        }
        Ok(Self { items })
    }

    /// The built-in table served by `/items7` and `/items8`.
    pub fn seeded() -> Result<Self, CatalogError> {
        Self::from_records([
            ("foo", json!({"name": "Foo", "price": 50.2})),
            (
                "bar",
                json!({"name": "Bar", "description": "The bartenders", "price": 62, "tax": 20.2}),
            ),
            (
                "baz",
                json!({"name": "Baz", "description": null, "price": 50.2, "tax": 10.5, "tags": []}),
            ),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&Tracked<Item>> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
