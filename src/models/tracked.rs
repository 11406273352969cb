//! Field-set tracking
//!
//! `Tracked<T>` deserializes like `T` but also remembers which wire fields
//! were present in the input object. Response shaping uses that set to tell
//! "not provided" apart from "provided with the default value".

use std::collections::BTreeSet;

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq)]
pub struct Tracked<T> {
    pub value: T,
    pub fields_set: BTreeSet<String>,
}

impl<T: DeserializeOwned> Tracked<T> {
    /// Bind a JSON value, recording its top-level keys.
    pub fn from_json(raw: Value) -> Result<Self, serde_json::Error> {
        let fields_set = match &raw {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => BTreeSet::new(),
        };
        let value = serde_json::from_value(raw)?;
        Ok(Self { value, fields_set })
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Tracked<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_json(raw).map_err(D::Error::custom)
    }
}

impl<T: Validate> Validate for Tracked<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.value.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use serde_json::json;

    #[test]
    fn test_tracked_records_present_keys() {
        let tracked: Tracked<Item> =
            serde_json::from_value(json!({"name": "Foo", "price": 50.2})).unwrap();

        assert!(tracked.fields_set.contains("name"));
        assert!(tracked.fields_set.contains("price"));
        assert!(!tracked.fields_set.contains("tags"));
        assert!(tracked.value.tags.is_empty());
    }

    #[test]
    fn test_tracked_keeps_explicit_defaults() {
        let tracked: Tracked<Item> = serde_json::from_value(json!({
            "name": "Baz",
            "description": null,
            "price": 50.2,
            "tags": []
        }))
        .unwrap();

        assert!(tracked.fields_set.contains("description"));
        assert!(tracked.fields_set.contains("tags"));
        assert_eq!(tracked.value.description, None);
    }

    #[test]
    fn test_tracked_propagates_shape_errors() {
        let result: Result<Tracked<Item>, _> = serde_json::from_value(json!({"name": "x"}));
        let err = result.unwrap_err().to_string();

        assert!(err.contains("price"));
    }

    #[test]
    fn test_tracked_delegates_validation() {
        let tracked: Tracked<Item> =
            serde_json::from_value(json!({"name": "x", "price": -1})).unwrap();

        assert!(tracked.validate().is_err());
    }
}
