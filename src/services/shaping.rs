//! Response shaping
//!
//! Filters the serialized form of a handler's return value before it is
//! sent. Three independent rules, all applied to top-level object fields:
//! - exclude unset: drop fields the input never provided
//! - include: keep only the named fields
//! - exclude: drop the named fields
//!
//! Non-object values pass through untouched.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use crate::models::Tracked;

/// Field filter applied to an outgoing JSON value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseShape {
    exclude_unset: bool,
    include: Option<BTreeSet<String>>,
    exclude: BTreeSet<String>,
}

impl ResponseShape {
    /// A shape that keeps every field
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop fields that were not present in the input
    pub fn exclude_unset(mut self) -> Self {
        self.exclude_unset = true;
        self
    }

    /// Keep only the given fields. Repeated calls widen the set.
    pub fn include<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include
            .get_or_insert_with(BTreeSet::new)
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Drop the given fields
    pub fn exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(fields.into_iter().map(Into::into));
        self
    }

    fn keeps(&self, field: &str, fields_set: Option<&BTreeSet<String>>) -> bool {
        if self.exclude.contains(field) {
            return false;
        }
        if let Some(include) = &self.include {
            if !include.contains(field) {
                return false;
            }
        }
        match (self.exclude_unset, fields_set) {
            (true, Some(set)) => set.contains(field),
            _ => true,
        }
    }

    /// Filter an already serialized value.
    ///
    /// `fields_set` is only consulted when exclude unset is on; passing
    /// `None` there means "everything counts as set".
    pub fn apply(&self, value: Value, fields_set: Option<&BTreeSet<String>>) -> Value {
        match value {
            Value::Object(mut map) => {
                map.retain(|field, _| self.keeps(field, fields_set));
                Value::Object(map)
            }
            other => other,
        }
    }

    /// Serialize a tracked value and filter it with its own field set.
    pub fn shape<T: Serialize>(&self, tracked: &Tracked<T>) -> Result<Value, serde_json::Error> {
        let value = serde_json::to_value(&tracked.value)?;
        Ok(self.apply(value, Some(&tracked.fields_set)))
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::Map;

    fn object_strategy() -> impl Strategy<Value = Map<String, Value>> {
        prop::collection::btree_map("[a-e]", any::<i32>(), 0..5).prop_map(|fields| {
            fields
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect()
        })
    }

    fn field_set_strategy() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set("[a-e]", 0..5)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Shaping never invents fields and never alters kept values.
        #[test]
        fn shaped_output_is_a_subset(
            object in object_strategy(),
            include in field_set_strategy(),
            exclude in field_set_strategy(),
            set in field_set_strategy(),
        ) {
            let shape = ResponseShape::new()
                .exclude_unset()
                .include(include.clone())
                .exclude(exclude.clone());
            let shaped = shape.apply(Value::Object(object.clone()), Some(&set));
            let shaped = shaped.as_object().unwrap();

            for (field, value) in shaped {
                prop_assert_eq!(object.get(field), Some(value));
                prop_assert!(include.contains(field));
                prop_assert!(!exclude.contains(field));
                prop_assert!(set.contains(field));
            }
        }

        /// Exclusion always wins over inclusion.
        #[test]
        fn excluded_fields_never_survive(
            object in object_strategy(),
            fields in field_set_strategy(),
        ) {
            let shape = ResponseShape::new().include(fields.clone()).exclude(fields.clone());
            let shaped = shape.apply(Value::Object(object), None);

            prop_assert!(shaped.as_object().unwrap().is_empty());
        }
    }
}
