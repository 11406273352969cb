//! Item, Image and Offer models
//!
//! These are the request/response shapes behind the `/items` and `/offers`
//! endpoints. Field constraints are declared with `validator` and checked by
//! the binding extractors in `api::extract`.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Only http and https URLs are accepted for images.
static HTTP_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^\s/?#]+[^\s]*$").expect("valid http url pattern")
});

/// An item for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Item {
    /// Display name
    pub name: String,
    /// Optional long description
    #[serde(default)]
    #[validate(length(max = 300))]
    pub description: Option<String>,
    /// Price, strictly positive
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    /// Optional tax added on top of the price
    #[serde(default)]
    pub tax: Option<f64>,
    /// Unique tags, kept sorted
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Optional pictures of the item
    #[serde(default)]
    #[validate(nested)]
    pub images: Option<Vec<Image>>,
}

impl Item {
    /// Create an item with only the required fields set.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            tax: None,
            tags: BTreeSet::new(),
            images: None,
        }
    }

    /// Price including tax, if a tax is set.
    pub fn price_with_tax(&self) -> Option<f64> {
        self.tax.map(|tax| self.price + tax)
    }
}

/// A picture attached to an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Image {
    #[validate(url, regex(path = *HTTP_URL))]
    pub url: String,
    pub name: String,
}

/// A bundle of items sold together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Offer {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[validate(nested)]
    pub items: Vec<Item>,
}
