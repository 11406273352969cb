//! Services layer
//!
//! Logic that sits behind the HTTP handlers:
//! - The read-only item catalog
//! - Response shaping (exclude unset, include/exclude)
//! - Password hashing for stored users

pub mod catalog;
pub mod password;
pub mod shaping;

pub use catalog::{CatalogError, ItemCatalog};
pub use password::hash_password;
pub use shaping::ResponseShape;
