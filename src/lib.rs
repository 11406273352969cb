//! coldapi - typed parameter binding and response shaping over HTTP
//!
//! This library provides the router, models and services; `main.rs` only
//! loads configuration and serves the router.

pub mod api;
pub mod config;
pub mod models;
pub mod services;
