//! Shop Forecaster Library
//!
//! Predicts when a shop item will be cheapest for a given user by replaying
//! the storefront's deterministic hourly price randomization:
//! - Hash-derived per-user/per-item/per-hour pricing
//! - Best-time search until the shop closes
//! - Catalog loading and startup configuration
//! - JSON API over the above

pub mod api;
pub mod catalog;
pub mod config;
pub mod models;
pub mod services;
