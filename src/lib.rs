//! Catalogd - a product catalog HTTP service
//!
//! Catalogd exposes a small REST surface over a single `product` table:
//! - CRUD endpoints under `/products`
//! - fixed plain-text and JSON endpoints
//! - an HTML page listing the catalog
//!
//! All persistence goes through [`store::ProductStore`]; the bundled
//! implementation runs on sqlx and accepts SQLite or PostgreSQL connection
//! strings.

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use error::{Error, Result};
