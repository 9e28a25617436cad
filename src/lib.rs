//! Art-discovery recommendation service.
//!
//! Recommends artworks similar to a reference work of an anchor artist, scored
//! by weighted attribute similarity and capped per artist for diversity.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{create_router, AppState};
