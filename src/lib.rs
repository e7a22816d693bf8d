//! Authenticated CRUD service for strength-training workouts.
//!
//! Requests flow through [`api`] handlers into [`services`], which validate
//! and authorize them before calling the [`repositories`] ports. The
//! PostgreSQL adapters live next to the ports; tests substitute their own.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod services;
pub mod telemetry;

pub use api::routes::{create_routes, AppState};
