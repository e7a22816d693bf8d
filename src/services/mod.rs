// Business rules sitting between the HTTP handlers and the repositories

pub mod workout_service;

pub use workout_service::*;
