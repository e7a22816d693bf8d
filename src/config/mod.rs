// Application and database configuration

pub mod app;
pub mod database;

pub use app::*;
pub use database::*;

use anyhow::{Context, Result};
use std::str::FromStr;

/// Read `key` through `lookup`, falling back to `default` when it is unset.
///
/// A value that is present but fails to parse is an error rather than a
/// silent fallback.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
