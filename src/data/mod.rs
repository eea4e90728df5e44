//! External collaborators: the observation store and the conversational backend.
//!
//! Both are plain blocking HTTP clients configured from the environment
//! (`.env` is honored). Neither retries; retry policy belongs to the caller.

pub mod assistant;
pub mod store;

pub use assistant::*;
pub use store::*;

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::AppError;

pub const TIMEOUT_VAR: &str = "TRENDS_TIMEOUT_SECS";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Read a required base URL from the environment.
pub(crate) fn env_base_url(var: &str) -> Result<String, AppError> {
    dotenvy::dotenv().ok();
    let raw = std::env::var(var).map_err(|_| AppError::new(2, format!("Missing {var} in environment (.env).")))?;
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::new(2, format!("{var} is empty.")));
    }
    Ok(trimmed.to_string())
}

/// Shared HTTP client honoring `TRENDS_TIMEOUT_SECS`.
pub(crate) fn http_client() -> Result<Client, AppError> {
    let secs = match std::env::var(TIMEOUT_VAR) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| AppError::new(2, format!("{TIMEOUT_VAR} must be a whole number of seconds.")))?,
        Err(_) => DEFAULT_TIMEOUT_SECS,
    };
    Client::builder()
        .timeout(Duration::from_secs(secs))
        .build()
        .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))
}
