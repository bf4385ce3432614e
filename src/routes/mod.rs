/**
 * Routes Module
 * HTTP handlers; each one parses its parameters, calls the use-case layer
 * and renders the result.
 */

pub mod advertisement;
pub mod health;
pub mod profile;
pub mod user;

use crate::error::AppError;
use crate::usecase::Usecase;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub usecase: Usecase,
}

impl AppState {
    pub fn new(usecase: Usecase) -> Self {
        Self { usecase }
    }
}

/// Parse a numeric id from a query parameter. Ids past the BIGINT range
/// cannot exist and are rejected as invalid.
pub(crate) fn parse_id(raw: Option<&str>) -> Result<u64, AppError> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|id| *id <= i64::MAX as u64)
        .ok_or(AppError::InvalidParams)
}
