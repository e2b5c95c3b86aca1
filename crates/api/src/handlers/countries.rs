//! Handlers for the `/countries` registry lookups.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use visabuddy_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/countries
///
/// List the supported countries with their canonical configuration.
pub async fn list_countries(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.countries.all().to_vec(),
    }))
}

/// GET /api/v1/countries/{code}
///
/// Resolve a code, alias, or name to a country configuration. Returns
/// 400 rather than 404 on a miss: the path segment is user input, not a
/// resource id.
pub async fn get_country(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let country = state.countries.resolve(&code).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "'{code}' does not resolve to a supported country"
        )))
    })?;
    Ok(Json(DataResponse {
        data: country.clone(),
    }))
}
