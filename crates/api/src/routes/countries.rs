//! Route definitions for the `/countries` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::countries;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET /countries         -> list_countries
/// GET /countries/{code}  -> get_country
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/countries", get(countries::list_countries))
        .route("/countries/{code}", get(countries::get_country))
}
