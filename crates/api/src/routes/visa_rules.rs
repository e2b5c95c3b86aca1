//! Route definitions for the `/visa-rules` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::visa_rules;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET    /visa-rules              -> list_rule_sets  (?country_code, ?visa_type)
/// POST   /visa-rules              -> create_rule_set (draft)
/// GET    /visa-rules/{id}         -> get_rule_set
/// POST   /visa-rules/{id}/promote -> promote_rule_set
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/visa-rules",
            get(visa_rules::list_rule_sets).post(visa_rules::create_rule_set),
        )
        .route("/visa-rules/{id}", get(visa_rules::get_rule_set))
        .route("/visa-rules/{id}/promote", post(visa_rules::promote_rule_set))
}
