//! Route definitions for the `/admin` consistency tooling.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET  /consistency                   -> consistency_report
/// POST /consistency/repair-approvals  -> repair_approvals
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/consistency", get(admin::consistency_report))
        .route(
            "/consistency/repair-approvals",
            post(admin::repair_approvals),
        )
}
