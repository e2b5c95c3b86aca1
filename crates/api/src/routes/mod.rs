pub mod admin;
pub mod applications;
pub mod countries;
pub mod health;
pub mod visa_rules;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /applications                              list, create
/// /applications/{id}                         get
/// /applications/{id}/checklist               generate (POST), merged read (GET)
/// /applications/{id}/documents               record (POST), list (GET)
/// /documents/{id}/review                     review decision (PUT, admin)
///
/// /visa-rules                                list versions, create draft (admin)
/// /visa-rules/{id}                           get with items (admin)
/// /visa-rules/{id}/promote                   promote to approved (admin)
///
/// /countries                                 list registry
/// /countries/{code}                          resolve code/alias/name
///
/// /admin/consistency                         audit report (admin)
/// /admin/consistency/repair-approvals        demote stale approvals (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(applications::router())
        .merge(visa_rules::router())
        .merge(countries::router())
        .nest("/admin", admin::router())
}
