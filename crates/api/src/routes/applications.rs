//! Route definitions for the `/applications` and `/documents` resources.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{applications, checklist, documents};
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET    /applications                    -> list_applications
/// POST   /applications                    -> create_application
/// GET    /applications/{id}               -> get_application
/// POST   /applications/{id}/checklist     -> generate_checklist
/// GET    /applications/{id}/checklist     -> get_merged_checklist
/// POST   /applications/{id}/documents     -> record_document
/// GET    /applications/{id}/documents     -> list_documents
/// PUT    /documents/{id}/review           -> review_document  (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route("/applications/{id}", get(applications::get_application))
        .route(
            "/applications/{id}/checklist",
            post(checklist::generate_checklist).get(checklist::get_merged_checklist),
        )
        .route(
            "/applications/{id}/documents",
            post(documents::record_document).get(documents::list_documents),
        )
        .route("/documents/{id}/review", put(documents::review_document))
}
