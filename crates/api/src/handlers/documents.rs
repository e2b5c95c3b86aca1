//! Handlers for uploaded-document records.
//!
//! The file bytes live in external storage (out of scope); these
//! endpoints track the metadata rows the checklist merge joins against.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use visabuddy_core::checklist::validate_document_status;
use visabuddy_core::document_type::normalize_document_type;
use visabuddy_core::error::CoreError;
use visabuddy_core::types::DbId;
use visabuddy_db::models::user_document::{CreateUserDocument, ReviewUserDocument};
use visabuddy_db::repositories::UserDocumentRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::applications::ensure_application_access;
use crate::middleware::auth::{AdminUser, AuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for recording an upload.
#[derive(Debug, Deserialize)]
pub struct RecordDocumentRequest {
    /// Client-supplied document type; normalized before storage.
    pub document_type: String,
    pub file_url: Option<String>,
}

/// POST /api/v1/applications/{id}/documents
///
/// Record an uploaded document with status `pending`. The document type
/// is normalized at write time so the merge's join key is stable.
pub async fn record_document(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(application_id): Path<DbId>,
    Json(input): Json<RecordDocumentRequest>,
) -> AppResult<impl IntoResponse> {
    let application = ensure_application_access(&state, &auth, application_id).await?;

    if normalize_document_type(&input.document_type).is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "document_type must not be empty".into(),
        )));
    }

    let document = UserDocumentRepo::create(
        &state.pool,
        &CreateUserDocument {
            application_id: application.id,
            document_type: input.document_type,
            file_url: input.file_url,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        application_id = application.id,
        document_id = document.id,
        document_type = %document.document_type,
        "Document recorded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/v1/applications/{id}/documents
///
/// List all uploaded documents for an application, newest first. Every
/// row is returned, including older uploads shadowed by the merge.
pub async fn list_documents(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(application_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let application = ensure_application_access(&state, &auth, application_id).await?;
    let documents = UserDocumentRepo::list_for_application(&state.pool, application.id).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// Request body for a review decision.
#[derive(Debug, Deserialize)]
pub struct ReviewDocumentRequest {
    /// `verified` or `rejected`.
    pub status: String,
    pub verification_notes: Option<String>,
}

/// PUT /api/v1/documents/{id}/review
///
/// Record a review decision on a document (admin only). The next merged
/// checklist read reflects the new status.
pub async fn review_document(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewDocumentRequest>,
) -> AppResult<impl IntoResponse> {
    validate_document_status(&input.status)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let document = UserDocumentRepo::review(
        &state.pool,
        id,
        &ReviewUserDocument {
            status: input.status,
            verification_notes: input.verification_notes,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "UserDocument",
        id,
    }))?;

    tracing::info!(
        reviewer_id = admin.0.user_id,
        document_id = document.id,
        status = %document.status,
        "Document reviewed"
    );

    Ok(Json(DataResponse { data: document }))
}
