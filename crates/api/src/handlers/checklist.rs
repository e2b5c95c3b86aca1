//! Handlers for checklist generation and the merged checklist read.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use visabuddy_core::checklist::{merge_checklist, ChecklistItem};
use visabuddy_core::error::CoreError;
use visabuddy_core::profile::ApplicantProfile;
use visabuddy_core::types::{DbId, Timestamp};
use visabuddy_db::repositories::{DocumentChecklistRepo, UserDocumentRepo};

use crate::engine::generator;
use crate::error::{AppError, AppResult};
use crate::handlers::applications::ensure_application_access;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for checklist generation.
#[derive(Debug, Deserialize)]
pub struct GenerateChecklistRequest {
    /// Applicant questionnaire snapshot; may be partial or absent.
    #[serde(default)]
    pub profile: ApplicantProfile,
}

/// Response payload for the merged checklist read.
#[derive(Debug, Serialize)]
pub struct MergedChecklistResponse {
    pub id: DbId,
    pub application_id: DbId,
    pub status: String,
    pub mode: Option<String>,
    pub generated_at: Option<Timestamp>,
    /// Items with per-item status recomputed against the current
    /// document set.
    pub items: Vec<ChecklistItem>,
}

/// POST /api/v1/applications/{id}/checklist
///
/// Generate (or regenerate) the checklist for an application. Call this
/// when the applicant profile materially changes -- a document upload
/// alone never requires regeneration, the merge handles that. A failed
/// generation still returns a checklist object with `status="failed"`.
pub async fn generate_checklist(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(application_id): Path<DbId>,
    Json(input): Json<GenerateChecklistRequest>,
) -> AppResult<impl IntoResponse> {
    let application = ensure_application_access(&state, &auth, application_id).await?;

    let checklist = generator::generate_checklist(
        &state,
        application.id,
        &application.country_code,
        &application.visa_type,
        &input.profile,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: checklist })))
}

/// GET /api/v1/applications/{id}/checklist
///
/// Fetch the checklist with per-item status merged against the user's
/// uploaded documents. The merge runs on every read, since documents
/// arrive asynchronously after generation.
pub async fn get_merged_checklist(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(application_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let application = ensure_application_access(&state, &auth, application_id).await?;

    let checklist = DocumentChecklistRepo::find_by_application(&state.pool, application.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DocumentChecklist",
            id: application.id,
        }))?;

    let documents = UserDocumentRepo::list_for_application(&state.pool, application.id).await?;
    let records: Vec<_> = documents.iter().map(|d| d.to_record()).collect();

    let items = merge_checklist(&checklist.parsed_items(), &records);

    Ok(Json(DataResponse {
        data: MergedChecklistResponse {
            id: checklist.id,
            application_id: checklist.application_id,
            status: checklist.status,
            mode: checklist.mode,
            generated_at: checklist.generated_at,
            items,
        },
    }))
}
