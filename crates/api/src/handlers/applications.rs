//! Handlers for the `/applications` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use visabuddy_core::error::CoreError;
use visabuddy_core::types::DbId;
use visabuddy_db::models::application::{Application, CreateApplication};
use visabuddy_db::repositories::ApplicationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating an application.
#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    /// Raw country code or name; normalized at checklist generation.
    pub country_code: String,
    /// Raw visa type; normalized at checklist generation.
    pub visa_type: String,
}

/// POST /api/v1/applications
///
/// Create an application for the authenticated user. The raw country and
/// visa-type strings are stored as submitted.
pub async fn create_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateApplicationRequest>,
) -> AppResult<impl IntoResponse> {
    if input.country_code.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "country_code must not be empty".into(),
        )));
    }
    if input.visa_type.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "visa_type must not be empty".into(),
        )));
    }

    let application = ApplicationRepo::create(
        &state.pool,
        &CreateApplication {
            user_id: auth.user_id,
            country_code: input.country_code.trim().to_string(),
            visa_type: input.visa_type.trim().to_string(),
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        application_id = application.id,
        country_code = %application.country_code,
        visa_type = %application.visa_type,
        "Application created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/v1/applications
///
/// List the authenticated user's applications, newest first.
pub async fn list_applications(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let applications = ApplicationRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: applications }))
}

/// GET /api/v1/applications/{id}
///
/// Fetch one application. Owners and admins only.
pub async fn get_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let application = ensure_application_access(&state, &auth, id).await?;
    Ok(Json(DataResponse { data: application }))
}

/// Load an application and verify the caller may act on it.
///
/// Shared by the checklist and document handlers.
pub async fn ensure_application_access(
    state: &AppState,
    auth: &AuthUser,
    application_id: DbId,
) -> AppResult<Application> {
    let application = ApplicationRepo::find_by_id(&state.pool, application_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Application",
            id: application_id,
        }))?;

    if application.user_id != auth.user_id && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this application".into(),
        )));
    }
    Ok(application)
}
