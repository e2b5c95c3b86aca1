//! Handlers for rule-set administration.
//!
//! Rule sets are versioned per (country, visa type) key; drafts are
//! created freely and promoted explicitly. Promotion demotes every
//! sibling so at most one approved version exists per key.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use visabuddy_core::checklist::validate_item_category;
use visabuddy_core::document_type::normalize_document_type;
use visabuddy_core::error::CoreError;
use visabuddy_core::types::DbId;
use visabuddy_db::models::visa_rule_set::{
    CreateVisaRuleItem, CreateVisaRuleSet, PromoteOutcome,
};
use visabuddy_db::repositories::VisaRuleSetRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for listing rule-set versions.
#[derive(Debug, Deserialize)]
pub struct ListRuleSetsParams {
    pub country_code: String,
    pub visa_type: String,
}

/// GET /api/v1/visa-rules?country_code=X&visa_type=Y
///
/// List every version for a key, newest first. The key is normalized the
/// same way generation normalizes it, so querying `country_code=UK`
/// finds rules stored under `GB`.
pub async fn list_rule_sets(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(params): Query<ListRuleSetsParams>,
) -> AppResult<impl IntoResponse> {
    let country_code = state.countries.normalize(&params.country_code).into_value();
    let visa_type = state
        .visa_aliases
        .normalize(&country_code, &params.visa_type)
        .into_value();

    let rule_sets = VisaRuleSetRepo::list_for_key(&state.pool, &country_code, &visa_type).await?;
    Ok(Json(DataResponse { data: rule_sets }))
}

/// Request body for creating a draft rule set.
#[derive(Debug, Deserialize)]
pub struct CreateRuleSetRequest {
    pub country_code: String,
    pub visa_type: String,
    pub items: Vec<RuleItemInput>,
}

/// One rule item of a draft.
#[derive(Debug, Deserialize)]
pub struct RuleItemInput {
    pub document_type: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub priority: i32,
    pub condition: Option<serde_json::Value>,
    pub source_url: Option<String>,
}

/// POST /api/v1/visa-rules
///
/// Create a new draft version for a key (admin only). The key is
/// normalized before storage so drafts can only ever be created under
/// canonical keys; document types are normalized to their snake_case
/// form. The draft is NOT live until promoted.
pub async fn create_rule_set(
    admin: AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRuleSetRequest>,
) -> AppResult<impl IntoResponse> {
    if input.items.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A rule set must contain at least one item".into(),
        )));
    }
    for item in &input.items {
        validate_item_category(&item.category)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
        if normalize_document_type(&item.document_type).is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Rule items must have a non-empty document_type".into(),
            )));
        }
    }

    let country = state.countries.normalize(&input.country_code);
    if !country.is_resolved() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown country '{}'",
            input.country_code
        ))));
    }
    let country_code = country.into_value();
    let visa_type = state
        .visa_aliases
        .normalize(&country_code, &input.visa_type)
        .into_value();

    let create = CreateVisaRuleSet {
        country_code,
        visa_type,
        created_by: Some(admin.0.user_id),
        items: input
            .items
            .into_iter()
            .map(|item| CreateVisaRuleItem {
                document_type: normalize_document_type(&item.document_type),
                name: item.name,
                description: item.description,
                category: item.category,
                priority: item.priority,
                condition: item.condition,
                source_url: item.source_url,
            })
            .collect(),
    };

    let rule_set = VisaRuleSetRepo::create_draft(&state.pool, &create).await?;

    tracing::info!(
        user_id = admin.0.user_id,
        rule_set_id = rule_set.rule_set.id,
        country_code = %rule_set.rule_set.country_code,
        visa_type = %rule_set.rule_set.visa_type,
        version = rule_set.rule_set.version,
        "Draft rule set created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: rule_set })))
}

/// GET /api/v1/visa-rules/{id}
///
/// Fetch one rule-set version with its items.
pub async fn get_rule_set(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rule_set = VisaRuleSetRepo::find_with_items(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "VisaRuleSet",
            id,
        }))?;
    Ok(Json(DataResponse { data: rule_set }))
}

/// POST /api/v1/visa-rules/{id}/promote
///
/// Promote a version to approved, demoting all siblings in the same
/// transaction (admin only). A post-promotion verification failure is
/// surfaced as an integrity error, never guessed away.
pub async fn promote_rule_set(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    match VisaRuleSetRepo::promote(&state.pool, id, admin.0.user_id).await? {
        PromoteOutcome::Promoted(rule_set) => {
            tracing::info!(
                user_id = admin.0.user_id,
                rule_set_id = rule_set.id,
                country_code = %rule_set.country_code,
                visa_type = %rule_set.visa_type,
                version = rule_set.version,
                "Rule set promoted to approved"
            );
            Ok(Json(DataResponse { data: rule_set }))
        }
        PromoteOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "VisaRuleSet",
            id,
        })),
        PromoteOutcome::IntegrityViolation { approved_rows } => {
            Err(AppError::Core(CoreError::Integrity(format!(
                "Promotion left {approved_rows} approved rows; transaction rolled back"
            ))))
        }
    }
}
