//! Handlers for the operational consistency audit.
//!
//! Read-only detection plus the one recommended repair. These run
//! on demand from the admin dashboard, never on the request path.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use visabuddy_core::consistency::{
    audit_documents, audit_rule_set_keys, audit_unmatched_documents, ConsistencyIssue,
    ConsistencyReport,
};
use visabuddy_db::repositories::{ConsistencyRepo, DocumentChecklistRepo, VisaRuleSetRepo};

use crate::error::AppResult;
use crate::middleware::auth::AdminUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/consistency
///
/// Run the full audit: duplicate approvals, non-canonical rule keys,
/// damaged document types, unmatched and shadowed documents.
pub async fn consistency_report(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let mut issues: Vec<ConsistencyIssue> = Vec::new();

    // Duplicate approved rows: the one invariant that blocks generation.
    for (country_code, visa_type, versions) in
        VisaRuleSetRepo::duplicate_approved_keys(&state.pool).await?
    {
        issues.push(ConsistencyIssue::DuplicateApprovedRuleSets {
            country_code,
            visa_type,
            versions,
        });
    }

    // Rule-set keys vs the registry and alias tables.
    let rule_sets = ConsistencyRepo::list_rule_set_briefs(&state.pool).await?;
    issues.extend(audit_rule_set_keys(
        &rule_sets,
        &state.countries,
        &state.visa_aliases,
    ));

    // Stored document types: normalization damage and shadowing.
    let documents = ConsistencyRepo::list_document_briefs(&state.pool).await?;
    issues.extend(audit_documents(&documents));

    // Documents no checklist item matches.
    let checklists: Vec<_> = DocumentChecklistRepo::list_all(&state.pool)
        .await?
        .into_iter()
        .map(|c| (c.application_id, c.parsed_items()))
        .collect();
    issues.extend(audit_unmatched_documents(&checklists, &documents));

    let report = ConsistencyReport {
        issues,
        checked_at: chrono::Utc::now(),
    };

    if !report.is_clean() {
        tracing::warn!(
            issue_count = report.issues.len(),
            "Consistency audit found issues"
        );
    }

    Ok(Json(DataResponse { data: report }))
}

/// Response payload for the approval repair.
#[derive(Debug, Serialize)]
pub struct RepairResponse {
    /// Number of stale approved rows demoted.
    pub demoted_rows: u64,
}

/// POST /api/v1/admin/consistency/repair-approvals
///
/// Apply the recommended repair for duplicate approvals: the newest
/// approved version of each key stays approved, the rest are demoted.
pub async fn repair_approvals(
    admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let demoted_rows = ConsistencyRepo::repair_duplicate_approvals(&state.pool).await?;

    tracing::info!(
        user_id = admin.0.user_id,
        demoted_rows,
        "Duplicate approvals repaired"
    );

    Ok(Json(DataResponse {
        data: RepairResponse { demoted_rows },
    }))
}
