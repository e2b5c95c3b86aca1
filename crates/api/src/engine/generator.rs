//! The rules-first / AI-fallback checklist generation algorithm.

use visabuddy_core::checklist::{
    ensure_baseline, validate_generated_checklist, ChecklistItem, CHECKLIST_FAILED,
    CHECKLIST_GENERATING, CHECKLIST_READY, MODE_AI_FALLBACK, MODE_RULES,
};
use visabuddy_core::error::CoreError;
use visabuddy_core::profile::ApplicantProfile;
use visabuddy_core::rules::expand_rule_items;
use visabuddy_core::types::DbId;
use visabuddy_db::models::document_checklist::{DocumentChecklist, UpsertDocumentChecklist};
use visabuddy_db::repositories::{DocumentChecklistRepo, VisaRuleSetRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Generate and persist the checklist for an application.
///
/// 1. Normalize the country and visa type; fallbacks proceed but are
///    logged so operators can extend the alias tables.
/// 2. Look up the approved rule set for the canonical key. A lookup
///    error aborts here -- it is never masked as "no rule", so an
///    outage cannot impersonate a missing rule set. More than one
///    approved row is an integrity error that also aborts.
/// 3. Rules path: expand items against the profile, keeping
///    inapplicable items flagged rather than dropped.
/// 4. AI path (no approved rule): call the collaborator, retrying once
///    on malformed or empty output; if both attempts fail (or no
///    collaborator is configured), persist `status="failed"` -- the
///    caller still receives a checklist object, never an exception.
/// 5. Both paths top up to the minimum size and critical documents,
///    then persist as `ready`.
pub async fn generate_checklist(
    state: &AppState,
    application_id: DbId,
    country_input: &str,
    visa_type_input: &str,
    profile: &ApplicantProfile,
) -> AppResult<DocumentChecklist> {
    // --- Step 1: normalization ---
    let country = state.countries.normalize(country_input);
    if !country.is_resolved() {
        tracing::warn!(
            application_id,
            raw = country_input,
            fallback = country.value(),
            "Country did not resolve; proceeding with fallback value"
        );
    }
    let country_code = country.value().to_string();

    let visa = state.visa_aliases.normalize(&country_code, visa_type_input);
    if !visa.is_resolved() {
        tracing::warn!(
            application_id,
            country_code = %country_code,
            raw = visa_type_input,
            fallback = visa.value(),
            "Visa type did not resolve; rule lookup will use the raw value"
        );
    }
    let visa_type = visa.value().to_string();

    // Mark the checklist as in flight so concurrent readers see
    // `generating` rather than a stale result or a 404.
    DocumentChecklistRepo::upsert(
        &state.pool,
        &UpsertDocumentChecklist {
            application_id,
            status: CHECKLIST_GENERATING.to_string(),
            mode: None,
            items: Vec::new(),
        },
    )
    .await?;

    // --- Step 2: approved rule lookup ---
    let approved =
        VisaRuleSetRepo::approved_for_key(&state.pool, &country_code, &visa_type).await?;

    if approved.len() > 1 {
        let versions: Vec<i32> = approved.iter().map(|r| r.version).collect();
        tracing::error!(
            country_code = %country_code,
            visa_type = %visa_type,
            ?versions,
            "Multiple approved rule sets for one key; refusing to guess"
        );
        return Err(AppError::Core(CoreError::Integrity(format!(
            "{} approved rule sets exist for ({country_code}, {visa_type})",
            approved.len()
        ))));
    }

    let (mut items, mode) = match approved.into_iter().next() {
        // --- Step 3: rules path ---
        Some(rule_set) => {
            let rule_items =
                VisaRuleSetRepo::items_for_rule_set(&state.pool, rule_set.id).await?;
            let domain_items: Vec<_> = rule_items.iter().map(|r| r.to_rule_item()).collect();
            tracing::info!(
                application_id,
                rule_set_id = rule_set.id,
                version = rule_set.version,
                item_count = domain_items.len(),
                "Generating checklist from approved rule set"
            );
            (expand_rule_items(&domain_items, profile), MODE_RULES)
        }

        // --- Step 4: AI fallback ---
        None => match ai_fallback(state, application_id, &country_code, &visa_type, profile).await
        {
            Some(items) => (items, MODE_AI_FALLBACK),
            None => {
                let failed = DocumentChecklistRepo::upsert(
                    &state.pool,
                    &UpsertDocumentChecklist {
                        application_id,
                        status: CHECKLIST_FAILED.to_string(),
                        mode: Some(MODE_AI_FALLBACK.to_string()),
                        items: Vec::new(),
                    },
                )
                .await?;
                return Ok(failed);
            }
        },
    };

    // --- Step 5: invariants, then persist ---
    ensure_baseline(&mut items);
    validate_generated_checklist(&items).map_err(|violation| {
        AppError::Core(CoreError::Internal(format!(
            "Generated checklist violated invariants: {violation}"
        )))
    })?;

    let checklist = DocumentChecklistRepo::upsert(
        &state.pool,
        &UpsertDocumentChecklist {
            application_id,
            status: CHECKLIST_READY.to_string(),
            mode: Some(mode.to_string()),
            items,
        },
    )
    .await?;

    tracing::info!(
        application_id,
        mode,
        status = %checklist.status,
        "Checklist generated"
    );
    Ok(checklist)
}

/// Run the AI collaborator with a single retry.
///
/// Returns `None` when no usable checklist could be obtained; the caller
/// persists the explicit `failed` state. Malformed and empty outputs are
/// rejected here, never padded into a plausible-looking checklist.
async fn ai_fallback(
    state: &AppState,
    application_id: DbId,
    country_code: &str,
    visa_type: &str,
    profile: &ApplicantProfile,
) -> Option<Vec<ChecklistItem>> {
    let Some(client) = state.ai.as_ref() else {
        tracing::warn!(
            application_id,
            country_code,
            visa_type,
            "No approved rule set and no AI collaborator configured"
        );
        return None;
    };

    for attempt in 1..=2 {
        match client
            .generate_checklist(country_code, visa_type, profile)
            .await
        {
            Ok(items) => return Some(items),
            Err(e) => {
                tracing::warn!(
                    application_id,
                    country_code,
                    visa_type,
                    attempt,
                    error = %e,
                    "AI checklist generation attempt failed"
                );
            }
        }
    }
    None
}
