//! HTTP-level integration tests for checklist generation and the merged
//! checklist read.
//!
//! No AI collaborator is configured in the test app, so the fallback
//! path fails explicitly -- asserted below as the documented behavior.

mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, build_test_app, get, post_json, user_token};
use serde_json::json;
use sqlx::PgPool;

/// Seed an approved rule set for a key via the admin API.
async fn seed_approved_rules(
    app: &axum::Router,
    country_code: &str,
    visa_type: &str,
    items: serde_json::Value,
) {
    let token = admin_token(99);
    let response = post_json(
        app.clone(),
        "/api/v1/visa-rules",
        &token,
        json!({
            "country_code": country_code,
            "visa_type": visa_type,
            "items": items
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/visa-rules/{id}/promote"),
        &token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Create an application for the given user and return its id.
async fn create_application(
    app: &axum::Router,
    token: &str,
    country_code: &str,
    visa_type: &str,
) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/applications",
        token,
        json!({"country_code": country_code, "visa_type": visa_type}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Test: rules path end to end, with raw country/visa spellings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_generate_from_rules_with_raw_key(pool: PgPool) {
    let app = build_test_app(pool);
    seed_approved_rules(
        &app,
        "US",
        "tourist",
        json!([
            {"document_type": "passport", "name": "Valid Passport", "category": "required", "priority": 1},
            {"document_type": "bank_statement", "name": "Bank Statement", "category": "required", "priority": 2},
            {"document_type": "travel_itinerary", "name": "Itinerary", "category": "optional", "priority": 3}
        ]),
    )
    .await;

    let token = user_token(7);
    // Raw spellings: "usa" resolves to US, "B1/B2" aliases to tourist.
    let application_id = create_application(&app, &token, "usa", "B1/B2").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/applications/{application_id}/checklist"),
        &token,
        json!({"profile": {"sponsor_type": "self"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ready");
    assert_eq!(json["data"]["mode"], "rules");

    let items = json["data"]["items"].as_array().unwrap();
    assert!(
        items.len() >= 10,
        "generated checklist must have at least 10 items, got {}",
        items.len()
    );
    for critical in ["passport", "application_fee_receipt", "photo"] {
        assert!(
            items.iter().any(|i| i["document_type"] == critical),
            "missing critical document '{critical}'"
        );
    }
}

// ---------------------------------------------------------------------------
// Test: inapplicable rule items are kept, flagged
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_inapplicable_items_kept_with_flag(pool: PgPool) {
    let app = build_test_app(pool);
    seed_approved_rules(
        &app,
        "GB",
        "tourist",
        json!([
            {"document_type": "passport", "name": "Valid Passport", "category": "required", "priority": 1},
            {
                "document_type": "sponsorship_letter",
                "name": "Sponsorship Letter",
                "category": "required",
                "priority": 2,
                "condition": {"when": "sponsor_type", "equals": "third_party"}
            }
        ]),
    )
    .await;

    let token = user_token(7);
    let application_id = create_application(&app, &token, "GB", "tourist").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/applications/{application_id}/checklist"),
        &token,
        json!({"profile": {"sponsor_type": "self"}}),
    )
    .await;
    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();

    let sponsorship = items
        .iter()
        .find(|i| i["document_type"] == "sponsorship_letter")
        .expect("inapplicable item must not be dropped");
    assert_eq!(sponsorship["applies_to_this_applicant"], false);

    let passport = items
        .iter()
        .find(|i| i["document_type"] == "passport")
        .unwrap();
    assert_eq!(passport["applies_to_this_applicant"], true);
}

// ---------------------------------------------------------------------------
// Test: no approved rule and no AI collaborator -> explicit failed state
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_no_rules_no_ai_persists_failed_checklist(pool: PgPool) {
    let app = build_test_app(pool);
    let token = user_token(7);
    let application_id = create_application(&app, &token, "CA", "tourist").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/applications/{application_id}/checklist"),
        &token,
        json!({}),
    )
    .await;
    // The caller still gets a checklist object, never an error response.
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "failed");
    assert_eq!(json["data"]["mode"], "ai_fallback");
}

// ---------------------------------------------------------------------------
// Test: the alias-miss bug class, and its fix
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_alias_resolves_to_existing_rules(pool: PgPool) {
    // Rules exist for ("CA", "tourist"). The builtin alias table maps
    // CA "visitor" -> "tourist", so the raw input reaches those rules
    // instead of falling back. (Without the alias entry this exact input
    // silently fell through to AI generation.)
    let app = build_test_app(pool);
    seed_approved_rules(
        &app,
        "CA",
        "tourist",
        json!([
            {"document_type": "passport", "name": "Valid Passport", "category": "required", "priority": 1}
        ]),
    )
    .await;

    let token = user_token(7);
    let application_id = create_application(&app, &token, "CA", "Visitor").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/applications/{application_id}/checklist"),
        &token,
        json!({}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ready");
    assert_eq!(json["data"]["mode"], "rules");
}

// ---------------------------------------------------------------------------
// Test: merged read reflects documents uploaded after generation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_merge_runs_on_every_read(pool: PgPool) {
    let app = build_test_app(pool);
    seed_approved_rules(
        &app,
        "US",
        "tourist",
        json!([
            {"document_type": "passport", "name": "Valid Passport", "category": "required", "priority": 1}
        ]),
    )
    .await;

    let token = user_token(7);
    let application_id = create_application(&app, &token, "US", "tourist").await;

    post_json(
        app.clone(),
        &format!("/api/v1/applications/{application_id}/checklist"),
        &token,
        json!({}),
    )
    .await;

    // Before any upload: passport is missing.
    let response = get(
        app.clone(),
        &format!("/api/v1/applications/{application_id}/checklist"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let passport = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["document_type"] == "passport")
        .unwrap()
        .clone();
    assert_eq!(passport["status"], "missing");

    // Upload, then read again: no regeneration, just the merge.
    post_json(
        app.clone(),
        &format!("/api/v1/applications/{application_id}/documents"),
        &token,
        json!({"document_type": "Passport", "file_url": "https://files.test/p.pdf"}),
    )
    .await;

    let response = get(
        app,
        &format!("/api/v1/applications/{application_id}/checklist"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let passport = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["document_type"] == "passport")
        .unwrap()
        .clone();
    assert_eq!(passport["status"], "pending");
    assert_eq!(passport["file_url"], "https://files.test/p.pdf");
}

// ---------------------------------------------------------------------------
// Test: merge tolerates legacy denormalized document types
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_merge_matches_damaged_stored_types(pool: PgPool) {
    let app = build_test_app(pool.clone());
    seed_approved_rules(
        &app,
        "US",
        "tourist",
        json!([
            {"document_type": "bank_statement", "name": "Bank Statement", "category": "required", "priority": 1}
        ]),
    )
    .await;

    let token = user_token(7);
    let application_id = create_application(&app, &token, "US", "tourist").await;
    post_json(
        app.clone(),
        &format!("/api/v1/applications/{application_id}/checklist"),
        &token,
        json!({}),
    )
    .await;

    // Simulate a legacy row written before write-time normalization:
    // trailing space and case damage in the stored type.
    sqlx::query(
        "INSERT INTO user_documents (application_id, document_type, status, file_url)
         VALUES ($1, '  Bank Statement ', 'verified', 'https://files.test/bs.pdf')",
    )
    .bind(application_id)
    .execute(&pool)
    .await
    .unwrap();

    let response = get(
        app,
        &format!("/api/v1/applications/{application_id}/checklist"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let statement = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["document_type"] == "bank_statement")
        .unwrap()
        .clone();
    assert_eq!(
        statement["status"], "verified",
        "a damaged stored type must still match after normalization"
    );
}

// ---------------------------------------------------------------------------
// Test: duplicate uploads of one type -- the newest wins
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_merge_newest_document_wins(pool: PgPool) {
    let app = build_test_app(pool.clone());
    seed_approved_rules(
        &app,
        "US",
        "tourist",
        json!([
            {"document_type": "passport", "name": "Valid Passport", "category": "required", "priority": 1}
        ]),
    )
    .await;

    let token = user_token(7);
    let application_id = create_application(&app, &token, "US", "tourist").await;
    post_json(
        app.clone(),
        &format!("/api/v1/applications/{application_id}/checklist"),
        &token,
        json!({}),
    )
    .await;

    // Older verified upload, newer pending upload.
    sqlx::query(
        "INSERT INTO user_documents (application_id, document_type, status, file_url, created_at)
         VALUES ($1, 'passport', 'verified', 'https://files.test/old.pdf', NOW() - INTERVAL '1 hour')",
    )
    .bind(application_id)
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO user_documents (application_id, document_type, status, file_url)
         VALUES ($1, 'passport', 'pending', 'https://files.test/new.pdf')",
    )
    .bind(application_id)
    .execute(&pool)
    .await
    .unwrap();

    let response = get(
        app,
        &format!("/api/v1/applications/{application_id}/checklist"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    let passports: Vec<_> = items
        .iter()
        .filter(|i| i["document_type"] == "passport")
        .collect();
    assert_eq!(passports.len(), 1, "one checklist item per document type");
    assert_eq!(passports[0]["status"], "pending");
    assert_eq!(passports[0]["file_url"], "https://files.test/new.pdf");
}

// ---------------------------------------------------------------------------
// Test: reading a checklist that was never generated returns 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_checklist_before_generation_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let token = user_token(7);
    let application_id = create_application(&app, &token, "US", "tourist").await;

    let response = get(
        app,
        &format!("/api/v1/applications/{application_id}/checklist"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: another user's application is off limits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_checklist_access_is_owner_scoped(pool: PgPool) {
    let app = build_test_app(pool);
    let owner = user_token(7);
    let stranger = user_token(8);
    let application_id = create_application(&app, &owner, "US", "tourist").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/applications/{application_id}/checklist"),
        &stranger,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
