//! HTTP-level integration tests for the admin consistency audit.
//!
//! The interesting fixtures are deliberately corrupt, inserted with raw
//! SQL to bypass the write-path guards the audit exists to backstop.

mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, build_test_app, get, post_json, user_token};
use serde_json::json;
use sqlx::PgPool;

/// Insert a rule set row directly, bypassing the normalized admin API.
async fn insert_rule_set(
    pool: &PgPool,
    country_code: &str,
    visa_type: &str,
    version: i32,
    is_approved: bool,
) -> i64 {
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO visa_rule_sets (country_code, visa_type, version, is_approved, approved_at)
         VALUES ($1, $2, $3, $4, CASE WHEN $4 THEN NOW() ELSE NULL END)
         RETURNING id",
    )
    .bind(country_code)
    .bind(visa_type)
    .bind(version)
    .bind(is_approved)
    .fetch_one(pool)
    .await
    .unwrap();
    row.0
}

// ---------------------------------------------------------------------------
// Test: the audit is admin-only
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_audit_requires_admin(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/admin/consistency", &user_token(1)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Test: clean data produces a clean report
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_clean_database_clean_report(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/admin/consistency", &admin_token(1)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["issues"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Test: duplicate approvals are flagged and repaired newest-wins
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_approvals_flagged_and_repaired(pool: PgPool) {
    let app = build_test_app(pool.clone());
    // Two approved versions for one key: the invariant the promote
    // transaction exists to prevent.
    insert_rule_set(&pool, "US", "tourist", 1, true).await;
    insert_rule_set(&pool, "US", "tourist", 2, true).await;

    let response = get(app.clone(), "/api/v1/admin/consistency", &admin_token(1)).await;
    let json = body_json(response).await;
    let issues = json["data"]["issues"].as_array().unwrap();
    let duplicate = issues
        .iter()
        .find(|i| i["kind"] == "duplicate_approved_rule_sets")
        .expect("duplicate approvals must be flagged");
    assert_eq!(duplicate["country_code"], "US");
    assert_eq!(duplicate["versions"], json!([1, 2]));

    // Repair: newest version wins, the rest are demoted.
    let response = post_json(
        app.clone(),
        "/api/v1/admin/consistency/repair-approvals",
        &admin_token(1),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["demoted_rows"], 1);

    let approved: Vec<(i32,)> = sqlx::query_as(
        "SELECT version FROM visa_rule_sets
         WHERE country_code = 'US' AND visa_type = 'tourist' AND is_approved = true",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(approved, vec![(2,)]);

    // The report no longer flags the key.
    let response = get(app, "/api/v1/admin/consistency", &admin_token(1)).await;
    let json = body_json(response).await;
    assert!(!json["data"]["issues"]
        .as_array()
        .unwrap()
        .iter()
        .any(|i| i["kind"] == "duplicate_approved_rule_sets"));
}

// ---------------------------------------------------------------------------
// Test: non-canonical rule keys are flagged
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_canonical_keys_flagged(pool: PgPool) {
    let app = build_test_app(pool.clone());
    // Stored under the colloquial spelling: unreachable by normalized
    // lookups (the "visitor" vs "tourist" bug class).
    let visitor_id = insert_rule_set(&pool, "CA", "visitor", 1, true).await;
    // Unknown country code.
    let unknown_id = insert_rule_set(&pool, "ZZ", "tourist", 1, false).await;

    let response = get(app, "/api/v1/admin/consistency", &admin_token(1)).await;
    let json = body_json(response).await;
    let issues = json["data"]["issues"].as_array().unwrap();

    assert!(issues.iter().any(|i| i["kind"] == "non_canonical_visa_type"
        && i["rule_set_id"] == visitor_id));
    assert!(issues
        .iter()
        .any(|i| i["kind"] == "unknown_country_code" && i["rule_set_id"] == unknown_id));
}

// ---------------------------------------------------------------------------
// Test: damaged and shadowed document types are flagged
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_document_damage_flagged(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let token = user_token(7);

    let response = post_json(
        app.clone(),
        "/api/v1/applications",
        &token,
        json!({"country_code": "US", "visa_type": "tourist"}),
    )
    .await;
    let application_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // A legacy row with a trailing space, plus a clean duplicate.
    sqlx::query(
        "INSERT INTO user_documents (application_id, document_type, status)
         VALUES ($1, 'passport ', 'pending'), ($1, 'passport', 'pending')",
    )
    .bind(application_id)
    .execute(&pool)
    .await
    .unwrap();

    let response = get(app, "/api/v1/admin/consistency", &admin_token(1)).await;
    let json = body_json(response).await;
    let issues = json["data"]["issues"].as_array().unwrap();

    assert!(issues.iter().any(|i| i["kind"] == "denormalized_document_type"
        && i["stored"] == "passport "
        && i["normalized"] == "passport"));
    assert!(issues.iter().any(|i| i["kind"] == "shadowed_documents"
        && i["application_id"] == application_id
        && i["count"] == 2));
}
