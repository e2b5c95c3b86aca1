//! Read-only audit queries and the duplicate-approval repair.
//!
//! Feeds the pure detection helpers in `visabuddy_core::consistency`;
//! nothing here runs on the request path.

use sqlx::PgPool;
use visabuddy_core::consistency::{DocumentBrief, RuleSetBrief};
use visabuddy_core::types::DbId;

/// Provides audit queries over rule sets and documents.
pub struct ConsistencyRepo;

impl ConsistencyRepo {
    /// Brief view of every stored rule set key.
    pub async fn list_rule_set_briefs(pool: &PgPool) -> Result<Vec<RuleSetBrief>, sqlx::Error> {
        let rows: Vec<(DbId, String, String)> =
            sqlx::query_as("SELECT id, country_code, visa_type FROM visa_rule_sets ORDER BY id")
                .fetch_all(pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, country_code, visa_type)| RuleSetBrief {
                id,
                country_code,
                visa_type,
            })
            .collect())
    }

    /// Brief view of every stored document.
    pub async fn list_document_briefs(pool: &PgPool) -> Result<Vec<DocumentBrief>, sqlx::Error> {
        let rows: Vec<(
            DbId,
            DbId,
            String,
            String,
            visabuddy_core::types::Timestamp,
        )> = sqlx::query_as(
            "SELECT id, application_id, document_type, status, created_at
             FROM user_documents ORDER BY id",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(
                |(id, application_id, document_type, status, uploaded_at)| DocumentBrief {
                    id,
                    application_id,
                    document_type,
                    status,
                    uploaded_at,
                },
            )
            .collect())
    }

    /// Demote all but the newest approved version for every key holding
    /// more than one approved row (the recommended repair for the
    /// duplicate-approval integrity violation). Returns the number of
    /// demoted rows.
    pub async fn repair_duplicate_approvals(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE visa_rule_sets s
             SET is_approved = false, updated_at = NOW()
             WHERE s.is_approved = true
               AND EXISTS (
                   SELECT 1 FROM visa_rule_sets newer
                   WHERE newer.country_code = s.country_code
                     AND newer.visa_type = s.visa_type
                     AND newer.is_approved = true
                     AND newer.version > s.version
               )",
        )
        .execute(pool)
        .await?;
        tracing::debug!(
            demoted_rows = result.rows_affected(),
            "Demoted stale approved rule sets"
        );
        Ok(result.rows_affected())
    }
}
