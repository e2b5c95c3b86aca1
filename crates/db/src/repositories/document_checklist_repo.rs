//! Repository for the `document_checklists` table.

use sqlx::PgPool;
use visabuddy_core::types::DbId;

use crate::models::document_checklist::{DocumentChecklist, UpsertDocumentChecklist};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, application_id, status, mode, items, generated_at, created_at, updated_at";

/// Provides read/write operations for generated checklists.
pub struct DocumentChecklistRepo;

impl DocumentChecklistRepo {
    /// Write a generated checklist for an application, replacing any
    /// previous generation (one checklist per application).
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertDocumentChecklist,
    ) -> Result<DocumentChecklist, sqlx::Error> {
        let items = serde_json::to_value(&input.items).unwrap_or_default();
        let query = format!(
            "INSERT INTO document_checklists (application_id, status, mode, items, generated_at)
             VALUES ($1, $2, $3, $4, NOW())
             ON CONFLICT ON CONSTRAINT uq_document_checklists_application
             DO UPDATE SET status = EXCLUDED.status,
                           mode = EXCLUDED.mode,
                           items = EXCLUDED.items,
                           generated_at = EXCLUDED.generated_at,
                           updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentChecklist>(&query)
            .bind(input.application_id)
            .bind(&input.status)
            .bind(&input.mode)
            .bind(items)
            .fetch_one(pool)
            .await
    }

    /// Find the checklist for an application.
    pub async fn find_by_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Option<DocumentChecklist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_checklists WHERE application_id = $1"
        );
        sqlx::query_as::<_, DocumentChecklist>(&query)
            .bind(application_id)
            .fetch_optional(pool)
            .await
    }

    /// All checklists with their stored item snapshots, for the audit.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<DocumentChecklist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM document_checklists ORDER BY id");
        sqlx::query_as::<_, DocumentChecklist>(&query)
            .fetch_all(pool)
            .await
    }
}
