//! Document checklist models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use visabuddy_core::checklist::ChecklistItem;
use visabuddy_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A checklist row from the `document_checklists` table.
///
/// `items` holds the JSONB snapshot written at generation time; item
/// statuses inside it are the generation-time values and are recomputed
/// by the merge on every read.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DocumentChecklist {
    pub id: DbId,
    pub application_id: DbId,
    /// `generating`, `ready`, or `failed`.
    pub status: String,
    /// `rules` or `ai_fallback`; NULL while generating or failed before
    /// a path was chosen.
    pub mode: Option<String>,
    pub items: serde_json::Value,
    pub generated_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DocumentChecklist {
    /// Deserialize the stored item snapshot.
    ///
    /// Rows written by this codebase always parse; a corrupted snapshot
    /// surfaces as an empty checklist rather than a read failure, since
    /// the checklist must always render.
    pub fn parsed_items(&self) -> Vec<ChecklistItem> {
        serde_json::from_value(self.items.clone()).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Upsert DTO
// ---------------------------------------------------------------------------

/// Input for writing a generated checklist.
#[derive(Debug, Clone)]
pub struct UpsertDocumentChecklist {
    pub application_id: DbId,
    pub status: String,
    pub mode: Option<String>,
    pub items: Vec<ChecklistItem>,
}
