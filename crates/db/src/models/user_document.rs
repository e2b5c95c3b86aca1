//! User document models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use visabuddy_core::checklist::DocumentRecord;
use visabuddy_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// An uploaded document row from the `user_documents` table.
///
/// `document_type` originates from the upload client. The repository
/// normalizes it at write time, but the merge still normalizes
/// defensively on read because legacy rows predate that guarantee.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserDocument {
    pub id: DbId,
    pub application_id: DbId,
    pub document_type: String,
    pub status: String,
    pub file_url: Option<String>,
    pub verification_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserDocument {
    /// Project the row into the merge-side view used by the core engine.
    pub fn to_record(&self) -> DocumentRecord {
        DocumentRecord {
            document_type: self.document_type.clone(),
            status: self.status.clone(),
            file_url: self.file_url.clone(),
            verification_notes: self.verification_notes.clone(),
            uploaded_at: self.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Create / update DTOs
// ---------------------------------------------------------------------------

/// Input for recording a newly uploaded document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserDocument {
    pub application_id: DbId,
    pub document_type: String,
    pub file_url: Option<String>,
}

/// Input for a review decision on a document.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewUserDocument {
    /// `verified` or `rejected`.
    pub status: String,
    pub verification_notes: Option<String>,
}
