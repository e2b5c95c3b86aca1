//! Application models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use visabuddy_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A visa application row from the `applications` table.
///
/// `country_code` and `visa_type` are stored as submitted; the checklist
/// engine normalizes them at generation time.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Application {
    pub id: DbId,
    pub user_id: DbId,
    pub country_code: String,
    pub visa_type: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for creating a new application record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApplication {
    pub user_id: DbId,
    pub country_code: String,
    pub visa_type: String,
}
