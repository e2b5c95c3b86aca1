//! Repository for the `user_documents` table.

use sqlx::PgPool;
use visabuddy_core::checklist::STATUS_PENDING;
use visabuddy_core::document_type::normalize_document_type;
use visabuddy_core::types::DbId;

use crate::models::user_document::{CreateUserDocument, ReviewUserDocument, UserDocument};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, application_id, document_type, status, file_url, \
    verification_notes, created_at, updated_at";

/// Provides CRUD operations for uploaded documents.
pub struct UserDocumentRepo;

impl UserDocumentRepo {
    /// Record a newly uploaded document with status `pending`.
    ///
    /// The client-supplied `document_type` is normalized here, at write
    /// time, with the same function the merge uses at read time, so the
    /// two sides of the join can never diverge for new rows.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUserDocument,
    ) -> Result<UserDocument, sqlx::Error> {
        let document_type = normalize_document_type(&input.document_type);
        let query = format!(
            "INSERT INTO user_documents (application_id, document_type, status, file_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserDocument>(&query)
            .bind(input.application_id)
            .bind(&document_type)
            .bind(STATUS_PENDING)
            .bind(&input.file_url)
            .fetch_one(pool)
            .await
    }

    /// Find a document by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserDocument>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_documents WHERE id = $1");
        sqlx::query_as::<_, UserDocument>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all documents for an application, newest first.
    ///
    /// All rows are returned, including ones the merge will shadow, so
    /// operators and the UI can see duplicate uploads.
    pub async fn list_for_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Vec<UserDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_documents
             WHERE application_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, UserDocument>(&query)
            .bind(application_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a review decision. Returns the updated row, or `None` if no
    /// row with the given `id` exists.
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        input: &ReviewUserDocument,
    ) -> Result<Option<UserDocument>, sqlx::Error> {
        let query = format!(
            "UPDATE user_documents
             SET status = $2, verification_notes = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserDocument>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.verification_notes)
            .fetch_optional(pool)
            .await
    }
}
