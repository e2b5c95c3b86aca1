//! Repository for the `applications` table.

use sqlx::PgPool;
use visabuddy_core::types::DbId;

use crate::models::application::{Application, CreateApplication};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, country_code, visa_type, status, created_at, updated_at";

/// Provides CRUD operations for applications.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert a new application.
    pub async fn create(
        pool: &PgPool,
        input: &CreateApplication,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications (user_id, country_code, visa_type)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(input.user_id)
            .bind(&input.country_code)
            .bind(&input.visa_type)
            .fetch_one(pool)
            .await
    }

    /// Find an application by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List applications for a user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications
             WHERE user_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

}
