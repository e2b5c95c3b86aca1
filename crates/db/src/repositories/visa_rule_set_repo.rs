//! Repository for the `visa_rule_sets` and `visa_rule_items` tables.
//!
//! Rule sets are versioned per (country_code, visa_type) key and move
//! through a draft -> approved workflow. Promotion demotes every sibling
//! in the same transaction and re-verifies the one-approved-row invariant
//! before committing; rule sets are never hard-deleted (kept for audit).

use sqlx::PgPool;
use visabuddy_core::types::DbId;

use crate::models::visa_rule_set::{
    CreateVisaRuleSet, PromoteOutcome, VisaRuleItem, VisaRuleSet, VisaRuleSetWithItems,
};

/// Column list for visa_rule_sets queries.
const COLUMNS: &str = "id, country_code, visa_type, version, is_approved, \
    approved_at, approved_by, created_by, created_at, updated_at";

/// Column list for visa_rule_items queries.
const ITEM_COLUMNS: &str = "id, rule_set_id, position, document_type, name, \
    description, category, priority, condition, source_url";

/// Provides versioning and approval operations for visa rule sets.
pub struct VisaRuleSetRepo;

impl VisaRuleSetRepo {
    // ── Drafts ───────────────────────────────────────────────────────

    /// Insert a new draft rule set with its items, auto-incrementing the
    /// version number for the key. The set and its items are written in
    /// one transaction; item order follows the input order.
    pub async fn create_draft(
        pool: &PgPool,
        input: &CreateVisaRuleSet,
    ) -> Result<VisaRuleSetWithItems, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO visa_rule_sets (country_code, visa_type, version, created_by)
             VALUES (
                 $1, $2,
                 COALESCE(
                     (SELECT MAX(version) FROM visa_rule_sets
                      WHERE country_code = $1 AND visa_type = $2),
                     0
                 ) + 1,
                 $3
             )
             RETURNING {COLUMNS}"
        );
        let rule_set = sqlx::query_as::<_, VisaRuleSet>(&query)
            .bind(&input.country_code)
            .bind(&input.visa_type)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        let item_query = format!(
            "INSERT INTO visa_rule_items
                (rule_set_id, position, document_type, name, description,
                 category, priority, condition, source_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {ITEM_COLUMNS}"
        );
        let mut items = Vec::with_capacity(input.items.len());
        for (position, item) in input.items.iter().enumerate() {
            let row = sqlx::query_as::<_, VisaRuleItem>(&item_query)
                .bind(rule_set.id)
                .bind(position as i32)
                .bind(&item.document_type)
                .bind(&item.name)
                .bind(&item.description)
                .bind(&item.category)
                .bind(item.priority)
                .bind(&item.condition)
                .bind(&item.source_url)
                .fetch_one(&mut *tx)
                .await?;
            items.push(row);
        }

        tx.commit().await?;
        Ok(VisaRuleSetWithItems { rule_set, items })
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// Find a rule set by its primary key, without items.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VisaRuleSet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM visa_rule_sets WHERE id = $1");
        sqlx::query_as::<_, VisaRuleSet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load the items of a rule set, in stored order.
    pub async fn items_for_rule_set(
        pool: &PgPool,
        rule_set_id: DbId,
    ) -> Result<Vec<VisaRuleItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM visa_rule_items
             WHERE rule_set_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, VisaRuleItem>(&query)
            .bind(rule_set_id)
            .fetch_all(pool)
            .await
    }

    /// Find a rule set with its items.
    pub async fn find_with_items(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<VisaRuleSetWithItems>, sqlx::Error> {
        let Some(rule_set) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let items = Self::items_for_rule_set(pool, id).await?;
        Ok(Some(VisaRuleSetWithItems { rule_set, items }))
    }

    /// List all versions for a key, newest version first.
    pub async fn list_for_key(
        pool: &PgPool,
        country_code: &str,
        visa_type: &str,
    ) -> Result<Vec<VisaRuleSet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM visa_rule_sets
             WHERE country_code = $1 AND visa_type = $2
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, VisaRuleSet>(&query)
            .bind(country_code)
            .bind(visa_type)
            .fetch_all(pool)
            .await
    }

    /// Fetch every approved row for a key.
    ///
    /// The healthy result has zero or one element. Callers must treat
    /// more than one as a data-integrity error and abort rather than
    /// pick a row; the query deliberately does not `LIMIT 1`.
    pub async fn approved_for_key(
        pool: &PgPool,
        country_code: &str,
        visa_type: &str,
    ) -> Result<Vec<VisaRuleSet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM visa_rule_sets
             WHERE country_code = $1 AND visa_type = $2 AND is_approved = true
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, VisaRuleSet>(&query)
            .bind(country_code)
            .bind(visa_type)
            .fetch_all(pool)
            .await
    }

    // ── Approval state machine ───────────────────────────────────────

    /// Promote a rule-set version to approved.
    ///
    /// In one transaction: demote every approved sibling sharing the
    /// key, approve the target with `approved_at`/`approved_by`, then
    /// verify exactly one approved row remains for the key. On a failed
    /// verification the transaction is rolled back and
    /// [`PromoteOutcome::IntegrityViolation`] is returned so the caller
    /// can alert instead of guessing.
    pub async fn promote(
        pool: &PgPool,
        id: DbId,
        approved_by: DbId,
    ) -> Result<PromoteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let target = sqlx::query_as::<_, (String, String)>(
            "SELECT country_code, visa_type FROM visa_rule_sets WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((country_code, visa_type)) = target else {
            return Ok(PromoteOutcome::NotFound);
        };

        // Demote every other approved version for the key.
        sqlx::query(
            "UPDATE visa_rule_sets
             SET is_approved = false, updated_at = NOW()
             WHERE country_code = $1 AND visa_type = $2
               AND is_approved = true AND id <> $3",
        )
        .bind(&country_code)
        .bind(&visa_type)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // Approve the target.
        let query = format!(
            "UPDATE visa_rule_sets
             SET is_approved = true, approved_at = NOW(), approved_by = $2,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let promoted = sqlx::query_as::<_, VisaRuleSet>(&query)
            .bind(id)
            .bind(approved_by)
            .fetch_one(&mut *tx)
            .await?;

        // Verify the invariant before committing.
        let approved_rows: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM visa_rule_sets
             WHERE country_code = $1 AND visa_type = $2 AND is_approved = true",
        )
        .bind(&country_code)
        .bind(&visa_type)
        .fetch_one(&mut *tx)
        .await?;

        if approved_rows.0 != 1 {
            tx.rollback().await?;
            return Ok(PromoteOutcome::IntegrityViolation {
                approved_rows: approved_rows.0,
            });
        }

        tx.commit().await?;
        Ok(PromoteOutcome::Promoted(promoted))
    }

    // ── Audit support ────────────────────────────────────────────────

    /// Keys holding more than one approved row, with the offending
    /// versions: `(country_code, visa_type, versions)`.
    pub async fn duplicate_approved_keys(
        pool: &PgPool,
    ) -> Result<Vec<(String, String, Vec<i32>)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT country_code, visa_type, ARRAY_AGG(version ORDER BY version)
             FROM visa_rule_sets
             WHERE is_approved = true
             GROUP BY country_code, visa_type
             HAVING COUNT(*) > 1",
        )
        .fetch_all(pool)
        .await
    }
}
