//! Visa rule-set models and DTOs.
//!
//! Defines the database row structs for `visa_rule_sets` and
//! `visa_rule_items` plus the create DTOs used by the repository layer.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use visabuddy_core::rules::{RuleCondition, RuleItem};
use visabuddy_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A rule-set row from the `visa_rule_sets` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VisaRuleSet {
    pub id: DbId,
    pub country_code: String,
    pub visa_type: String,
    pub version: i32,
    pub is_approved: bool,
    pub approved_at: Option<Timestamp>,
    pub approved_by: Option<DbId>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A rule-item row from the `visa_rule_items` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VisaRuleItem {
    pub id: DbId,
    pub rule_set_id: DbId,
    pub position: i32,
    pub document_type: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub priority: i32,
    pub condition: Option<serde_json::Value>,
    pub source_url: Option<String>,
}

impl VisaRuleItem {
    /// Convert the row into the domain rule item.
    ///
    /// A NULL or unparseable `condition` column degrades to
    /// [`RuleCondition::Always`] -- an unreadable predicate must widen a
    /// checklist, never silently hide a requirement.
    pub fn to_rule_item(&self) -> RuleItem {
        let condition = self
            .condition
            .clone()
            .and_then(|value| serde_json::from_value::<RuleCondition>(value).ok())
            .unwrap_or_default();
        RuleItem {
            document_type: self.document_type.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            priority: self.priority,
            condition,
            source_url: self.source_url.clone(),
        }
    }
}

/// A rule set together with its ordered items.
#[derive(Debug, Clone, Serialize)]
pub struct VisaRuleSetWithItems {
    #[serde(flatten)]
    pub rule_set: VisaRuleSet,
    pub items: Vec<VisaRuleItem>,
}

// ---------------------------------------------------------------------------
// Create DTOs
// ---------------------------------------------------------------------------

/// Input for creating a new draft rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVisaRuleSet {
    pub country_code: String,
    pub visa_type: String,
    pub created_by: Option<DbId>,
    pub items: Vec<CreateVisaRuleItem>,
}

/// One item of a draft rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVisaRuleItem {
    pub document_type: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub priority: i32,
    pub condition: Option<serde_json::Value>,
    pub source_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Promotion outcome
// ---------------------------------------------------------------------------

/// Result of attempting to promote a rule-set version to approved.
#[derive(Debug)]
pub enum PromoteOutcome {
    /// The version was approved; all siblings were demoted.
    Promoted(VisaRuleSet),
    /// No rule set with the given id exists.
    NotFound,
    /// The post-promotion verification found a number of approved rows
    /// other than one; the transaction was rolled back.
    IntegrityViolation { approved_rows: i64 },
}
