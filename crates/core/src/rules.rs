//! Rule items and their applicability predicates.
//!
//! A rule set is a versioned, approvable list of rule items for one
//! `(country, visa type)` key; each item may carry a condition over the
//! applicant profile. Expansion never drops inapplicable items -- they are
//! kept with `applies_to_this_applicant = false` so the UI can explain why
//! something is absent and the checklist keeps a stable shape.

use serde::{Deserialize, Serialize};

use crate::checklist::{ChecklistItem, STATUS_MISSING};
use crate::profile::ApplicantProfile;

/// Predicate deciding whether a rule item applies to a given applicant.
///
/// Serialized as tagged JSON in the rule-item row, e.g.
/// `{"when": "sponsor_type", "equals": "self"}`. A profile field that is
/// not filled in counts as applicable: requirements must never be hidden
/// by an incomplete questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum RuleCondition {
    /// Applies to every applicant.
    #[default]
    Always,
    /// Applies when `sponsor_type` equals the given value.
    SponsorType { equals: String },
    /// Applies when `employment_status` equals the given value.
    EmploymentStatus { equals: String },
    /// Applies when `marital_status` equals the given value.
    MaritalStatus { equals: String },
    /// Applies when the applicant has (or has not) prior visa refusals.
    PriorRefusals { equals: bool },
    /// Applies when the applicant is at most this old.
    MaxAge { years: i32 },
    /// Applies when the applicant is at least this old.
    MinAge { years: i32 },
}

impl RuleCondition {
    /// Evaluate this condition against an applicant profile.
    pub fn applies(&self, profile: &ApplicantProfile) -> bool {
        match self {
            RuleCondition::Always => true,
            RuleCondition::SponsorType { equals } => match &profile.sponsor_type {
                Some(v) => v == equals,
                None => true,
            },
            RuleCondition::EmploymentStatus { equals } => match &profile.employment_status {
                Some(v) => v == equals,
                None => true,
            },
            RuleCondition::MaritalStatus { equals } => match &profile.marital_status {
                Some(v) => v == equals,
                None => true,
            },
            RuleCondition::PriorRefusals { equals } => match profile.prior_refusals {
                Some(v) => v == *equals,
                None => true,
            },
            RuleCondition::MaxAge { years } => match profile.age {
                Some(age) => age <= *years,
                None => true,
            },
            RuleCondition::MinAge { years } => match profile.age {
                Some(age) => age >= *years,
                None => true,
            },
        }
    }
}

/// One row of a rule set: a document requirement with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleItem {
    /// Canonical snake_case document-type key, e.g. `bank_statement`.
    pub document_type: String,
    /// Human-readable document name.
    pub name: String,
    /// Longer guidance shown to the applicant.
    pub description: Option<String>,
    /// `"required"`, `"highly_recommended"`, or `"optional"`.
    pub category: String,
    /// Display/sort priority within the checklist (ascending).
    pub priority: i32,
    /// Applicability predicate over the applicant profile.
    #[serde(default)]
    pub condition: RuleCondition,
    /// Pointer to the official source for this requirement.
    pub source_url: Option<String>,
}

/// Expand rule items into checklist items for one applicant.
///
/// Every rule item produces exactly one checklist item, annotated with
/// whether it applies; the relative order of the input is preserved.
pub fn expand_rule_items(items: &[RuleItem], profile: &ApplicantProfile) -> Vec<ChecklistItem> {
    items
        .iter()
        .map(|item| ChecklistItem {
            document_type: item.document_type.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            priority: item.priority,
            applies_to_this_applicant: item.condition.applies(profile),
            status: STATUS_MISSING.to_string(),
            file_url: None,
            verification_notes: None,
            source_url: item.source_url.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::CATEGORY_REQUIRED;
    use crate::profile::{SPONSOR_SELF, SPONSOR_THIRD_PARTY};

    fn rule(document_type: &str, condition: RuleCondition) -> RuleItem {
        RuleItem {
            document_type: document_type.to_string(),
            name: document_type.to_string(),
            description: None,
            category: CATEGORY_REQUIRED.to_string(),
            priority: 1,
            condition,
            source_url: None,
        }
    }

    #[test]
    fn always_applies() {
        assert!(RuleCondition::Always.applies(&ApplicantProfile::default()));
    }

    #[test]
    fn sponsor_condition_matches_profile() {
        let condition = RuleCondition::SponsorType {
            equals: SPONSOR_SELF.to_string(),
        };
        let selfpay = ApplicantProfile {
            sponsor_type: Some(SPONSOR_SELF.to_string()),
            ..Default::default()
        };
        let sponsored = ApplicantProfile {
            sponsor_type: Some(SPONSOR_THIRD_PARTY.to_string()),
            ..Default::default()
        };
        assert!(condition.applies(&selfpay));
        assert!(!condition.applies(&sponsored));
    }

    #[test]
    fn unknown_profile_field_counts_as_applicable() {
        let condition = RuleCondition::PriorRefusals { equals: true };
        assert!(condition.applies(&ApplicantProfile::default()));
    }

    #[test]
    fn age_bounds() {
        let minor = ApplicantProfile {
            age: Some(16),
            ..Default::default()
        };
        assert!(RuleCondition::MaxAge { years: 17 }.applies(&minor));
        assert!(!RuleCondition::MinAge { years: 18 }.applies(&minor));
    }

    #[test]
    fn expansion_keeps_inapplicable_items_with_flag() {
        let items = vec![
            rule("bank_statement", RuleCondition::Always),
            rule(
                "sponsorship_letter",
                RuleCondition::SponsorType {
                    equals: SPONSOR_THIRD_PARTY.to_string(),
                },
            ),
        ];
        let profile = ApplicantProfile {
            sponsor_type: Some(SPONSOR_SELF.to_string()),
            ..Default::default()
        };

        let expanded = expand_rule_items(&items, &profile);
        assert_eq!(expanded.len(), 2, "inapplicable items are never dropped");
        assert!(expanded[0].applies_to_this_applicant);
        assert!(!expanded[1].applies_to_this_applicant);
        assert_eq!(expanded[1].status, STATUS_MISSING);
    }

    #[test]
    fn condition_round_trips_through_json() {
        let condition = RuleCondition::SponsorType {
            equals: SPONSOR_SELF.to_string(),
        };
        let json = serde_json::to_value(&condition).unwrap();
        assert_eq!(json["when"], "sponsor_type");
        let back: RuleCondition = serde_json::from_value(json).unwrap();
        assert_eq!(back, condition);
    }

    #[test]
    fn missing_condition_defaults_to_always() {
        let item: RuleItem = serde_json::from_str(
            r#"{"document_type": "passport", "name": "Passport",
                "description": null, "category": "required",
                "priority": 1, "source_url": null}"#,
        )
        .unwrap();
        assert_eq!(item.condition, RuleCondition::Always);
    }
}
