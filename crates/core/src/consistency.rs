//! Consistency audit: issue types and pure detection helpers.
//!
//! The audit runs operationally (admin endpoint), never on the request
//! path. It encodes the invariants the engine depends on: one approved
//! rule set per key, canonical country codes and visa types in stored
//! rules, and document-type strings that survive normalization unchanged.
//! Detection over stored rows lives here as pure functions; the queries
//! that feed them live in the repository layer.

use serde::Serialize;

use crate::canonical::Canonicalized;
use crate::checklist::ChecklistItem;
use crate::country::CountryRegistry;
use crate::document_type::normalize_document_type;
use crate::types::{DbId, Timestamp};
use crate::visa_type::VisaTypeAliases;

/// One detected data-quality problem.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsistencyIssue {
    /// More than one approved rule set for a key: an integrity violation
    /// that blocks generation for that key.
    DuplicateApprovedRuleSets {
        country_code: String,
        visa_type: String,
        versions: Vec<i32>,
    },
    /// A rule set's country code does not resolve in the registry.
    UnknownCountryCode {
        rule_set_id: DbId,
        country_code: String,
    },
    /// A rule set's visa type is not canonical for its country, so
    /// normalized lookups will never find it.
    NonCanonicalVisaType {
        rule_set_id: DbId,
        country_code: String,
        visa_type: String,
    },
    /// A stored document type differs from its normalized form
    /// (whitespace, case, or invisible characters).
    DenormalizedDocumentType {
        document_id: DbId,
        stored: String,
        normalized: String,
    },
    /// An uploaded document matches no checklist item for its
    /// application even after normalization.
    UnmatchedDocument {
        application_id: DbId,
        document_id: DbId,
        document_type: String,
    },
    /// Several documents share one normalized type; all but the newest
    /// are shadowed by the merge.
    ShadowedDocuments {
        application_id: DbId,
        document_type: String,
        count: usize,
    },
}

/// Full audit output.
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
    pub issues: Vec<ConsistencyIssue>,
    pub checked_at: Timestamp,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Brief view of a stored rule set, as fed by the repository layer.
#[derive(Debug, Clone)]
pub struct RuleSetBrief {
    pub id: DbId,
    pub country_code: String,
    pub visa_type: String,
}

/// Brief view of a stored document, as fed by the repository layer.
#[derive(Debug, Clone)]
pub struct DocumentBrief {
    pub id: DbId,
    pub application_id: DbId,
    pub document_type: String,
    pub status: String,
    pub uploaded_at: Timestamp,
}

/// Check stored rule-set keys against the registry and alias tables.
pub fn audit_rule_set_keys(
    rule_sets: &[RuleSetBrief],
    registry: &CountryRegistry,
    aliases: &VisaTypeAliases,
) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();
    for rs in rule_sets {
        if registry.resolve(&rs.country_code).is_none() {
            issues.push(ConsistencyIssue::UnknownCountryCode {
                rule_set_id: rs.id,
                country_code: rs.country_code.clone(),
            });
            continue;
        }
        match aliases.normalize(&rs.country_code, &rs.visa_type) {
            Canonicalized::Resolved(canonical) if canonical == rs.visa_type => {}
            _ => issues.push(ConsistencyIssue::NonCanonicalVisaType {
                rule_set_id: rs.id,
                country_code: rs.country_code.clone(),
                visa_type: rs.visa_type.clone(),
            }),
        }
    }
    issues
}

/// Check stored document types for normalization damage and shadowing.
pub fn audit_documents(documents: &[DocumentBrief]) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();

    for doc in documents {
        let normalized = normalize_document_type(&doc.document_type);
        if normalized != doc.document_type {
            issues.push(ConsistencyIssue::DenormalizedDocumentType {
                document_id: doc.id,
                stored: doc.document_type.clone(),
                normalized,
            });
        }
    }

    // Shadowing: several rows sharing one normalized type per application.
    let mut counts: std::collections::HashMap<(DbId, String), usize> =
        std::collections::HashMap::new();
    for doc in documents {
        let key = (doc.application_id, normalize_document_type(&doc.document_type));
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut shadowed: Vec<_> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .collect();
    shadowed.sort_by(|a, b| a.0.cmp(&b.0));
    for ((application_id, document_type), count) in shadowed {
        issues.push(ConsistencyIssue::ShadowedDocuments {
            application_id,
            document_type,
            count,
        });
    }

    issues
}

/// Find uploaded documents that no checklist item matches.
///
/// `checklists` pairs each application with its stored items; documents
/// for applications without a checklist are skipped (nothing to match
/// against yet).
pub fn audit_unmatched_documents(
    checklists: &[(DbId, Vec<ChecklistItem>)],
    documents: &[DocumentBrief],
) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();
    for (application_id, items) in checklists {
        let item_keys: Vec<String> = items
            .iter()
            .map(|i| normalize_document_type(&i.document_type))
            .collect();
        for doc in documents
            .iter()
            .filter(|d| d.application_id == *application_id)
        {
            let key = normalize_document_type(&doc.document_type);
            if !item_keys.contains(&key) {
                issues.push(ConsistencyIssue::UnmatchedDocument {
                    application_id: *application_id,
                    document_id: doc.id,
                    document_type: doc.document_type.clone(),
                });
            }
        }
    }
    issues
}
