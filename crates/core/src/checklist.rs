//! Checklist items, generation invariants, and the checklist--document
//! merge.
//!
//! A checklist is the per-application expansion of a rule set (or of the
//! AI collaborator's output) into concrete items. Items are joined against
//! uploaded documents by normalized document-type string on every read;
//! the join lives here so the write path, the read path, and the
//! consistency checker all share one implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document_type::normalize_document_type;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Item must be submitted for the application to proceed.
pub const CATEGORY_REQUIRED: &str = "required";

/// Item strongly improves approval odds but is not mandatory.
pub const CATEGORY_HIGHLY_RECOMMENDED: &str = "highly_recommended";

/// Item is situational.
pub const CATEGORY_OPTIONAL: &str = "optional";

/// All valid item categories.
pub const VALID_ITEM_CATEGORIES: &[&str] = &[
    CATEGORY_REQUIRED,
    CATEGORY_HIGHLY_RECOMMENDED,
    CATEGORY_OPTIONAL,
];

/// No uploaded document matches this item.
pub const STATUS_MISSING: &str = "missing";

/// A matching document was uploaded and awaits review.
pub const STATUS_PENDING: &str = "pending";

/// A matching document was reviewed and accepted.
pub const STATUS_VERIFIED: &str = "verified";

/// A matching document was reviewed and rejected.
pub const STATUS_REJECTED: &str = "rejected";

/// Document statuses that may be copied onto a checklist item.
pub const VALID_DOCUMENT_STATUSES: &[&str] =
    &[STATUS_PENDING, STATUS_VERIFIED, STATUS_REJECTED];

/// Checklist lifecycle states.
pub const CHECKLIST_GENERATING: &str = "generating";
pub const CHECKLIST_READY: &str = "ready";
pub const CHECKLIST_FAILED: &str = "failed";

/// The checklist came from an approved rule set.
pub const MODE_RULES: &str = "rules";

/// No approved rule set existed; the AI collaborator produced the items.
pub const MODE_AI_FALLBACK: &str = "ai_fallback";

/// Every generated checklist must reach at least this many items.
pub const MIN_CHECKLIST_ITEMS: usize = 10;

/// Document types that must appear in every generated checklist,
/// whichever path produced it.
pub const CRITICAL_DOCUMENT_TYPES: &[&str] =
    &["passport", "application_fee_receipt", "photo"];

/// Validate an item category string.
pub fn validate_item_category(category: &str) -> Result<(), String> {
    if VALID_ITEM_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(format!(
            "Invalid item category '{category}'. Must be one of: {}",
            VALID_ITEM_CATEGORIES.join(", ")
        ))
    }
}

/// Validate a reviewable document status string.
pub fn validate_document_status(status: &str) -> Result<(), String> {
    if VALID_DOCUMENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid document status '{status}'. Must be one of: {}",
            VALID_DOCUMENT_STATUSES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// One entry of a generated checklist, annotated by the merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Canonical snake_case document-type key.
    pub document_type: String,
    /// Human-readable document name.
    pub name: String,
    pub description: Option<String>,
    /// `"required"`, `"highly_recommended"`, or `"optional"`.
    pub category: String,
    /// Display/sort priority (ascending).
    pub priority: i32,
    /// Whether the item's rule condition holds for this applicant.
    /// Inapplicable items stay in the checklist so the UI can explain
    /// why they are not needed.
    pub applies_to_this_applicant: bool,
    /// Merge-computed: `missing`, `pending`, `verified`, or `rejected`.
    pub status: String,
    /// Copied from the matching uploaded document, if any.
    pub file_url: Option<String>,
    /// Copied from the matching uploaded document, if any.
    pub verification_notes: Option<String>,
    /// Pointer to the official source for this requirement.
    pub source_url: Option<String>,
}

/// Read-side view of one uploaded document, as consumed by the merge.
///
/// `document_type` is client-supplied free text and is NOT assumed
/// canonical; the merge normalizes it defensively.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub document_type: String,
    /// `pending`, `verified`, or `rejected`.
    pub status: String,
    pub file_url: Option<String>,
    pub verification_notes: Option<String>,
    pub uploaded_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Baseline catalog
// ---------------------------------------------------------------------------

/// Universal document items used to top up sparse checklists.
///
/// `(document_type, name, description, category, priority)`; the first
/// entries cover the critical documents every checklist must contain.
const BASELINE_CATALOG: &[(&str, &str, &str, &str, i32)] = &[
    (
        "passport",
        "Valid Passport",
        "Passport valid for at least 6 months beyond the intended stay",
        CATEGORY_REQUIRED,
        1,
    ),
    (
        "application_fee_receipt",
        "Application Fee Receipt",
        "Proof of payment of the visa application fee",
        CATEGORY_REQUIRED,
        2,
    ),
    (
        "photo",
        "Passport Photo",
        "Recent passport-sized photograph meeting embassy requirements",
        CATEGORY_REQUIRED,
        3,
    ),
    (
        "application_form",
        "Visa Application Form",
        "Completed and signed visa application form",
        CATEGORY_REQUIRED,
        4,
    ),
    (
        "bank_statement",
        "Bank Statement",
        "Bank statements covering the last 3-6 months",
        CATEGORY_REQUIRED,
        5,
    ),
    (
        "travel_itinerary",
        "Travel Itinerary",
        "Round-trip reservation or planned travel route",
        CATEGORY_REQUIRED,
        6,
    ),
    (
        "accommodation_proof",
        "Proof of Accommodation",
        "Hotel booking or host invitation covering the stay",
        CATEGORY_REQUIRED,
        7,
    ),
    (
        "travel_insurance",
        "Travel Insurance",
        "Medical travel insurance valid for the destination",
        CATEGORY_HIGHLY_RECOMMENDED,
        8,
    ),
    (
        "employment_letter",
        "Employment Letter",
        "Letter from the employer stating position, salary, and approved leave",
        CATEGORY_HIGHLY_RECOMMENDED,
        9,
    ),
    (
        "property_documents",
        "Property Documents",
        "Evidence of property ownership in the home country",
        CATEGORY_OPTIONAL,
        10,
    ),
    (
        "family_ties_evidence",
        "Family Ties Evidence",
        "Marriage or birth certificates showing ties to the home country",
        CATEGORY_OPTIONAL,
        11,
    ),
    (
        "previous_visas",
        "Previous Visas",
        "Copies of previous visas and entry stamps",
        CATEGORY_OPTIONAL,
        12,
    ),
];

/// Materialize the baseline catalog as checklist items.
pub fn baseline_items() -> Vec<ChecklistItem> {
    BASELINE_CATALOG
        .iter()
        .map(
            |(document_type, name, description, category, priority)| ChecklistItem {
                document_type: (*document_type).to_string(),
                name: (*name).to_string(),
                description: Some((*description).to_string()),
                category: (*category).to_string(),
                priority: *priority,
                applies_to_this_applicant: true,
                status: STATUS_MISSING.to_string(),
                file_url: None,
                verification_notes: None,
                source_url: None,
            },
        )
        .collect()
}

/// Enforce the generation invariants on a checklist in place: every
/// critical document type is present and the item count reaches
/// [`MIN_CHECKLIST_ITEMS`], topping up from the baseline catalog.
///
/// Presence is decided on normalized document types, so a rule set using
/// `"Passport"` will not receive a duplicate baseline `passport` row.
pub fn ensure_baseline(items: &mut Vec<ChecklistItem>) {
    let mut present: Vec<String> = items
        .iter()
        .map(|i| normalize_document_type(&i.document_type))
        .collect();
    let mut next_priority = items.iter().map(|i| i.priority).max().unwrap_or(0) + 1;

    let baseline = baseline_items();

    // Critical documents first, then the rest of the catalog until the
    // minimum size is met.
    for item in baseline
        .iter()
        .filter(|i| CRITICAL_DOCUMENT_TYPES.contains(&i.document_type.as_str()))
        .chain(baseline.iter())
    {
        let key = normalize_document_type(&item.document_type);
        let is_critical = CRITICAL_DOCUMENT_TYPES.contains(&item.document_type.as_str());
        if present.contains(&key) {
            continue;
        }
        if !is_critical && items.len() >= MIN_CHECKLIST_ITEMS {
            continue;
        }
        let mut item = item.clone();
        item.priority = next_priority;
        next_priority += 1;
        present.push(key);
        items.push(item);
    }
}

/// Check the generation invariants without modifying the checklist.
///
/// Returns a description of the first violation; used as a final guard
/// before a checklist is persisted as `ready`.
pub fn validate_generated_checklist(items: &[ChecklistItem]) -> Result<(), String> {
    if items.len() < MIN_CHECKLIST_ITEMS {
        return Err(format!(
            "Checklist has {} items; at least {MIN_CHECKLIST_ITEMS} required",
            items.len()
        ));
    }
    let present: Vec<String> = items
        .iter()
        .map(|i| normalize_document_type(&i.document_type))
        .collect();
    for critical in CRITICAL_DOCUMENT_TYPES {
        if !present.iter().any(|p| p == critical) {
            return Err(format!("Checklist is missing critical document '{critical}'"));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Join checklist items against uploaded documents by normalized
/// document-type string, computing each item's status.
///
/// Both sides of the join normalize through
/// [`normalize_document_type`]; when several documents share a type, the
/// most recently uploaded wins and earlier ones are shadowed (a
/// documented simplification -- the shadowed rows are surfaced by the
/// consistency checker, not by the merge). Items with no match stay
/// `missing`. Runs on every checklist read, since documents arrive
/// asynchronously after generation.
pub fn merge_checklist(
    items: &[ChecklistItem],
    documents: &[DocumentRecord],
) -> Vec<ChecklistItem> {
    let mut latest_by_type: HashMap<String, &DocumentRecord> = HashMap::new();
    for doc in documents {
        let key = normalize_document_type(&doc.document_type);
        if key.is_empty() {
            continue;
        }
        let newer = match latest_by_type.get(&key) {
            Some(existing) => doc.uploaded_at > existing.uploaded_at,
            None => true,
        };
        if newer {
            latest_by_type.insert(key, doc);
        }
    }

    items
        .iter()
        .map(|item| {
            let mut merged = item.clone();
            let key = normalize_document_type(&item.document_type);
            match latest_by_type.get(&key) {
                Some(doc) => {
                    merged.status = doc.status.clone();
                    merged.file_url = doc.file_url.clone();
                    merged.verification_notes = doc.verification_notes.clone();
                }
                None => {
                    merged.status = STATUS_MISSING.to_string();
                    merged.file_url = None;
                    merged.verification_notes = None;
                }
            }
            merged
        })
        .collect()
}
