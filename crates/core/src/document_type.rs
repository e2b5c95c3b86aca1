//! The single shared document-type normalization function.
//!
//! Checklist items reference uploaded documents by value equality of the
//! `document_type` string, not by foreign key, and the upload path accepts
//! arbitrary client-supplied text. Both the write path (when a document is
//! recorded) and the merge path (on every checklist read) MUST normalize
//! through this one function; applying different normalization on the two
//! sides of the join is the documented root cause of checklists showing
//! "missing" for documents that were in fact uploaded.

/// Invisible characters observed in client-supplied document types.
/// Zero-width space/joiner/non-joiner and the BOM are dropped outright.
const ZERO_WIDTH: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Normalize a raw document-type string to its canonical snake_case key.
///
/// Steps, in order:
/// 1. drop zero-width characters;
/// 2. fold non-breaking spaces into ordinary spaces;
/// 3. trim and lower-case;
/// 4. collapse runs of whitespace and hyphens into a single `_`.
///
/// `"  Bank\u{00A0}Statement "` and `"bank-statement"` both normalize to
/// `"bank_statement"`.
pub fn normalize_document_type(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !ZERO_WIDTH.contains(c))
        .map(|c| if c == '\u{00A0}' { ' ' } else { c })
        .collect();

    let lowered = cleaned.trim().to_lowercase();

    let mut key = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for c in lowered.chars() {
        if c.is_whitespace() || c == '-' {
            pending_separator = !key.is_empty();
        } else {
            if pending_separator {
                key.push('_');
                pending_separator = false;
            }
            key.push(c);
        }
    }
    key
}
