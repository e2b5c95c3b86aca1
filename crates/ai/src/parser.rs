//! Extraction and parsing of the collaborator's checklist response.
//!
//! Models wrap JSON in markdown fences or pad it with prose despite the
//! template instructions, so extraction is forgiving; the parse itself is
//! strict about shape.

use serde::Deserialize;
use visabuddy_core::checklist::{
    ChecklistItem, CATEGORY_HIGHLY_RECOMMENDED, CATEGORY_OPTIONAL, CATEGORY_REQUIRED,
    STATUS_MISSING,
};
use visabuddy_core::document_type::normalize_document_type;

/// The JSON envelope the prompt template asks for.
#[derive(Debug, Deserialize)]
struct ChecklistEnvelope {
    #[serde(default)]
    checklist: Vec<EnvelopeItem>,
}

/// One checklist entry as emitted by the model.
#[derive(Debug, Deserialize)]
struct EnvelopeItem {
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    name: String,
    description: Option<String>,
}

/// Parse a raw completion into checklist items.
///
/// Returns an error message (not a panic) on anything unparseable; the
/// caller decides whether to retry or fail the generation.
pub fn parse_checklist_response(raw: &str) -> Result<Vec<ChecklistItem>, String> {
    let json_text = extract_json(raw).ok_or_else(|| "no JSON object in response".to_string())?;

    let envelope: ChecklistEnvelope = serde_json::from_str(json_text)
        .map_err(|e| format!("checklist JSON did not parse: {e}"))?;

    let items = envelope
        .checklist
        .into_iter()
        .filter(|item| !item.name.trim().is_empty())
        .enumerate()
        .map(|(index, item)| {
            let document_type = item
                .id
                .as_deref()
                .map(normalize_document_type)
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| normalize_document_type(&item.name));
            ChecklistItem {
                document_type,
                name: item.name.trim().to_string(),
                description: item.description,
                category: map_category(item.kind.as_deref()),
                priority: index as i32 + 1,
                applies_to_this_applicant: true,
                status: STATUS_MISSING.to_string(),
                file_url: None,
                verification_notes: None,
                source_url: None,
            }
        })
        .collect();

    Ok(items)
}

/// Map the model's loose `type` vocabulary onto item categories.
fn map_category(kind: Option<&str>) -> String {
    match kind.map(|k| k.trim().to_lowercase()).as_deref() {
        Some("required") => CATEGORY_REQUIRED.to_string(),
        Some("recommended") | Some("highly_recommended") => {
            CATEGORY_HIGHLY_RECOMMENDED.to_string()
        }
        _ => CATEGORY_OPTIONAL.to_string(),
    }
}

/// Pull the JSON payload out of a completion.
///
/// Tries a ```json fence, then a bare ``` fence, then the outermost
/// braces.
fn extract_json(raw: &str) -> Option<&str> {
    let text = raw.trim();

    if let Some(start) = text.find("```json") {
        let rest = &text[start + 7..];
        if let Some(end) = rest.find("```") {
            return Some(rest[..end].trim());
        }
    }

    if let Some(start) = text.find("```") {
        let rest = &text[start + 3..];
        if let Some(end) = rest.find("```") {
            return Some(rest[..end].trim());
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| text[start..=end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "type": "checklist",
        "country": "CA",
        "visaType": "tourist",
        "checklist": [
            {"id": "passport", "type": "required", "name": "Valid Passport", "description": "6+ months validity"},
            {"id": "bank-statement", "type": "recommended", "name": "Bank Statement"},
            {"type": "weird", "name": "Itinerary"}
        ],
        "notes": ["verify with the embassy"]
    }"#;

    #[test]
    fn parses_bare_json() {
        let items = parse_checklist_response(PAYLOAD).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].document_type, "passport");
        assert_eq!(items[0].category, CATEGORY_REQUIRED);
        assert_eq!(items[1].document_type, "bank_statement", "ids are normalized");
        assert_eq!(items[1].category, CATEGORY_HIGHLY_RECOMMENDED);
        // Unknown type degrades to optional; missing id derives from name.
        assert_eq!(items[2].category, CATEGORY_OPTIONAL);
        assert_eq!(items[2].document_type, "itinerary");
    }

    #[test]
    fn parses_json_inside_markdown_fence() {
        let fenced = format!("Here is your checklist:\n```json\n{PAYLOAD}\n```\nGood luck!");
        let items = parse_checklist_response(&fenced).unwrap();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn parses_json_inside_anonymous_fence() {
        let fenced = format!("```\n{PAYLOAD}\n```");
        let items = parse_checklist_response(&fenced).unwrap();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn extracts_object_from_surrounding_prose() {
        let noisy = format!("Sure! {PAYLOAD} Let me know if you need more.");
        let items = parse_checklist_response(&noisy).unwrap();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn rejects_response_without_json() {
        let err = parse_checklist_response("I cannot help with that.").unwrap_err();
        assert!(err.contains("no JSON object"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_checklist_response("{\"checklist\": [oops]}").unwrap_err();
        assert!(err.contains("did not parse"));
    }

    #[test]
    fn missing_checklist_field_yields_empty_items() {
        let items = parse_checklist_response(r#"{"type": "checklist"}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn items_are_priority_ordered() {
        let items = parse_checklist_response(PAYLOAD).unwrap();
        assert_eq!(
            items.iter().map(|i| i.priority).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn blank_names_are_dropped() {
        let payload = r#"{"checklist": [{"name": "  "}, {"name": "Passport"}]}"#;
        let items = parse_checklist_response(payload).unwrap();
        assert_eq!(items.len(), 1);
    }
}
