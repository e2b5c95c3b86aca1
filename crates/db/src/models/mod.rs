pub mod application;
pub mod document_checklist;
pub mod user_document;
pub mod visa_rule_set;
