//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod application_repo;
pub mod consistency_repo;
pub mod document_checklist_repo;
pub mod user_document_repo;
pub mod visa_rule_set_repo;

pub use application_repo::ApplicationRepo;
pub use consistency_repo::ConsistencyRepo;
pub use document_checklist_repo::DocumentChecklistRepo;
pub use user_document_repo::UserDocumentRepo;
pub use visa_rule_set_repo::VisaRuleSetRepo;
