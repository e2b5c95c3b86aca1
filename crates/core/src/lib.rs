//! Domain logic for the visa document checklist engine.
//!
//! This crate has no internal dependencies so its types and algorithms can
//! be used by the repository layer, the API server, and any future CLI
//! tooling. Everything here is pure computation over immutable reference
//! data; persistence and HTTP live in the sibling crates.

pub mod canonical;
pub mod checklist;
pub mod consistency;
pub mod country;
pub mod document_type;
pub mod error;
pub mod profile;
pub mod rules;
pub mod types;
pub mod visa_type;
