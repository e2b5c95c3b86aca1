//! AI-fallback collaborator client.
//!
//! When no approved rule set exists for a (country, visa type) key, the
//! checklist engine asks an OpenAI-compatible chat-completions endpoint
//! to draft the checklist. The service is treated as untrusted: its
//! output is extracted, parsed, and validated before a single item is
//! accepted, and the engine retries or fails explicitly rather than
//! serving a thin or malformed checklist.

pub mod client;
pub mod parser;
pub mod prompt;

pub use client::{AiClient, AiClientConfig, AiClientError};
