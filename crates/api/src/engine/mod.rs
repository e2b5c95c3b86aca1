//! Checklist generation engine.
//!
//! Composes the normalization tables, the rule-set store, and the AI
//! collaborator into the rules-first / AI-fallback generation decision,
//! and persists the result. Synchronous and stateless per call; callers
//! poll the checklist status rather than block on slow generations.

pub mod generator;
