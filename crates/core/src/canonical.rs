//! Outcome type for country and visa-type normalization.
//!
//! Normalization never hard-fails: an unresolvable input is coerced to a
//! best-effort value so downstream lookups always receive *some* string.
//! [`Canonicalized`] keeps that coercion explicit so callers can decide to
//! proceed (the default) or reject, and so the fallback can be logged for
//! operators to extend the alias tables.

use serde::Serialize;

/// Result of normalizing a raw country or visa-type string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "resolution", content = "value", rename_all = "snake_case")]
pub enum Canonicalized {
    /// The input resolved to a known canonical value.
    Resolved(String),
    /// No canonical match; carries the cleaned-up input unchanged.
    Fallback(String),
}

impl Canonicalized {
    /// The canonical (or best-effort) value.
    pub fn value(&self) -> &str {
        match self {
            Canonicalized::Resolved(v) | Canonicalized::Fallback(v) => v,
        }
    }

    /// Consume and return the canonical (or best-effort) value.
    pub fn into_value(self) -> String {
        match self {
            Canonicalized::Resolved(v) | Canonicalized::Fallback(v) => v,
        }
    }

    /// Whether the input resolved to a known canonical value.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Canonicalized::Resolved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_accessors() {
        let resolved = Canonicalized::Resolved("US".to_string());
        assert_eq!(resolved.value(), "US");
        assert!(resolved.is_resolved());

        let fallback = Canonicalized::Fallback("NARNIA".to_string());
        assert_eq!(fallback.value(), "NARNIA");
        assert!(!fallback.is_resolved());
        assert_eq!(fallback.into_value(), "NARNIA");
    }
}
