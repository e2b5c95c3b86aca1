//! Per-country visa-type alias normalization.
//!
//! Upload clients and older application rows carry colloquial visa-type
//! spellings ("visitor", "standard visitor", "B1/B2"); rule sets are keyed
//! by the shared canonical vocabulary ("tourist", "student"). The alias
//! table maps one to the other per country. Countries absent from the
//! table pass the lower-cased input through unchanged, which keeps the
//! flow alive but silently misses rules keyed on the shared vocabulary --
//! exactly the failure mode the consistency checker reports on.

use std::collections::HashMap;

use crate::canonical::Canonicalized;

/// Canonical visa category: short-stay visits and tourism.
pub const CATEGORY_TOURIST: &str = "tourist";

/// Canonical visa category: study at a recognized institution.
pub const CATEGORY_STUDENT: &str = "student";

/// The shared canonical vocabulary. Open-ended: countries may register
/// additional categories, but these two are always understood.
pub const SHARED_CATEGORIES: &[&str] = &[CATEGORY_TOURIST, CATEGORY_STUDENT];

/// Immutable per-country alias table.
///
/// Keys are upper-case ISO country codes; each entry maps lower-cased
/// colloquial spellings to a canonical category.
#[derive(Debug, Clone)]
pub struct VisaTypeAliases {
    by_country: HashMap<String, HashMap<String, String>>,
}

impl Default for VisaTypeAliases {
    fn default() -> Self {
        Self::new()
    }
}

impl VisaTypeAliases {
    /// Build the builtin alias table.
    pub fn new() -> Self {
        let mut by_country = HashMap::new();

        let entries: &[(&str, &[(&str, &str)])] = &[
            (
                "US",
                &[
                    ("visitor", CATEGORY_TOURIST),
                    ("b1/b2", CATEGORY_TOURIST),
                    ("b1-b2", CATEGORY_TOURIST),
                    ("b2", CATEGORY_TOURIST),
                    ("f1", CATEGORY_STUDENT),
                    ("f-1", CATEGORY_STUDENT),
                    ("academic", CATEGORY_STUDENT),
                ],
            ),
            (
                "GB",
                &[
                    ("visitor", CATEGORY_TOURIST),
                    ("standard visitor", CATEGORY_TOURIST),
                    ("student route", CATEGORY_STUDENT),
                    ("tier 4", CATEGORY_STUDENT),
                ],
            ),
            (
                "CA",
                &[
                    ("visitor", CATEGORY_TOURIST),
                    ("trv", CATEGORY_TOURIST),
                    ("temporary resident visa", CATEGORY_TOURIST),
                    ("study permit", CATEGORY_STUDENT),
                ],
            ),
            (
                "AU",
                &[
                    ("visitor", CATEGORY_TOURIST),
                    ("subclass 600", CATEGORY_TOURIST),
                    ("subclass 500", CATEGORY_STUDENT),
                ],
            ),
            (
                "DE",
                &[
                    ("schengen", CATEGORY_TOURIST),
                    ("c visa", CATEGORY_TOURIST),
                    ("short stay", CATEGORY_TOURIST),
                    ("national visa", CATEGORY_STUDENT),
                ],
            ),
            (
                "FR",
                &[
                    ("schengen", CATEGORY_TOURIST),
                    ("short stay", CATEGORY_TOURIST),
                    ("etudiant", CATEGORY_STUDENT),
                ],
            ),
            (
                "ES",
                &[("schengen", CATEGORY_TOURIST), ("short stay", CATEGORY_TOURIST)],
            ),
            (
                "IT",
                &[("schengen", CATEGORY_TOURIST), ("short stay", CATEGORY_TOURIST)],
            ),
            (
                "NL",
                &[("schengen", CATEGORY_TOURIST), ("short stay", CATEGORY_TOURIST)],
            ),
            (
                "KR",
                &[
                    ("c-3", CATEGORY_TOURIST),
                    ("c3", CATEGORY_TOURIST),
                    ("d-2", CATEGORY_STUDENT),
                ],
            ),
            (
                "JP",
                &[
                    ("temporary visitor", CATEGORY_TOURIST),
                    ("visitor", CATEGORY_TOURIST),
                ],
            ),
            ("AE", &[("visit", CATEGORY_TOURIST), ("visitor", CATEGORY_TOURIST)]),
            ("TR", &[("visitor", CATEGORY_TOURIST), ("e-visa", CATEGORY_TOURIST)]),
        ];

        for (code, aliases) in entries {
            let map: HashMap<String, String> = aliases
                .iter()
                .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
                .collect();
            by_country.insert((*code).to_string(), map);
        }

        Self { by_country }
    }

    /// Build an alias table from explicit entries (test fixtures).
    pub fn with_entries(entries: &[(&str, &str, &str)]) -> Self {
        let mut by_country: HashMap<String, HashMap<String, String>> = HashMap::new();
        for (country, from, to) in entries {
            by_country
                .entry((*country).to_uppercase())
                .or_default()
                .insert((*from).to_lowercase(), (*to).to_lowercase());
        }
        Self { by_country }
    }

    /// Normalize a raw visa-type string for the given country.
    ///
    /// The input is trimmed and lower-cased, then looked up in the
    /// country's alias map. Already-canonical values pass through as
    /// [`Canonicalized::Resolved`] unchanged, which makes normalization
    /// idempotent. Unknown values (or an unknown country) pass through
    /// lower-cased as [`Canonicalized::Fallback`].
    pub fn normalize(&self, country_code: &str, raw_visa_type: &str) -> Canonicalized {
        let lowered = raw_visa_type.trim().to_lowercase();

        // Canonical values map to themselves regardless of the country.
        if SHARED_CATEGORIES.contains(&lowered.as_str()) {
            return Canonicalized::Resolved(lowered);
        }

        let country_map = self.by_country.get(&country_code.trim().to_uppercase());

        if let Some(map) = country_map {
            // A value some alias maps *to* is canonical for this country.
            if map.values().any(|v| v == &lowered) {
                return Canonicalized::Resolved(lowered);
            }
            if let Some(canonical) = map.get(&lowered) {
                return Canonicalized::Resolved(canonical.clone());
            }
        }

        Canonicalized::Fallback(lowered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_maps_to_canonical() {
        let aliases = VisaTypeAliases::new();
        assert_eq!(
            aliases.normalize("GB", "Standard Visitor"),
            Canonicalized::Resolved("tourist".to_string())
        );
        assert_eq!(
            aliases.normalize("US", "B1/B2"),
            Canonicalized::Resolved("tourist".to_string())
        );
        assert_eq!(
            aliases.normalize("US", "F-1"),
            Canonicalized::Resolved("student".to_string())
        );
    }

    #[test]
    fn canonical_value_passes_through_resolved() {
        let aliases = VisaTypeAliases::new();
        assert_eq!(
            aliases.normalize("US", "tourist"),
            Canonicalized::Resolved("tourist".to_string())
        );
        // Even for a country absent from the table.
        assert_eq!(
            aliases.normalize("ZZ", "student"),
            Canonicalized::Resolved("student".to_string())
        );
    }

    #[test]
    fn unknown_country_passes_input_through_lowercased() {
        let aliases = VisaTypeAliases::new();
        assert_eq!(
            aliases.normalize("ZZ", " Working Holiday "),
            Canonicalized::Fallback("working holiday".to_string())
        );
    }

    #[test]
    fn alias_miss_passes_input_through_lowercased() {
        // A country whose local terminology is not yet in the table: the
        // value flows on unchanged and will not match rules keyed on the
        // shared vocabulary.
        let aliases = VisaTypeAliases::with_entries(&[("CA", "study permit", "student")]);
        assert_eq!(
            aliases.normalize("CA", "Visitor"),
            Canonicalized::Fallback("visitor".to_string())
        );

        // Once the alias is added, the same input resolves.
        let fixed = VisaTypeAliases::with_entries(&[
            ("CA", "study permit", "student"),
            ("CA", "visitor", "tourist"),
        ]);
        assert_eq!(
            fixed.normalize("CA", "Visitor"),
            Canonicalized::Resolved("tourist".to_string())
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let aliases = VisaTypeAliases::new();
        let inputs = [
            ("US", "Visitor"),
            ("US", "tourist"),
            ("GB", "TIER 4"),
            ("ZZ", "Working Holiday"),
            ("CA", "Study Permit"),
        ];
        for (country, raw) in inputs {
            let once = aliases.normalize(country, raw);
            let twice = aliases.normalize(country, once.value());
            assert_eq!(
                once.value(),
                twice.value(),
                "normalize({country}, {raw}) is not idempotent"
            );
        }
    }

    #[test]
    fn alias_target_is_resolved_for_country() {
        // "c-3" maps to tourist for KR; "tourist" itself must therefore be
        // recognized as canonical there.
        let aliases = VisaTypeAliases::new();
        assert_eq!(
            aliases.normalize("KR", "C-3"),
            Canonicalized::Resolved("tourist".to_string())
        );
        assert_eq!(
            aliases.normalize("KR", "tourist"),
            Canonicalized::Resolved("tourist".to_string())
        );
    }
}
