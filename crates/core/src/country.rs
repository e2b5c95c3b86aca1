//! Country registry: canonical ISO-3166 codes with alias resolution.
//!
//! The registry is an immutable value built once at process start and
//! injected into the engine (never ambient global state), so tests can
//! substitute fixture tables. It combines a curated table of countries the
//! product actively supports with a wider static ISO reference list used
//! as a secondary lookup for codes and names we do not curate.

use serde::Serialize;

use crate::canonical::Canonicalized;
use crate::visa_type::{CATEGORY_STUDENT, CATEGORY_TOURIST};

/// Canonical configuration for one supported country.
///
/// Immutable reference data; `aliases` holds alternate codes and spellings
/// matched case-insensitively (e.g. `UK` for `GB`).
#[derive(Debug, Clone, Serialize)]
pub struct CountryConfig {
    /// ISO-3166-1 alpha-2 code, upper-case, unique within the registry.
    pub code: String,
    /// Canonical English name.
    pub name: String,
    /// Whether the country is part of the Schengen area.
    pub schengen: bool,
    /// Alternate codes and names, matched case-insensitively.
    pub aliases: Vec<String>,
    /// Visa categories the product supports for this country.
    pub visa_categories: Vec<String>,
}

/// Static ISO-3166 reference entries: `(code, name, alternate names)`.
///
/// Consulted after the curated table so inputs like `"KR"` or
/// `"Republic of Korea"` resolve even when our curated alias list is
/// incomplete. Not exhaustive; extended as support requests come in.
const ISO_REFERENCE: &[(&str, &str, &[&str])] = &[
    ("AE", "United Arab Emirates", &["UAE", "Emirates"]),
    ("AR", "Argentina", &[]),
    ("AT", "Austria", &[]),
    ("AU", "Australia", &[]),
    ("BE", "Belgium", &[]),
    ("BR", "Brazil", &[]),
    ("CA", "Canada", &[]),
    ("CH", "Switzerland", &["Swiss Confederation"]),
    ("CN", "China", &["People's Republic of China", "PRC"]),
    ("CZ", "Czechia", &["Czech Republic"]),
    ("DE", "Germany", &["Federal Republic of Germany"]),
    ("DK", "Denmark", &[]),
    ("EE", "Estonia", &[]),
    ("EG", "Egypt", &[]),
    ("ES", "Spain", &[]),
    ("FI", "Finland", &[]),
    ("FR", "France", &["French Republic"]),
    ("GB", "United Kingdom", &["UK", "Great Britain", "Britain", "England"]),
    ("GE", "Georgia", &[]),
    ("GR", "Greece", &["Hellenic Republic"]),
    ("HU", "Hungary", &[]),
    ("ID", "Indonesia", &[]),
    ("IE", "Ireland", &[]),
    ("IL", "Israel", &[]),
    ("IN", "India", &[]),
    ("IT", "Italy", &[]),
    ("JP", "Japan", &[]),
    ("KR", "South Korea", &["Republic of Korea", "Korea, Republic of"]),
    ("KZ", "Kazakhstan", &[]),
    ("LT", "Lithuania", &[]),
    ("LV", "Latvia", &[]),
    ("MY", "Malaysia", &[]),
    ("NL", "Netherlands", &["Holland", "The Netherlands"]),
    ("NO", "Norway", &[]),
    ("NZ", "New Zealand", &[]),
    ("PL", "Poland", &[]),
    ("PT", "Portugal", &[]),
    ("QA", "Qatar", &[]),
    ("RU", "Russia", &["Russian Federation"]),
    ("SA", "Saudi Arabia", &["KSA"]),
    ("SE", "Sweden", &[]),
    ("SG", "Singapore", &[]),
    ("TH", "Thailand", &[]),
    ("TR", "Turkey", &["Türkiye", "Turkiye"]),
    ("UA", "Ukraine", &[]),
    ("US", "United States", &["USA", "United States of America", "America"]),
    ("UZ", "Uzbekistan", &["Republic of Uzbekistan"]),
    ("VN", "Vietnam", &["Viet Nam"]),
];

/// Immutable lookup table over the supported countries.
#[derive(Debug, Clone)]
pub struct CountryRegistry {
    countries: Vec<CountryConfig>,
}

impl Default for CountryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CountryRegistry {
    /// Build the registry from the builtin curated table.
    pub fn new() -> Self {
        Self {
            countries: builtin_countries(),
        }
    }

    /// Build a registry from an explicit table (test fixtures).
    pub fn with_countries(countries: Vec<CountryConfig>) -> Self {
        Self { countries }
    }

    /// All registered countries, in table order.
    pub fn all(&self) -> &[CountryConfig] {
        &self.countries
    }

    /// Resolve a code, alias, or (partial) name to a registered country.
    ///
    /// Matching order, first hit wins:
    /// 1. exact canonical code (case-insensitive);
    /// 2. exact code in the ISO reference list, mapped back to a
    ///    registered country;
    /// 3. exact alias match within any registered country;
    /// 4. case-insensitive exact name match;
    /// 5. case-insensitive substring match in either direction between the
    ///    input and the canonical name. Deliberately permissive so partial
    ///    names like "Korea" still find "South Korea".
    pub fn resolve(&self, input: &str) -> Option<&CountryConfig> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lowered = trimmed.to_lowercase();

        // 1. Canonical code.
        if let Some(c) = self
            .countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(trimmed))
        {
            return Some(c);
        }

        // 2. ISO reference code, mapped back into the registry.
        if let Some((code, _, _)) = ISO_REFERENCE
            .iter()
            .find(|(code, _, _)| code.eq_ignore_ascii_case(trimmed))
        {
            if let Some(c) = self.countries.iter().find(|c| c.code == *code) {
                return Some(c);
            }
        }

        // 3. Alias match.
        if let Some(c) = self.countries.iter().find(|c| {
            c.aliases
                .iter()
                .any(|a| a.to_lowercase() == lowered)
        }) {
            return Some(c);
        }

        // 4. Exact name match.
        if let Some(c) = self
            .countries
            .iter()
            .find(|c| c.name.to_lowercase() == lowered)
        {
            return Some(c);
        }

        // 5. Substring match, both directions.
        self.countries.iter().find(|c| {
            let name = c.name.to_lowercase();
            name.contains(&lowered) || lowered.contains(&name)
        })
    }

    /// Normalize a code or name to a canonical ISO code.
    ///
    /// Tries [`resolve`](Self::resolve) first, then the ISO reference list
    /// by name and alternate names. When neither matches, the trimmed
    /// upper-cased input is returned as [`Canonicalized::Fallback`] so
    /// downstream code always receives some string; callers are expected
    /// to log the fallback so operators can extend the tables.
    pub fn normalize(&self, input: &str) -> Canonicalized {
        if let Some(country) = self.resolve(input) {
            return Canonicalized::Resolved(country.code.clone());
        }

        let trimmed = input.trim();
        let lowered = trimmed.to_lowercase();

        // ISO reference by code, name, or alternate name: resolves inputs
        // for countries we have no curated config for yet.
        for (code, name, alt_names) in ISO_REFERENCE {
            if code.eq_ignore_ascii_case(trimmed)
                || name.to_lowercase() == lowered
                || alt_names.iter().any(|a| a.to_lowercase() == lowered)
            {
                return Canonicalized::Resolved((*code).to_string());
            }
        }

        Canonicalized::Fallback(trimmed.to_uppercase())
    }
}

/// The curated country table loaded at process start.
fn builtin_countries() -> Vec<CountryConfig> {
    fn country(
        code: &str,
        name: &str,
        schengen: bool,
        aliases: &[&str],
        visa_categories: &[&str],
    ) -> CountryConfig {
        CountryConfig {
            code: code.to_string(),
            name: name.to_string(),
            schengen,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            visa_categories: visa_categories.iter().map(|v| v.to_string()).collect(),
        }
    }

    let both = &[CATEGORY_TOURIST, CATEGORY_STUDENT];

    vec![
        country("US", "United States", false, &["USA", "United States of America", "America"], both),
        country("GB", "United Kingdom", false, &["UK", "Great Britain", "Britain", "England"], both),
        country("CA", "Canada", false, &[], both),
        country("AU", "Australia", false, &[], both),
        country("DE", "Germany", true, &["Deutschland"], both),
        country("FR", "France", true, &[], both),
        country("ES", "Spain", true, &["España", "Espana"], both),
        country("IT", "Italy", true, &["Italia"], both),
        country("NL", "Netherlands", true, &["Holland", "The Netherlands"], both),
        country("KR", "South Korea", false, &["Korea", "Republic of Korea"], both),
        country("JP", "Japan", false, &[], both),
        country("AE", "United Arab Emirates", false, &["UAE", "Emirates", "Dubai"], &[CATEGORY_TOURIST]),
        country("TR", "Turkey", false, &["Türkiye", "Turkiye"], &[CATEGORY_TOURIST]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_canonical_code_case_insensitive() {
        let registry = CountryRegistry::new();
        assert_eq!(registry.resolve("us").unwrap().code, "US");
        assert_eq!(registry.resolve("Us").unwrap().code, "US");
        assert_eq!(registry.resolve(" GB ").unwrap().code, "GB");
    }

    #[test]
    fn resolve_alias() {
        let registry = CountryRegistry::new();
        assert_eq!(registry.resolve("UK").unwrap().code, "GB");
        assert_eq!(registry.resolve("usa").unwrap().code, "US");
        assert_eq!(registry.resolve("Dubai").unwrap().code, "AE");
    }

    #[test]
    fn resolve_exact_name() {
        let registry = CountryRegistry::new();
        assert_eq!(registry.resolve("united kingdom").unwrap().code, "GB");
        assert_eq!(registry.resolve("South Korea").unwrap().code, "KR");
    }

    #[test]
    fn resolve_partial_name_substring() {
        let registry = CountryRegistry::new();
        // Input contained in canonical name.
        assert_eq!(registry.resolve("Korea").unwrap().code, "KR");
        // Canonical name contained in input.
        assert_eq!(
            registry.resolve("the Netherlands (Holland)").unwrap().code,
            "NL"
        );
    }

    #[test]
    fn resolve_unknown_returns_none() {
        let registry = CountryRegistry::new();
        assert!(registry.resolve("Atlantis").is_none());
        assert!(registry.resolve("").is_none());
        assert!(registry.resolve("   ").is_none());
    }

    #[test]
    fn normalize_resolves_registered_country() {
        let registry = CountryRegistry::new();
        assert_eq!(
            registry.normalize("uk"),
            Canonicalized::Resolved("GB".to_string())
        );
    }

    #[test]
    fn normalize_falls_through_to_iso_reference() {
        let registry = CountryRegistry::new();
        // Brazil has no curated config but exists in the ISO list.
        assert_eq!(
            registry.normalize("Brazil"),
            Canonicalized::Resolved("BR".to_string())
        );
        assert_eq!(
            registry.normalize("br"),
            Canonicalized::Resolved("BR".to_string())
        );
        assert_eq!(
            registry.normalize("Russian Federation"),
            Canonicalized::Resolved("RU".to_string())
        );
    }

    #[test]
    fn normalize_unresolvable_falls_back_to_uppercased_input() {
        let registry = CountryRegistry::new();
        // The permissive contract: garbage is passed through, flagged as a
        // fallback, rather than failing the request.
        assert_eq!(
            registry.normalize(" atlantis "),
            Canonicalized::Fallback("ATLANTIS".to_string())
        );
    }

    #[test]
    fn fixture_registry_is_injectable() {
        let registry = CountryRegistry::with_countries(vec![CountryConfig {
            code: "XX".to_string(),
            name: "Testland".to_string(),
            schengen: false,
            aliases: vec!["TL".to_string()],
            visa_categories: vec![CATEGORY_TOURIST.to_string()],
        }]);
        assert_eq!(registry.resolve("tl").unwrap().code, "XX");
        assert!(registry.resolve("US").is_none());
    }

    #[test]
    fn schengen_flags() {
        let registry = CountryRegistry::new();
        assert!(registry.resolve("DE").unwrap().schengen);
        assert!(!registry.resolve("US").unwrap().schengen);
    }
}
