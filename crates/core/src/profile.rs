//! Applicant profile: transient input used to filter and annotate rule
//! items. Never persisted as part of a rule.

use serde::{Deserialize, Serialize};

/// The applicant pays for the trip themselves.
pub const SPONSOR_SELF: &str = "self";

/// A third party (relative, employer, host) covers the trip.
pub const SPONSOR_THIRD_PARTY: &str = "third_party";

/// Employment status values understood by rule conditions.
pub const EMPLOYMENT_EMPLOYED: &str = "employed";
pub const EMPLOYMENT_SELF_EMPLOYED: &str = "self_employed";
pub const EMPLOYMENT_STUDENT: &str = "student";
pub const EMPLOYMENT_UNEMPLOYED: &str = "unemployed";

/// Snapshot of the applicant's circumstances at generation time.
///
/// All fields are optional: questionnaires are filled in over time and a
/// partially-known profile must still produce a checklist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicantProfile {
    /// Applicant age in years.
    pub age: Option<i32>,
    /// Citizenship as a raw country string (normalized by the caller).
    pub citizenship: Option<String>,
    /// Who pays: [`SPONSOR_SELF`] or [`SPONSOR_THIRD_PARTY`].
    pub sponsor_type: Option<String>,
    /// One of the `EMPLOYMENT_*` values.
    pub employment_status: Option<String>,
    /// Marital status as a free string (`"married"`, `"single"`, ...).
    pub marital_status: Option<String>,
    /// Owns property in the home country.
    pub owns_property: Option<bool>,
    /// Has immediate family remaining in the home country.
    pub has_family_ties: Option<bool>,
    /// Has previously been refused a visa for any country.
    pub prior_refusals: Option<bool>,
    /// Countries visited in the last years, raw strings.
    #[serde(default)]
    pub travel_history: Vec<String>,
    /// Document types the applicant reports already possessing.
    #[serde(default)]
    pub possessed_document_types: Vec<String>,
}
