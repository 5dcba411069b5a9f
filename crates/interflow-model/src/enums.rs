//! Coverage state of a need.
//!
//! The backend writes states as lower-case French labels (`couvert`,
//! `partiel`, ...) while the coverage pass historically emitted upper-case
//! tokens (`COUVERT`, `NON_COUVERT`). Both spellings are accepted; anything
//! else decodes as [`CoverageState::Unknown`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coverage state of a need, declared by the backend or computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CoverageState {
    /// Not analysed yet.
    #[default]
    Unknown,
    /// Some stock is available, but not the full quantity.
    Partial,
    /// The full quantity is available.
    Covered,
    /// Nothing is available.
    NotCovered,
}

impl CoverageState {
    pub const ALL: [CoverageState; 4] = [
        CoverageState::Unknown,
        CoverageState::Partial,
        CoverageState::Covered,
        CoverageState::NotCovered,
    ];

    /// Returns the label used in URLs, filters and backend payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageState::Unknown => "inconnu",
            CoverageState::Partial => "partiel",
            CoverageState::Covered => "couvert",
            CoverageState::NotCovered => "non_couvert",
        }
    }

    /// Parse a label, falling back to `Unknown` for unrecognised input.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for CoverageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CoverageState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "inconnu" | "unknown" => Ok(CoverageState::Unknown),
            "partiel" | "partial" | "partially_covered" => Ok(CoverageState::Partial),
            "couvert" | "covered" => Ok(CoverageState::Covered),
            "non_couvert" | "not_covered" => Ok(CoverageState::NotCovered),
            _ => Err(format!("Unknown coverage state: {s}")),
        }
    }
}

impl From<String> for CoverageState {
    fn from(value: String) -> Self {
        CoverageState::parse_lenient(&value)
    }
}

impl From<CoverageState> for String {
    fn from(value: CoverageState) -> Self {
        value.as_str().to_string()
    }
}
