//! Tri-state sort state of a list screen.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an active sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    /// Short token used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Active sort column and direction, or no sort at all.
///
/// `Unsorted` leaves records in their natural order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SortState {
    #[default]
    Unsorted,
    Sorted {
        column: String,
        direction: SortDirection,
    },
}

impl SortState {
    pub fn sorted(column: impl Into<String>, direction: SortDirection) -> Self {
        SortState::Sorted {
            column: column.into(),
            direction,
        }
    }

    /// Next state after a click on a column header.
    ///
    /// The active column cycles ascending, descending, unsorted; any other
    /// column starts ascending.
    #[must_use]
    pub fn toggle(&self, column: &str) -> SortState {
        match self {
            SortState::Sorted {
                column: active,
                direction: SortDirection::Ascending,
            } if active == column => SortState::sorted(column, SortDirection::Descending),
            SortState::Sorted {
                column: active,
                direction: SortDirection::Descending,
            } if active == column => SortState::Unsorted,
            _ => SortState::sorted(column, SortDirection::Ascending),
        }
    }

    pub fn column(&self) -> Option<&str> {
        match self {
            SortState::Sorted { column, .. } => Some(column),
            SortState::Unsorted => None,
        }
    }

    pub fn direction(&self) -> Option<SortDirection> {
        match self {
            SortState::Sorted { direction, .. } => Some(*direction),
            SortState::Unsorted => None,
        }
    }

    pub fn is_sorted(&self) -> bool {
        matches!(self, SortState::Sorted { .. })
    }

    /// Encode as a `(column, direction)` pair of filter values.
    ///
    /// `Unsorted` encodes as two empty strings so it matches the defaults.
    pub fn to_params(&self) -> (String, String) {
        match self {
            SortState::Sorted { column, direction } => {
                (column.clone(), direction.as_str().to_string())
            }
            SortState::Unsorted => (String::new(), String::new()),
        }
    }

    /// Decode from a `(column, direction)` pair; anything incomplete is unsorted.
    pub fn from_params(column: &str, direction: &str) -> SortState {
        let column = column.trim();
        match SortDirection::parse(direction) {
            Some(direction) if !column.is_empty() => SortState::sorted(column, direction),
            _ => SortState::Unsorted,
        }
    }
}
