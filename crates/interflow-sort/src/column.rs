//! Sortable column declarations.
//!
//! A screen declares each sortable column once. The declaration names the
//! column key, the semantic type used for comparison, an optional field to
//! read values from and an optional fixed-direction tie-break.

use serde::{Deserialize, Serialize};

use crate::compare::SortType;
use crate::state::SortDirection;

/// Secondary key consulted only when the primary comparison is equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieBreak {
    pub key: String,
    pub sort_type: SortType,
    /// Fixed; does not follow the primary column's toggle.
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: String,
    pub sort_type: SortType,
    pub sort_key: Option<String>,
    pub secondary: Option<TieBreak>,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, sort_type: SortType) -> Self {
        Self {
            key: key.into(),
            sort_type,
            sort_key: None,
            secondary: None,
        }
    }

    #[must_use]
    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }

    #[must_use]
    pub fn with_secondary(
        mut self,
        key: impl Into<String>,
        sort_type: SortType,
        direction: SortDirection,
    ) -> Self {
        self.secondary = Some(TieBreak {
            key: key.into(),
            sort_type,
            direction,
        });
        self
    }

    /// Field the values are read from: `sort_key` when declared, else `key`.
    pub fn value_key(&self) -> &str {
        self.sort_key.as_deref().unwrap_or(&self.key)
    }
}

/// Untyped column declaration, as supplied by screen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDecl {
    pub key: String,
    #[serde(rename = "type", default)]
    pub sort_type: Option<String>,
    #[serde(default)]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub secondary_key: Option<String>,
    #[serde(default)]
    pub secondary_type: Option<String>,
    #[serde(default)]
    pub secondary_direction: Option<String>,
}

impl TryFrom<ColumnDecl> for ColumnSpec {
    type Error = String;

    fn try_from(decl: ColumnDecl) -> Result<Self, Self::Error> {
        if decl.key.trim().is_empty() {
            return Err("column key is empty".to_string());
        }
        let sort_type = parse_type(decl.sort_type.as_deref())?;
        let mut spec = ColumnSpec::new(decl.key, sort_type);
        spec.sort_key = decl.sort_key.filter(|k| !k.trim().is_empty());
        if let Some(key) = decl.secondary_key.filter(|k| !k.trim().is_empty()) {
            let sort_type = parse_type(decl.secondary_type.as_deref())?;
            let direction = match decl.secondary_direction.as_deref() {
                None | Some("") => SortDirection::Ascending,
                Some(value) => SortDirection::parse(value)
                    .ok_or_else(|| format!("Unknown sort direction: {value}"))?,
            };
            spec = spec.with_secondary(key, sort_type, direction);
        }
        Ok(spec)
    }
}

fn parse_type(value: Option<&str>) -> Result<SortType, String> {
    match value {
        None | Some("") => Ok(SortType::String),
        Some(value) => value.parse(),
    }
}

/// Convert declarations, dropping (and logging) the ones that do not parse.
///
/// A dropped column is simply not sortable: sorting on it leaves the order
/// unchanged.
pub fn columns_from_decls(decls: Vec<ColumnDecl>) -> Vec<ColumnSpec> {
    decls
        .into_iter()
        .filter_map(|decl| {
            let key = decl.key.clone();
            match ColumnSpec::try_from(decl) {
                Ok(spec) => Some(spec),
                Err(reason) => {
                    tracing::warn!(column = %key, %reason, "ignoring invalid column declaration");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_defaults_to_string_type() {
        let spec = ColumnSpec::try_from(ColumnDecl {
            key: "nom".to_string(),
            ..ColumnDecl::default()
        })
        .unwrap();
        assert_eq!(spec.sort_type, SortType::String);
        assert_eq!(spec.value_key(), "nom");
        assert!(spec.secondary.is_none());
    }

    #[test]
    fn declaration_parses_from_json() {
        let decls: Vec<ColumnDecl> = serde_json::from_str(
            r#"[
                {"key": "echeance", "type": "date", "sortKey": "echeanceIso",
                 "secondaryKey": "code", "secondaryDirection": "desc"},
                {"key": "broken", "type": "colour"}
            ]"#,
        )
        .unwrap();
        let columns = columns_from_decls(decls);
        assert_eq!(columns.len(), 1);
        let spec = &columns[0];
        assert_eq!(spec.value_key(), "echeanceIso");
        let tie = spec.secondary.as_ref().unwrap();
        assert_eq!(tie.key, "code");
        assert_eq!(tie.sort_type, SortType::String);
        assert_eq!(tie.direction, SortDirection::Descending);
    }
}
