//! Materials and needs ("besoins").

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dates::{format_iso, parse_datetime};
use crate::enums::CoverageState;
use crate::error::ModelError;

/// A raw material, identified by its code MP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(rename = "code_mp")]
    pub code: String,
    #[serde(rename = "nom", default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Material {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
        }
    }
}

/// A required quantity of a material by a due date, optionally scoped to a lot.
///
/// An empty lot means the need applies across all lots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NeedRecord", into = "NeedRecord")]
pub struct Need {
    pub material: Material,
    pub quantity: f64,
    pub due: NaiveDateTime,
    pub lot: String,
    pub state: CoverageState,
}

impl Need {
    pub fn new(
        material: Material,
        quantity: f64,
        due: NaiveDateTime,
        lot: impl Into<String>,
        state: CoverageState,
    ) -> Self {
        Self {
            material,
            quantity,
            due,
            lot: lot.into().trim().to_string(),
            state,
        }
    }

    /// Derived identifier: `CODE_YYYYMMDD` or `CODE_YYYYMMDD_LOT`.
    pub fn id(&self) -> String {
        let date = self.due.format("%Y%m%d");
        let lot = self.lot.trim();
        if lot.is_empty() {
            format!("{}_{}", self.material.code, date)
        } else {
            format!("{}_{}_{}", self.material.code, date, lot)
        }
    }

    pub fn material_code(&self) -> &str {
        &self.material.code
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due.date()
    }

    pub fn has_lot(&self) -> bool {
        !self.lot.trim().is_empty()
    }

    /// Copy of this need carrying another state.
    pub fn with_state(&self, state: CoverageState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }
}

/// Backend wire shape of a need.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NeedRecord {
    #[serde(default, skip_deserializing)]
    id: Option<String>,
    matiere: Material,
    quantite: f64,
    echeance: String,
    #[serde(default)]
    etat: Option<String>,
    #[serde(default)]
    lot: Option<String>,
}

impl TryFrom<NeedRecord> for Need {
    type Error = ModelError;

    fn try_from(record: NeedRecord) -> Result<Self, Self::Error> {
        if record.matiere.code.trim().is_empty() {
            return Err(ModelError::MissingField("matiere.code_mp"));
        }
        if !record.quantite.is_finite() || record.quantite < 0.0 {
            return Err(ModelError::InvalidQuantity(record.quantite.to_string()));
        }
        let due = parse_datetime(&record.echeance)
            .ok_or_else(|| ModelError::InvalidDate(record.echeance.clone()))?;
        let state = record
            .etat
            .as_deref()
            .map(CoverageState::parse_lenient)
            .unwrap_or_default();
        Ok(Need::new(
            record.matiere,
            record.quantite,
            due,
            record.lot.unwrap_or_default(),
            state,
        ))
    }
}

impl From<Need> for NeedRecord {
    fn from(need: Need) -> Self {
        NeedRecord {
            id: Some(need.id()),
            echeance: format_iso(&need.due),
            etat: Some(need.state.as_str().to_string()),
            lot: Some(need.lot),
            quantite: need.quantity,
            matiere: need.material,
        }
    }
}
