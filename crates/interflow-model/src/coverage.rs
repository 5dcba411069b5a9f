use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::parse_date;
use crate::enums::CoverageState;

/// Coverage computed for one need by the coverage pass.
///
/// The identifier is produced by that pass and is not guaranteed to match
/// [`Need::id`](crate::Need::id); correspondence is established by content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRecord {
    #[serde(alias = "besoin_id")]
    pub id: String,
    #[serde(alias = "quantite_besoin", alias = "quantite")]
    pub quantity: f64,
    /// ISO 8601 due date or timestamp, as emitted by the coverage pass.
    #[serde(alias = "echeance")]
    pub due: String,
    #[serde(alias = "etat_couverture", alias = "etat")]
    pub state: CoverageState,
    #[serde(default, alias = "quantite_disponible_couverture")]
    pub available_quantity: f64,
    #[serde(default, alias = "pourcentage_couverture")]
    pub percent_covered: f64,
    #[serde(default, alias = "stock_restant_apres_consommation")]
    pub remaining_stock: f64,
}

impl CoverageRecord {
    /// Calendar date of the due timestamp, ignoring time of day.
    pub fn due_date(&self) -> Option<NaiveDate> {
        parse_date(&self.due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_date_ignores_time_of_day() {
        let record = CoverageRecord {
            id: "X".to_string(),
            quantity: 1.0,
            due: "2024-06-01T23:59:00".to_string(),
            state: CoverageState::Covered,
            available_quantity: 1.0,
            percent_covered: 100.0,
            remaining_stock: 0.0,
        };
        assert_eq!(record.due_date(), NaiveDate::from_ymd_opt(2024, 6, 1));
    }
}
