//! Stock, repatriation and reception lines consumed by the coverage pass.

use serde::{Deserialize, Serialize};

use crate::need::Material;

/// Quantity of a material held in a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLine {
    #[serde(alias = "code_mp", alias = "article")]
    pub material_code: String,
    #[serde(alias = "quantite")]
    pub quantity: f64,
    #[serde(default, alias = "magasin")]
    pub store: String,
    /// Internal stock counts toward coverage; external stores are informative.
    #[serde(default = "default_internal", alias = "interne")]
    pub internal: bool,
}

fn default_internal() -> bool {
    true
}

/// One product line of a repatriation shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepatriationLine {
    #[serde(alias = "code_prdt")]
    pub product_code: String,
    #[serde(default, alias = "designation_prdt")]
    pub designation: String,
    #[serde(alias = "poids_net")]
    pub net_weight: f64,
}

impl RepatriationLine {
    /// Product code or designation contains the material code (case-insensitive).
    pub fn concerns(&self, material_code: &str) -> bool {
        let code = material_code.to_lowercase();
        if code.is_empty() {
            return false;
        }
        self.product_code.to_lowercase().contains(&code)
            || self.designation.to_lowercase().contains(&code)
    }
}

/// A supplier or internal reception of a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceptionLine {
    #[serde(alias = "matiere")]
    pub material: Material,
    #[serde(alias = "quantite")]
    pub quantity: f64,
    #[serde(default)]
    pub lot: String,
    /// `en_cours`, `terminée`, `annulée`, `relâché` or `en_attente`.
    #[serde(default = "default_reception_status", alias = "etat")]
    pub status: String,
}

fn default_reception_status() -> String {
    RECEPTION_IN_PROGRESS.to_string()
}

pub const RECEPTION_IN_PROGRESS: &str = "en_cours";

impl ReceptionLine {
    pub fn is_in_progress(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(RECEPTION_IN_PROGRESS)
    }
}
