//! Tests for interflow-model wire formats.

use chrono::NaiveDate;
use interflow_model::{
    CoverageRecord, CoverageState, Need, ReceptionLine, RepatriationLine, StockLine,
};

#[test]
fn need_decodes_backend_shape() {
    let json = r#"{
        "id": "ignored",
        "matiere": {"code_mp": "H2SO4", "nom": "Acide sulfurique"},
        "quantite": 100.0,
        "echeance": "2024-06-01T00:00:00",
        "etat": "partiel",
        "lot": "L1"
    }"#;
    let need: Need = serde_json::from_str(json).expect("decode need");
    assert_eq!(need.material.code, "H2SO4");
    assert_eq!(need.id(), "H2SO4_20240601_L1");
    assert_eq!(need.state, CoverageState::Partial);
    assert_eq!(need.due_date(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
}

#[test]
fn need_defaults_missing_state_and_lot() {
    let json = r#"{
        "matiere": {"code_mp": "M1", "nom": "Soude"},
        "quantite": 3,
        "echeance": "2024-02-03"
    }"#;
    let need: Need = serde_json::from_str(json).expect("decode need");
    assert_eq!(need.state, CoverageState::Unknown);
    assert_eq!(need.lot, "");
    assert_eq!(need.id(), "M1_20240203");
}

#[test]
fn need_rejects_bad_date() {
    let json = r#"{
        "matiere": {"code_mp": "M1", "nom": "Soude"},
        "quantite": 3,
        "echeance": "tomorrow"
    }"#;
    let err = serde_json::from_str::<Need>(json).unwrap_err();
    assert!(err.to_string().contains("invalid date"));
}

#[test]
fn need_serializes_with_derived_id() {
    let json = r#"{
        "matiere": {"code_mp": "M1", "nom": "Soude"},
        "quantite": 3,
        "echeance": "2024-02-03",
        "etat": "COUVERT"
    }"#;
    let need: Need = serde_json::from_str(json).unwrap();
    let value = serde_json::to_value(&need).unwrap();
    assert_eq!(value["id"], "M1_20240203");
    assert_eq!(value["etat"], "couvert");
    assert_eq!(value["echeance"], "2024-02-03T00:00:00");
}

#[test]
fn coverage_record_accepts_api_field_names() {
    let json = r#"{
        "besoin_id": "H2SO4_20240601",
        "quantite_besoin": 100.0,
        "echeance": "2024-06-01T00:00:00Z",
        "etat_couverture": "COUVERT",
        "quantite_disponible_couverture": 100.0,
        "pourcentage_couverture": 100.0,
        "stock_restant_apres_consommation": 20.0
    }"#;
    let record: CoverageRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.state, CoverageState::Covered);
    assert_eq!(record.remaining_stock, 20.0);
    assert_eq!(record.due_date(), NaiveDate::from_ymd_opt(2024, 6, 1));
}

#[test]
fn stock_and_repatriation_lines_decode() {
    let stock: StockLine =
        serde_json::from_str(r#"{"code_mp": "M1", "quantite": 4.5, "magasin": "0102"}"#).unwrap();
    assert!(stock.internal);
    assert_eq!(stock.store, "0102");

    let line: RepatriationLine = serde_json::from_str(
        r#"{"code_prdt": "X-m1-BIG", "designation_prdt": "Drum", "poids_net": 12.0}"#,
    )
    .unwrap();
    assert!(line.concerns("M1"));
    assert!(!line.concerns("M2"));
}

#[test]
fn reception_defaults_to_in_progress() {
    let json = r#"[
        {"matiere": {"code_mp": "M63244", "nom": "Acide"}, "quantite": 25},
        {"matiere": {"code_mp": "M63244"}, "quantite": 5, "etat": "terminée"}
    ]"#;
    let receptions: Vec<ReceptionLine> = serde_json::from_str(json).unwrap();
    assert!(receptions[0].is_in_progress());
    assert!(!receptions[1].is_in_progress());
    assert_eq!(receptions[0].material.code, "M63244");
}
