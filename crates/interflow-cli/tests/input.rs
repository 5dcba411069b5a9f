use std::fs;

use chrono::NaiveDate;
use tempfile::TempDir;

use interflow_cli::input::{load_coverage, load_needs, parse_needs_csv};
use interflow_model::CoverageState;

/// Planning export: six preamble lines, the due date line, then materials.
fn export(rows: &[&str]) -> String {
    let mut lines = vec![
        "Planning besoins MP",
        "Site,Usine 1",
        "",
        "Edité le,01/06/2024",
        "",
        ",Code MP,Libellé MP,Mag Appro Ext,Stock dispo 0102,,,Qté Besoin total,,Semaine",
        ",,,,,,,,,03/06/2024,2024-06-10,S25,17/06/2024",
    ];
    lines.extend_from_slice(rows);
    lines.join("\n")
}

#[test]
fn pivot_export_yields_one_need_per_dated_cell() {
    let content = export(&[
        r#","M63244,Acide sulfurique,0,120,,,"1 250,5",,"1 000,5",250,999,0"#,
        ",NAOH1,Soude,,,,,12,,,,,12",
    ]);
    let needs = parse_needs_csv(&format!("\u{feff}{content}")).unwrap();

    let summary: Vec<_> = needs.iter().map(|n| (n.id(), n.quantity)).collect();
    assert_eq!(
        summary,
        vec![
            ("M63244_20240603".to_string(), 1000.5),
            ("M63244_20240610".to_string(), 250.0),
            ("NAOH1_20240617".to_string(), 12.0),
        ]
    );
    assert_eq!(needs[0].material.name, "Acide sulfurique");
    assert_eq!(
        needs[0].due,
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(0, 0, 0).unwrap()
    );
    assert!(needs.iter().all(|n| !n.has_lot()));
    assert!(needs.iter().all(|n| n.state == CoverageState::Unknown));
}

#[test]
fn rows_without_a_usable_code_are_skipped() {
    let content = export(&[
        ",67,Sous-total,,,,,,,10",
        ",nan,,,,,,,,10",
        ",AB,Trop court,,,,,,,10",
        ",H2O2,,,,,,,,10",
        "Total",
        ",H2O2,Eau oxygénée,,,,,,,4",
    ]);
    let needs = parse_needs_csv(&content).unwrap();

    assert_eq!(needs.len(), 1);
    assert_eq!(needs[0].id(), "H2O2_20240603");
}

#[test]
fn unreadable_quantities_are_skipped() {
    let content = export(&[",M63244,Acide,,,,,,,beaucoup,-5,1,\u{202f}7\u{202f}500"]);
    let needs = parse_needs_csv(&content).unwrap();

    assert_eq!(needs.len(), 1);
    assert_eq!(needs[0].id(), "M63244_20240617");
    assert_eq!(needs[0].quantity, 7500.0);
}

#[test]
fn export_without_due_date_line_is_empty() {
    let needs = parse_needs_csv("Code MP,Libellé MP\nM63244,Acide\n").unwrap();
    assert!(needs.is_empty());
}

#[test]
fn semicolon_export_is_read() {
    let content = export(&[]).replace(',', ";") + "\n;M63244;Acide;;;;;;;3";
    let needs = parse_needs_csv(&content).unwrap();
    assert_eq!(needs.len(), 1);
    assert_eq!(needs[0].quantity, 3.0);
}

#[test]
fn json_inputs_use_backend_field_names() {
    let dir = TempDir::new().unwrap();
    let needs_path = dir.path().join("besoins.json");
    fs::write(
        &needs_path,
        r#"[{"id": 7, "matiere": {"code_mp": "H2SO4", "nom": "Acide"},
             "quantite": 100, "echeance": "2024-06-01T08:00:00", "etat": "PARTIEL"}]"#,
    )
    .unwrap();
    let coverage_path = dir.path().join("couverture.json");
    fs::write(
        &coverage_path,
        r#"[{"besoin_id": "H2SO4_20240601", "quantite_besoin": 100,
             "echeance": "2024-06-01", "etat_couverture": "couvert"}]"#,
    )
    .unwrap();

    let needs = load_needs(&needs_path).unwrap();
    assert_eq!(needs[0].id(), "H2SO4_20240601");
    assert_eq!(needs[0].state, CoverageState::Partial);

    let records = load_coverage(&coverage_path).unwrap();
    assert_eq!(records[0].state, CoverageState::Covered);
}

#[test]
fn missing_input_reports_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    let error = load_coverage(&path).unwrap_err();
    assert!(format!("{error:#}").contains("absent.json"));
}
