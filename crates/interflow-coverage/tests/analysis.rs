use chrono::NaiveDate;
use interflow_coverage::{
    CoverageIndex, HorizonWindow, Inventory, MatchRule, analyse, analyse_material,
    recompute_states,
};
use interflow_model::dates::parse_datetime;
use interflow_model::{
    CoverageState, Material, Need, ReceptionLine, RepatriationLine, StockLine,
};

fn need(code: &str, due: &str, quantity: f64) -> Need {
    Need::new(
        Material::new(code, format!("Matière {code}")),
        quantity,
        parse_datetime(due).unwrap(),
        "",
        CoverageState::Unknown,
    )
}

fn internal(code: &str, quantity: f64) -> StockLine {
    StockLine {
        material_code: code.to_string(),
        quantity,
        store: "MAG1".to_string(),
        internal: true,
    }
}

fn stocked(code: &str, quantity: f64) -> Inventory {
    Inventory {
        stock: vec![internal(code, quantity)],
        ..Inventory::default()
    }
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

#[test]
fn stock_is_consumed_chronologically() {
    // Out of order on purpose.
    let needs = vec![
        need("M1", "2024-06-10", 30.0),
        need("M1", "2024-06-01", 50.0),
        need("M1", "2024-06-20", 40.0),
    ];

    let analysis = analyse_material(&needs, 70.0);
    let states: Vec<_> = analysis.records.iter().map(|r| (r.due.as_str(), r.state)).collect();
    assert_eq!(
        states,
        vec![
            ("2024-06-01T00:00:00", CoverageState::Covered),
            ("2024-06-10T00:00:00", CoverageState::Partial),
            ("2024-06-20T00:00:00", CoverageState::NotCovered),
        ]
    );
    assert_eq!(analysis.records[0].remaining_stock, 20.0);
    assert_eq!(analysis.records[1].available_quantity, 20.0);
    assert_eq!(analysis.records[2].remaining_stock, 0.0);
    assert_eq!(analysis.initial_stock, 70.0);
    assert_eq!(analysis.final_stock, 0.0);

    let shortfall = analysis.first_shortfall.unwrap();
    assert_eq!(shortfall.index, 1);
    assert_eq!(shortfall.stock_before, 20.0);
    assert_eq!(shortfall.missing, 10.0);

    let steps: Vec<_> = analysis
        .steps
        .iter()
        .map(|s| (s.stock_before, s.stock_after, s.state))
        .collect();
    assert_eq!(
        steps,
        vec![
            (70.0, 20.0, CoverageState::Covered),
            (20.0, 0.0, CoverageState::Partial),
            (0.0, 0.0, CoverageState::NotCovered),
        ]
    );
    assert_eq!(analysis.steps[1].quantity, 30.0);
}

#[test]
fn fully_covered_material_has_no_shortfall() {
    let analysis = analyse_material(&[need("M1", "2024-06-01", 5.0)], 8.0);
    assert!(analysis.first_shortfall.is_none());
    assert_eq!(analysis.final_stock, 3.0);
    assert_eq!(analysis.code, "M1");
}

#[test]
fn analyse_groups_by_material_within_window() {
    let needs = vec![
        need("M1", "2024-06-01", 10.0),
        need("M1", "2024-06-15", 10.0),
        need("M1", "2024-09-01", 10.0),
        need("M2", "2024-06-05", 4.0),
    ];
    let inventory = Inventory {
        stock: vec![internal("M1", 15.0)],
        repatriations: vec![RepatriationLine {
            product_code: "RP-M2".to_string(),
            designation: String::new(),
            net_weight: 4.0,
        }],
        receptions: Vec::new(),
    };
    let window = HorizonWindow::new(june(1), 30).unwrap();

    let analysis = analyse(&needs, &inventory, Some(window));

    let m1 = &analysis.stats["M1"];
    assert_eq!(m1.total_needs, 2);
    assert_eq!((m1.covered, m1.partial, m1.not_covered), (1, 1, 0));
    assert_eq!(m1.needed_quantity, 20.0);
    assert_eq!(m1.covered_quantity, 15.0);
    assert_eq!(m1.coverage_rate, 50.0);
    assert_eq!(m1.missing_stock, 5.0);

    let m2 = &analysis.stats["M2"];
    assert_eq!(m2.stock.repatriated, 4.0);
    assert_eq!(m2.covered, 1);
    assert_eq!(m2.missing_stock, 0.0);

    assert_eq!(analysis.total_needs(), 3);
    assert_eq!(analysis.total_covered(), 2);
    assert!((analysis.coverage_rate() - 200.0 / 3.0).abs() < 1e-9);
}

#[test]
fn computed_records_reconcile_by_exact_id() {
    let needs = vec![need("M1", "2024-06-01", 10.0), need("M1", "2024-06-02", 10.0)];
    let analysis = analyse(&needs, &stocked("M1", 10.0), None);
    let records: Vec<_> = analysis.records().cloned().collect();
    let index = CoverageIndex::new(&records);

    let resolutions: Vec<_> = needs.iter().map(|n| index.resolve(n)).collect();
    assert_eq!(resolutions[0].state, CoverageState::Covered);
    assert_eq!(resolutions[1].state, CoverageState::NotCovered);
    assert!(resolutions
        .iter()
        .all(|r| r.matched.map(|m| m.rule) == Some(MatchRule::ExactId)));
}

#[test]
fn recompute_states_leaves_input_untouched() {
    let needs = vec![need("M1", "2024-06-02", 10.0), need("M1", "2024-06-01", 10.0)];
    let updated = recompute_states(&needs, &stocked("M1", 12.0));

    assert!(needs.iter().all(|n| n.state == CoverageState::Unknown));
    assert_eq!(updated[0].due_date(), june(1));
    assert_eq!(updated[0].state, CoverageState::Covered);
    assert_eq!(updated[1].state, CoverageState::Partial);
}

#[test]
fn overdue_needs_draw_on_stock_first() {
    let needs = vec![need("M1", "2024-06-05", 10.0), need("M1", "2024-05-25", 10.0)];
    let window = HorizonWindow::new(june(1), 30).unwrap();

    let analysis = analyse(&needs, &stocked("M1", 10.0), Some(window));

    let states: Vec<_> = analysis.records().map(|r| (r.due.as_str(), r.state)).collect();
    assert_eq!(
        states,
        vec![
            ("2024-05-25T00:00:00", CoverageState::Covered),
            ("2024-06-05T00:00:00", CoverageState::NotCovered),
        ]
    );
}

#[test]
fn declared_states_are_kept_out_of_the_walk() {
    let declared = need("M1", "2024-06-01", 10.0).with_state(CoverageState::Covered);
    let needs = vec![declared, need("M1", "2024-06-02", 10.0)];

    let analysis = analyse(&needs, &stocked("M1", 10.0), None);
    assert_eq!(analysis.total_needs(), 1);

    let updated = recompute_states(&needs, &stocked("M1", 10.0));
    assert_eq!(updated[0].state, CoverageState::Covered);
    assert_eq!(updated[1].due_date(), june(2));
    assert_eq!(updated[1].state, CoverageState::Covered);
}

#[test]
fn receptions_are_reported_but_not_consumed() {
    let reception = ReceptionLine {
        material: Material::new("M1", ""),
        quantity: 50.0,
        lot: String::new(),
        status: "en_cours".to_string(),
    };
    let inventory = Inventory {
        stock: vec![internal("M1", 5.0)],
        receptions: vec![reception],
        ..Inventory::default()
    };

    let analysis = analyse(&[need("M1", "2024-06-01", 20.0)], &inventory, None);

    let stats = &analysis.stats["M1"];
    assert_eq!(stats.partial, 1);
    assert_eq!(stats.stock.receptions, 50.0);
    assert_eq!(stats.stock.grand_total(), 55.0);
    assert_eq!(stats.missing_stock, 15.0);
}
