//! Terminal tables for the needs screen and the coverage analysis.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use interflow_coverage::CoverageAnalysis;
use interflow_model::CoverageState;
use interflow_model::dates::format_iso;

use crate::screen::NeedRow;

pub fn needs_table(rows: &[NeedRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Matière"),
        header_cell("Quantité"),
        header_cell("Échéance"),
        header_cell("Lot"),
        header_cell("État"),
        header_cell("Couverture"),
    ]);
    apply_list_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.need.material.code).add_attribute(Attribute::Bold),
            Cell::new(&row.need.material.name),
            Cell::new(format_quantity(row.need.quantity)),
            Cell::new(row.need.due.format("%Y-%m-%d")),
            if row.need.has_lot() {
                Cell::new(&row.need.lot)
            } else {
                dim_cell("-")
            },
            state_cell(row.state),
            match &row.coverage {
                Some(coverage) => Cell::new(format!("{:.0} %", coverage.percent_covered)),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

pub fn analysis_table(analysis: &CoverageAnalysis) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Matière"),
        header_cell("Besoins"),
        header_cell("Couverts"),
        header_cell("Partiels"),
        header_cell("Non couverts"),
        header_cell("Demandé"),
        header_cell("Stock"),
        header_cell("Manquant"),
        header_cell("En réception"),
        header_cell("Taux"),
        header_cell("Première rupture"),
    ]);
    apply_summary_style(&mut table);
    for index in 1..10 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (code, stats) in &analysis.stats {
        let shortfall = analysis
            .materials
            .get(code)
            .and_then(|m| m.first_shortfall.as_ref());
        table.add_row(vec![
            Cell::new(code).add_attribute(Attribute::Bold),
            Cell::new(stats.total_needs),
            count_cell(stats.covered, Color::Green),
            count_cell(stats.partial, Color::Yellow),
            count_cell(stats.not_covered, Color::Red),
            Cell::new(format_quantity(stats.needed_quantity)),
            Cell::new(format_quantity(stats.stock.total())),
            if stats.missing_stock > 0.0 {
                Cell::new(format_quantity(stats.missing_stock)).fg(Color::Red)
            } else {
                dim_cell("-")
            },
            Cell::new(format_quantity(stats.stock.receptions)),
            Cell::new(format!("{:.1} %", stats.coverage_rate)),
            match shortfall {
                Some(s) => Cell::new(format!(
                    "{} (manque {})",
                    format_iso(&s.due),
                    format_quantity(s.missing)
                ))
                .fg(Color::Red),
                None => dim_cell("-"),
            },
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(analysis.total_needs()).add_attribute(Attribute::Bold),
        count_cell(analysis.total_covered(), Color::Green).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(format!("{:.1} %", analysis.coverage_rate())).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

fn apply_list_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn state_cell(state: CoverageState) -> Cell {
    let cell = Cell::new(state.as_str());
    match state {
        CoverageState::Covered => cell.fg(Color::Green),
        CoverageState::Partial => cell.fg(Color::Yellow),
        CoverageState::NotCovered => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        CoverageState::Unknown => cell.fg(Color::DarkGrey),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

/// Trims trailing zeros: `12.50` shows as `12.5`, `3.00` as `3`.
pub fn format_quantity(value: f64) -> String {
    let text = format!("{value:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
