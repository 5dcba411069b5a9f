//! The needs list screen: filter keys, sortable columns and the row pipeline.

use interflow_coverage::{CoverageIndex, MatchRule};
use interflow_filter::{ALL, FilterCache, FilterDefaults, FilterState, FilterStore, Location};
use interflow_model::{CoverageRecord, CoverageState, Need};
use interflow_sort::{
    ColumnSpec, FieldValue, SortDirection, SortFields, SortOptions, SortState, SortType,
    sort_with_options,
};
use serde::Serialize;

pub const ROUTE: &str = "/besoins";

pub const KEY_MATERIAL: &str = "matiere";
pub const KEY_STATE: &str = "etat";
pub const KEY_LOT: &str = "lot";
pub const KEY_TEXT: &str = "q";
pub const KEY_SORT_COLUMN: &str = "tri";
pub const KEY_SORT_DIRECTION: &str = "ordre";

pub fn filter_defaults() -> FilterDefaults {
    FilterDefaults::new()
        .with(KEY_MATERIAL, "")
        .with(KEY_STATE, ALL)
        .with(KEY_LOT, "")
        .with(KEY_TEXT, "")
        .with(KEY_SORT_COLUMN, "")
        .with(KEY_SORT_DIRECTION, "")
}

pub fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("code", SortType::String),
        ColumnSpec::new("nom", SortType::String),
        ColumnSpec::new("quantite", SortType::Number),
        ColumnSpec::new("echeance", SortType::Date).with_secondary(
            "code",
            SortType::String,
            SortDirection::Ascending,
        ),
        ColumnSpec::new("lot", SortType::String),
        ColumnSpec::new("etat", SortType::String).with_secondary(
            "echeance",
            SortType::Date,
            SortDirection::Ascending,
        ),
    ]
}

/// Coverage record a row was reconciled with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedCoverage {
    pub rule: MatchRule,
    pub record_id: String,
    pub available_quantity: f64,
    pub percent_covered: f64,
    pub remaining_stock: f64,
}

/// A need as displayed: declared data plus its resolved coverage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeedRow {
    pub id: String,
    pub need: Need,
    pub state: CoverageState,
    pub coverage: Option<MatchedCoverage>,
}

impl SortFields for NeedRow {
    fn field(&self, key: &str) -> FieldValue {
        match key {
            "id" => self.id.as_str().into(),
            "code" => self.need.material.code.as_str().into(),
            "nom" => self.need.material.name.as_str().into(),
            "quantite" => self.need.quantity.into(),
            "echeance" => self.need.due.into(),
            "lot" => self.need.lot.as_str().into(),
            "etat" => self.state.as_str().into(),
            _ => FieldValue::Null,
        }
    }
}

/// Text and state filters of the screen, read from a [`FilterState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeedFilters {
    material: String,
    state: Option<String>,
    lot: String,
    text: String,
}

impl NeedFilters {
    pub fn from_state(state: &FilterState) -> Self {
        let wanted = state.get(KEY_STATE).trim();
        Self {
            material: state.get(KEY_MATERIAL).trim().to_lowercase(),
            state: (!wanted.is_empty() && wanted != ALL).then(|| wanted.to_lowercase()),
            lot: state.get(KEY_LOT).trim().to_lowercase(),
            text: state.get(KEY_TEXT).trim().to_lowercase(),
        }
    }

    /// Filters that only depend on the declared need.
    pub fn matches_need(&self, need: &Need) -> bool {
        let code = need.material.code.to_lowercase();
        let name = need.material.name.to_lowercase();
        let lot = need.lot.to_lowercase();

        if !self.material.is_empty() && !code.contains(&self.material) && !name.contains(&self.material) {
            return false;
        }
        if !self.lot.is_empty() && !lot.contains(&self.lot) {
            return false;
        }
        if !self.text.is_empty() {
            let id = need.id().to_lowercase();
            let hit = [&code, &name, &lot, &id]
                .iter()
                .any(|field| field.contains(&self.text));
            if !hit {
                return false;
            }
        }
        true
    }

    pub fn matches_state(&self, state: CoverageState) -> bool {
        self.state.as_deref().is_none_or(|wanted| state.as_str() == wanted)
    }
}

pub fn sort_state(filters: &FilterState) -> SortState {
    SortState::from_params(filters.get(KEY_SORT_COLUMN), filters.get(KEY_SORT_DIRECTION))
}

/// Click on a column header: advance its tri-state cycle and persist it.
pub fn toggle_sort<L: Location, C: FilterCache>(
    store: &mut FilterStore<L, C>,
    column: &str,
) -> SortState {
    let next = sort_state(store.state()).toggle(column);
    let (tri, ordre) = next.to_params();
    store.update_many([
        (KEY_SORT_COLUMN, tri.as_str()),
        (KEY_SORT_DIRECTION, ordre.as_str()),
    ]);
    next
}

/// Rows of the screen for the current filter state.
///
/// Needs are narrowed by the declared-data filters, reconciled with
/// `records`, narrowed by resolved state, then sorted.
pub fn build_rows(needs: &[Need], records: &[CoverageRecord], filters: &FilterState) -> Vec<NeedRow> {
    build_rows_with_options(needs, records, filters, SortOptions::default())
}

pub fn build_rows_with_options(
    needs: &[Need],
    records: &[CoverageRecord],
    filters: &FilterState,
    options: SortOptions,
) -> Vec<NeedRow> {
    let criteria = NeedFilters::from_state(filters);
    let index = CoverageIndex::new(records);

    let rows: Vec<NeedRow> = needs
        .iter()
        .filter(|need| criteria.matches_need(need))
        .map(|need| annotate(need, &index))
        .filter(|row| criteria.matches_state(row.state))
        .collect();

    let sorted = sort_with_options(&rows, &sort_state(filters), &columns(), options);
    tracing::debug!(
        needs = needs.len(),
        shown = sorted.len(),
        "built needs screen rows"
    );
    sorted
}

fn annotate(need: &Need, index: &CoverageIndex<'_>) -> NeedRow {
    let resolution = index.resolve(need);
    NeedRow {
        id: need.id(),
        need: need.clone(),
        state: resolution.state,
        coverage: resolution.matched.map(|m| MatchedCoverage {
            rule: m.rule,
            record_id: m.record.id.clone(),
            available_quantity: m.record.available_quantity,
            percent_covered: m.record.percent_covered,
            remaining_stock: m.record.remaining_stock,
        }),
    }
}
