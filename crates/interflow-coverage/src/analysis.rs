//! Chronological coverage computation.
//!
//! Needs of one material are walked in due-date order, each consuming the
//! stock left by the previous ones. Only needs still in the
//! [`CoverageState::Unknown`] state take part; the others keep the state they
//! were declared with. The resulting [`CoverageRecord`]s are what the
//! reconciler later matches back to needs.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, NaiveDateTime};
use interflow_model::dates::format_iso;
use interflow_model::{
    CoverageRecord, CoverageState, Need, ReceptionLine, RepatriationLine, StockLine,
};
use serde::Serialize;

use crate::error::{CoverageError, Result};

pub const DEFAULT_HORIZON_DAYS: u32 = 30;
pub const MAX_HORIZON_DAYS: u32 = 365;

/// Due-date horizon ending `days` after `start`.
///
/// Needs already overdue at `start` stay inside the window so they draw on
/// the stock before later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HorizonWindow {
    pub start: NaiveDate,
    pub days: u32,
}

impl HorizonWindow {
    pub fn new(start: NaiveDate, days: u32) -> Result<Self> {
        if !(1..=MAX_HORIZON_DAYS).contains(&days) {
            return Err(CoverageError::InvalidHorizon(days));
        }
        Ok(Self { start, days })
    }

    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            days: DEFAULT_HORIZON_DAYS,
        }
    }

    pub fn end(&self) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(u64::from(self.days)))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date <= self.end()
    }
}

/// Everything the coverage pass reads besides the needs themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub stock: Vec<StockLine>,
    pub repatriations: Vec<RepatriationLine>,
    pub receptions: Vec<ReceptionLine>,
}

/// Stock a material can draw on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AvailableStock {
    pub internal: f64,
    pub repatriated: f64,
    /// Held in external stores; reported but never consumed.
    pub external: BTreeMap<String, f64>,
    /// In-progress receptions; reported but never consumed.
    pub receptions: f64,
}

impl AvailableStock {
    /// Quantity the chronological walk consumes.
    pub fn total(&self) -> f64 {
        self.internal + self.repatriated
    }

    /// Every known quantity, including stock not used for coverage.
    pub fn grand_total(&self) -> f64 {
        self.internal + self.external.values().sum::<f64>() + self.receptions + self.repatriated
    }
}

/// Stock of `material_code` known to `inventory`.
pub fn available_stock(material_code: &str, inventory: &Inventory) -> AvailableStock {
    let mut available = AvailableStock::default();
    for line in inventory
        .stock
        .iter()
        .filter(|l| l.material_code == material_code)
    {
        if line.internal {
            available.internal += line.quantity;
        } else {
            *available.external.entry(line.store.clone()).or_default() += line.quantity;
        }
    }
    available.repatriated = inventory
        .repatriations
        .iter()
        .filter(|line| line.concerns(material_code))
        .map(|line| line.net_weight)
        .sum();
    available.receptions = inventory
        .receptions
        .iter()
        .filter(|r| r.is_in_progress() && r.material.code == material_code)
        .map(|r| r.quantity)
        .sum();
    available
}

/// State of a single need given what is left: `(state, covered quantity, percent)`.
pub fn coverage_state(available: f64, needed: f64) -> (CoverageState, f64, f64) {
    if available >= needed {
        (CoverageState::Covered, needed, 100.0)
    } else if available > 0.0 {
        (CoverageState::Partial, available, available / needed * 100.0)
    } else {
        (CoverageState::NotCovered, 0.0, 0.0)
    }
}

/// First need of a material the stock did not fully cover.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirstShortfall {
    pub index: usize,
    pub due: NaiveDateTime,
    pub quantity: f64,
    pub stock_before: f64,
    pub missing: f64,
}

/// One need of the chronological walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageStep {
    pub due: NaiveDateTime,
    pub quantity: f64,
    pub stock_before: f64,
    pub stock_after: f64,
    pub state: CoverageState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialAnalysis {
    pub code: String,
    pub name: String,
    pub records: Vec<CoverageRecord>,
    pub steps: Vec<CoverageStep>,
    pub first_shortfall: Option<FirstShortfall>,
    pub initial_stock: f64,
    pub final_stock: f64,
}

/// Walk `needs` in due-date order consuming `available`.
pub fn analyse_material(needs: &[Need], available: f64) -> MaterialAnalysis {
    let mut ordered: Vec<&Need> = needs.iter().collect();
    ordered.sort_by_key(|need| need.due);

    let mut stock = available;
    let mut first_shortfall = None;
    let mut records = Vec::with_capacity(ordered.len());
    let mut steps = Vec::with_capacity(ordered.len());

    for (index, need) in ordered.iter().enumerate() {
        let (state, covered, percent) = coverage_state(stock, need.quantity);
        if state != CoverageState::Covered && first_shortfall.is_none() {
            first_shortfall = Some(FirstShortfall {
                index,
                due: need.due,
                quantity: need.quantity,
                stock_before: stock,
                missing: need.quantity - covered,
            });
        }
        let stock_before = stock;
        match state {
            CoverageState::Covered => stock -= need.quantity,
            CoverageState::Partial => stock = 0.0,
            _ => {}
        }
        steps.push(CoverageStep {
            due: need.due,
            quantity: need.quantity,
            stock_before,
            stock_after: stock,
            state,
        });
        records.push(CoverageRecord {
            id: need.id(),
            quantity: need.quantity,
            due: format_iso(&need.due),
            state,
            available_quantity: covered,
            percent_covered: percent,
            remaining_stock: stock,
        });
    }

    let (code, name) = ordered
        .first()
        .map(|need| (need.material.code.clone(), need.material.name.clone()))
        .unwrap_or_default();

    MaterialAnalysis {
        code,
        name,
        records,
        steps,
        first_shortfall,
        initial_stock: available,
        final_stock: stock,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaterialStats {
    pub total_needs: usize,
    pub covered: usize,
    pub partial: usize,
    pub not_covered: usize,
    pub needed_quantity: f64,
    pub covered_quantity: f64,
    pub stock: AvailableStock,
    /// Needed quantity the coverage stock cannot supply.
    pub missing_stock: f64,
    pub coverage_rate: f64,
    pub partial_rate: f64,
    pub not_covered_rate: f64,
}

impl MaterialStats {
    fn from_analysis(analysis: &MaterialAnalysis, stock: AvailableStock) -> Self {
        let mut stats = Self {
            total_needs: analysis.records.len(),
            stock,
            ..Self::default()
        };
        for record in &analysis.records {
            stats.needed_quantity += record.quantity;
            stats.covered_quantity += record.available_quantity;
            match record.state {
                CoverageState::Covered => stats.covered += 1,
                CoverageState::Partial => stats.partial += 1,
                CoverageState::NotCovered => stats.not_covered += 1,
                CoverageState::Unknown => {}
            }
        }
        stats.missing_stock = (stats.needed_quantity - stats.stock.total()).max(0.0);
        stats.coverage_rate = rate(stats.covered, stats.total_needs);
        stats.partial_rate = rate(stats.partial, stats.total_needs);
        stats.not_covered_rate = rate(stats.not_covered, stats.total_needs);
        stats
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Coverage of every material with needs inside the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageAnalysis {
    pub window: Option<HorizonWindow>,
    pub materials: BTreeMap<String, MaterialAnalysis>,
    pub stats: BTreeMap<String, MaterialStats>,
}

impl CoverageAnalysis {
    /// All produced records, grouped by material code.
    pub fn records(&self) -> impl Iterator<Item = &CoverageRecord> {
        self.materials.values().flat_map(|m| m.records.iter())
    }

    pub fn total_needs(&self) -> usize {
        self.stats.values().map(|s| s.total_needs).sum()
    }

    pub fn total_covered(&self) -> usize {
        self.stats.values().map(|s| s.covered).sum()
    }

    /// Share of fully covered needs across all materials, in percent.
    pub fn coverage_rate(&self) -> f64 {
        rate(self.total_covered(), self.total_needs())
    }
}

/// Coverage of the [`CoverageState::Unknown`] needs due before the window ends.
pub fn analyse(
    needs: &[Need],
    inventory: &Inventory,
    window: Option<HorizonWindow>,
) -> CoverageAnalysis {
    let mut grouped: BTreeMap<&str, Vec<Need>> = BTreeMap::new();
    let mut declared = 0usize;
    for need in needs {
        if need.state != CoverageState::Unknown {
            declared += 1;
            continue;
        }
        if window.is_some_and(|w| !w.contains(need.due_date())) {
            continue;
        }
        grouped
            .entry(need.material_code())
            .or_default()
            .push(need.clone());
    }

    if declared > 0 {
        tracing::debug!(declared, "skipped needs with a declared state");
    }

    let mut materials = BTreeMap::new();
    let mut stats = BTreeMap::new();
    for (code, needs) in grouped {
        let available = available_stock(code, inventory);
        let analysis = analyse_material(&needs, available.total());
        tracing::debug!(
            material = code,
            needs = needs.len(),
            initial_stock = analysis.initial_stock,
            final_stock = analysis.final_stock,
            "analysed material coverage"
        );
        stats.insert(
            code.to_string(),
            MaterialStats::from_analysis(&analysis, available),
        );
        materials.insert(code.to_string(), analysis);
    }

    let analysis = CoverageAnalysis {
        window,
        materials,
        stats,
    };
    tracing::info!(
        materials = analysis.materials.len(),
        needs = analysis.total_needs(),
        coverage_rate = analysis.coverage_rate(),
        "coverage analysis complete"
    );
    analysis
}

/// Copies of `needs` in due-date order. Unknown needs carry their computed
/// state, the others keep their own.
pub fn recompute_states(needs: &[Need], inventory: &Inventory) -> Vec<Need> {
    let analysis = analyse(needs, inventory, None);
    let computed: BTreeMap<String, CoverageState> = analysis
        .records()
        .map(|record| (record.id.clone(), record.state))
        .collect();

    let mut updated: Vec<Need> = needs
        .iter()
        .map(|need| match computed.get(&need.id()) {
            Some(state) => need.with_state(*state),
            None => need.clone(),
        })
        .collect();
    updated.sort_by_key(|need| need.due);
    updated
}
