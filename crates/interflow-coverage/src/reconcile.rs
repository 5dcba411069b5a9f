//! Need/coverage reconciliation.
//!
//! Coverage records come from a separate pass with its own identifiers, so a
//! need is matched against them through an ordered cascade of rules. The
//! first rule that yields a record wins:
//!
//! 1. [`MatchRule::ExactId`]: record id equals the need's derived id.
//! 2. [`MatchRule::Content`]: same due date (time of day ignored), record id
//!    contains the material code, quantities within the tolerance.
//! 3. [`MatchRule::RelaxedContent`]: rule 2 without the quantity check.
//!
//! With no match the need keeps its declared state. A record that shares
//! only the material code is never borrowed.

use std::collections::HashMap;

use chrono::NaiveDate;
use interflow_model::{CoverageRecord, CoverageState, Need};
use serde::Serialize;

/// Absolute quantity tolerance of [`MatchRule::Content`].
pub const QUANTITY_TOLERANCE: f64 = 0.01;

// Absorbs binary rounding of decimal quantities at the tolerance boundary.
const FLOAT_SLACK: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    ExactId,
    Content,
    RelaxedContent,
}

impl MatchRule {
    /// Rules in evaluation order.
    pub const CASCADE: [MatchRule; 3] = [
        MatchRule::ExactId,
        MatchRule::Content,
        MatchRule::RelaxedContent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::ExactId => "exact_id",
            MatchRule::Content => "content",
            MatchRule::RelaxedContent => "relaxed_content",
        }
    }

    /// First record of `index` this rule matches to `need`.
    pub fn find<'a>(&self, need: &Need, index: &CoverageIndex<'a>) -> Option<&'a CoverageRecord> {
        match self {
            MatchRule::ExactId => index.by_id.get(need.id().as_str()).copied(),
            MatchRule::Content => index
                .same_day(need)
                .find(|record| quantity_matches(need, record, index.tolerance)),
            MatchRule::RelaxedContent => index.same_day(need).next(),
        }
    }
}

/// A record matched to a need, and the rule that matched it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub rule: MatchRule,
    pub record: &'a CoverageRecord,
}

/// Resolved coverage of one need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    pub state: CoverageState,
    pub matched: Option<Match<'a>>,
}

/// Coverage records indexed by id and by due date.
///
/// Records keep their input order within each date bucket, so every rule
/// returns the first matching record.
#[derive(Debug, Clone)]
pub struct CoverageIndex<'a> {
    by_id: HashMap<&'a str, &'a CoverageRecord>,
    by_date: HashMap<NaiveDate, Vec<&'a CoverageRecord>>,
    tolerance: f64,
}

impl<'a> CoverageIndex<'a> {
    pub fn new(records: &'a [CoverageRecord]) -> Self {
        Self::with_tolerance(records, QUANTITY_TOLERANCE)
    }

    pub fn with_tolerance(records: &'a [CoverageRecord], tolerance: f64) -> Self {
        let mut by_id = HashMap::new();
        let mut by_date: HashMap<NaiveDate, Vec<&'a CoverageRecord>> = HashMap::new();
        for record in records {
            by_id.entry(record.id.as_str()).or_insert(record);
            match record.due_date() {
                Some(date) => by_date.entry(date).or_default().push(record),
                None => {
                    tracing::debug!(id = %record.id, due = %record.due, "coverage record has no usable due date");
                }
            }
        }
        Self {
            by_id,
            by_date,
            tolerance,
        }
    }

    /// Run the cascade for one need.
    pub fn resolve(&self, need: &Need) -> Resolution<'a> {
        for rule in MatchRule::CASCADE {
            if let Some(record) = rule.find(need, self) {
                return Resolution {
                    state: record.state,
                    matched: Some(Match { rule, record }),
                };
            }
        }
        Resolution {
            state: need.state,
            matched: None,
        }
    }

    /// Records due the same day as `need` whose id mentions its material.
    fn same_day<'s>(&'s self, need: &'s Need) -> impl Iterator<Item = &'a CoverageRecord> + 's {
        let code = need.material_code();
        self.by_date
            .get(&need.due_date())
            .into_iter()
            .flatten()
            .copied()
            .filter(move |record| !code.is_empty() && record.id.contains(code))
    }
}

fn quantity_matches(need: &Need, record: &CoverageRecord, tolerance: f64) -> bool {
    (record.quantity - need.quantity).abs() <= tolerance + FLOAT_SLACK
}

/// Coverage state applicable to `need`.
pub fn resolve_coverage_state(need: &Need, records: &[CoverageRecord]) -> CoverageState {
    CoverageIndex::new(records).resolve(need).state
}

/// Resolve every need against one shared index, preserving need order.
pub fn reconcile<'a>(needs: &[Need], records: &'a [CoverageRecord]) -> Vec<Resolution<'a>> {
    let index = CoverageIndex::new(records);
    let resolutions: Vec<Resolution<'a>> = needs.iter().map(|need| index.resolve(need)).collect();
    tracing::debug!(
        needs = needs.len(),
        records = records.len(),
        matched = resolutions.iter().filter(|r| r.matched.is_some()).count(),
        "reconciled needs with coverage"
    );
    resolutions
}
