//! Coverage of material needs.
//!
//! [`analysis`] computes coverage records from stock; [`reconcile`] maps
//! such records back onto the needs displayed to the user.

pub mod analysis;
pub mod error;
pub mod reconcile;

pub use analysis::{
    AvailableStock, CoverageAnalysis, CoverageStep, DEFAULT_HORIZON_DAYS, FirstShortfall,
    HorizonWindow, Inventory, MaterialAnalysis, MaterialStats, analyse, analyse_material,
    available_stock, coverage_state, recompute_states,
};
pub use error::{CoverageError, Result};
pub use reconcile::{
    CoverageIndex, Match, MatchRule, QUANTITY_TOLERANCE, Resolution, reconcile,
    resolve_coverage_state,
};
