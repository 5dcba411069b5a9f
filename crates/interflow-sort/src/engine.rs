//! Multi-key sort over heterogeneous record sets.

use std::cmp::Ordering;

use crate::column::ColumnSpec;
use crate::compare::{FieldValue, NullPlacement, SortKey, compare_keys};
use crate::state::SortState;

/// Keyed field access for sortable records.
pub trait SortFields {
    /// Value of the named field; unknown fields are [`FieldValue::Null`].
    fn field(&self, key: &str) -> FieldValue;
}

/// Tunables of the sort engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub null_placement: NullPlacement,
}

/// Sort a copy of `records`; the input is left untouched.
///
/// Returns the input order when the state is unsorted or names no declared
/// column. Ties beyond the secondary key keep their input order.
pub fn sort<R>(records: &[R], state: &SortState, columns: &[ColumnSpec]) -> Vec<R>
where
    R: SortFields + Clone,
{
    sort_with_options(records, state, columns, SortOptions::default())
}

pub fn sort_with_options<R>(
    records: &[R],
    state: &SortState,
    columns: &[ColumnSpec],
    options: SortOptions,
) -> Vec<R>
where
    R: SortFields + Clone,
{
    sorted_indices(records, state, columns, options)
        .into_iter()
        .map(|idx| records[idx].clone())
        .collect()
}

/// Permutation of `0..records.len()` describing the sorted order.
pub fn sorted_indices<R: SortFields>(
    records: &[R],
    state: &SortState,
    columns: &[ColumnSpec],
    options: SortOptions,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    let SortState::Sorted { column, direction } = state else {
        return order;
    };
    let Some(spec) = columns.iter().find(|c| &c.key == column) else {
        tracing::debug!(column = %column, "sort column not declared, keeping order");
        return order;
    };

    // Coerce every key once instead of once per comparison.
    let primary: Vec<SortKey> = records
        .iter()
        .map(|r| SortKey::coerce(&r.field(spec.value_key()), spec.sort_type))
        .collect();
    let secondary: Option<Vec<SortKey>> = spec.secondary.as_ref().map(|tie| {
        records
            .iter()
            .map(|r| SortKey::coerce(&r.field(&tie.key), tie.sort_type))
            .collect()
    });

    order.sort_by(|&a, &b| {
        let ordering = compare_keys(
            &primary[a],
            &primary[b],
            *direction,
            options.null_placement,
        );
        match (&spec.secondary, &secondary) {
            (Some(tie), Some(keys)) if ordering == Ordering::Equal => compare_keys(
                &keys[a],
                &keys[b],
                tie.direction,
                options.null_placement,
            ),
            _ => ordering,
        }
    });
    tracing::debug!(
        column = %column,
        direction = %direction,
        records = records.len(),
        "sorted records"
    );
    order
}
