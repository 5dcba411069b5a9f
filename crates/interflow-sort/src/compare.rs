//! Type-aware ordering primitive.
//!
//! Values are coerced to a [`SortKey`] according to the column's declared
//! [`SortType`] before being compared. Two kinds of value never take part in
//! the regular ordering:
//!
//! - **missing** values (`Null`, or blank text in a number/date column);
//! - **invalid** values (text that does not coerce to a number or a date,
//!   `NaN`).
//!
//! Both are placed at a fixed end of the ordering given by [`NullPlacement`]
//! (default: last), missing values beyond invalid ones, and that placement is
//! not flipped by a descending sort.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use interflow_model::dates::{format_iso, parse_datetime};
use serde::{Deserialize, Serialize};

use crate::state::SortDirection;

/// Semantic type of a sortable column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    #[default]
    String,
    Number,
    Date,
}

impl SortType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::String => "string",
            SortType::Number => "number",
            SortType::Date => "date",
        }
    }
}

impl std::str::FromStr for SortType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" | "text" => Ok(SortType::String),
            "number" | "numeric" => Ok(SortType::Number),
            "date" | "datetime" => Ok(SortType::Date),
            _ => Err(format!("Unknown sort type: {s}")),
        }
    }
}

/// Where missing and invalid values go, independently of sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NullPlacement {
    #[default]
    Last,
    First,
}

/// A record field as read by the sort engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::Date(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        value
            .and_hms_opt(0, 0, 0)
            .map_or(FieldValue::Null, FieldValue::Date)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// A field value coerced to a column type.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Missing,
    Invalid,
    Text(String),
    Number(f64),
    Instant(NaiveDateTime),
}

impl SortKey {
    /// Coerce a field value to the given column type.
    pub fn coerce(value: &FieldValue, sort_type: SortType) -> SortKey {
        match sort_type {
            SortType::String => match value {
                FieldValue::Null => SortKey::Missing,
                FieldValue::Text(text) => SortKey::Text(text.clone()),
                FieldValue::Number(n) => SortKey::Text(n.to_string()),
                FieldValue::Date(dt) => SortKey::Text(format_iso(dt)),
            },
            SortType::Number => match value {
                FieldValue::Null => SortKey::Missing,
                FieldValue::Number(n) => number_key(*n),
                FieldValue::Text(text) if text.trim().is_empty() => SortKey::Missing,
                FieldValue::Text(text) => text
                    .trim()
                    .parse::<f64>()
                    .map_or(SortKey::Invalid, number_key),
                FieldValue::Date(dt) => SortKey::Number(dt.and_utc().timestamp_millis() as f64),
            },
            SortType::Date => match value {
                FieldValue::Null => SortKey::Missing,
                FieldValue::Date(dt) => SortKey::Instant(*dt),
                FieldValue::Text(text) if text.trim().is_empty() => SortKey::Missing,
                FieldValue::Text(text) => {
                    parse_datetime(text).map_or(SortKey::Invalid, SortKey::Instant)
                }
                FieldValue::Number(n) if n.is_finite() => {
                    DateTime::from_timestamp_millis(*n as i64)
                        .map_or(SortKey::Invalid, |dt| SortKey::Instant(dt.naive_utc()))
                }
                FieldValue::Number(_) => SortKey::Invalid,
            },
        }
    }

    fn outlier_rank(&self) -> u8 {
        match self {
            SortKey::Missing => 2,
            SortKey::Invalid => 1,
            _ => 0,
        }
    }
}

fn number_key(n: f64) -> SortKey {
    if n.is_nan() {
        SortKey::Invalid
    } else {
        SortKey::Number(n)
    }
}

/// Compare two values as the given type, ascending, outliers last.
pub fn compare(a: &FieldValue, b: &FieldValue, sort_type: SortType) -> Ordering {
    compare_keys(
        &SortKey::coerce(a, sort_type),
        &SortKey::coerce(b, sort_type),
        SortDirection::Ascending,
        NullPlacement::Last,
    )
}

/// Compare two coerced keys with a direction.
///
/// The direction only applies when both keys are comparable; missing and
/// invalid keys keep their placement.
pub fn compare_keys(
    a: &SortKey,
    b: &SortKey,
    direction: SortDirection,
    placement: NullPlacement,
) -> Ordering {
    let (rank_a, rank_b) = (a.outlier_rank(), b.outlier_rank());
    if rank_a != 0 || rank_b != 0 {
        return match placement {
            NullPlacement::Last => rank_a.cmp(&rank_b),
            NullPlacement::First => rank_b.cmp(&rank_a),
        };
    }
    let ordering = match (a, b) {
        (SortKey::Text(x), SortKey::Text(y)) => natural_cmp(x, y),
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Instant(x), SortKey::Instant(y)) => x.cmp(y),
        // Keys of one column always share a variant.
        _ => Ordering::Equal,
    };
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Case- and accent-insensitive comparison that orders digit runs numerically,
/// so `"A2" < "A10"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = take_digits(&mut left);
                let run_b = take_digits(&mut right);
                let ordering = compare_digit_runs(&run_a, &run_b);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                left.next();
                right.next();
                let ordering = fold(x).cmp(&fold(y));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Fold a character to its base lower-case letter.
fn fold(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    match lower {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'æ' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'œ' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
