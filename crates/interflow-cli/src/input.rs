//! Loading of needs, coverage records and stock from files.
//!
//! Every input is a JSON array of backend records. Needs may also come from
//! the planning CSV export, a pivot table with one column per due date.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::{Reader, ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;

use interflow_model::{
    CoverageRecord, CoverageState, Material, Need, ReceptionLine, RepatriationLine, StockLine,
};

/// Line of the export holding the due dates.
const DATES_LINE: usize = 6;
const COL_CODE: usize = 1;
const COL_NAME: usize = 2;
/// First column carrying a quantity per due date.
const FIRST_DATE_COL: usize = 9;

/// Read a JSON array of records.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))
}

/// Needs from a `.csv` export or a JSON file.
pub fn load_needs(path: &Path) -> Result<Vec<Need>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let needs = if is_csv {
        let content =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        parse_needs_csv(&content).with_context(|| format!("parse {}", path.display()))?
    } else {
        read_json(path)?
    };
    tracing::debug!(path = %path.display(), count = needs.len(), "loaded needs");
    Ok(needs)
}

pub fn load_coverage(path: &Path) -> Result<Vec<CoverageRecord>> {
    read_json(path)
}

pub fn load_stock(path: &Path) -> Result<Vec<StockLine>> {
    read_json(path)
}

pub fn load_repatriations(path: &Path) -> Result<Vec<RepatriationLine>> {
    read_json(path)
}

pub fn load_receptions(path: &Path) -> Result<Vec<ReceptionLine>> {
    read_json(path)
}

/// Parse the planning CSV export.
///
/// Line 7 holds the due dates, material rows start on line 8 with the code
/// in column 1 and the name in column 2. Every column from the tenth on
/// under a readable date yields one need per positive quantity. The total
/// in column 7 is ignored. Rows with an unusable code and cells that are not
/// numbers are skipped.
pub fn parse_needs_csv(content: &str) -> Result<Vec<Need>> {
    let content = content.trim_start_matches('\u{feff}');
    let lines: Vec<&str> = content.lines().collect();
    let Some(dates_line) = lines.get(DATES_LINE) else {
        tracing::warn!(lines = lines.len(), "export has no due date line");
        return Ok(Vec::new());
    };
    let delimiter = detect_delimiter(dates_line);

    let header = csv_reader(dates_line, delimiter)
        .records()
        .next()
        .transpose()
        .context("read due date line")?
        .unwrap_or_default();
    let dates: Vec<Option<NaiveDateTime>> = header.iter().map(parse_due_header).collect();
    tracing::debug!(
        columns = dates.iter().skip(FIRST_DATE_COL).flatten().count(),
        "due date columns"
    );

    let data = lines[DATES_LINE + 1..].join("\n");
    let mut needs = Vec::new();
    let mut skipped = 0usize;
    for (offset, record) in csv_reader(&data, delimiter).records().enumerate() {
        let record =
            record.with_context(|| format!("read line {}", DATES_LINE + 2 + offset))?;
        match row_material(&record) {
            Some(material) => push_row_needs(&record, &material, &dates, &mut needs),
            None => skipped += 1,
        }
    }
    tracing::info!(needs = needs.len(), skipped, "decoded needs export");
    Ok(needs)
}

fn csv_reader(text: &str, delimiter: u8) -> Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes())
}

fn row_material(record: &StringRecord) -> Option<Material> {
    if record.len() < 2 {
        return None;
    }
    let code = record.get(COL_CODE).unwrap_or("").trim();
    let name = record.get(COL_NAME).unwrap_or("").trim();
    if name.is_empty() || !is_valid_material_code(code) {
        return None;
    }
    Some(Material::new(code, name))
}

fn push_row_needs(
    record: &StringRecord,
    material: &Material,
    dates: &[Option<NaiveDateTime>],
    needs: &mut Vec<Need>,
) {
    for (col, raw) in record.iter().enumerate().skip(FIRST_DATE_COL) {
        let Some(due) = dates.get(col).copied().flatten() else {
            continue;
        };
        let raw = raw.trim();
        if raw.is_empty() || raw == "0" {
            continue;
        }
        match parse_quantity(raw) {
            Some(quantity) if quantity > 0.0 => needs.push(Need::new(
                material.clone(),
                quantity,
                due,
                "",
                CoverageState::Unknown,
            )),
            Some(_) => {}
            None => tracing::debug!(code = %material.code, col, raw, "skipped quantity"),
        }
    }
}

/// Codes that name a material: at least three characters, not `nan`.
pub fn is_valid_material_code(code: &str) -> bool {
    !code.is_empty() && code != "nan" && code.chars().count() >= 3
}

/// Due date of a pivot column, at midnight.
fn parse_due_header(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let format = if raw.contains('/') {
        "%d/%m/%Y"
    } else if raw.contains('-') {
        "%Y-%m-%d"
    } else {
        return None;
    };
    NaiveDate::parse_from_str(raw, format)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn detect_delimiter(line: &str) -> u8 {
    if line.matches(';').count() > line.matches(',').count() {
        b';'
    } else {
        b','
    }
}

/// Quantity in French or plain notation: `1 234,5`, `1234.5`.
pub fn parse_quantity(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return Some(0.0);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|q| q.is_finite() && *q >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_accept_french_notation() {
        assert_eq!(parse_quantity("1 234,5"), Some(1234.5));
        assert_eq!(parse_quantity("1\u{a0}000"), Some(1000.0));
        assert_eq!(parse_quantity("12.25"), Some(12.25));
        assert_eq!(parse_quantity(""), Some(0.0));
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity("-4"), None);
    }

    #[test]
    fn semicolon_export_is_detected() {
        assert_eq!(detect_delimiter(";;;;;;;;;03/06/2024;10/06/2024"), b';');
        assert_eq!(detect_delimiter(",,,,,,,,,2024-06-03"), b',');
    }

    #[test]
    fn due_headers_follow_their_separator() {
        let midnight = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap().and_time(NaiveTime::MIN);
        assert_eq!(parse_due_header("03/06/2024"), Some(midnight(3)));
        assert_eq!(parse_due_header(" 2024-06-10 "), Some(midnight(10)));
        assert_eq!(parse_due_header("45447"), None);
        assert_eq!(parse_due_header("Semaine 23"), None);
        assert_eq!(parse_due_header("2024/06/03"), None);
    }

    #[test]
    fn material_codes_need_three_characters() {
        assert!(is_valid_material_code("M63244"));
        assert!(is_valid_material_code("H2O"));
        assert!(!is_valid_material_code("67"));
        assert!(!is_valid_material_code("AB"));
        assert!(!is_valid_material_code("nan"));
        assert!(!is_valid_material_code(""));
    }
}
