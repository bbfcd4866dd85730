use std::path::Path;

use thiserror::Error;

use crate::util::read_file_as_utf8;

const FULL_NAME_COLUMN: &str = "Full Name";
const DETAIL_COLUMN: &str = "Statement CC Details";
const HOUSEHOLD_COLUMN: &str = "HH ID";

#[derive(Debug, Error)]
pub enum CcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CC details file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// One row of the CC details export: a household member and the card
/// annotation that goes next to their name on the cover sheet.
#[derive(Debug, Clone)]
pub struct CcRow {
    pub full_name: String,
    pub detail: Option<String>,
    /// Household source system ID, verbatim (e.g. `"A-0099-4521"`).
    pub household_source: String,
}

/// All cover-sheet lines for one household, in roster order.
#[derive(Debug, Clone)]
pub struct CcHousehold {
    /// Filename label: the source ID's segments after the second `-`,
    /// joined with `_`.
    pub label: String,
    pub names: Vec<String>,
}

impl CcHousehold {
    pub fn file_name(&self) -> String {
        format!("CC_HH_{}.pdf", self.label)
    }
}

/// Load the CC details CSV. Headers are trimmed before matching since the
/// export pads some of them.
pub fn load_cc_rows(path: &Path) -> Result<Vec<CcRow>, CcError> {
    let content = read_file_as_utf8(path)?;
    cc_rows_from_csv_text(&content)
}

pub fn cc_rows_from_csv_text(content: &str) -> Result<Vec<CcRow>, CcError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let required = [FULL_NAME_COLUMN, DETAIL_COLUMN, HOUSEHOLD_COLUMN];
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CcError::MissingColumns(missing));
    }

    let column = |name: &str| -> usize {
        headers.iter().position(|h| h == name).expect("known column")
    };
    let name_col = column(FULL_NAME_COLUMN);
    let detail_col = column(DETAIL_COLUMN);
    let household_col = column(HOUSEHOLD_COLUMN);

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row?;
        let value = |idx: usize| row.get(idx).unwrap_or_default().trim().to_string();
        rows.push(CcRow {
            full_name: value(name_col),
            detail: present(value(detail_col)),
            household_source: value(household_col),
        });
    }
    Ok(rows)
}

/// Group rows by household in first-seen order. Rows without a household ID
/// are dropped — they can't be routed to a cover sheet.
pub fn group_households(rows: &[CcRow]) -> Vec<CcHousehold> {
    let mut order: Vec<&str> = Vec::new();
    for row in rows {
        if present(row.household_source.clone()).is_none() {
            continue;
        }
        if !order.contains(&row.household_source.as_str()) {
            order.push(&row.household_source);
        }
    }

    order
        .iter()
        .map(|&source| CcHousehold {
            label: cover_label(source),
            names: rows
                .iter()
                .filter(|row| row.household_source == source)
                .map(|row| match &row.detail {
                    Some(detail) => format!("{} {}", row.full_name, detail),
                    None => row.full_name.clone(),
                })
                .collect(),
        })
        .collect()
}

/// The household portion of a source ID: everything after the second `-`,
/// with any further dashes flattened to `_` for the filename.
pub fn cover_label(source_id: &str) -> String {
    let parts: Vec<&str> = source_id.split('-').collect();
    if parts.len() > 2 {
        parts[2..].join("_")
    } else {
        source_id.to_string()
    }
}

/// Treat empty cells and the spreadsheet tool's literal "nan" as absent.
fn present(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
