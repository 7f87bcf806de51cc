//! Activity rule table from CSV.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use hashbrown::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::models::rules::{GENERAL_FIELDS, SECTOR_FIELD, SPECIFIC_FIELDS};
use crate::models::{ActivityRule, RuleTable};

/// Load the activity rule table from a CSV file.
pub fn load_rules(path: &Path) -> Result<RuleTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open rules file: {}", path.display()))?;
    let table = read_rules(file)
        .with_context(|| format!("Failed to parse rules file: {}", path.display()))?;

    info!(
        "Loaded {} activity rules with {} zoning columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

/// Parse the rule table. Every header other than the three descriptive
/// fields is a zoning key column.
pub fn read_rules<R: Read>(reader: R) -> Result<RuleTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    let sector_idx = find_column(&headers, &[SECTOR_FIELD])
        .with_context(|| format!("Column '{}' not found", SECTOR_FIELD))?;
    let general_idx = find_column(&headers, GENERAL_FIELDS)
        .with_context(|| format!("Column '{}' not found", GENERAL_FIELDS[0]))?;
    let specific_idx = find_column(&headers, SPECIFIC_FIELDS)
        .with_context(|| format!("Column '{}' not found", SPECIFIC_FIELDS[0]))?;

    let key_columns: Vec<(usize, &String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, h)| {
            !h.is_empty() && *i != sector_idx && *i != general_idx && *i != specific_idx
        })
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;

        let mut cells = HashMap::new();
        for (idx, key) in &key_columns {
            let value = field(&record, *idx);
            if !value.is_empty() {
                cells.insert((*key).clone(), value.to_string());
            }
        }

        rows.push(ActivityRule {
            sector: field(&record, sector_idx).to_string(),
            general_activity: field(&record, general_idx).to_string(),
            specific_activity: field(&record, specific_idx).to_string(),
            cells,
        });
    }

    let columns = key_columns.into_iter().map(|(_, key)| key.clone()).collect();
    Ok(RuleTable::new(columns, rows))
}

fn find_column(headers: &[String], names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h == name))
}

/// Trimmed field value; short rows read as empty.
fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or("")
}
