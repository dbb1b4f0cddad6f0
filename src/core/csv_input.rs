use crate::domain::model::{Row, COMPANY_ID, PARENT_COMPANY_ID};
use crate::utils::error::{Result, SyncError};
use std::collections::BTreeMap;

const REQUIRED_COLUMNS: [&str; 2] = [COMPANY_ID, PARENT_COMPANY_ID];

/// Columns whose values are compared case-insensitively, so they are lower-cased on load.
const LOWERCASE_VALUE_COLUMNS: [&str; 2] = ["action", "key"];

/// Parses the input CSV. Header names are trimmed and lower-cased.
pub fn parse_rows(data: &[u8]) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_lowercase())
        .collect();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(SyncError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let fields: BTreeMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| {
                let value = if LOWERCASE_VALUE_COLUMNS.contains(&header.as_str()) {
                    value.to_lowercase()
                } else {
                    value.to_string()
                };
                (header.clone(), value)
            })
            .collect();
        rows.push(Row::new(fields));
    }

    tracing::debug!("Parsed {} rows with columns {:?}", rows.len(), headers);
    Ok(rows)
}
