use crate::domain::model::Row;
use crate::utils::error::{Result, SyncError};
use std::collections::HashSet;

/// Rejects the batch at the first row that repeats an earlier one field-for-field.
pub fn ensure_no_duplicate_rows(rows: &[Row]) -> Result<()> {
    let mut seen = HashSet::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if !seen.insert(&row.fields) {
            let err = SyncError::DuplicateRecord {
                // header is line 1
                line: index + 2,
                record: row.to_string(),
            };
            tracing::error!("{}", err);
            return Err(err);
        }
    }

    tracing::info!("Input data has been validated");
    Ok(())
}
