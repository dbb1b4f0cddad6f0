use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const COMPANY_ID: &str = "company_id";
pub const PARENT_COMPANY_ID: &str = "parent_company_id";

/// One CSV line. Fields are kept sorted so two rows compare equal exactly when
/// every column holds the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Row {
    pub fields: BTreeMap<String, String>,
}

impl Row {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn company_id(&self) -> &str {
        self.get(COMPANY_ID).unwrap_or_default()
    }

    pub fn parent_company_id(&self) -> &str {
        self.get(PARENT_COMPANY_ID).unwrap_or_default()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub company_id: String,
    pub parent_company_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub company_id: String,
    pub parent_company_id: String,
    pub error: String,
}

impl ErrorRecord {
    pub fn for_row(row: &Row, error: impl Into<String>) -> Self {
        Self {
            company_id: row.company_id().to_string(),
            parent_company_id: row.parent_company_id().to_string(),
            error: error.into(),
        }
    }
}

/// What happened to a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Linked(OutcomeRecord),
    Missing(ErrorRecord),
    UpdateFailed(ErrorRecord),
}

/// Accumulated state of one batch run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub timestamp: String,
    pub results: Vec<OutcomeRecord>,
    pub errors: Vec<ErrorRecord>,
    /// Rows never looked at because the run stopped early.
    pub skipped: usize,
}

impl BatchReport {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Linked(record) => self.results.push(record),
            RowOutcome::Missing(record) | RowOutcome::UpdateFailed(record) => {
                self.errors.push(record)
            }
        }
    }
}

/// Where the run's JSON files ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifacts {
    pub outputs_path: String,
    pub errors_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Record a missing company and move on to the next row.
    #[default]
    Continue,
    /// Record a missing company and stop processing the remaining rows.
    StopOnMissing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_equality_ignores_column_order() {
        let a: Row = [("company_id", "1"), ("parent_company_id", "2")]
            .into_iter()
            .collect();
        let b: Row = [("parent_company_id", "2"), ("company_id", "1")]
            .into_iter()
            .collect();

        assert_eq!(a, b);
        assert_eq!(a.to_string(), "{company_id: 1, parent_company_id: 2}");
    }

    #[test]
    fn report_keeps_processing_order() {
        let row: Row = [("company_id", "7"), ("parent_company_id", "8")]
            .into_iter()
            .collect();
        let mut report = BatchReport::new("20240101_000000");

        report.record(RowOutcome::Missing(ErrorRecord::for_row(&row, "Company not found")));
        report.record(RowOutcome::Linked(OutcomeRecord {
            company_id: "1".to_string(),
            parent_company_id: "2".to_string(),
        }));

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].company_id, "7");
        assert_eq!(report.results[0].parent_company_id, "2");
    }

    #[test]
    fn run_mode_parses_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: RunMode,
        }
        let parsed: Wrapper = toml::from_str("mode = \"stop_on_missing\"").unwrap();
        assert_eq!(parsed.mode, RunMode::StopOnMissing);
    }
}
