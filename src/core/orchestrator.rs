use crate::domain::model::{BatchReport, ErrorRecord, Row, RowOutcome, RunMode};
use crate::domain::ports::CompanyApi;

pub const COMPANY_NOT_FOUND: &str = "Company not found";

/// Drives rows through existence checks and association updates, one at a time.
pub struct BatchOrchestrator<'a, A: CompanyApi> {
    api: &'a A,
    mode: RunMode,
}

impl<'a, A: CompanyApi> BatchOrchestrator<'a, A> {
    pub fn new(api: &'a A, mode: RunMode) -> Self {
        Self { api, mode }
    }

    pub async fn process_row(&self, row: &Row) -> RowOutcome {
        let company_id = row.company_id();
        let parent_company_id = row.parent_company_id();

        // the parent is not looked up once the child is known to be missing
        let both_exist = self.api.company_exists(company_id).await
            && self.api.company_exists(parent_company_id).await;
        if !both_exist {
            tracing::info!(
                "Skipping company {}: The company_id or parent_company_id does not exist",
                row
            );
            return RowOutcome::Missing(ErrorRecord::for_row(row, COMPANY_NOT_FOUND));
        }

        match self
            .api
            .associate_parent(company_id, parent_company_id)
            .await
        {
            Ok(record) => RowOutcome::Linked(record),
            Err(e) => RowOutcome::UpdateFailed(ErrorRecord::for_row(row, e.to_string())),
        }
    }

    pub async fn run(&self, rows: &[Row], timestamp: &str) -> BatchReport {
        let mut report = BatchReport::new(timestamp);

        for (index, row) in rows.iter().enumerate() {
            tracing::info!("Processing company: {}", row);

            let outcome = self.process_row(row).await;
            let stop = matches!(outcome, RowOutcome::Missing(_)) && self.mode == RunMode::StopOnMissing;
            report.record(outcome);

            if stop {
                report.skipped = rows.len() - index - 1;
                tracing::warn!(
                    "Stopping after missing company; {} remaining rows were not processed",
                    report.skipped
                );
                break;
            }
        }

        tracing::info!(
            "Batch finished: {} associated, {} errors",
            report.results.len(),
            report.errors.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::OutcomeRecord;
    use crate::utils::error::{Result, SyncError};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeApi {
        known: HashSet<String>,
        failing_updates: HashSet<String>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeApi {
        fn with_companies(ids: &[&str]) -> Self {
            Self {
                known: ids.iter().map(|id| id.to_string()).collect(),
                ..Default::default()
            }
        }

        fn failing_update_for(mut self, company_id: &str) -> Self {
            self.failing_updates.insert(company_id.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CompanyApi for FakeApi {
        async fn company_exists(&self, company_id: &str) -> bool {
            self.calls.lock().unwrap().push(format!("get {}", company_id));
            self.known.contains(company_id)
        }

        async fn associate_parent(
            &self,
            company_id: &str,
            parent_company_id: &str,
        ) -> Result<OutcomeRecord> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("put {}->{}", parent_company_id, company_id));
            if self.failing_updates.contains(company_id) {
                return Err(SyncError::AssociationUpdate {
                    company_id: company_id.to_string(),
                    parent_company_id: parent_company_id.to_string(),
                    status: 400,
                    body: "invalid association".to_string(),
                });
            }
            Ok(OutcomeRecord {
                company_id: company_id.to_string(),
                parent_company_id: parent_company_id.to_string(),
            })
        }
    }

    fn row(company_id: &str, parent_company_id: &str) -> Row {
        [
            ("company_id", company_id),
            ("parent_company_id", parent_company_id),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn links_row_when_both_companies_exist() {
        let api = FakeApi::with_companies(&["1", "2"]);
        let report = BatchOrchestrator::new(&api, RunMode::Continue)
            .run(&[row("1", "2")], "20240101_120000")
            .await;

        assert_eq!(
            report.results,
            vec![OutcomeRecord {
                company_id: "1".to_string(),
                parent_company_id: "2".to_string(),
            }]
        );
        assert!(report.errors.is_empty());
        assert_eq!(report.timestamp, "20240101_120000");
        assert_eq!(api.calls(), vec!["get 1", "get 2", "put 2->1"]);
    }

    #[tokio::test]
    async fn missing_parent_records_error_without_update() {
        let api = FakeApi::with_companies(&["1"]);
        let report = BatchOrchestrator::new(&api, RunMode::Continue)
            .run(&[row("1", "99")], "ts")
            .await;

        assert!(report.results.is_empty());
        assert_eq!(
            report.errors,
            vec![ErrorRecord {
                company_id: "1".to_string(),
                parent_company_id: "99".to_string(),
                error: COMPANY_NOT_FOUND.to_string(),
            }]
        );
        assert!(api.calls().iter().all(|call| !call.starts_with("put")));
    }

    #[tokio::test]
    async fn missing_child_skips_parent_lookup() {
        let api = FakeApi::with_companies(&["2"]);
        let outcome = BatchOrchestrator::new(&api, RunMode::Continue)
            .process_row(&row("1", "2"))
            .await;

        assert!(matches!(outcome, RowOutcome::Missing(_)));
        assert_eq!(api.calls(), vec!["get 1"]);
    }

    #[tokio::test]
    async fn failed_update_is_recorded_and_batch_continues() {
        let api = FakeApi::with_companies(&["1", "2", "3"]).failing_update_for("1");
        let report = BatchOrchestrator::new(&api, RunMode::Continue)
            .run(&[row("1", "2"), row("3", "2")], "ts")
            .await;

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].company_id, "1");
        assert!(report.errors[0].error.contains("400 - invalid association"));
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].company_id, "3");
    }

    #[tokio::test]
    async fn continue_mode_processes_rows_after_missing_company() {
        let api = FakeApi::with_companies(&["1", "2", "3"]);
        let rows = vec![row("1", "2"), row("404", "2"), row("3", "2")];
        let report = BatchOrchestrator::new(&api, RunMode::Continue)
            .run(&rows, "ts")
            .await;

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.skipped, 0);
    }

    #[tokio::test]
    async fn stop_on_missing_truncates_the_batch() {
        let api = FakeApi::with_companies(&["1", "2", "3"]);
        let rows = vec![row("1", "2"), row("404", "2"), row("3", "2"), row("2", "1")];
        let report = BatchOrchestrator::new(&api, RunMode::StopOnMissing)
            .run(&rows, "ts")
            .await;

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].company_id, "404");
        assert_eq!(report.skipped, 2);
        assert!(!api.calls().contains(&"get 3".to_string()));
    }

    #[tokio::test]
    async fn every_row_yields_exactly_one_record() {
        let api = FakeApi::with_companies(&["1", "2", "3", "4"]).failing_update_for("4");
        let rows = vec![row("1", "2"), row("5", "2"), row("3", "1"), row("4", "3")];
        let report = BatchOrchestrator::new(&api, RunMode::Continue)
            .run(&rows, "ts")
            .await;

        assert_eq!(report.results.len() + report.errors.len(), rows.len());
    }
}
