use crate::core::csv_input::parse_rows;
use crate::core::orchestrator::BatchOrchestrator;
use crate::core::validator::ensure_no_duplicate_rows;
use crate::core::{BatchReport, CompanyApi, ConfigProvider, Pipeline, Row, RunArtifacts, Storage};
use crate::utils::error::Result;
use serde::Serialize;
use std::path::Path;

pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Reads the association CSV, links each row's parent company and writes the
/// outcome files.
pub struct ParentLinkPipeline<S: Storage, C: ConfigProvider, A: CompanyApi> {
    storage: S,
    config: C,
    api: A,
}

impl<S: Storage, C: ConfigProvider, A: CompanyApi> ParentLinkPipeline<S, C, A> {
    pub fn new(storage: S, config: C, api: A) -> Self {
        Self {
            storage,
            config,
            api,
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> Result<()> {
        let json_data = serde_json::to_string_pretty(data)?;
        self.storage.write_file(path, json_data.as_bytes()).await
    }
}

fn artifact_path(dir: &str, prefix: &str, timestamp: &str) -> String {
    Path::new(dir)
        .join(format!("{}_{}.json", prefix, timestamp))
        .to_string_lossy()
        .into_owned()
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, A: CompanyApi> Pipeline for ParentLinkPipeline<S, C, A> {
    async fn extract(&self) -> Result<Vec<Row>> {
        tracing::debug!("Reading input file: {}", self.config.input_path());
        let data = self.storage.read_file(self.config.input_path()).await?;
        let rows = parse_rows(&data)?;
        ensure_no_duplicate_rows(&rows)?;
        Ok(rows)
    }

    async fn transform(&self, rows: Vec<Row>) -> Result<BatchReport> {
        let orchestrator = BatchOrchestrator::new(&self.api, self.config.run_mode());
        Ok(orchestrator.run(&rows, &run_timestamp()).await)
    }

    async fn load(&self, report: &BatchReport) -> Result<RunArtifacts> {
        let errors_path = if report.errors.is_empty() {
            None
        } else {
            let path = artifact_path(self.config.errors_dir(), "missing", &report.timestamp);
            self.write_json(&path, &report.errors).await?;
            tracing::info!("Wrote {} errors to {}", report.errors.len(), path);
            Some(path)
        };

        let outputs_path = artifact_path(self.config.outputs_dir(), "updated", &report.timestamp);
        self.write_json(&outputs_path, &report.results).await?;
        tracing::info!("Wrote {} results to {}", report.results.len(), outputs_path);

        Ok(RunArtifacts {
            outputs_path,
            errors_path,
        })
    }
}
