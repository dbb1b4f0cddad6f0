use crate::core::{BatchReport, Confirmation, Pipeline, RunArtifacts};
use crate::utils::error::Result;

pub const CONFIRMATION_QUESTION: &str =
    "The data input file has been successfully validated. Do you want to continue with the update? (y/n) ";

#[derive(Debug)]
pub enum SyncOutcome {
    /// Validation passed but the operator declined the update.
    Aborted { validated_rows: usize },
    Completed {
        report: BatchReport,
        artifacts: RunArtifacts,
    },
}

pub struct SyncEngine<P: Pipeline, C: Confirmation> {
    pipeline: P,
    confirmation: C,
}

impl<P: Pipeline, C: Confirmation> SyncEngine<P, C> {
    pub fn new(pipeline: P, confirmation: C) -> Self {
        Self {
            pipeline,
            confirmation,
        }
    }

    pub async fn run(&self) -> Result<SyncOutcome> {
        tracing::info!("Loading and validating input data");
        let rows = self.pipeline.extract().await?;
        tracing::info!("Validated {} rows", rows.len());

        if !self.confirmation.confirm(CONFIRMATION_QUESTION)? {
            tracing::info!("Update operation aborted.");
            return Ok(SyncOutcome::Aborted {
                validated_rows: rows.len(),
            });
        }

        tracing::info!("Update operation started");
        let report = self.pipeline.transform(rows).await?;
        let artifacts = self.pipeline.load(&report).await?;

        Ok(SyncOutcome::Completed { report, artifacts })
    }
}
