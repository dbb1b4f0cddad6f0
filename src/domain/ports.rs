use crate::domain::model::{BatchReport, OutcomeRecord, Row, RunArtifacts, RunMode};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn outputs_dir(&self) -> &str;
    fn errors_dir(&self) -> &str;
    fn run_mode(&self) -> RunMode;
}

/// The remote companies API.
#[async_trait]
pub trait CompanyApi: Send + Sync {
    /// Never fails: any problem reaching or reading the company counts as "missing".
    async fn company_exists(&self, company_id: &str) -> bool;

    async fn associate_parent(
        &self,
        company_id: &str,
        parent_company_id: &str,
    ) -> Result<OutcomeRecord>;
}

/// Gate between validation and the first mutating call.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, question: &str) -> Result<bool>;
}

pub trait CredentialProvider: Send + Sync {
    /// `Ok(None)` means this source has nothing to offer; the next one is tried.
    fn access_token(&self) -> Result<Option<String>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Row>>;
    async fn transform(&self, rows: Vec<Row>) -> Result<BatchReport>;
    async fn load(&self, report: &BatchReport) -> Result<RunArtifacts>;
}
