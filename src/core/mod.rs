pub mod csv_input;
pub mod engine;
pub mod orchestrator;
pub mod pipeline;
pub mod validator;

pub use crate::domain::model::{BatchReport, ErrorRecord, OutcomeRecord, Row, RunArtifacts};
pub use crate::domain::ports::{
    CompanyApi, ConfigProvider, Confirmation, CredentialProvider, Pipeline, Storage,
};
pub use crate::utils::error::Result;
