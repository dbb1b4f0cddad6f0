pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{
    console::{AssumeYes, ConsolePrompt, PromptToken},
    hubspot::HubSpotClient,
    storage::LocalStorage,
};
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::SyncConfig;
pub use crate::core::{
    engine::{SyncEngine, SyncOutcome},
    pipeline::ParentLinkPipeline,
};
pub use domain::model::{BatchReport, ErrorRecord, OutcomeRecord, Row, RunArtifacts, RunMode};
pub use utils::error::{Result, SyncError};
