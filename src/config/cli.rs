use crate::config::credentials::{CredentialChain, EnvToken, StaticToken, DEFAULT_TOKEN_VAR};
use crate::config::toml_config::SyncConfig;
use crate::domain::model::RunMode;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "crm-parent-link")]
#[command(about = "Link child companies to their parent company in the CRM from a CSV file")]
pub struct CliConfig {
    /// Path to a TOML run configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// CSV file with company_id and parent_company_id columns
    #[arg(short, long)]
    pub input: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub api_key: Option<String>,

    /// Env file to load the API key from (defaults to ./.env when present)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    #[arg(long)]
    pub outputs_dir: Option<String>,

    #[arg(long)]
    pub errors_dir: Option<String>,

    #[arg(long)]
    pub logs_dir: Option<String>,

    /// Stop the whole batch at the first company that does not exist
    #[arg(long)]
    pub strict: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Never ask for the API key on the console
    #[arg(long)]
    pub no_prompt: bool,

    /// Log as JSON lines on stdout instead of console + log file
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Loads the config file (if any) and applies command line overrides on top.
    pub fn resolve(&self) -> Result<SyncConfig> {
        let mut config = match &self.config {
            Some(path) => SyncConfig::from_file(path)?,
            None => SyncConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input.path = input.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.api.access_token = Some(api_key.clone());
        }
        if let Some(outputs_dir) = &self.outputs_dir {
            config.output.outputs_dir = outputs_dir.clone();
        }
        if let Some(errors_dir) = &self.errors_dir {
            config.output.errors_dir = errors_dir.clone();
        }
        if let Some(logs_dir) = &self.logs_dir {
            config.output.logs_dir = logs_dir.clone();
        }
        if self.strict {
            config.run.mode = RunMode::StopOnMissing;
        }

        Ok(config)
    }

    /// Explicit token first, then the environment. The console prompt is added by the caller.
    pub fn credential_chain(&self, config: &SyncConfig) -> CredentialChain {
        CredentialChain::new()
            .with(StaticToken::new(config.api.access_token.clone()))
            .with(EnvToken::new(DEFAULT_TOKEN_VAR, self.env_file.clone()))
    }
}
