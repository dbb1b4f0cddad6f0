use crate::core::CredentialProvider;
use crate::utils::error::{Result, SyncError};
use std::path::PathBuf;

pub const DEFAULT_TOKEN_VAR: &str = "HUBSPOT_API_KEY";

/// A token handed over directly (flag or config file).
#[derive(Debug, Clone)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }
}

impl CredentialProvider for StaticToken {
    fn access_token(&self) -> Result<Option<String>> {
        Ok(self.0.clone().filter(|token| !token.trim().is_empty()))
    }
}

/// Reads the token from the process environment, after loading an optional `.env` file.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var_name: String,
    env_file: Option<PathBuf>,
}

impl EnvToken {
    pub fn new(var_name: impl Into<String>, env_file: Option<PathBuf>) -> Self {
        Self {
            var_name: var_name.into(),
            env_file,
        }
    }

    fn load_env_file(&self) -> Result<()> {
        match &self.env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| SyncError::ConfigError {
                    message: format!("Could not load env file {}: {}", path.display(), e),
                })?;
            }
            // a missing ./.env is fine
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Ok(())
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_VAR, None)
    }
}

impl CredentialProvider for EnvToken {
    fn access_token(&self) -> Result<Option<String>> {
        self.load_env_file()?;
        Ok(std::env::var(&self.var_name)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty()))
    }
}

/// Asks each provider in turn and keeps the first token found.
#[derive(Default)]
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn resolve(&self) -> Result<String> {
        self.access_token()?.ok_or(SyncError::MissingCredentials)
    }
}

impl CredentialProvider for CredentialChain {
    fn access_token(&self) -> Result<Option<String>> {
        for provider in &self.providers {
            if let Some(token) = provider.access_token()? {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }
}
