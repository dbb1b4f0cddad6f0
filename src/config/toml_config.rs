use crate::core::ConfigProvider;
use crate::domain::model::RunMode;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub api: ApiSettings,
    pub association: AssociationSettings,
    pub input: InputSettings,
    pub output: OutputSettings,
    pub run: RunSettings,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub access_token: Option<String>,
    /// No timeout unless set.
    pub timeout_seconds: Option<u64>,
}

impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSettings")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            timeout_seconds: None,
        }
    }
}

/// Classification of the parent/child link in the CRM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationSettings {
    pub category: String,
    pub definition_id: u32,
}

impl Default for AssociationSettings {
    fn default() -> Self {
        Self {
            category: "HUBSPOT_DEFINED".to_string(),
            // parent company to child company
            definition_id: 13,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub path: String,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            path: "input_data.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub outputs_dir: String,
    pub errors_dir: String,
    pub logs_dir: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            outputs_dir: "data/outputs".to_string(),
            errors_dir: "data/errors".to_string(),
            logs_dir: "logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub mode: RunMode,
}

impl SyncConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SyncError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SyncError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validate_positive_number("api.timeout_seconds", timeout, 1)?;
        }

        validate_non_empty_string("association.category", &self.association.category)?;
        validate_path("input.path", &self.input.path)?;
        validate_path("output.outputs_dir", &self.output.outputs_dir)?;
        validate_path("output.errors_dir", &self.output.errors_dir)?;
        validate_path("output.logs_dir", &self.output.logs_dir)?;

        Ok(())
    }
}

impl ConfigProvider for SyncConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn outputs_dir(&self) -> &str {
        &self.output.outputs_dir
    }

    fn errors_dir(&self) -> &str {
        &self.output.errors_dir
    }

    fn run_mode(&self) -> RunMode {
        self.run.mode
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
