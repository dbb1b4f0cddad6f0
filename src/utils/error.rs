use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Duplicate record found at line {line}: {record}")]
    DuplicateRecord { line: usize, record: String },

    #[error("Input file is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Error associating Parent company {parent_company_id} with {company_id}: {status} - {body}")]
    AssociationUpdate {
        company_id: String,
        parent_company_id: String,
        status: u16,
        body: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("No API access token was provided")]
    MissingCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Remote,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::DuplicateRecord { .. }
            | SyncError::MissingColumn { .. }
            | SyncError::CsvError(_) => ErrorCategory::Input,
            SyncError::AssociationUpdate { .. } | SyncError::ApiError(_) => ErrorCategory::Remote,
            SyncError::IoError(_) | SyncError::SerializationError(_) => ErrorCategory::Storage,
            SyncError::ConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::ConfigValidationError { .. }
            | SyncError::MissingCredentials => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SyncError::AssociationUpdate { .. } => ErrorSeverity::Low,
            SyncError::ApiError(_) => ErrorSeverity::Medium,
            SyncError::DuplicateRecord { .. }
            | SyncError::MissingColumn { .. }
            | SyncError::CsvError(_)
            | SyncError::ConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::ConfigValidationError { .. }
            | SyncError::MissingCredentials => ErrorSeverity::High,
            SyncError::IoError(_) | SyncError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The input file was rejected: {}", self),
            ErrorCategory::Remote => format!("The CRM API call failed: {}", self),
            ErrorCategory::Storage => format!("Could not read or write a local file: {}", self),
            ErrorCategory::Configuration => format!("The configuration is not usable: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::DuplicateRecord { .. } => {
                "Remove the repeated row from the input file and run again"
            }
            SyncError::MissingColumn { .. } => {
                "Make sure the header row contains company_id and parent_company_id"
            }
            SyncError::CsvError(_) => "Check that every row has the same number of columns",
            SyncError::AssociationUpdate { .. } | SyncError::ApiError(_) => {
                "Check the API access token scopes and network connectivity"
            }
            SyncError::IoError(_) | SyncError::SerializationError(_) => {
                "Check file permissions and free disk space for the output directories"
            }
            SyncError::MissingCredentials => {
                "Pass --api-key, set HUBSPOT_API_KEY, or enter the key when prompted"
            }
            SyncError::ConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::ConfigValidationError { .. } => {
                "Review the configuration file and command line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
