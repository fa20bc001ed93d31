use thiserror::Error;

#[derive(Error, Debug)]
pub enum KpaError {
    #[error("CPI data source error: {message}")]
    DataSource { message: String },

    #[error("No CPI data for year {0}")]
    CpiNotFound(i32),

    #[error("Unexpected CPI data format: {message}")]
    CpiParse { message: String },

    #[error("AI analyst error: {message}")]
    Analyst { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<reqwest::Error> for KpaError {
    fn from(err: reqwest::Error) -> Self {
        // Transport, timeout and body-decode failures all surface as a
        // data-source failure; callers never retry (one call, one result).
        KpaError::DataSource {
            message: err.to_string(),
        }
    }
}

impl KpaError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            KpaError::DataSource { .. } => "CPI service unavailable".to_string(),
            KpaError::CpiNotFound(year) => format!("No CPI data for year {}", year),
            KpaError::CpiParse { .. } => "Unexpected CPI data format".to_string(),
            KpaError::Analyst { .. } => "AI analysis unavailable".to_string(),
            KpaError::ConfigError { message } => format!("Configuration problem: {}", message),
            KpaError::MissingConfigError { field } => format!("Missing configuration: {}", field),
            KpaError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            KpaError::IoError(e) => format!("File system problem: {}", e),
            KpaError::SerializationError(e) => format!("Data format problem: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            KpaError::DataSource { .. } => {
                "Check network connectivity and GENESIS credentials, then try again"
            }
            KpaError::CpiNotFound(_) => {
                "Check the purchase date; GENESIS may not have published the prior October yet"
            }
            KpaError::CpiParse { .. } => {
                "The GENESIS table layout may have changed; inspect the raw response"
            }
            KpaError::Analyst { .. } => "Check OPENAI_API_KEY; the numeric result is unaffected",
            KpaError::ConfigError { .. }
            | KpaError::MissingConfigError { .. }
            | KpaError::InvalidConfigValueError { .. } => {
                "Fix the flag or environment variable and rerun"
            }
            KpaError::IoError(_) => "Check the output path and permissions",
            KpaError::SerializationError(_) => "Report this as a bug",
        }
    }

    /// Process exit code for the CLI: configuration mistakes are the
    /// operator's to fix (2), provider outages are transient (3),
    /// everything else is a processing failure (1).
    pub fn exit_code(&self) -> i32 {
        match self {
            KpaError::ConfigError { .. }
            | KpaError::MissingConfigError { .. }
            | KpaError::InvalidConfigValueError { .. } => 2,
            KpaError::DataSource { .. } => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, KpaError>;
