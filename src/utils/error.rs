use thiserror::Error;

/// 單筆記錄的驗證錯誤，只影響該行，不會中斷整個串流。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Invalid JSON: {0}")]
    Parse(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("{0} cannot be Null.")]
    NullField(String),

    #[error("registered_name is Null and no sales history is available")]
    NoSalesHistory,

    #[error("Invalid sales history: {0}")]
    InvalidSalesHistory(String),

    #[error("Unknown address format: {0}")]
    InvalidAddress(String),
}

impl RecordError {
    /// Stable label used for rejection tallies and report files.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordError::Parse(_) => "parse_error",
            RecordError::MissingField(_) => "missing_field",
            RecordError::NullField(_) => "null_field",
            RecordError::NoSalesHistory => "no_sales_history",
            RecordError::InvalidSalesHistory(_) => "invalid_sales_history",
            RecordError::InvalidAddress(_) => "invalid_address",
        }
    }
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Worker task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) | EtlError::CsvError(_) => ErrorCategory::Io,
            EtlError::SerializationError(_) => ErrorCategory::Data,
            EtlError::TaskError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Io => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::IoError(_) => "Check that the input file exists and the report directory is writable",
            EtlError::CsvError(_) => "Check that the report directory is writable",
            EtlError::SerializationError(_) => "Inspect the summary data for values that cannot be encoded",
            EtlError::TaskError(_) => "Retry with --workers 1 to run without the worker pool",
            EtlError::ConfigError { .. } => "Check the --config path and file permissions",
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => "Fix the configuration value and run again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Io => format!("Could not read or write a file: {}", self),
            ErrorCategory::Data => format!("Could not process the data: {}", self),
            ErrorCategory::System => format!("Internal failure: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
