use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to look up address")]
    LookupFailed { status: u16 },

    #[error("Failed to upload spreadsheet")]
    UploadFailed { status: u16 },

    /// Server-supplied reason; displayed verbatim.
    #[error("{detail}")]
    UploadRejected { status: u16, detail: String },

    #[error("Failed to purge database")]
    PurgeFailed { status: u16 },

    #[error("Health check failed")]
    HealthFailed { status: u16 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected locally before any request was made.
    Validation,
    /// The request never produced an HTTP response.
    Transport,
    /// The backend answered with a failure.
    Server,
    Config,
}

impl ErrorCategory {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCategory::Validation => 1,
            ErrorCategory::Server => 2,
            ErrorCategory::Transport => 3,
            ErrorCategory::Config => 4,
        }
    }
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::ValidationError { .. } => ErrorCategory::Validation,
            ClientError::HttpError(_) | ClientError::IoError(_) => ErrorCategory::Transport,
            ClientError::SerializationError(_)
            | ClientError::LookupFailed { .. }
            | ClientError::UploadFailed { .. }
            | ClientError::UploadRejected { .. }
            | ClientError::PurgeFailed { .. }
            | ClientError::HealthFailed { .. } => ErrorCategory::Server,
            ClientError::UrlError(_)
            | ClientError::ConfigError { .. }
            | ClientError::InvalidConfigValueError { .. } => ErrorCategory::Config,
        }
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::LookupFailed { status }
            | ClientError::UploadFailed { status }
            | ClientError::UploadRejected { status, .. }
            | ClientError::PurgeFailed { status }
            | ClientError::HealthFailed { status } => Some(*status),
            ClientError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::HttpError(e) if e.is_timeout() => {
                "The server took too long to answer".to_string()
            }
            ClientError::HttpError(e) if e.is_connect() => {
                "Could not reach the server; check the API URL".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
