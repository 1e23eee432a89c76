use thiserror::Error;

/// Main error type for the tempo-run library
#[derive(Error, Debug)]
pub enum PaceError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Feature service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Training error: {0}")]
    Training(#[from] TrainingError),

    #[error("No usable features for '{song}': {reason}")]
    FeatureUnavailable { song: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised while reading or shaping tables
#[derive(Error, Debug)]
pub enum DataError {
    #[error("No {what} available")]
    EmptyInput { what: String },

    #[error("Record {index} is missing required field '{field}'")]
    MissingField { index: usize, field: String },

    #[error("Record {index} has invalid {field}: {value}")]
    InvalidValue {
        index: usize,
        field: String,
        value: String,
    },

    #[error("Data file not found: {path}")]
    NotFound { path: String },

    #[error("Malformed data in {source_name}: {reason}")]
    Malformed { source_name: String, reason: String },
}

/// Errors from the external feature-generation service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,

    #[error("API key variable {var} is not set")]
    MissingApiKey { var: String },

    #[error("Service returned an empty response")]
    EmptyResponse,

    #[error("Unparsable response: {0}")]
    InvalidResponse(String),

    #[error("Feature {field} out of range: {value}")]
    InvalidFeature { field: String, value: String },
}

/// Errors raised while fitting the pace model
#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("Need at least {required} rows to train, got {rows}")]
    InsufficientData { rows: usize, required: usize },

    #[error("Split of {rows} rows leaves an empty {partition} partition")]
    EmptyPartition { rows: usize, partition: String },

    #[error("Invalid training parameters: {details}")]
    InvalidParameters { details: String },

    #[error("Failed to build training thread pool: {reason}")]
    ThreadPool { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using PaceError
pub type Result<T> = std::result::Result<T, PaceError>;

impl PaceError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Service(err) => err.is_transient(),
            Self::FeatureUnavailable { .. } => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Data(DataError::NotFound { path }) => {
                format!("Data file '{}' not found. Run the earlier pipeline stages first.", path)
            }
            Self::Data(DataError::EmptyInput { what }) => {
                format!("No {} available yet. Ingest some runs first.", what)
            }
            Self::Service(ServiceError::MissingApiKey { var }) => {
                format!("Set the {} environment variable to reach the feature service.", var)
            }
            Self::FeatureUnavailable { song, reason } => {
                if crate::enrichment::split_song_name(song).is_some() {
                    format!("Could not estimate a pace for '{}': {}.", song, reason)
                } else {
                    format!(
                        "Could not estimate a pace for '{}': {}. Use the form 'Title - Artist'.",
                        song, reason
                    )
                }
            }
            Self::Training(TrainingError::InsufficientData { rows, required }) => {
                format!("Only {} song(s) in the condensed table; at least {} are needed to train.", rows, required)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

impl ServiceError {
    /// Whether a later attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::MissingApiKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_wrap_into_pace_error() {
        let err: PaceError = ServiceError::Timeout.into();
        assert!(matches!(err, PaceError::Service(ServiceError::Timeout)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_missing_api_key_is_not_recoverable() {
        let err: PaceError = ServiceError::MissingApiKey { var: "GROQ_API_KEY".into() }.into();
        assert!(!err.is_recoverable());
        assert!(err.user_message().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_training_errors_are_permanent() {
        let err: PaceError = TrainingError::InsufficientData { rows: 1, required: 2 }.into();
        assert!(!err.is_recoverable());
        assert!(err.user_message().contains("at least 2"));
    }

    #[test]
    fn test_feature_unavailable_message_hints_format_only_when_unsplittable() {
        let failed = PaceError::FeatureUnavailable {
            song: "Titanium - David Guetta".to_string(),
            reason: "3 attempt(s) failed, last error: Request timeout".to_string(),
        };
        let message = failed.user_message();
        assert!(message.contains("Request timeout"));
        assert!(!message.contains("Title - Artist"));

        let skipped = PaceError::FeatureUnavailable {
            song: "Titanium".to_string(),
            reason: "expected the form 'Title - Artist'".to_string(),
        };
        assert!(skipped.user_message().contains("Use the form 'Title - Artist'"));
    }
}
