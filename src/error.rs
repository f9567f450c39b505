use thiserror::Error;

/// Main error type for kvconf operations
#[derive(Debug, Error)]
pub enum KvconfError {
    #[error("Config '{name}' is immutable and cannot be modified")]
    Immutable { name: String },

    #[error("No value was found for key '{key}'")]
    NotFound { key: String },

    #[error("The value mapped to key '{key}' is not of type {expected}")]
    WrongType { key: String, expected: String },

    #[error("The value for key '{key}' cannot be stored: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("A config is already registered under the name '{name}'")]
    DuplicateName { name: String },

    #[error("Field '{field}' is not defined in config '{config}'. Please populate '{field}' with valid information and the correct type")]
    MissingField { config: String, field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl KvconfError {
    pub fn immutable<S: Into<String>>(name: S) -> Self {
        Self::Immutable { name: name.into() }
    }

    pub fn not_found<S: Into<String>>(key: S) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn wrong_type<S: Into<String>, T: Into<String>>(key: S, expected: T) -> Self {
        Self::WrongType {
            key: key.into(),
            expected: expected.into(),
        }
    }

    pub fn invalid_value<S: Into<String>, R: Into<String>>(key: S, reason: R) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn duplicate_name<S: Into<String>>(name: S) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    pub fn missing_field<S: Into<String>, F: Into<String>>(config: S, field: F) -> Self {
        Self::MissingField {
            config: config.into(),
            field: field.into(),
        }
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result type alias for kvconf operations
pub type Result<T> = std::result::Result<T, KvconfError>;
