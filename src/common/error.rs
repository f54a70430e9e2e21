//! Error handling primitives shared across the service.

use thiserror::Error;

/// Stable error codes attached to log events.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// No model could be loaded at startup.
    ModelUnavailable = 1,
    /// Request payload could not be mapped onto the feature record.
    InvalidInput = 2,
    /// The model rejected the row or produced an unusable value.
    InferenceFailure = 3,
    /// Catch-all for startup and wiring failures.
    Internal = 4,
}

/// Errors raised while serving a prediction request.
#[derive(Debug, Error)]
pub enum SalaryError {
    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("inference failed: {0}")]
    InferenceFailure(String),
}

/// Result alias used on the request path.
pub type SalaryResult<T> = Result<T, SalaryError>;

impl SalaryError {
    /// Validation helper.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Inference helper.
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::InferenceFailure(msg.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SalaryError::ModelUnavailable => ErrorCode::ModelUnavailable,
            SalaryError::InvalidInput { .. } => ErrorCode::InvalidInput,
            SalaryError::InferenceFailure(_) => ErrorCode::InferenceFailure,
        }
    }
}

/// Errors raised while reading the model artefact at startup.
///
/// None of these abort the process; they put the service into degraded mode.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("cannot read model artefact: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot decode model artefact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model artefact is inconsistent: {0}")]
    Schema(String),
}

impl ModelLoadError {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }
}

/// Configuration errors. The only class of error that stops startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address: {0}")]
    BindAddr(String),
}
