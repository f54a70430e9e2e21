//! One-shot, fail-soft model loading and the process-wide model handle.

use std::sync::Arc;
use std::time::Instant;

use crate::common::error::{ErrorCode, ModelLoadError, SalaryError, SalaryResult};
use crate::common::time;

use super::domain::Regressor;
use super::repo_fs::ModelRepo;

/// Process-wide model state. Decided once at startup and never changed.
#[derive(Clone)]
pub enum ModelHandle {
    Available(Arc<dyn Regressor>),
    Unavailable { reason: String },
}

impl ModelHandle {
    pub fn available<R: Regressor + 'static>(model: R) -> Self {
        ModelHandle::Available(Arc::new(model))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ModelHandle::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn from_result<R: Regressor + 'static>(result: Result<R, ModelLoadError>) -> Self {
        match result {
            Ok(model) => Self::available(model),
            Err(err) => Self::unavailable(err.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ModelHandle::Available(_))
    }

    /// The loaded model, or [`SalaryError::ModelUnavailable`].
    pub fn regressor(&self) -> SalaryResult<&dyn Regressor> {
        match self {
            ModelHandle::Available(model) => Ok(model.as_ref()),
            ModelHandle::Unavailable { .. } => Err(SalaryError::ModelUnavailable),
        }
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelHandle::Available(_) => f.write_str("ModelHandle::Available"),
            ModelHandle::Unavailable { reason } => f
                .debug_struct("ModelHandle::Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Load the model from `repo`. Never fails: errors are logged and yield an
/// unavailable handle so the server keeps running in degraded mode.
pub fn load_handle(repo: &dyn ModelRepo) -> ModelHandle {
    let start = Instant::now();
    let loaded = repo.load();
    match &loaded {
        Ok(model) => {
            tracing::info!(
                ev = "model_loaded",
                code = ErrorCode::Ok as u32,
                dur_ms = time::elapsed_ms(start) as u64,
                path = %repo.location(),
                trees = model.tree_count(),
                features = model.feature_count(),
                "model loaded successfully"
            );
        }
        Err(err) => {
            tracing::error!(
                ev = "model_unavailable",
                code = ErrorCode::ModelUnavailable as u32,
                dur_ms = time::elapsed_ms(start) as u64,
                path = %repo.location(),
                error = %err,
                "error loading model, predictions are disabled"
            );
        }
    }
    ModelHandle::from_result(loaded)
}
