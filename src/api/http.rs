//! HTTP surface: the form page, its script, and the prediction endpoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::common::error::{ErrorCode, SalaryError, SalaryResult};
use crate::common::time;
use crate::inference::{self, Prediction};
use crate::model::ModelHandle;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const SCRIPT_JS: &str = include_str!("../../static/script.js");

/// Shared, read-only state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub model: Arc<ModelHandle>,
}

impl AppState {
    pub fn new(model: ModelHandle) -> Self {
        Self {
            model: Arc::new(model),
        }
    }
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    predicted_salary: f64,
    formatted_salary: String,
    success: bool,
}

impl From<Prediction> for PredictResponse {
    fn from(p: Prediction) -> Self {
        Self {
            predicted_salary: p.predicted_salary,
            formatted_salary: p.formatted_salary,
            success: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
}

impl IntoResponse for SalaryError {
    fn into_response(self) -> Response {
        match self {
            SalaryError::ModelUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: self.to_string(),
                    success: None,
                }),
            )
                .into_response(),
            SalaryError::InvalidInput { .. } | SalaryError::InferenceFailure(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: self.to_string(),
                    success: Some(false),
                }),
            )
                .into_response(),
        }
    }
}

/// Build the application router.
///
/// Request bodies are unbounded so that an oversized payload still gets the
/// model check and the JSON error shape instead of a bare 413.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/static/:file", get(static_asset))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn static_asset(Path(file): Path<String>) -> Response {
    match file.as_str() {
        "script.js" => (
            [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
            SCRIPT_JS,
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn predict(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let outcome = state
        .model
        .regressor()
        .and_then(|_| require_json(&headers))
        .and_then(|()| inference::predict(&state.model, &body));
    match outcome {
        Ok(prediction) => Json(PredictResponse::from(prediction)).into_response(),
        Err(err) => {
            tracing::debug!(code = err.code() as u32, error = %err, "prediction rejected");
            err.into_response()
        }
    }
}

/// Accepts `application/json` and `application/*+json`, parameters ignored.
fn require_json(headers: &HeaderMap) -> SalaryResult<()> {
    let essence = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase());
    match essence.as_deref() {
        Some("application/json") => Ok(()),
        Some(other) if other.starts_with("application/") && other.ends_with("+json") => Ok(()),
        _ => Err(SalaryError::invalid(
            "content-type",
            "expected request with `Content-Type: application/json`",
        )),
    }
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, model: ModelHandle) -> std::io::Result<()> {
    let start = Instant::now();
    let available = model.is_available();
    let app = router(AppState::new(model));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    let code = if available {
        ErrorCode::Ok
    } else {
        ErrorCode::ModelUnavailable
    };
    tracing::info!(
        ev = "listening",
        code = code as u32,
        dur_ms = time::elapsed_ms(start) as u64,
        addr = %local,
        model_available = available,
        "serving salary predictions"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!(ev = "shutdown", "shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn json_content_types_are_accepted() {
        for value in [
            "application/json",
            "application/json; charset=utf-8",
            "Application/JSON",
            "application/vnd.salary+json",
        ] {
            assert!(require_json(&with_content_type(value)).is_ok(), "{value}");
        }
    }

    #[test]
    fn other_content_types_are_rejected() {
        for value in ["text/plain", "application/x-www-form-urlencoded", "multipart/form-data"] {
            let err = require_json(&with_content_type(value)).unwrap_err();
            assert!(matches!(err, SalaryError::InvalidInput { .. }), "{value}");
        }
        assert!(require_json(&HeaderMap::new()).is_err());
    }
}
