//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::engine::{PredictionResult, PredictionService};
use crate::error::PredictError;
use crate::frame::FeatureRecord;
use crate::repository::FsRepository;

/// Shared application state
pub struct AppState {
    pub service: Arc<PredictionService<FsRepository>>,
}

impl AppState {
    pub fn new(service: Arc<PredictionService<FsRepository>>) -> Self {
        Self { service }
    }
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Single-record prediction
pub async fn predict_single(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SessionQuery>, QueryRejection>,
    request: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    let span = request_span("predict", &query.session_id);
    let service = state.service.clone();
    let session_id = query.session_id;

    let outcome = run_blocking(
        move || service.predict(&session_id, &request.features),
        span.clone(),
    )
    .instrument(span)
    .await;

    match outcome {
        Ok(outcome) => {
            let response = PredictResponse {
                warnings: outcome.report.warnings(),
                result: outcome.result,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Feature schema of the session's model
pub async fn features(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    let span = request_span("features", &query.session_id);
    let service = state.service.clone();
    let session_id = query.session_id;

    match run_blocking(move || service.feature_schema(&session_id), span.clone())
        .instrument(span)
        .await
    {
        Ok(schema) => (StatusCode::OK, Json(schema)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Raw model artifact as an attachment
pub async fn download_model(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    let span = request_span("download", &query.session_id);
    let service = state.service.clone();
    let session_id = query.session_id;

    match run_blocking(move || service.export_model(&session_id), span.clone())
        .instrument(span)
        .await
    {
        Ok(export) => {
            let disposition = format!("attachment; filename=\"{}\"", export.file_name);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                export.bytes,
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

fn request_span(operation: &'static str, session_id: &str) -> tracing::Span {
    tracing::info_span!(
        "request",
        id = %uuid::Uuid::new_v4(),
        operation,
        session = %session_id
    )
}

/// Run pipeline work off the async runtime
async fn run_blocking<T, F>(work: F, span: tracing::Span) -> Result<T, PredictError>
where
    F: FnOnce() -> Result<T, PredictError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || span.in_scope(work))
        .await
        .map_err(|e| PredictError::Internal(format!("prediction task failed: {}", e)))?
}

fn error_response(err: &PredictError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::info!(error = %err, "request rejected");
    }
    error_body(status, err.to_string(), err.error_type())
}

/// Malformed query string or body, before any pipeline work
fn invalid_request(status: StatusCode, message: String) -> Response {
    tracing::info!(status = %status, error = %message, "invalid request");
    error_body(status, message, "invalid_request")
}

fn error_body(status: StatusCode, message: String, error_type: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: ErrorDetail {
                message,
                r#type: error_type.to_string(),
            },
        }),
    )
        .into_response()
}

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub features: FeatureRecord,
}

#[derive(Serialize)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub result: PredictionResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InferenceConfig;
    use serde_json::Value;
    use std::path::Path;

    const MODEL: &str = r#"{
        "model_type": "logistic_regression",
        "classes": [0, 1],
        "coefficients": [[1.0, -1.0]],
        "intercepts": [0.0]
    }"#;

    const METADATA: &str = r#"{
        "feature_names": ["a", "b"],
        "feature_types": {"a": "float64", "b": "float64"},
        "class_labels": ["cat", "dog"],
        "model_name": "Logistic Regression"
    }"#;

    fn write_session(root: &Path, id: &str, files: &[(&str, &str)]) {
        let dir = root.join(id);
        std::fs::create_dir_all(&dir).unwrap();
        for (name, body) in files {
            std::fs::write(dir.join(name), body).unwrap();
        }
    }

    fn state(root: &Path) -> State<Arc<AppState>> {
        let service = PredictionService::new(FsRepository::new(root), InferenceConfig::default());
        State(Arc::new(AppState::new(Arc::new(service))))
    }

    fn query(id: &str) -> Result<Query<SessionQuery>, QueryRejection> {
        Ok(Query(SessionQuery {
            session_id: id.to_string(),
        }))
    }

    fn predict_body(json: &str) -> Result<Json<PredictRequest>, JsonRejection> {
        Ok(Json(serde_json::from_str(json).unwrap()))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_predict_single() {
        let dir = tempfile::tempdir().unwrap();
        write_session(
            dir.path(),
            "s1",
            &[("best_model.json", MODEL), ("model_metadata.json", METADATA)],
        );

        let response = predict_single(
            state(dir.path()),
            query("s1"),
            predict_body(r#"{"features": {"b": 0.5, "a": 2.0}}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["prediction"], 1);
        assert_eq!(body["predicted_label"], "dog");
        assert_eq!(body["model_name"], "Logistic Regression");
        assert_eq!(body["probabilities"].as_array().unwrap().len(), 2);
        assert!(body.get("warnings").is_none());
    }

    #[tokio::test]
    async fn test_predict_reports_corrupt_transformers() {
        let dir = tempfile::tempdir().unwrap();
        write_session(
            dir.path(),
            "s1",
            &[
                ("best_model.json", MODEL),
                ("model_metadata.json", METADATA),
                ("transformers.json", "not json at all {"),
            ],
        );

        let response = predict_single(
            state(dir.path()),
            query("s1"),
            predict_body(r#"{"features": {"a": 2.0, "b": 0.5}}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["predicted_label"], "dog");
        assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_statuses() {
        let dir = tempfile::tempdir().unwrap();
        write_session(dir.path(), "empty", &[]);

        let response = predict_single(
            state(dir.path()),
            query("missing"),
            predict_body(r#"{"features": {}}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "session_not_found");

        let response = predict_single(
            state(dir.path()),
            query("empty"),
            predict_body(r#"{"features": {}}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = download_model(state(dir.path()), query("empty")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(
            body["error"]["message"],
            "No trained model found. Please train a model first."
        );
    }

    #[tokio::test]
    async fn test_corrupt_model_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        write_session(
            dir.path(),
            "s1",
            &[("best_model.json", "[1, 2"), ("model_metadata.json", METADATA)],
        );

        let response = predict_single(
            state(dir.path()),
            query("s1"),
            predict_body(r#"{"features": {"a": 1.0, "b": 1.0}}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "deserialization_error");
    }

    #[tokio::test]
    async fn test_features() {
        let dir = tempfile::tempdir().unwrap();
        write_session(dir.path(), "s1", &[("model_metadata.yaml", "feature_names: [x, y]\n")]);

        let response = features(state(dir.path()), query("s1")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["feature_names"], serde_json::json!(["x", "y"]));
        assert_eq!(body["model_name"], "Unknown");
    }

    #[tokio::test]
    async fn test_download_model() {
        let dir = tempfile::tempdir().unwrap();
        write_session(dir.path(), "s1", &[("best_model.yaml", "garbage: [")]);

        let response = download_model(state(dir.path()), query("s1")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"model_s1.yaml\""
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"garbage: [");
    }

    #[tokio::test]
    async fn test_missing_session_id_uses_error_body() {
        let dir = tempfile::tempdir().unwrap();
        let uri: axum::http::Uri = "/api/predict/features".parse().unwrap();

        let response = features(state(dir.path()), Query::try_from_uri(&uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "invalid_request");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("session_id"));
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_body() {
        let dir = tempfile::tempdir().unwrap();
        write_session(
            dir.path(),
            "s1",
            &[("best_model.json", MODEL), ("model_metadata.json", METADATA)],
        );

        let response = predict_single(
            state(dir.path()),
            query("s1"),
            Json::<PredictRequest>::from_bytes(br#"{"features": [1, 2]}"#),
        )
        .await;
        assert!(response.status().is_client_error());
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "invalid_request");
    }
}
