//! HTTP surface for the student registry.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /` – Liveness text.
//! - `POST /students` – Create a student from `{ "name", "age" }`; returns 201 with the record.
//! - `GET /students` – List every student.
//! - `GET /students/:id` – Fetch one student (404 when absent).
//! - `DELETE /students/:id` – Delete one student. A missing id answers 200 with an error body in
//!   legacy mode, 404 otherwise.
//! - `GET /students/name/:fragment` – Case-insensitive name search (404 when nothing matches).
//! - `GET /health` – Store reachability.
//! - `GET /metrics` – Record activity counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools.
//!
//! Records are rendered as `{ "id", "name", "age" }` and every failure as `{ "error": message }`.

use crate::metrics::MetricsSnapshot;
use crate::records::{RecordApi, RecordError, Student};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

const WELCOME: &str = "Welcome to the Student Management System 9.0 API!";
const INTERNAL_ERROR: &str = "Internal server error";

/// Boundary behaviour that differs between legacy and normalized clients.
#[derive(Debug, Clone, Copy)]
pub struct ApiOptions {
    /// Report a missing student on `DELETE` as 200 with an error body instead of 404.
    pub legacy_delete_status: bool,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            legacy_delete_status: true,
        }
    }
}

struct ApiState<S> {
    service: Arc<S>,
    options: ApiOptions,
}

impl<S> Clone for ApiState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            options: self.options,
        }
    }
}

/// Build the HTTP router with default (legacy-compatible) options.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: RecordApi + 'static,
{
    create_router_with(service, ApiOptions::default())
}

/// Build the HTTP router exposing the student API surface.
pub fn create_router_with<S>(service: Arc<S>, options: ApiOptions) -> Router
where
    S: RecordApi + 'static,
{
    Router::new()
        .route("/", get(home))
        .route(
            "/students",
            get(list_students::<S>).post(create_student::<S>),
        )
        .route(
            "/students/:id",
            get(get_student::<S>).delete(delete_student::<S>),
        )
        .route("/students/name/:fragment", get(search_students::<S>))
        .route("/health", get(get_health::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(ApiState { service, options })
}

async fn home() -> &'static str {
    WELCOME
}

/// Create a student from the request body.
///
/// Bodies that are not JSON are treated like payloads missing both fields.
async fn create_student<S>(
    State(state): State<ApiState<S>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), AppError>
where
    S: RecordApi,
{
    let payload = match payload {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected create body");
            Value::Null
        }
    };
    let student = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

async fn list_students<S>(
    State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Student>>, AppError>
where
    S: RecordApi,
{
    Ok(Json(state.service.list_all().await?))
}

async fn get_student<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError>
where
    S: RecordApi,
{
    Ok(Json(state.service.get_by_id(&id).await?))
}

async fn delete_student<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError>
where
    S: RecordApi,
{
    match state.service.delete_by_id(&id).await {
        Ok(()) => Ok(Json(json!({ "message": "Deleted" }))),
        Err(err) if err.is_not_found() && state.options.legacy_delete_status => {
            Ok(Json(json!({ "error": err.to_string() })))
        }
        Err(err) => Err(err.into()),
    }
}

async fn search_students<S>(
    State(state): State<ApiState<S>>,
    Path(fragment): Path<String>,
) -> Result<Json<Vec<Student>>, AppError>
where
    S: RecordApi,
{
    Ok(Json(state.service.search_by_name(&fragment).await?))
}

/// Report whether the document store answers a ping.
async fn get_health<S>(State(state): State<ApiState<S>>) -> Response
where
    S: RecordApi,
{
    let health = state.service.store_health().await;
    if health.reachable {
        (StatusCode::OK, Json(json!({ "store": "reachable" }))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "store": "unreachable", "error": health.error })),
        )
            .into_response()
    }
}

async fn get_metrics<S>(State(state): State<ApiState<S>>) -> Json<MetricsSnapshot>
where
    S: RecordApi,
{
    Json(state.service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    let command = |name, method, path, description| CommandDescriptor {
        name,
        method,
        path,
        description,
        request_example: None,
    };
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                request_example: Some(json!({ "name": "Bob", "age": 21 })),
                ..command(
                    "create_student",
                    "POST",
                    "/students",
                    "Create a student. Returns 201 with { \"id\", \"name\", \"age\" }.",
                )
            },
            command(
                "list_students",
                "GET",
                "/students",
                "Return every stored student.",
            ),
            command(
                "get_student",
                "GET",
                "/students/{id}",
                "Return one student by id, or 404.",
            ),
            command(
                "delete_student",
                "DELETE",
                "/students/{id}",
                "Delete one student by id.",
            ),
            command(
                "search_students",
                "GET",
                "/students/name/{fragment}",
                "Return students whose name contains the fragment, ignoring case, or 404.",
            ),
            command(
                "health",
                "GET",
                "/health",
                "Report whether the document store is reachable.",
            ),
            command(
                "metrics",
                "GET",
                "/metrics",
                "Return record activity counters.",
            ),
        ],
    })
}

struct AppError(RecordError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RecordError::Validation(_)
            | RecordError::InvalidIdentifier(_)
            | RecordError::InvalidPattern(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            RecordError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            RecordError::Store(err) => {
                // Driver messages can carry hosts and topology; keep them in the log only.
                tracing::error!(error = %err, "Store failure while handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<RecordError> for AppError {
    fn from(inner: RecordError) -> Self {
        Self(inner)
    }
}
