use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use dm_upgrade::{parse_version, BoardError, InputError, SchemaVersion, Target};
use serde::Deserialize;
use serde_json::Value;

use crate::render::{render_page, PageMode};
use crate::report::BoardReport;
use crate::AppState;

// ── Page handlers ───────────────────────────────────────────────────

pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let board = state.board().await;
    match render_page(&board, &state.page, &PageMode::Live) {
        Ok(html) => ([(header::CACHE_CONTROL, "no-cache")], Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render board page");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[derive(Deserialize)]
pub struct VersionForm {
    #[serde(default)]
    version: String,
}

pub async fn submit_database(
    State(state): State<Arc<AppState>>,
    form: Result<Form<VersionForm>, FormRejection>,
) -> Response {
    submit(&state, Target::Database, form).await
}

pub async fn submit_snapshot(
    State(state): State<Arc<AppState>>,
    form: Result<Form<VersionForm>, FormRejection>,
) -> Response {
    submit(&state, Target::Snapshot, form).await
}

pub async fn submit_service(
    State(state): State<Arc<AppState>>,
    index: Result<Path<usize>, PathRejection>,
    form: Result<Form<VersionForm>, FormRejection>,
) -> Response {
    match index {
        Ok(Path(index)) => submit(&state, Target::Service(index), form).await,
        Err(rejection) => path_error(rejection),
    }
}

/// Apply a form edit and send the browser back to the page.
///
/// Refused input is not reported on the page; the field simply shows the
/// previous value again after the redirect.
async fn submit(
    state: &AppState,
    target: Target,
    form: Result<Form<VersionForm>, FormRejection>,
) -> Response {
    let version = match form {
        Ok(Form(form)) => parse_version(&form.version),
        Err(rejection) => {
            tracing::warn!(%target, error = %rejection.body_text(), "unreadable form edit");
            return Redirect::to("/").into_response();
        }
    };
    match edit(state, target, version).await {
        Ok(_) | Err(EditError::Input(_)) => Redirect::to("/").into_response(),
        Err(EditError::Board(e)) => error_response(StatusCode::NOT_FOUND, e.to_string()),
    }
}

// ── API types ───────────────────────────────────────────────────────

/// Body of a `PUT`: `{"version": 3}` or `{"version": "3"}`.
///
/// The value is kept as raw JSON so every bad shape is refused through
/// [`InputError`] rather than by the extractor.
#[derive(Deserialize)]
pub struct VersionBody {
    #[serde(default)]
    version: Value,
}

impl VersionBody {
    fn resolve(&self) -> Result<SchemaVersion, InputError> {
        match &self.version {
            Value::Null => Err(InputError::Empty),
            Value::String(text) => parse_version(text),
            Value::Number(n) => n.as_i64().ok_or_else(|| {
                let whole = n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0);
                if whole {
                    InputError::OutOfRange(n.to_string())
                } else {
                    InputError::NotANumber(n.to_string())
                }
            }),
            other => Err(InputError::NotANumber(other.to_string())),
        }
    }
}

// ── API handlers ────────────────────────────────────────────────────

pub async fn board(State(state): State<Arc<AppState>>) -> Json<BoardReport> {
    Json(BoardReport::from_board(&state.board().await))
}

pub async fn put_database(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VersionBody>, JsonRejection>,
) -> Response {
    put(&state, Target::Database, body).await
}

pub async fn put_snapshot(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VersionBody>, JsonRejection>,
) -> Response {
    put(&state, Target::Snapshot, body).await
}

pub async fn put_service(
    State(state): State<Arc<AppState>>,
    index: Result<Path<usize>, PathRejection>,
    body: Result<Json<VersionBody>, JsonRejection>,
) -> Response {
    match index {
        Ok(Path(index)) => put(&state, Target::Service(index), body).await,
        Err(rejection) => path_error(rejection),
    }
}

async fn put(
    state: &AppState,
    target: Target,
    body: Result<Json<VersionBody>, JsonRejection>,
) -> Response {
    let version = match body {
        Ok(Json(body)) => body.resolve(),
        Err(rejection) => {
            tracing::warn!(%target, error = %rejection.body_text(), "unreadable JSON edit");
            return error_response(rejection.status(), rejection.body_text());
        }
    };
    match edit(state, target, version).await {
        Ok(report) => Json(report).into_response(),
        Err(EditError::Input(e)) => error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        Err(EditError::Board(e)) => error_response(StatusCode::NOT_FOUND, e.to_string()),
    }
}

// ── Edit flow ───────────────────────────────────────────────────────

enum EditError {
    Input(InputError),
    Board(BoardError),
}

/// Replace exactly one field of the board if the parsed value is usable.
async fn edit(
    state: &AppState,
    target: Target,
    version: Result<SchemaVersion, InputError>,
) -> Result<BoardReport, EditError> {
    let version = version.map_err(|e| {
        tracing::warn!(%target, error = %e, "refused schema version edit");
        EditError::Input(e)
    })?;

    let board = state.apply(target, version).await.map_err(|e| {
        tracing::warn!(%target, error = %e, "edit for unknown card");
        EditError::Board(e)
    })?;

    tracing::info!(%target, version, "schema version updated");
    Ok(BoardReport::from_board(&board))
}

// ── Helpers ─────────────────────────────────────────────────────────

fn error_response(status: StatusCode, msg: String) -> Response {
    (status, Json(serde_json::json!({ "error": msg }))).into_response()
}

fn path_error(rejection: PathRejection) -> Response {
    tracing::warn!(error = %rejection.body_text(), "bad service index");
    error_response(rejection.status(), rejection.body_text())
}
