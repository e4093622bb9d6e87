//! # dm-upgrade-ui
//!
//! The web page for a [`dm-upgrade`](dm_upgrade) board.
//!
//! Two ways to use it:
//!
//! - [`serve`] runs a small local web server (Axum) where every version
//!   field is editable. Each edit replaces one field and re-renders the page.
//! - [`export`] writes the evaluated board as a self-contained static page,
//!   ready to be published under a sub-path such as `/dm`.
//!
//! ## Quick Start
//!
//! ```no_run
//! #[tokio::main]
//! async fn main() {
//!     let file = dm_upgrade_config::BoardFile::default();
//!     dm_upgrade_ui::serve(&file).await.unwrap();
//! }
//! ```

mod api;
mod export;
mod render;
mod report;

use std::fmt;
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use dm_upgrade::{Board, BoardError, Edit, SchemaVersion, Target};
use dm_upgrade_config::{BoardFile, PageConfig};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

pub use export::{export, ExportTarget};
pub use render::{form_action, render_page, PageMode};
pub use report::{BoardReport, EntityReport};

/// Error type for serving or exporting the page.
#[derive(Debug)]
pub enum UiError {
    /// Socket or file system failure.
    Io(std::io::Error),
    /// The page template failed to render.
    Render(askama::Error),
    /// A static page was asked for with an unusable base path.
    BasePath(String),
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Render(e) => write!(f, "render error: {e}"),
            Self::BasePath(msg) => write!(f, "invalid base path: {msg}"),
        }
    }
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Render(e) => Some(e),
            Self::BasePath(_) => None,
        }
    }
}

impl From<std::io::Error> for UiError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<askama::Error> for UiError {
    fn from(e: askama::Error) -> Self {
        Self::Render(e)
    }
}

/// Shared application state for Axum handlers.
///
/// Owns the one board of the session. Handlers never mutate it in place;
/// they compute the next board and swap it in under the write lock.
pub struct AppState {
    board: RwLock<Board>,
    pub(crate) page: PageConfig,
}

impl AppState {
    /// Create state around an initial board.
    pub fn new(board: Board, page: PageConfig) -> Self {
        Self {
            board: RwLock::new(board),
            page,
        }
    }

    /// Create state from a board file.
    pub fn from_file(file: &BoardFile) -> Self {
        Self::new(file.to_board(), file.page.clone())
    }

    /// A copy of the current board.
    pub async fn board(&self) -> Board {
        self.board.read().await.clone()
    }

    /// Replace one field and return the resulting board.
    pub async fn apply(&self, target: Target, version: SchemaVersion) -> Result<Board, BoardError> {
        let mut board = self.board.write().await;
        let next = board.apply(&Edit::new(target, version))?;
        *board = next.clone();
        Ok(next)
    }
}

/// Build the router for the page and the JSON API.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/versions/database", post(api::submit_database))
        .route("/versions/snapshot", post(api::submit_snapshot))
        .route("/versions/services/:index", post(api::submit_service))
        .route("/api/board", get(api::board))
        .route("/api/database", put(api::put_database))
        .route("/api/snapshot", put(api::put_snapshot))
        .route("/api/services/:index", put(api::put_service))
        .with_state(state)
}

/// Start the dev server on the host and port of `file.server`.
///
/// Blocks until the server is shut down (Ctrl-C).
pub async fn serve(file: &BoardFile) -> Result<(), UiError> {
    let listener = bind(&file.server.host, file.server.port).await?;
    serve_on(listener, Arc::new(AppState::from_file(file))).await
}

/// Bind the dev server socket.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener, UiError> {
    Ok(TcpListener::bind((host, port)).await?)
}

/// Serve the page on an already bound listener until Ctrl-C.
pub async fn serve_on(listener: TcpListener, state: Arc<AppState>) -> Result<(), UiError> {
    let addr = listener.local_addr()?;
    tracing::info!("dm-upgrade board on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("dev server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
