use std::path::PathBuf;

use chrono::Utc;
use dm_upgrade::Board;
use dm_upgrade_config::{ExportConfig, PageConfig};

use crate::render::{render_page, PageMode};
use crate::UiError;

/// Where a static export goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    /// Directory the page is written into. Created if missing.
    pub out_dir: PathBuf,
    /// URL sub-path the directory is served from (`""` for the site root).
    pub base_path: String,
}

impl From<&ExportConfig> for ExportTarget {
    fn from(config: &ExportConfig) -> Self {
        Self {
            out_dir: PathBuf::from(&config.out_dir),
            base_path: config.base_path.clone(),
        }
    }
}

/// Write the evaluated board to `<out_dir>/index.html`.
///
/// Returns the path of the written page. Any existing `index.html` in the
/// directory is replaced; nothing else in it is touched.
pub fn export(board: &Board, page: &PageConfig, target: &ExportTarget) -> Result<PathBuf, UiError> {
    let mode = PageMode::Static {
        base_path: target.base_path.clone(),
        generated_at: Utc::now(),
    };
    let html = render_page(board, page, &mode)?;

    std::fs::create_dir_all(&target.out_dir)?;
    let path = target.out_dir.join("index.html");
    std::fs::write(&path, html)?;

    tracing::info!(
        path = %path.display(),
        base_path = %target.base_path,
        "exported static board page"
    );
    Ok(path)
}
