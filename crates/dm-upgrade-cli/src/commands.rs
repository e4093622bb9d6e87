use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::style;
use dm_upgrade::{Board, SchemaVersion, Status};
use dm_upgrade_config::{default_file_contents, load_or_default, validate_board_file, ConfigError};
use dm_upgrade_ui::{AppState, BoardReport, ExportTarget};

type Result = std::result::Result<(), Box<dyn std::error::Error>>;

/// Version overrides given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub database: Option<SchemaVersion>,
    pub snapshot: Option<SchemaVersion>,
    pub services: Vec<(String, SchemaVersion)>,
}

impl Overrides {
    /// Apply every override to `board`. Unknown service names are an error.
    fn apply(&self, board: &mut Board) -> std::result::Result<(), String> {
        if let Some(v) = self.database {
            board.set_database_version(v);
        }
        if let Some(v) = self.snapshot {
            board.set_snapshot_version(v);
        }
        for (name, version) in &self.services {
            let index = board.service_index(name).ok_or_else(|| {
                let known: Vec<_> = board.services().iter().map(|s| s.name.as_str()).collect();
                format!("unknown service `{name}` (board has: {})", known.join(", "))
            })?;
            board
                .set_service_version(index, *version)
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

/// `dmup check`: Evaluate the board and print the result.
pub fn check(config: Option<&Path>, overrides: &Overrides, json: bool, strict: bool) -> Result {
    let file = load_or_default(config)?;
    let mut board = file.to_board();
    overrides.apply(&mut board)?;

    let report = BoardReport::from_board(&board);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    let problems = report.problems().count();
    if strict && problems > 0 {
        return Err(format!("{problems} of {} entities need attention", report.entities.len()).into());
    }
    Ok(())
}

fn print_report(report: &BoardReport) {
    println!("Snapshot schema version: v{}", report.snapshot_version);
    println!();
    println!("  {:<28} {:>8}  {:<12}", "Entity", "Version", "Status");
    println!("  {}", "-".repeat(52));

    for entity in &report.entities {
        let status = format!("{:<12}", entity.status.to_string());
        let status = match entity.status {
            Status::Ok => style(status).green(),
            Status::Inconsistent => style(status).yellow(),
            Status::Outdated => style(status).red().bold(),
        };
        println!(
            "  {:<28} {:>8}  {}",
            truncate(&entity.name, 28),
            entity.version,
            status
        );
        if let Some(msg) = &entity.message {
            println!("    {}", style(msg).dim());
        }
    }

    println!("  {}", "-".repeat(52));
    let problems = report.problems().count();
    if problems == 0 {
        println!("  {}", style("All entities compatible with the snapshot").green());
    } else {
        println!("  {problems} of {} entities need attention", report.entities.len());
    }
    println!();
}

/// `dmup export`: Write the static page.
pub fn export(config: Option<&Path>, out: Option<PathBuf>, base_path: Option<String>) -> Result {
    let mut file = load_or_default(config)?;
    if let Some(out) = out {
        file.export.out_dir = out.to_string_lossy().into_owned();
    }
    if let Some(base_path) = base_path {
        file.export.base_path = base_path;
    }
    validate_board_file(&file).map_err(ConfigError::Validation)?;

    let board = file.to_board();
    let path = dm_upgrade_ui::export(&board, &file.page, &ExportTarget::from(&file.export))?;

    let problems = BoardReport::from_board(&board).problems().count();
    println!("  Exported: {}", path.display());
    if problems > 0 {
        println!("  Note: {problems} entities on the exported board need attention");
    }
    Ok(())
}

/// `dmup serve`: Run the live board.
pub async fn serve(
    config: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    open: bool,
) -> Result {
    let mut file = load_or_default(config)?;
    if let Some(host) = host {
        file.server.host = host;
    }
    if let Some(port) = port {
        file.server.port = port;
    }
    validate_board_file(&file).map_err(ConfigError::Validation)?;

    let listener = dm_upgrade_ui::bind(&file.server.host, file.server.port).await?;
    let url = format!("http://{}", listener.local_addr()?);
    eprintln!("  Board: {url}");

    if open {
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open a browser");
        }
    }

    dm_upgrade_ui::serve_on(listener, Arc::new(AppState::from_file(&file))).await?;
    Ok(())
}

/// `dmup init`: Write the stock board file.
pub fn init(path: &Path, force: bool) -> Result {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, default_file_contents()?)?;
    println!("  Created: {}", path.display());
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    }
}
