//! # dm-upgrade-config
//!
//! Board files for [`dm-upgrade`](dm_upgrade).
//!
//! A `dm-board.toml` file names the cards on the board, seeds their initial
//! schema versions, and carries the export and dev-server settings. Every
//! section is optional:
//!
//! ```toml
//! [page]
//! title = "DM version upgrades"
//!
//! [database]
//! name = "Postgres"
//! version = 1
//!
//! [snapshot]
//! name = "Snap (Generates Snapshot)"
//! version = 1
//!
//! [[service]]
//! name = "Bidder"
//! version = 1
//!
//! [export]
//! out_dir = "docs"
//! base_path = "/dm"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 4242
//! ```
//!
//! # Example
//!
//! ```rust
//! use dm_upgrade_config::from_str;
//!
//! let file = from_str(r#"
//! [snapshot]
//! version = 3
//!
//! [[service]]
//! name = "Bidder"
//! version = 2
//! "#).unwrap();
//!
//! let board = file.to_board();
//! assert_eq!(board.snapshot().version, 3);
//! assert_eq!(board.services().len(), 1);
//! ```

mod board_file;
mod validator;

pub use board_file::{BoardFile, EntityConfig, ExportConfig, PageConfig, ServerConfig};
pub use validator::{check_base_path, validate_board_file, ValidationError};

use std::fmt;
use std::path::Path;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_FILE_NAME: &str = "dm-board.toml";

/// Error type for loading a board file.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the board file.
    Io(std::io::Error),
    /// Failed to parse the TOML.
    Parse(String),
    /// Failed to serialize a board file.
    Serialize(String),
    /// Board file validation failed.
    Validation(Vec<ValidationError>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Self::Validation(errs) => {
                writeln!(f, "board file validation failed:")?;
                for e in errs {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Read, parse and validate a board file from disk.
pub fn load(path: &Path) -> Result<BoardFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    from_str(&content)
}

/// Parse and validate a board file from a TOML string.
pub fn from_str(content: &str) -> Result<BoardFile, ConfigError> {
    let file: BoardFile = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_board_file(&file).map_err(ConfigError::Validation)?;
    Ok(file)
}

/// Load the board file to use for a command.
///
/// An explicit `path` must exist. Without one, [`DEFAULT_FILE_NAME`] in the
/// working directory is used if present; otherwise the stock board.
pub fn load_or_default(path: Option<&Path>) -> Result<BoardFile, ConfigError> {
    match path {
        Some(path) => load(path),
        None => {
            let fallback = Path::new(DEFAULT_FILE_NAME);
            if fallback.is_file() {
                load(fallback)
            } else {
                Ok(BoardFile::default())
            }
        }
    }
}

/// The stock board file as TOML text, as written by `dmup init`.
pub fn default_file_contents() -> Result<String, ConfigError> {
    toml::to_string_pretty(&BoardFile::default()).map_err(|e| ConfigError::Serialize(e.to_string()))
}
