use dm_upgrade::{
    Board, SchemaVersion, VersionRecord, DEFAULT_DATABASE_NAME, DEFAULT_SERVICES,
    DEFAULT_SNAPSHOT_NAME,
};
use serde::{Deserialize, Serialize};

/// Top-level structure of a `dm-board.toml` file.
///
/// Every section is optional; a missing section takes the stock value, so an
/// empty file describes the default board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardFile {
    /// Page texts.
    #[serde(default)]
    pub page: PageConfig,
    /// The database card.
    #[serde(default = "default_database")]
    pub database: EntityConfig,
    /// The snapshot card.
    #[serde(default = "default_snapshot")]
    pub snapshot: EntityConfig,
    /// DM client cards, in display order. Replaces the stock list when given.
    #[serde(rename = "service", default = "default_services")]
    pub services: Vec<EntityConfig>,
    /// Static export settings.
    #[serde(default)]
    pub export: ExportConfig,
    /// Dev server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for BoardFile {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            database: default_database(),
            snapshot: default_snapshot(),
            services: default_services(),
            export: ExportConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl BoardFile {
    /// Build the initial board described by this file.
    ///
    /// A database or snapshot without a name gets the stock name. Services
    /// without a name are rejected by validation, so they never get here in
    /// a validated file.
    pub fn to_board(&self) -> Board {
        Board::new(
            self.database.to_record(DEFAULT_DATABASE_NAME),
            self.snapshot.to_record(DEFAULT_SNAPSHOT_NAME),
            self.services
                .iter()
                .map(|s| s.to_record(""))
                .collect(),
        )
    }
}

/// Texts shown around the cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Page heading and document title.
    pub title: String,
    /// The deployment order line under the cards.
    pub deployment_order: String,
    /// Small print under the deployment order.
    pub footnote: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "DM version upgrades".into(),
            deployment_order: "Update DM → Deploy all services fully then snap at the end → \
                               Run postgres migration"
                .into(),
            footnote: "* If the Postgres changes are not used in the DM, you can proceed \
                       with migration without updating the DM"
                .into(),
        }
    }
}

/// One entity card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Initial schema version.
    #[serde(default = "default_version")]
    pub version: SchemaVersion,
}

impl EntityConfig {
    fn named(name: &str) -> Self {
        Self {
            name: Some(name.into()),
            version: default_version(),
        }
    }

    fn to_record(&self, fallback_name: &str) -> VersionRecord {
        let name = self.name.as_deref().map(str::trim).unwrap_or(fallback_name);
        VersionRecord::new(name, self.version)
    }
}

/// Where and how `dmup export` writes the static page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory.
    pub out_dir: String,
    /// URL sub-path the page is served from (`""` for the site root).
    pub base_path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: "docs".into(),
            base_path: "/dm".into(),
        }
    }
}

/// Dev server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 4242,
        }
    }
}

fn default_version() -> SchemaVersion {
    1
}

fn default_database() -> EntityConfig {
    EntityConfig::named(DEFAULT_DATABASE_NAME)
}

fn default_snapshot() -> EntityConfig {
    EntityConfig::named(DEFAULT_SNAPSHOT_NAME)
}

fn default_services() -> Vec<EntityConfig> {
    DEFAULT_SERVICES.iter().map(|n| EntityConfig::named(n)).collect()
}
