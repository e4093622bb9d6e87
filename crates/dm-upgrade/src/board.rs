//! The board: every version value shown on the page.
//!
//! A [`Board`] is a plain value. Whoever drives the page owns it and
//! replaces it after each edit; there is no shared or global state.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::verdict::{evaluate, EntityRole, Verdict};
use crate::version::SchemaVersion;

/// Default display name of the database card.
pub const DEFAULT_DATABASE_NAME: &str = "Postgres";
/// Default display name of the snapshot card.
pub const DEFAULT_SNAPSHOT_NAME: &str = "Snap (Generates Snapshot)";
/// Services on a board that was not configured otherwise.
pub const DEFAULT_SERVICES: &[&str] = &["Bidder", "Act", "EP", "Or any dm client"];

/// A named schema version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VersionRecord {
    /// Display name.
    pub name: String,
    /// Declared schema version.
    pub version: SchemaVersion,
}

impl VersionRecord {
    /// Create a record.
    pub fn new(name: impl Into<String>, version: SchemaVersion) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

/// Error from a board update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A service index past the end of the service list.
    ServiceOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of services on the board.
        len: usize,
    },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceOutOfRange { index, len } => {
                write!(f, "no service at index {index} (board has {len})")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}

/// The field an edit replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Target {
    /// The database version.
    Database,
    /// The snapshot version.
    Snapshot,
    /// The service at this position.
    Service(usize),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => f.write_str("database"),
            Self::Snapshot => f.write_str("snapshot"),
            Self::Service(index) => write!(f, "service #{index}"),
        }
    }
}

/// A whole-field replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    /// Field to replace.
    pub target: Target,
    /// New value.
    pub version: SchemaVersion,
}

impl Edit {
    /// Create an edit.
    pub fn new(target: Target, version: SchemaVersion) -> Self {
        Self { target, version }
    }
}

/// One evaluated entity, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Which field of the board this card shows.
    pub target: Target,
    /// Role in the dependency flow.
    pub role: EntityRole,
    /// Display name.
    pub name: String,
    /// Current version.
    pub version: SchemaVersion,
    /// Classification against the snapshot.
    pub verdict: Verdict,
}

/// Version state for the database, the snapshot, and every service.
///
/// # Example
///
/// ```
/// use dm_upgrade::{Board, Edit, Status, Target};
///
/// let board = Board::default();
/// let next = board.apply(&Edit::new(Target::Snapshot, 2)).unwrap();
///
/// // Every service is still on v1 and now trails the snapshot.
/// let outdated = next
///     .assess()
///     .into_iter()
///     .filter(|card| card.verdict.status() == Status::Outdated)
///     .count();
/// assert_eq!(outdated, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    database: VersionRecord,
    snapshot: VersionRecord,
    services: Vec<VersionRecord>,
}

impl Board {
    /// Create a board from its records. Service order is display order.
    pub fn new(
        database: VersionRecord,
        snapshot: VersionRecord,
        services: Vec<VersionRecord>,
    ) -> Self {
        Self {
            database,
            snapshot,
            services,
        }
    }

    /// The database record.
    pub fn database(&self) -> &VersionRecord {
        &self.database
    }

    /// The snapshot record.
    pub fn snapshot(&self) -> &VersionRecord {
        &self.snapshot
    }

    /// All service records in display order.
    pub fn services(&self) -> &[VersionRecord] {
        &self.services
    }

    /// Position of the service with this display name.
    pub fn service_index(&self, name: &str) -> Option<usize> {
        self.services.iter().position(|s| s.name == name)
    }

    /// Replace the database version.
    pub fn set_database_version(&mut self, version: SchemaVersion) {
        self.database.version = version;
    }

    /// Replace the snapshot version.
    pub fn set_snapshot_version(&mut self, version: SchemaVersion) {
        self.snapshot.version = version;
    }

    /// Replace the version of the service at `index`.
    ///
    /// Fails without touching the board when `index` is out of range.
    pub fn set_service_version(
        &mut self,
        index: usize,
        version: SchemaVersion,
    ) -> Result<(), BoardError> {
        let len = self.services.len();
        let service = self
            .services
            .get_mut(index)
            .ok_or(BoardError::ServiceOutOfRange { index, len })?;
        service.version = version;
        Ok(())
    }

    /// Return a new board with the edit applied. `self` is left as is.
    pub fn apply(&self, edit: &Edit) -> Result<Board, BoardError> {
        let mut next = self.clone();
        match edit.target {
            Target::Database => next.set_database_version(edit.version),
            Target::Snapshot => next.set_snapshot_version(edit.version),
            Target::Service(index) => next.set_service_version(index, edit.version)?,
        }
        Ok(next)
    }

    /// Evaluate every entity against the current snapshot version.
    ///
    /// Cards come out in display order: database, snapshot, then services.
    pub fn assess(&self) -> Vec<Card> {
        let snapshot_version = self.snapshot.version;
        let card = |target: Target, role: EntityRole, record: &VersionRecord| Card {
            target,
            role,
            name: record.name.clone(),
            version: record.version,
            verdict: evaluate(
                record.version,
                snapshot_version,
                role.ignores_version_check(),
                role,
            ),
        };

        let mut cards = Vec::with_capacity(self.services.len() + 2);
        cards.push(card(Target::Database, EntityRole::Database, &self.database));
        cards.push(card(Target::Snapshot, EntityRole::Snapshot, &self.snapshot));
        for (index, service) in self.services.iter().enumerate() {
            cards.push(card(Target::Service(index), EntityRole::Service, service));
        }
        cards
    }
}

impl Default for Board {
    /// Everything at version 1 with the stock entity names.
    fn default() -> Self {
        Self::new(
            VersionRecord::new(DEFAULT_DATABASE_NAME, 1),
            VersionRecord::new(DEFAULT_SNAPSHOT_NAME, 1),
            DEFAULT_SERVICES
                .iter()
                .map(|name| VersionRecord::new(name.to_string(), 1))
                .collect(),
        )
    }
}
