//! The compatibility rule.
//!
//! Every entity on the board is judged against the snapshot version, because
//! the snapshot is what DM clients load at startup:
//!
//! | Entity   | version < snapshot | version == snapshot | version > snapshot |
//! |----------|--------------------|---------------------|--------------------|
//! | service  | [`Status::Outdated`] | [`Status::Ok`]    | [`Status::Inconsistent`] |
//! | database | [`Status::Ok`]     | [`Status::Ok`]      | [`Status::Inconsistent`] |
//! | snapshot | [`Status::Ok`]     | [`Status::Ok`]      | [`Status::Ok`]     |
//!
//! A database behind the snapshot is not flagged. Migrations run last in the
//! deployment order, so the database lagging the snapshot is the expected
//! state during a rollout.

use alloc::format;
use alloc::string::String;
use core::fmt;

use crate::version::SchemaVersion;

/// What part an entity plays in the dependency flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntityRole {
    /// The database whose schema the snapshot is generated from.
    Database,
    /// The snapshot generator. It is the reference point and never judged.
    Snapshot,
    /// A DM client consuming the snapshot.
    Service,
}

impl EntityRole {
    /// Whether cards in this role skip the version check when rendered.
    ///
    /// Only the snapshot does; the database and services are always checked.
    pub fn ignores_version_check(self) -> bool {
        matches!(self, Self::Snapshot)
    }
}

/// Three-way classification of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Status {
    /// Compatible with the snapshot.
    Ok,
    /// Older than the snapshot: the service will fail to start.
    Outdated,
    /// Newer than the snapshot: risk of drift.
    Inconsistent,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::Outdated => f.write_str("OUTDATED"),
            Self::Inconsistent => f.write_str("INCONSISTENT"),
        }
    }
}

/// Display color family for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Tone {
    /// Nothing to do.
    Nominal,
    /// Drift risk, deployable with care.
    WarningMild,
    /// Broken configuration.
    WarningStrong,
}

/// Which side drifted ahead of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Drift {
    /// A service expects a newer schema than the snapshot carries.
    Service,
    /// The database has a change the snapshot (and so DM) does not know.
    Database,
}

/// Result of evaluating one entity against the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum Verdict {
    /// Compatible.
    Ok,
    /// Service version is below the snapshot version.
    Outdated {
        /// The snapshot version the service fell behind.
        snapshot_version: SchemaVersion,
    },
    /// Entity version is above the snapshot version.
    Inconsistent {
        /// Whether a service or the database drifted.
        drift: Drift,
    },
}

impl Verdict {
    /// The bare classification.
    pub fn status(&self) -> Status {
        match self {
            Self::Ok => Status::Ok,
            Self::Outdated { .. } => Status::Outdated,
            Self::Inconsistent { .. } => Status::Inconsistent,
        }
    }

    /// Display color family.
    pub fn tone(&self) -> Tone {
        match self.status() {
            Status::Ok => Tone::Nominal,
            Status::Outdated => Tone::WarningStrong,
            Status::Inconsistent => Tone::WarningMild,
        }
    }

    /// `true` unless the entity needs attention.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Explanatory message shown under the card, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Ok => None,
            Self::Outdated { snapshot_version } => Some(format!(
                "Service will fail to start: Schema Version is smaller than \
                 Snap's Schema Version ({snapshot_version})"
            )),
            Self::Inconsistent {
                drift: Drift::Service,
            } => Some(String::from(
                "Please have consistent Schema Version across all services to avoid risk",
            )),
            Self::Inconsistent {
                drift: Drift::Database,
            } => Some(String::from(
                "If this version's change is used in DM, it is not consumed \
                 as DM does not know about it",
            )),
        }
    }
}

/// Classify one entity against the snapshot version.
///
/// Pure and deterministic; see the module docs for the rule table.
///
/// ```
/// use dm_upgrade::{evaluate, EntityRole, Status};
///
/// assert_eq!(evaluate(2, 3, false, EntityRole::Service).status(), Status::Outdated);
/// assert_eq!(evaluate(1, 4, false, EntityRole::Database).status(), Status::Ok);
/// assert_eq!(evaluate(9, 1, true, EntityRole::Service).status(), Status::Ok);
/// ```
pub fn evaluate(
    version: SchemaVersion,
    snapshot_version: SchemaVersion,
    ignore_version_check: bool,
    role: EntityRole,
) -> Verdict {
    if ignore_version_check || role == EntityRole::Snapshot {
        return Verdict::Ok;
    }

    match role {
        EntityRole::Database if version > snapshot_version => Verdict::Inconsistent {
            drift: Drift::Database,
        },
        EntityRole::Database => Verdict::Ok,
        _ if version < snapshot_version => Verdict::Outdated { snapshot_version },
        _ if version > snapshot_version => Verdict::Inconsistent {
            drift: Drift::Service,
        },
        _ => Verdict::Ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_matching_snapshot_is_ok() {
        let v = evaluate(1, 1, false, EntityRole::Service);
        assert_eq!(v, Verdict::Ok);
        assert_eq!(v.tone(), Tone::Nominal);
        assert_eq!(v.message(), None);
    }

    #[test]
    fn service_behind_snapshot_is_outdated() {
        let v = evaluate(2, 3, false, EntityRole::Service);
        assert_eq!(v, Verdict::Outdated { snapshot_version: 3 });
        assert_eq!(v.tone(), Tone::WarningStrong);
        assert_eq!(
            v.message().unwrap(),
            "Service will fail to start: Schema Version is smaller than Snap's Schema Version (3)"
        );
    }

    #[test]
    fn service_ahead_of_snapshot_is_inconsistent() {
        let v = evaluate(5, 2, false, EntityRole::Service);
        assert_eq!(v.status(), Status::Inconsistent);
        assert_eq!(v.tone(), Tone::WarningMild);
        assert_eq!(
            v.message().unwrap(),
            "Please have consistent Schema Version across all services to avoid risk"
        );
    }

    #[test]
    fn database_ahead_of_snapshot_is_inconsistent() {
        let v = evaluate(5, 2, false, EntityRole::Database);
        assert_eq!(
            v,
            Verdict::Inconsistent {
                drift: Drift::Database
            }
        );
        assert_eq!(
            v.message().unwrap(),
            "If this version's change is used in DM, it is not consumed as DM does not know about it"
        );
    }

    #[test]
    fn database_behind_snapshot_is_not_flagged() {
        assert_eq!(evaluate(1, 4, false, EntityRole::Database), Verdict::Ok);
    }

    #[test]
    fn snapshot_is_never_judged() {
        assert_eq!(evaluate(1, 9, false, EntityRole::Snapshot), Verdict::Ok);
        assert_eq!(evaluate(9, 1, false, EntityRole::Snapshot), Verdict::Ok);
    }

    #[test]
    fn ignore_flag_wins_over_database_rule() {
        assert_eq!(evaluate(7, 1, true, EntityRole::Database), Verdict::Ok);
    }

    #[test]
    fn only_snapshot_ignores_version_check() {
        assert!(EntityRole::Snapshot.ignores_version_check());
        assert!(!EntityRole::Database.ignores_version_check());
        assert!(!EntityRole::Service.ignores_version_check());
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::Ok.to_string(), "OK");
        assert_eq!(Status::Outdated.to_string(), "OUTDATED");
        assert_eq!(Status::Inconsistent.to_string(), "INCONSISTENT");
    }
}
