//! # dm-upgrade
//!
//! Schema-version compatibility rules for a DM deployment: a database, the
//! snapshot generator ("Snap") that stamps snapshots from it, and the DM
//! clients that load those snapshots.
//!
//! Before a deployment, enter the schema version each component is on and
//! see which ones would break or drift. The recommended deployment order is
//! *update DM → deploy all services, snap last → run the database migration*.
//!
//! ## Quick Start
//!
//! ```
//! use dm_upgrade::prelude::*;
//!
//! let mut board = Board::default();
//! board.set_snapshot_version(3);
//! board.set_service_version(0, 2).unwrap();
//!
//! let cards = board.assess();
//! let bidder = &cards[2];
//! assert_eq!(bidder.name, "Bidder");
//! assert_eq!(bidder.verdict.status(), Status::Outdated);
//! ```
//!
//! ## Editing from text
//!
//! Version fields are typed by people. [`parse_version`] is the only way
//! text becomes a version; text it refuses leaves the board unchanged.
//!
//! ```
//! use dm_upgrade::{parse_version, Board, Edit, Target};
//!
//! let board = Board::default();
//! let board = match parse_version("4") {
//!     Ok(v) => board.apply(&Edit::new(Target::Database, v)).unwrap(),
//!     Err(_) => board,
//! };
//! assert_eq!(board.database().version, 4);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod board;
mod verdict;
mod version;
#[cfg(feature = "wasm")]
mod wasm;

pub mod prelude;

pub use board::{
    Board, BoardError, Card, Edit, Target, VersionRecord, DEFAULT_DATABASE_NAME,
    DEFAULT_SERVICES, DEFAULT_SNAPSHOT_NAME,
};
pub use verdict::{evaluate, Drift, EntityRole, Status, Tone, Verdict};
pub use version::{parse_version, InputError, SchemaVersion};
