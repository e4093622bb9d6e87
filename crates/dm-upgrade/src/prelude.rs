//! Convenient re-exports for common usage.
//!
//! ```
//! use dm_upgrade::prelude::*;
//! ```

pub use crate::evaluate;
pub use crate::parse_version;
pub use crate::Board;
pub use crate::Edit;
pub use crate::EntityRole;
pub use crate::Status;
pub use crate::Target;
pub use crate::VersionRecord;
