//! Schema version numbers and the text-to-version input policy.
//!
//! Version fields are edited as free text. Text is only ever turned into a
//! [`SchemaVersion`] through [`parse_version`], so a value that failed to
//! parse can never reach the evaluator.

use alloc::string::{String, ToString};
use core::fmt;
use core::num::IntErrorKind;

/// A schema version tag. Any integer is a valid version.
pub type SchemaVersion = i64;

/// Reason a piece of input text was refused as a schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The field was empty (or whitespace only).
    Empty,
    /// The text is not a whole decimal integer.
    NotANumber(String),
    /// The text is an integer that does not fit a [`SchemaVersion`].
    OutOfRange(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "schema version must not be empty"),
            Self::NotANumber(text) => write!(f, "'{text}' is not a whole number"),
            Self::OutOfRange(text) => write!(f, "'{text}' is out of range for a schema version"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InputError {}

/// Parse user-entered text into a schema version.
///
/// Leading and trailing whitespace is ignored. Anything other than a whole
/// decimal integer is refused: `"3abc"`, `"2.5"` and `"0x10"` are all errors.
/// Callers keep the previous value when this fails.
///
/// ```
/// use dm_upgrade::{parse_version, InputError};
///
/// assert_eq!(parse_version(" 7 "), Ok(7));
/// assert_eq!(parse_version("-2"), Ok(-2));
/// assert_eq!(parse_version(""), Err(InputError::Empty));
/// assert!(parse_version("3abc").is_err());
/// ```
pub fn parse_version(text: &str) -> Result<SchemaVersion, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }

    trimmed.parse::<SchemaVersion>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            InputError::OutOfRange(trimmed.to_string())
        }
        _ => InputError::NotANumber(trimmed.to_string()),
    })
}
