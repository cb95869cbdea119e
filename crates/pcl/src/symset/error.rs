//! Errors relating to symbol sets

use std::{io, path::PathBuf};

use thiserror::Error;

use super::MapVariant;

/// The ranges and arrays of a symbol set map do not fit together
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolSetMapError {
    /// Neither mapping variant is present
    #[error("A symbol set map needs at least one mapping variant")]
    NoVariants,
    /// There are no ranges
    #[error("A symbol set map needs at least one range")]
    NoRanges,
    /// A range was empty or reversed
    #[error("Range {index} is invalid: 0x{min:04X} > 0x{max:04X}")]
    InvalidRange {
        /// Position of the range
        index: usize,
        /// Lower bound
        min: u16,
        /// Upper bound
        max: u16,
    },
    /// A range starts before the end of the previous one
    #[error("Range {index} overlaps or precedes the range before it")]
    Unordered {
        /// Position of the range
        index: usize,
    },
    /// There is not exactly one mapping array per range
    #[error("The {variant} variant has {actual} arrays for {expected} ranges")]
    RangeCount {
        /// The affected variant
        variant: MapVariant,
        /// Number of ranges
        expected: usize,
        /// Number of arrays
        actual: usize,
    },
    /// A mapping array does not match the size of its range
    #[error("The {variant} array for range {index} has {actual} entries, expected {expected}")]
    ArrayLength {
        /// The affected variant
        variant: MapVariant,
        /// Position of the range
        index: usize,
        /// The size of the range
        expected: usize,
        /// The size of the array
        actual: usize,
    },
    /// A user-defined lookup table is empty or too large
    #[error("A user-defined lookup table needs 1 to 65536 entries, got {0}")]
    LookupSize(usize),
}

/// Failure when reading or writing a download symbol set file
#[derive(Debug, Error)]
pub enum SymbolSetFileError {
    /// The file could not be opened, read or written
    #[error("Failed to access '{}'", path.display())]
    Io {
        /// The affected file
        path: PathBuf,
        /// The cause
        #[source]
        source: io::Error,
    },
    /// An escape sequence at the start of the file is not what was expected
    #[error("Malformed header at offset {offset}: {reason}")]
    MalformedHeader {
        /// Byte offset of the problem
        offset: usize,
        /// What was wrong
        reason: &'static str,
    },
    /// Declared lengths disagree with each other or the file size
    #[error("Inconsistent length: {field} is {actual}, expected {expected}")]
    InconsistentLength {
        /// The field that was checked
        field: &'static str,
        /// The value required by the other fields
        expected: u64,
        /// The value found in the file
        actual: u64,
    },
    /// A descriptor field has an invalid value
    #[error("Invalid {field}: found {actual}, expected {expected}")]
    Validation {
        /// The field that was checked
        field: &'static str,
        /// Description of the valid values
        expected: String,
        /// The value found in the file
        actual: u64,
    },
    /// The parsed table does not form a valid map
    #[error(transparent)]
    Map(#[from] SymbolSetMapError),
}

impl SymbolSetFileError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
