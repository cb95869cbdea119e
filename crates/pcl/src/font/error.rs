//! Errors and diagnostics of font generation

use std::{io, path::PathBuf};

use displaydoc::Display;
use thiserror::Error;

/// Failure of a [`GlyphSource`](super::GlyphSource)
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum GlyphSourceError {
    /// Glyph {glyph} is out of range, the font has glyphs 0..={max}
    GlyphOutOfRange {
        /// The requested glyph
        glyph: u16,
        /// The highest glyph id
        max: u16,
    },
    /// Cannot read {length} bytes at offset {offset}, the data has {size} bytes
    OutOfBounds {
        /// Start of the requested data
        offset: u32,
        /// Length of the requested data
        length: u32,
        /// Size of the available data
        size: usize,
    },
    /// The font has no `{0}` table
    MissingTable(&'static str),
    /// The font data is malformed: {0}
    Malformed(String),
}

/// Fatal failure while writing a font
#[derive(Debug, Error)]
pub enum FontError {
    /// Writing to the output failed
    #[error("Failed to write font data")]
    Io(#[from] io::Error),
    /// Creating or writing the output file failed
    #[error("Failed to write '{}'", path.display())]
    File {
        /// The output file
        path: PathBuf,
        /// The cause
        #[source]
        source: io::Error,
    },
    /// The header does not fit into the selected format
    #[error("Font header length {length} exceeds the limit of {limit} bytes")]
    HeaderTooLarge {
        /// The computed length
        length: u64,
        /// The maximum for the format
        limit: u64,
    },
    /// A glyph is too large for a single character record
    #[error("Glyph {glyph} needs a {size} byte record, which exceeds 65535 bytes")]
    GlyphTooLarge {
        /// The glyph id
        glyph: u16,
        /// The required size
        size: u64,
    },
    /// Composite glyphs are nested deeper than allowed
    #[error("Composite glyph {glyph} at depth {depth} exceeds the nesting limit of {limit}")]
    CompositeTooDeep {
        /// The glyph that was about to be written
        glyph: u16,
        /// Its nesting depth
        depth: u16,
        /// The configured limit
        limit: u16,
    },
    /// Font metadata is inconsistent
    #[error("Invalid font metadata: {0}")]
    InvalidMetadata(String),
    /// The glyph source failed
    #[error(transparent)]
    GlyphSource(#[from] GlyphSourceError),
}

impl FontError {
    pub(crate) fn file(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::File { path, source }
    }

    /// Name the output file in an I/O error
    ///
    /// Other errors are returned unchanged.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Io(source) => Self::File {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}

/// A non-fatal condition encountered during font generation
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No glyph for character code {code:#06X} (code point {codepoint:#06X})
    MissingCharacter {
        /// The character code in the symbol set
        code: u16,
        /// The target code point
        codepoint: u16,
    },
    /// Glyph {glyph} in composite glyph {parent} was already written
    ReusedGlyph {
        /// The composite glyph
        parent: u16,
        /// The referenced component
        glyph: u16,
    },
    /// Component {component} of composite glyph {parent} exceeds the maximum glyph id {max}
    InvalidComponentGlyph {
        /// The composite glyph
        parent: u16,
        /// The invalid component id
        component: u16,
        /// The highest valid glyph id
        max: u16,
    },
}
