//! # Symbol sets
//!
//! A symbol set maps the character codes a printer receives to target code
//! points (Unicode). PCL identifies symbol sets by a number and a letter, like
//! `8U` (Roman-8) or `19U` (Windows Latin 1), which combine to a numeric id
//! `number * 32 + (letter - 64)`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod error;
pub mod file;
pub mod library;
mod map;
mod registry;

pub use error::{SymbolSetFileError, SymbolSetMapError};
pub use map::{MapVariant, SymbolSetMap, SymbolSetRange, UserDefinedMap, NOT_MAPPED};
pub use registry::{SymbolSetEntry, SymbolSetRegistry};

/// Numeric symbol set identifier
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SymbolSetId(pub u16);

impl SymbolSetId {
    /// `0U` - ASCII
    pub const ASCII: Self = Self(21);
    /// `0N` - ISO 8859-1 Latin 1
    pub const ISO_8859_1: Self = Self(14);
    /// `8U` - Roman-8
    pub const ROMAN_8: Self = Self(277);
    /// `10U` - PC-8 (code page 437)
    pub const PC_8: Self = Self(341);
    /// `19U` - Windows 3.1 Latin 1
    pub const WIN_LATIN_1: Self = Self(629);
    /// `56N` - the value stored in headers of unbound fonts
    pub const UNBOUND: Self = Self(1806);

    /// Combine a number and a letter (`'@'..='^'`)
    ///
    /// ```
    /// use pcl::symset::SymbolSetId;
    ///
    /// assert_eq!(SymbolSetId::from_parts(19, 'U'), Some(SymbolSetId::WIN_LATIN_1));
    /// assert_eq!(SymbolSetId::from_parts(19, 'u'), None);
    /// ```
    pub fn from_parts(number: u16, letter: char) -> Option<Self> {
        let letter = u8::try_from(letter).ok()?;
        if !(b'@'..=b'^').contains(&letter) {
            return None;
        }
        let value = u32::from(number) * 32 + u32::from(letter - 64);
        u16::try_from(value).ok().map(Self)
    }

    /// The numeric part of the kind string
    pub fn number(&self) -> u16 {
        self.0 / 32
    }

    /// The letter part of the kind string
    pub fn letter(&self) -> char {
        char::from((self.0 % 32) as u8 + 64)
    }
}

impl fmt::Debug for SymbolSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} ({})", self.number(), self.letter(), self.0)
    }
}

impl fmt::Display for SymbolSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number(), self.letter())
    }
}

/// Failed to parse a symbol set id
#[derive(Debug, Error)]
#[error("Invalid symbol set `{0}`, expected a kind like `19U` or a plain number")]
pub struct SymbolSetIdError(String);

impl FromStr for SymbolSetId {
    type Err = SymbolSetIdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let err = || SymbolSetIdError(input.to_owned());
        let input = input.trim();
        if let Ok(value) = input.parse::<u16>() {
            return Ok(Self(value));
        }
        let letter = input.chars().last().ok_or_else(err)?;
        let digits = &input[..input.len() - letter.len_utf8()];
        let number = digits.parse::<u16>().map_err(|_| err())?;
        Self::from_parts(number, letter).ok_or_else(err)
    }
}

/// The addressing scheme of a symbol set
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SymbolSetType {
    /// 7-bit codes, `0x20..=0x7F` printable
    Bound7Bit,
    /// 8-bit codes, `0x20..=0x7F` and `0xA0..=0xFF` printable
    Bound8Bit,
    /// 8-bit codes, all of `0x00..=0xFF` printable except some controls
    BoundPc8,
    /// 16-bit codes
    Bound16Bit,
    /// No symbol set binding, characters are addressed by Unicode value
    Unbound,
}

impl SymbolSetType {
    /// The type byte in a download symbol set descriptor
    pub fn type_id(self) -> u8 {
        match self {
            Self::Bound7Bit => 0,
            Self::Bound8Bit => 1,
            Self::BoundPc8 => 2,
            Self::Bound16Bit | Self::Unbound => 3,
        }
    }

    /// The type byte in a scalable font header
    pub fn font_type(self) -> u8 {
        match self {
            Self::Bound7Bit => 0,
            Self::Bound8Bit => 1,
            Self::BoundPc8 => 2,
            Self::Bound16Bit => 3,
            Self::Unbound => 10,
        }
    }

    /// Whether the set binds character codes to code points
    pub fn is_bound(self) -> bool {
        !matches!(self, Self::Unbound)
    }

    /// The number of character codes a font for this type has to cover
    pub fn code_range_size(self) -> u32 {
        match self {
            Self::Bound7Bit | Self::Bound8Bit | Self::BoundPc8 => 0x100,
            Self::Bound16Bit | Self::Unbound => 0x10000,
        }
    }

    /// Derive the type from the code range and mapping of a set
    ///
    /// `lookup` is the dense table for `0..=last_code`.
    ///
    /// ```
    /// use pcl::symset::SymbolSetType;
    ///
    /// let lookup = vec![0x0041; 0x80];
    /// assert_eq!(SymbolSetType::classify(0x20, 0x7F, &lookup), SymbolSetType::Bound7Bit);
    /// ```
    pub fn classify(first_code: u16, last_code: u16, lookup: &[u16]) -> Self {
        let printable = 0x20..=0x7F;
        if last_code > 0xFF {
            Self::Bound16Bit
        } else if printable.contains(&first_code) && printable.contains(&last_code) {
            Self::Bound7Bit
        } else if first_code >= 0x20
            || lookup
                .iter()
                .take(0xA0)
                .skip(0x80)
                .any(|&value| value != NOT_MAPPED)
        {
            Self::BoundPc8
        } else {
            Self::Bound8Bit
        }
    }
}

impl fmt::Display for SymbolSetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bound7Bit => "7-bit",
            Self::Bound8Bit => "8-bit",
            Self::BoundPc8 => "PC-8",
            Self::Bound16Bit => "16-bit",
            Self::Unbound => "unbound",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::{SymbolSetId, SymbolSetType, NOT_MAPPED};

    #[test]
    fn test_symbol_set_ids() {
        assert_eq!("8U".parse::<SymbolSetId>().unwrap(), SymbolSetId::ROMAN_8);
        assert_eq!("10U".parse::<SymbolSetId>().unwrap(), SymbolSetId::PC_8);
        assert_eq!("0N".parse::<SymbolSetId>().unwrap().0, 14);
        assert_eq!("629".parse::<SymbolSetId>().unwrap(), SymbolSetId::WIN_LATIN_1);
        assert!("U".parse::<SymbolSetId>().is_err());
        assert!("12z".parse::<SymbolSetId>().is_err());
        assert_eq!(SymbolSetId::UNBOUND.to_string(), "56N");
        assert_eq!(format!("{:?}", SymbolSetId::ASCII), "0U (21)");
    }

    fn lookup(last: u16) -> Vec<u16> {
        vec![NOT_MAPPED; usize::from(last) + 1]
    }

    #[test]
    fn test_classify_7bit() {
        assert_eq!(
            SymbolSetType::classify(0x20, 0x7F, &lookup(0x7F)),
            SymbolSetType::Bound7Bit
        );
    }

    #[test]
    fn test_classify_16bit() {
        assert_eq!(
            SymbolSetType::classify(0x20, 0x100, &lookup(0x100)),
            SymbolSetType::Bound16Bit
        );
    }

    #[test]
    fn test_classify_pc8() {
        let mut table = lookup(0xFF);
        table[0x81] = 0x00FC;
        assert_eq!(
            SymbolSetType::classify(0x00, 0xFF, &table),
            SymbolSetType::BoundPc8
        );
        assert_eq!(
            SymbolSetType::classify(0x20, 0xFF, &lookup(0xFF)),
            SymbolSetType::BoundPc8
        );
    }

    #[test]
    fn test_classify_8bit() {
        let mut table = lookup(0xFF);
        table[0x41] = 0x0041;
        table[0xE9] = 0x00E9;
        assert_eq!(
            SymbolSetType::classify(0x00, 0xFF, &table),
            SymbolSetType::Bound8Bit
        );
    }
}
