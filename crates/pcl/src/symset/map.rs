//! Range-segmented code point maps

use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};

use super::SymbolSetMapError;

/// Mapping slot value for "no character at this code"
pub const NOT_MAPPED: u16 = 0xFFFF;

/// An inclusive range of character codes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SymbolSetRange {
    /// First code in the range
    pub min: u16,
    /// Last code in the range
    pub max: u16,
}

impl SymbolSetRange {
    /// Create a new range, `None` if `min > max`
    pub fn new(min: u16, max: u16) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    /// Number of codes in the range
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        usize::from(self.max) - usize::from(self.min) + 1
    }

    /// Check whether a code is part of the range
    pub fn contains(&self, code: u16) -> bool {
        (self.min..=self.max).contains(&code)
    }
}

/// One of the two parallel mappings a symbol set may carry
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MapVariant {
    /// Mapping to standard Unicode code points
    Standard,
    /// The mapping as implemented by PCL printers
    Pcl,
}

impl fmt::Display for MapVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Pcl => f.write_str("PCL"),
        }
    }
}

/// The code point mapping of a symbol set
///
/// The map is segmented into ordered, non-overlapping ranges. For each range
/// there is one array of target code points per present variant. Queries for
/// an absent variant fall back to the other one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSetMap {
    ranges: Vec<SymbolSetRange>,
    standard: Option<Vec<Vec<u16>>>,
    pcl: Option<Vec<Vec<u16>>>,
    uses_difference: bool,
}

fn check_arrays(
    variant: MapVariant,
    ranges: &[SymbolSetRange],
    arrays: Option<&Vec<Vec<u16>>>,
) -> Result<(), SymbolSetMapError> {
    let Some(arrays) = arrays else {
        return Ok(());
    };
    if arrays.len() != ranges.len() {
        return Err(SymbolSetMapError::RangeCount {
            variant,
            expected: ranges.len(),
            actual: arrays.len(),
        });
    }
    for (index, (range, array)) in ranges.iter().zip(arrays).enumerate() {
        if array.len() != range.len() {
            return Err(SymbolSetMapError::ArrayLength {
                variant,
                index,
                expected: range.len(),
                actual: array.len(),
            });
        }
    }
    Ok(())
}

impl SymbolSetMap {
    /// Create a map from ranges and up to two parallel sets of arrays
    pub fn new(
        ranges: Vec<SymbolSetRange>,
        standard: Option<Vec<Vec<u16>>>,
        pcl: Option<Vec<Vec<u16>>>,
    ) -> Result<Self, SymbolSetMapError> {
        if standard.is_none() && pcl.is_none() {
            return Err(SymbolSetMapError::NoVariants);
        }
        if ranges.is_empty() {
            return Err(SymbolSetMapError::NoRanges);
        }
        for (index, range) in ranges.iter().enumerate() {
            if range.min > range.max {
                return Err(SymbolSetMapError::InvalidRange {
                    index,
                    min: range.min,
                    max: range.max,
                });
            }
            if index > 0 && range.min <= ranges[index - 1].max {
                return Err(SymbolSetMapError::Unordered { index });
            }
        }
        check_arrays(MapVariant::Standard, &ranges, standard.as_ref())?;
        check_arrays(MapVariant::Pcl, &ranges, pcl.as_ref())?;

        let uses_difference = match (&standard, &pcl) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        };
        Ok(Self {
            ranges,
            standard,
            pcl,
            uses_difference,
        })
    }

    /// Create a map with a single range starting at `min`
    pub fn single_range(min: u16, values: Vec<u16>) -> Result<Self, SymbolSetMapError> {
        let max = values
            .len()
            .checked_sub(1)
            .and_then(|len| u16::try_from(usize::from(min) + len).ok())
            .ok_or(SymbolSetMapError::LookupSize(values.len()))?;
        Self::new(vec![SymbolSetRange { min, max }], Some(vec![values]), None)
    }

    /// The ranges of the map
    pub fn ranges(&self) -> &[SymbolSetRange] {
        &self.ranges
    }

    /// The lowest mapped code
    pub fn code_min(&self) -> u16 {
        self.ranges[0].min
    }

    /// The highest mapped code
    pub fn code_max(&self) -> u16 {
        self.ranges[self.ranges.len() - 1].max
    }

    /// Whether the given variant is stored (and not just a fallback)
    pub fn has_variant(&self, variant: MapVariant) -> bool {
        match variant {
            MapVariant::Standard => self.standard.is_some(),
            MapVariant::Pcl => self.pcl.is_some(),
        }
    }

    /// True if both variants are present and differ somewhere
    pub fn has_difference(&self) -> bool {
        self.uses_difference
    }

    fn arrays(&self, variant: MapVariant) -> &[Vec<u16>] {
        let (preferred, other) = match variant {
            MapVariant::Standard => (&self.standard, &self.pcl),
            MapVariant::Pcl => (&self.pcl, &self.standard),
        };
        preferred
            .as_deref()
            .or(other.as_deref())
            .unwrap_or_default()
    }

    /// The mapping array of one range
    pub fn values(&self, index: usize, variant: MapVariant) -> &[u16] {
        self.arrays(variant)
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Map a single code
    pub fn lookup(&self, code: u16, variant: MapVariant) -> u16 {
        let index = self.ranges.partition_point(|r| r.max < code);
        match self.ranges.get(index) {
            Some(range) if range.contains(code) => self
                .values(index, variant)
                .get(usize::from(code - range.min))
                .copied()
                .unwrap_or(NOT_MAPPED),
            _ => NOT_MAPPED,
        }
    }

    /// A dense table for all codes `0..=code_max`, gaps filled with [`NOT_MAPPED`]
    pub fn full_lookup(&self, variant: MapVariant) -> Vec<u16> {
        let mut table = vec![NOT_MAPPED; usize::from(self.code_max()) + 1];
        for (index, range) in self.ranges.iter().enumerate() {
            let start = usize::from(range.min);
            let values = self.values(index, variant);
            table[start..start + values.len()].copy_from_slice(values);
        }
        table
    }

    /// Number of codes that map to a code point
    pub fn mapped_count(&self, variant: MapVariant) -> usize {
        self.arrays(variant)
            .iter()
            .flatten()
            .filter(|&&value| value != NOT_MAPPED)
            .count()
    }

    /// Format the map as a hex grid with 16 columns
    ///
    /// ```
    /// use pcl::symset::{MapVariant, SymbolSetMap};
    ///
    /// let map = SymbolSetMap::single_range(0x41, vec![0x0041, 0xFFFF]).unwrap();
    /// let dump = map.formatted_dump(MapVariant::Standard);
    /// let row = dump.lines().nth(5).unwrap();
    /// assert!(row.starts_with("4_  ---- 0041 ---- ----"));
    /// ```
    pub fn formatted_dump(&self, variant: MapVariant) -> String {
        let table = self.full_lookup(variant);
        let max = self.code_max();
        let (digits, first_row) = if max <= 0xFF {
            (1, 0)
        } else {
            (3, usize::from(self.code_min() >> 4))
        };
        let last_row = usize::from(max >> 4);

        let mut out = String::new();
        out.push_str(&" ".repeat(digits + 2));
        for col in 0..16 {
            out.push_str(&format!("  _{:X} ", col));
        }
        out.push('\n');
        for row in first_row..=last_row {
            out.push_str(&format!("{:0digits$X}_ ", row, digits = digits));
            for col in 0..16 {
                let code = row * 16 + col;
                match table.get(code).copied() {
                    Some(value) if value != NOT_MAPPED && code >= usize::from(self.code_min()) => {
                        out.push_str(&format!(" {:04X}", value));
                    }
                    _ => out.push_str(" ----"),
                }
            }
            out.push('\n');
        }
        out
    }
}

/// The symbol set slot that is filled from a download symbol set file
///
/// It always has a single range `0..=max`, where `max` is redefined by
/// every call to [`UserDefinedMap::assign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDefinedMap {
    map: SymbolSetMap,
}

impl UserDefinedMap {
    /// Create an empty user-defined map for `0..=codepoint_max`
    pub fn new(codepoint_max: u16) -> Self {
        let len = usize::from(codepoint_max) + 1;
        let map = SymbolSetMap {
            ranges: vec![SymbolSetRange {
                min: 0,
                max: codepoint_max,
            }],
            standard: Some(vec![vec![NOT_MAPPED; len]]),
            pcl: None,
            uses_difference: false,
        };
        Self { map }
    }

    /// Replace the range and mapping with a dense lookup table
    pub fn assign(&mut self, lookup: Vec<u16>) -> Result<(), SymbolSetMapError> {
        self.map = SymbolSetMap::single_range(0, lookup)?;
        Ok(())
    }

    /// Get the current map
    pub fn map(&self) -> &SymbolSetMap {
        &self.map
    }
}

impl Deref for UserDefinedMap {
    type Target = SymbolSetMap;

    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

#[cfg(test)]
mod tests {
    use super::{MapVariant, SymbolSetMap, SymbolSetRange, UserDefinedMap, NOT_MAPPED};
    use crate::symset::SymbolSetMapError;

    fn two_ranges() -> SymbolSetMap {
        let ranges = vec![
            SymbolSetRange::new(0x20, 0x22).unwrap(),
            SymbolSetRange::new(0xA0, 0xA1).unwrap(),
        ];
        let standard = vec![vec![0x20, 0x21, 0x22], vec![0xA0, 0xA1]];
        let pcl = vec![vec![0x20, 0x21, 0x22], vec![0xA0, 0x2010]];
        SymbolSetMap::new(ranges, Some(standard), Some(pcl)).unwrap()
    }

    #[test]
    fn test_full_lookup_fills_gaps() {
        let map = two_ranges();
        let table = map.full_lookup(MapVariant::Standard);
        assert_eq!(table.len(), 0xA2);
        for (code, value) in table.iter().copied().enumerate() {
            let expected = match code {
                0x20..=0x22 | 0xA0..=0xA1 => code as u16,
                _ => NOT_MAPPED,
            };
            assert_eq!(value, expected, "code 0x{:02X}", code);
        }
        assert_eq!(map.full_lookup(MapVariant::Pcl)[0xA1], 0x2010);
    }

    #[test]
    fn test_difference_and_fallback() {
        let map = two_ranges();
        assert!(map.has_difference());
        assert_eq!(map.lookup(0xA1, MapVariant::Pcl), 0x2010);
        assert_eq!(map.lookup(0xA1, MapVariant::Standard), 0xA1);
        assert_eq!(map.lookup(0x50, MapVariant::Standard), NOT_MAPPED);
        assert_eq!(map.lookup(0xFFFF, MapVariant::Pcl), NOT_MAPPED);

        let single = SymbolSetMap::new(
            vec![SymbolSetRange { min: 1, max: 2 }],
            None,
            Some(vec![vec![7, 8]]),
        )
        .unwrap();
        assert!(!single.has_difference());
        assert!(!single.has_variant(MapVariant::Standard));
        assert_eq!(single.lookup(2, MapVariant::Standard), 8);
        assert_eq!(single.mapped_count(MapVariant::Standard), 2);
    }

    #[test]
    fn test_invariants() {
        let r = |min, max| SymbolSetRange { min, max };
        assert_eq!(
            SymbolSetMap::new(vec![r(0, 1)], None, None),
            Err(SymbolSetMapError::NoVariants)
        );
        assert_eq!(
            SymbolSetMap::new(vec![r(5, 1)], Some(vec![vec![]]), None),
            Err(SymbolSetMapError::InvalidRange {
                index: 0,
                min: 5,
                max: 1
            })
        );
        assert_eq!(
            SymbolSetMap::new(vec![r(0, 4), r(4, 5)], Some(vec![vec![0; 5], vec![0; 2]]), None),
            Err(SymbolSetMapError::Unordered { index: 1 })
        );
        assert_eq!(
            SymbolSetMap::new(vec![r(0, 4)], None, Some(vec![vec![0; 4]])),
            Err(SymbolSetMapError::ArrayLength {
                variant: MapVariant::Pcl,
                index: 0,
                expected: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn test_user_defined_assign() {
        let mut user = UserDefinedMap::new(0xFF);
        assert_eq!(user.code_max(), 0xFF);
        assert_eq!(user.mapped_count(MapVariant::Standard), 0);

        let mut lookup = vec![NOT_MAPPED; 0x181];
        lookup[0x180] = 0x20AC;
        user.assign(lookup).unwrap();
        assert_eq!(user.ranges(), &[SymbolSetRange { min: 0, max: 0x180 }]);
        assert_eq!(user.lookup(0x180, MapVariant::Pcl), 0x20AC);
        assert_eq!(user.assign(Vec::new()), Err(SymbolSetMapError::LookupSize(0)));
    }

    #[test]
    fn test_dump_16bit_rows() {
        let map = SymbolSetMap::single_range(0x100, vec![0x0100; 0x20]).unwrap();
        let dump = map.formatted_dump(MapVariant::Standard);
        let rows: Vec<&str> = dump.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("010_  0100"));
        assert!(rows[1].starts_with("011_  0100"));
    }
}
