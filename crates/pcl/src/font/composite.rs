//! # Composite glyphs
//!
//! A composite glyph in a TrueType `glyf` table is a list of component
//! records following the 10 byte glyph header. Each record starts with a
//! flags word and the component glyph id, followed by two arguments and an
//! optional transform whose sizes depend on the flags.

use bitflags::bitflags;
use nom::{bytes::complete::take, number::complete::be_u16, sequence::pair, IResult};
use smallvec::SmallVec;

/// Size of the glyph header (contour count and bounding box)
pub const GLYPH_HEADER_SIZE: usize = 10;

bitflags! {
    /// Flags of a component record
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ComponentFlags: u16 {
        /// The arguments are 16-bit values, 8-bit otherwise
        const ARG_1_AND_2_ARE_WORDS = 0x0001;
        /// The arguments are offsets, point numbers otherwise
        const ARGS_ARE_XY_VALUES = 0x0002;
        /// Round offsets to the grid
        const ROUND_XY_TO_GRID = 0x0004;
        /// One F2DOT14 scale
        const WE_HAVE_A_SCALE = 0x0008;
        /// Another record follows
        const MORE_COMPONENTS = 0x0020;
        /// Separate x and y scales
        const WE_HAVE_AN_X_AND_Y_SCALE = 0x0040;
        /// A 2x2 transformation matrix
        const WE_HAVE_A_TWO_BY_TWO = 0x0080;
        /// Instructions follow the last record
        const WE_HAVE_INSTRUCTIONS = 0x0100;
        /// Use the metrics of this component for the composite
        const USE_MY_METRICS = 0x0200;
        /// The components overlap
        const OVERLAP_COMPOUND = 0x0400;
    }
}

impl ComponentFlags {
    fn args_len(self) -> usize {
        if self.contains(Self::ARG_1_AND_2_ARE_WORDS) {
            4
        } else {
            2
        }
    }

    fn transform_len(self) -> usize {
        if self.contains(Self::WE_HAVE_A_TWO_BY_TWO) {
            8
        } else if self.contains(Self::WE_HAVE_AN_X_AND_Y_SCALE) {
            4
        } else if self.contains(Self::WE_HAVE_A_SCALE) {
            2
        } else {
            0
        }
    }
}

/// A single component reference
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Component {
    /// The record flags
    pub flags: ComponentFlags,
    /// The referenced glyph
    pub glyph_id: u16,
}

fn component(input: &[u8]) -> IResult<&[u8], Component> {
    let (input, (bits, glyph_id)) = pair(be_u16, be_u16)(input)?;
    let flags = ComponentFlags::from_bits_retain(bits);
    let (input, _args) = take(flags.args_len())(input)?;
    let (input, _transform) = take(flags.transform_len())(input)?;
    Ok((input, Component { flags, glyph_id }))
}

/// Iterator over the component records of a composite glyph
#[derive(Debug, Clone)]
pub struct ComponentIter<'a> {
    rest: &'a [u8],
    done: bool,
    truncated: bool,
}

impl<'a> ComponentIter<'a> {
    /// Iterate the components of the given outline data
    pub fn new(outline: &'a [u8]) -> Self {
        let rest = outline.get(GLYPH_HEADER_SIZE..).unwrap_or_default();
        Self {
            rest,
            done: false,
            truncated: outline.len() < GLYPH_HEADER_SIZE,
        }
    }

    /// Whether the data ended before the last record
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl Iterator for ComponentIter<'_> {
    type Item = Component;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.truncated {
            return None;
        }
        match component(self.rest) {
            Ok((rest, component)) => {
                self.rest = rest;
                self.done = !component.flags.contains(ComponentFlags::MORE_COMPONENTS);
                Some(component)
            }
            Err(_) => {
                self.truncated = true;
                None
            }
        }
    }
}

/// Collect the component glyph ids of a composite glyph
pub fn component_ids(outline: &[u8]) -> (SmallVec<[u16; 4]>, bool) {
    let mut iter = ComponentIter::new(outline);
    let ids = iter.by_ref().map(|c| c.glyph_id).collect();
    (ids, iter.is_truncated())
}

#[cfg(test)]
mod tests {
    use super::{component_ids, ComponentFlags, ComponentIter};

    fn outline(records: &[&[u8]]) -> Vec<u8> {
        let mut data = vec![0xFF, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0];
        for record in records {
            data.extend_from_slice(record);
        }
        data
    }

    #[test]
    fn test_record_sizes() {
        let data = outline(&[
            // words, 2x2 matrix
            &[0x00, 0xA3, 0x00, 0x05, 1, 2, 3, 4, 1, 2, 3, 4, 5, 6, 7, 8],
            // bytes, x and y scale
            &[0x00, 0x60, 0x00, 0x06, 1, 2, 1, 2, 3, 4],
            // bytes, one scale
            &[0x00, 0x28, 0x00, 0x07, 1, 2, 1, 2],
            // words, no transform, last
            &[0x02, 0x01, 0x00, 0x08, 1, 2, 3, 4],
        ]);
        let components: Vec<_> = ComponentIter::new(&data).collect();
        let ids: Vec<u16> = components.iter().map(|c| c.glyph_id).collect();
        assert_eq!(ids, vec![5, 6, 7, 8]);
        assert!(components[3].flags.contains(ComponentFlags::USE_MY_METRICS));
        assert!(!components[3].flags.contains(ComponentFlags::MORE_COMPONENTS));
    }

    #[test]
    fn test_stops_without_more_components() {
        let data = outline(&[&[0x00, 0x00, 0x00, 0x02, 0, 0], &[0x00, 0x00, 0x00, 0x03, 0, 0]]);
        let (ids, truncated) = component_ids(&data);
        assert_eq!(ids.as_slice(), &[2]);
        assert!(!truncated);
    }

    #[test]
    fn test_truncated() {
        let data = outline(&[&[0x00, 0x20, 0x00, 0x02, 0, 0], &[0x00, 0x01, 0x00, 0x03, 0]]);
        let (ids, truncated) = component_ids(&data);
        assert_eq!(ids.as_slice(), &[2]);
        assert!(truncated);

        let (ids, truncated) = component_ids(&[0xFF, 0xFF]);
        assert!(ids.is_empty());
        assert!(truncated);
    }
}
