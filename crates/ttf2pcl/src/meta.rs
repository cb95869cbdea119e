//! Header fields taken from the font tables

use pcl::{
    font::{FontMetadata, Spacing},
    symset::{SymbolSetId, SymbolSetType},
};
use ttf_parser::{name_id, Face, GlyphId};

use crate::source::raw_table;

/// Offset of `xAvgCharWidth` in `OS/2`
const OS2_AVG_CHAR_WIDTH: usize = 2;

/// Offset of the PANOSE classification in `OS/2`
const OS2_PANOSE: usize = 32;

fn name(face: &Face<'_>, id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == id)
        .find_map(|name| name.to_string())
}

/// The PANOSE classification from the `OS/2` table
pub fn panose(face: &Face<'_>) -> Option<[u8; 10]> {
    let os2 = raw_table(face, b"OS/2")?;
    let bytes = os2.get(OS2_PANOSE..OS2_PANOSE + 10)?;
    let mut panose = [0; 10];
    panose.copy_from_slice(bytes);
    Some(panose)
}

/// PCL stroke weight for a weight class (400 is 0, 700 is 3)
///
/// ```
/// use ttf2pcl::stroke_weight;
///
/// assert_eq!(stroke_weight(400), 0);
/// assert_eq!(stroke_weight(700), 3);
/// assert_eq!(stroke_weight(100), -3);
/// assert_eq!(stroke_weight(1000), 6);
/// ```
pub fn stroke_weight(weight_class: u16) -> i8 {
    ((i32::from(weight_class) - 400) / 100).clamp(-7, 7) as i8
}

fn clamp_u16(value: i32) -> u16 {
    value.clamp(0, i32::from(u16::MAX)) as u16
}

/// Fill the font metadata from the font tables
pub fn font_metadata(
    face: &Face<'_>,
    symbol_set: SymbolSetId,
    symbol_set_type: SymbolSetType,
) -> FontMetadata {
    let font_name = name(face, name_id::FULL_NAME)
        .or_else(|| name(face, name_id::FAMILY))
        .unwrap_or_default();
    let copyright = name(face, name_id::COPYRIGHT_NOTICE).unwrap_or_default();

    let bbox = face.global_bounding_box();
    let space_width = face
        .glyph_index(' ')
        .and_then(|id| face.glyph_hor_advance(id))
        .unwrap_or(0);
    let average_width = raw_table(face, b"OS/2")
        .and_then(|os2| os2.get(OS2_AVG_CHAR_WIDTH..OS2_AVG_CHAR_WIDTH + 2))
        .map(|b| clamp_u16(i16::from_be_bytes([b[0], b[1]]).into()))
        .unwrap_or(space_width);
    let x_height = face
        .x_height()
        .or_else(|| glyph_top(face, 'x'))
        .unwrap_or(0);
    let cap_height = face
        .capital_height()
        .or_else(|| glyph_top(face, 'H'))
        .unwrap_or(0);
    let underline = face.underline_metrics();

    FontMetadata {
        font_name,
        copyright,
        style: u16::from(face.is_italic() || face.is_oblique()),
        stroke_weight: stroke_weight(face.weight().to_number()),
        spacing: if face.is_monospaced() {
            Spacing::Fixed
        } else {
            Spacing::Proportional
        },
        symbol_set,
        symbol_set_type,
        panose: panose(face),
        ascender: face.ascender(),
        descender: face.descender(),
        cell_width: clamp_u16(i32::from(bbox.x_max) - i32::from(bbox.x_min)),
        x_height: clamp_u16(x_height.into()),
        cap_height: clamp_u16(cap_height.into()),
        space_width,
        average_width,
        underline_position: underline.map_or(0, |m| m.position),
        underline_thickness: underline.map_or(0, |m| clamp_u16(m.thickness.into())),
        ..FontMetadata::default()
    }
}

fn glyph_top(face: &Face<'_>, c: char) -> Option<i16> {
    let id: GlyphId = face.glyph_index(c)?;
    face.glyph_bounding_box(id).map(|rect| rect.y_max)
}
