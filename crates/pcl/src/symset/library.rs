//! # Built-in symbol sets
//!
//! A small selection of the sets every PCL printer knows. Each entry lists the
//! printable ranges and the Unicode code points for them.

use super::{
    SymbolSetEntry, SymbolSetId, SymbolSetMap, SymbolSetMapError, SymbolSetRange, SymbolSetType,
    NOT_MAPPED,
};

const UND: u16 = NOT_MAPPED;

/// Windows code page 1252, `0x80..=0x9F`
#[rustfmt::skip]
const WIN_LATIN_1_C1: [u16; 32] = [
    0x20AC, UND,    0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021,
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, UND,    0x017D, UND,
    UND,    0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014,
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, UND,    0x017E, 0x0178,
];

/// The graphic symbols PC-8 prints for `0x01..=0x1F`
#[rustfmt::skip]
const PC_8_C0: [u16; 31] = [
            0x263A, 0x263B, 0x2665, 0x2666, 0x2663, 0x2660, 0x2022,
    0x25D8, 0x25CB, 0x25D9, 0x2642, 0x2640, 0x266A, 0x266B, 0x263C,
    0x25BA, 0x25C4, 0x2195, 0x203C, 0x00B6, 0x00A7, 0x25AC, 0x21A8,
    0x2191, 0x2193, 0x2192, 0x2190, 0x221F, 0x2194, 0x25B2, 0x25BC,
];

/// Code page 437, `0x80..=0xFF`
#[rustfmt::skip]
const PC_8_HIGH: [u16; 128] = [
    0x00C7, 0x00FC, 0x00E9, 0x00E2, 0x00E4, 0x00E0, 0x00E5, 0x00E7,
    0x00EA, 0x00EB, 0x00E8, 0x00EF, 0x00EE, 0x00EC, 0x00C4, 0x00C5,
    0x00C9, 0x00E6, 0x00C6, 0x00F4, 0x00F6, 0x00F2, 0x00FB, 0x00F9,
    0x00FF, 0x00D6, 0x00DC, 0x00A2, 0x00A3, 0x00A5, 0x20A7, 0x0192,
    0x00E1, 0x00ED, 0x00F3, 0x00FA, 0x00F1, 0x00D1, 0x00AA, 0x00BA,
    0x00BF, 0x2310, 0x00AC, 0x00BD, 0x00BC, 0x00A1, 0x00AB, 0x00BB,
    0x2591, 0x2592, 0x2593, 0x2502, 0x2524, 0x2561, 0x2562, 0x2556,
    0x2555, 0x2563, 0x2551, 0x2557, 0x255D, 0x255C, 0x255B, 0x2510,
    0x2514, 0x2534, 0x252C, 0x251C, 0x2500, 0x253C, 0x255E, 0x255F,
    0x255A, 0x2554, 0x2569, 0x2566, 0x2560, 0x2550, 0x256C, 0x2567,
    0x2568, 0x2564, 0x2565, 0x2559, 0x2558, 0x2552, 0x2553, 0x256B,
    0x256A, 0x2518, 0x250C, 0x2588, 0x2584, 0x258C, 0x2590, 0x2580,
    0x03B1, 0x00DF, 0x0393, 0x03C0, 0x03A3, 0x03C3, 0x00B5, 0x03C4,
    0x03A6, 0x0398, 0x03A9, 0x03B4, 0x221E, 0x03C6, 0x03B5, 0x2229,
    0x2261, 0x00B1, 0x2265, 0x2264, 0x2320, 0x2321, 0x00F7, 0x2248,
    0x00B0, 0x2219, 0x00B7, 0x221A, 0x207F, 0x00B2, 0x25A0, 0x00A0,
];

fn identity(min: u16, max: u16) -> Vec<u16> {
    (min..=max).collect()
}

fn range(min: u16, max: u16) -> SymbolSetRange {
    SymbolSetRange { min, max }
}

/// `0U` - ASCII
pub fn ascii() -> Result<SymbolSetMap, SymbolSetMapError> {
    SymbolSetMap::new(vec![range(0x20, 0x7F)], Some(vec![identity(0x20, 0x7F)]), None)
}

/// `0N` - ISO 8859-1 Latin 1
pub fn iso_8859_1() -> Result<SymbolSetMap, SymbolSetMapError> {
    SymbolSetMap::new(
        vec![range(0x20, 0x7F), range(0xA0, 0xFF)],
        Some(vec![identity(0x20, 0x7F), identity(0xA0, 0xFF)]),
        None,
    )
}

/// `19U` - Windows 3.1 Latin 1
pub fn win_latin_1() -> Result<SymbolSetMap, SymbolSetMapError> {
    let mut values = identity(0x20, 0xFF);
    values[0x60..0x80].copy_from_slice(&WIN_LATIN_1_C1);
    SymbolSetMap::new(vec![range(0x20, 0xFF)], Some(vec![values]), None)
}

/// `10U` - PC-8, code page 437
///
/// The PCL variant additionally maps the C0 control codes to the graphic
/// symbols that PC-8 fonts carry there.
pub fn pc_8() -> Result<SymbolSetMap, SymbolSetMapError> {
    let mut standard = vec![UND; 0x100];
    standard[0x20..0x7F].copy_from_slice(&identity(0x20, 0x7E));
    standard[0x7F] = 0x2302;
    standard[0x80..].copy_from_slice(&PC_8_HIGH);

    let mut pcl = standard.clone();
    pcl[0x01..0x20].copy_from_slice(&PC_8_C0);

    SymbolSetMap::new(vec![range(0x00, 0xFF)], Some(vec![standard]), Some(vec![pcl]))
}

/// All built-in symbol sets
pub fn entries() -> Result<Vec<SymbolSetEntry>, SymbolSetMapError> {
    let entry = |id: SymbolSetId, name: &str, kind: SymbolSetType, map: SymbolSetMap| SymbolSetEntry {
        id,
        name: String::from(name),
        kind,
        map,
    };
    Ok(vec![
        entry(SymbolSetId::ASCII, "ASCII", SymbolSetType::Bound7Bit, ascii()?),
        entry(
            SymbolSetId::ISO_8859_1,
            "ISO 8859-1 Latin 1",
            SymbolSetType::Bound8Bit,
            iso_8859_1()?,
        ),
        entry(
            SymbolSetId::PC_8,
            "PC-8",
            SymbolSetType::BoundPc8,
            pc_8()?,
        ),
        entry(
            SymbolSetId::WIN_LATIN_1,
            "Windows 3.1 Latin 1",
            SymbolSetType::BoundPc8,
            win_latin_1()?,
        ),
    ])
}
