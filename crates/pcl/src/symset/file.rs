//! # Download symbol set files
//!
//! A download symbol set file consists of a symbol set id sequence
//! (`ESC * c # R`), a define symbol set sequence (`ESC ( f # W`) carrying the
//! length of the data that follows, an 18-byte descriptor and finally the
//! big-endian code point mapping for `first_code..=last_code`.

use std::{io::Write, path::Path};

use log::{debug, info};
use nom::{
    bytes::complete::take,
    number::complete::{be_u16, u8 as be_u8},
    sequence::tuple,
    IResult,
};

use super::{MapVariant, SymbolSetFileError, SymbolSetId, SymbolSetMap, SymbolSetType, NOT_MAPPED};
use crate::{
    escape::Escape,
    util::{create_output, ByteWriter},
};

/// Size of the descriptor that follows `ESC ( f # W`
pub const DESCRIPTOR_SIZE: u16 = 18;

/// The only supported descriptor format: codes indexed by Unicode
pub const FORMAT_UNICODE: u8 = 3;

/// Upper bound for the bytes of a decimal escape sequence value, including
/// the terminator
const MAX_PARAM_LEN: usize = 12;

/// The fixed part of a download symbol set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSetDescriptor {
    /// Size of the descriptor, always 18
    pub header_size: u16,
    /// The symbol set id that this set defines
    pub designator: u16,
    /// The descriptor format, always 3
    pub format: u8,
    /// The type byte
    pub type_id: u8,
    /// The first code with a mapping
    pub first_code: u16,
    /// The last code with a mapping
    pub last_code: u16,
    /// Character requirements bit field
    pub requirements: [u8; 8],
}

impl SymbolSetDescriptor {
    /// The descriptor for `map`, addressed from its lowest to its highest code
    pub fn new(id: SymbolSetId, kind: SymbolSetType, map: &SymbolSetMap) -> Self {
        Self {
            header_size: DESCRIPTOR_SIZE,
            designator: id.0,
            format: FORMAT_UNICODE,
            type_id: kind.type_id(),
            first_code: map.code_min(),
            last_code: map.code_max(),
            requirements: [0; 8],
        }
    }

    /// The 18 bytes as they appear in the file
    pub fn to_bytes(&self) -> [u8; DESCRIPTOR_SIZE as usize] {
        let mut bytes = [0; DESCRIPTOR_SIZE as usize];
        bytes[0..2].copy_from_slice(&self.header_size.to_be_bytes());
        bytes[2..4].copy_from_slice(&self.designator.to_be_bytes());
        bytes[4] = self.format;
        bytes[5] = self.type_id;
        bytes[6..8].copy_from_slice(&self.first_code.to_be_bytes());
        bytes[8..10].copy_from_slice(&self.last_code.to_be_bytes());
        bytes[10..18].copy_from_slice(&self.requirements);
        bytes
    }
}

fn descriptor(input: &[u8]) -> IResult<&[u8], SymbolSetDescriptor> {
    let (input, (header_size, designator, format, type_id, first_code, last_code, req)) =
        tuple((be_u16, be_u16, be_u8, be_u8, be_u16, be_u16, take(8usize)))(input)?;
    let mut requirements = [0; 8];
    requirements.copy_from_slice(req);
    Ok((
        input,
        SymbolSetDescriptor {
            header_size,
            designator,
            format,
            type_id,
            first_code,
            last_code,
            requirements,
        },
    ))
}

/// A successfully parsed download symbol set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSymbolSet {
    /// The id from the `ESC * c # R` sequence
    pub id: SymbolSetId,
    /// The descriptor
    pub descriptor: SymbolSetDescriptor,
    /// The addressing scheme derived from codes and mapping
    pub kind: SymbolSetType,
    /// Dense table for the codes `0..=last_code`
    pub lookup: Vec<u16>,
}

impl DownloadSymbolSet {
    /// The first mapped code
    pub fn first_code(&self) -> u16 {
        self.descriptor.first_code
    }

    /// The last mapped code
    pub fn last_code(&self) -> u16 {
        self.descriptor.last_code
    }
}

/// Check the 3 byte introducer of an escape sequence at `offset`
fn introducer(input: &[u8], offset: usize, esc: Escape) -> Result<usize, SymbolSetFileError> {
    let expected = esc.introducer();
    match input.get(offset..offset + expected.len()) {
        Some(bytes) if bytes == expected => Ok(offset + expected.len()),
        _ => Err(SymbolSetFileError::MalformedHeader {
            offset,
            reason: match esc.terminator {
                b'R' => "expected symbol set id sequence (ESC * c)",
                _ => "expected define symbol set sequence (ESC ( f)",
            },
        }),
    }
}

/// Read decimal digits at `offset` up to the terminator of `esc`
///
/// Returns the value and the offset after the terminator.
fn decimal_param(
    input: &[u8],
    offset: usize,
    esc: Escape,
) -> Result<(u64, usize), SymbolSetFileError> {
    let mut value = 0u64;
    let mut digits = 0;
    for (i, &byte) in input[offset..].iter().take(MAX_PARAM_LEN).enumerate() {
        let pos = offset + i;
        match byte {
            b'0'..=b'9' => {
                value = value * 10 + u64::from(byte - b'0');
                digits += 1;
            }
            _ if byte == esc.terminator && digits > 0 => return Ok((value, pos + 1)),
            _ if byte == esc.terminator => {
                return Err(SymbolSetFileError::MalformedHeader {
                    offset: pos,
                    reason: "missing value before terminator",
                })
            }
            _ => {
                return Err(SymbolSetFileError::MalformedHeader {
                    offset: pos,
                    reason: "unexpected byte in escape sequence value",
                })
            }
        }
    }
    Err(SymbolSetFileError::MalformedHeader {
        offset: offset + digits,
        reason: "escape sequence is not terminated",
    })
}

fn validation(field: &'static str, expected: impl ToString, actual: u64) -> SymbolSetFileError {
    SymbolSetFileError::Validation {
        field,
        expected: expected.to_string(),
        actual,
    }
}

/// Parse a download symbol set from memory
pub fn parse_symbol_set(input: &[u8]) -> Result<DownloadSymbolSet, SymbolSetFileError> {
    let file_size = input.len() as u64;

    let offset = introducer(input, 0, Escape::SYMBOL_SET_ID)?;
    let (id, offset) = decimal_param(input, offset, Escape::SYMBOL_SET_ID)?;

    let offset = introducer(input, offset, Escape::DEFINE_SYMBOL_SET)?;
    let (data_length, offset) = decimal_param(input, offset, Escape::DEFINE_SYMBOL_SET)?;
    debug!("Symbol set {}, {} bytes of data at {}", id, data_length, offset);

    let available = file_size - offset as u64;
    if data_length > available {
        return Err(SymbolSetFileError::InconsistentLength {
            field: "data length",
            expected: available,
            actual: data_length,
        });
    }
    let data = &input[offset..offset + data_length as usize];

    let desc = match descriptor(data) {
        Ok((_, desc)) => desc,
        Err(_) => {
            return Err(SymbolSetFileError::InconsistentLength {
                field: "data length",
                expected: u64::from(DESCRIPTOR_SIZE),
                actual: data_length,
            })
        }
    };
    if desc.header_size != DESCRIPTOR_SIZE {
        return Err(validation(
            "header size",
            DESCRIPTOR_SIZE,
            desc.header_size.into(),
        ));
    }
    if u64::from(desc.designator) != id {
        return Err(validation(
            "symbol set designator",
            id,
            desc.designator.into(),
        ));
    }
    if desc.format != FORMAT_UNICODE {
        return Err(validation("format", FORMAT_UNICODE, desc.format.into()));
    }
    if desc.first_code > desc.last_code {
        return Err(validation(
            "first code",
            format!("at most {}", desc.last_code),
            desc.first_code.into(),
        ));
    }
    let count = usize::from(desc.last_code - desc.first_code) + 1;
    let expected_length = u64::from(DESCRIPTOR_SIZE) + 2 * count as u64;
    if data_length != expected_length {
        return Err(SymbolSetFileError::InconsistentLength {
            field: "data length",
            expected: expected_length,
            actual: data_length,
        });
    }

    let table = &data[usize::from(desc.header_size)..];
    let mut lookup = vec![NOT_MAPPED; usize::from(desc.last_code) + 1];
    for (slot, chunk) in lookup[usize::from(desc.first_code)..]
        .iter_mut()
        .zip(table.chunks_exact(2))
    {
        *slot = u16::from_be_bytes([chunk[0], chunk[1]]);
    }

    let kind = SymbolSetType::classify(desc.first_code, desc.last_code, &lookup);
    Ok(DownloadSymbolSet {
        id: SymbolSetId(desc.designator),
        descriptor: desc,
        kind,
        lookup,
    })
}

/// Read and validate a download symbol set file
pub fn check_symbol_set_file(path: &Path) -> Result<DownloadSymbolSet, SymbolSetFileError> {
    let input = std::fs::read(path).map_err(SymbolSetFileError::io(path))?;
    let set = parse_symbol_set(&input)?;
    info!(
        "Loaded symbol set {} ({}) from '{}': 0x{:04X}..=0x{:04X}",
        set.id,
        set.kind,
        path.display(),
        set.first_code(),
        set.last_code()
    );
    Ok(set)
}

/// Write a download symbol set for the codes `code_min..=code_max` of a map
pub fn write_symbol_set<W: Write>(
    out: &mut ByteWriter<W>,
    id: SymbolSetId,
    kind: SymbolSetType,
    map: &SymbolSetMap,
    variant: MapVariant,
) -> std::io::Result<()> {
    let desc = SymbolSetDescriptor::new(id, kind, map);
    let lookup = map.full_lookup(variant);
    let table = &lookup[usize::from(desc.first_code)..];
    let data_length = u64::from(DESCRIPTOR_SIZE) + 2 * table.len() as u64;

    Escape::SYMBOL_SET_ID.write(out, id.0.into())?;
    Escape::DEFINE_SYMBOL_SET.write(out, data_length)?;
    out.write_bytes(&desc.to_bytes())?;
    for &value in table {
        out.write_u16(value)?;
    }
    Ok(())
}

/// Create a download symbol set file
pub fn write_symbol_set_file(
    path: &Path,
    id: SymbolSetId,
    kind: SymbolSetType,
    map: &SymbolSetMap,
    variant: MapVariant,
) -> Result<(), SymbolSetFileError> {
    let mut out = create_output(path).map_err(SymbolSetFileError::io(path))?;
    write_symbol_set(&mut out, id, kind, map, variant).map_err(SymbolSetFileError::io(path))?;
    out.finish().map_err(SymbolSetFileError::io(path))?;
    info!("Wrote symbol set {} to '{}'", id, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{check_symbol_set_file, parse_symbol_set, write_symbol_set, write_symbol_set_file};
    use crate::{
        symset::{
            library, MapVariant, SymbolSetFileError, SymbolSetId, SymbolSetMap, SymbolSetType,
            NOT_MAPPED,
        },
        util::ByteWriter,
    };

    fn encode(id: u16, first: u16, values: &[u16]) -> Vec<u8> {
        let map = SymbolSetMap::single_range(first, values.to_vec()).unwrap();
        let mut out = ByteWriter::new(Vec::new());
        write_symbol_set(
            &mut out,
            SymbolSetId(id),
            SymbolSetType::Bound8Bit,
            &map,
            MapVariant::Standard,
        )
        .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_writer_layout() {
        let bytes = encode(629, 0x41, &[0x0041, 0x20AC]);
        let mut expected = b"\x1B*c629R\x1B(f22W".to_vec();
        expected.extend_from_slice(&[0, 18, 0x02, 0x75, 3, 1, 0, 0x41, 0, 0x42]);
        expected.extend_from_slice(&[0; 8]);
        expected.extend_from_slice(&[0x00, 0x41, 0x20, 0xAC]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_descriptor_bytes() {
        let mut bytes = encode(629, 0x20, &[0x0020, 0x0021]);
        bytes[13 + 10] = 0x80;
        let set = parse_symbol_set(&bytes).unwrap();
        assert_eq!(set.descriptor.requirements[0], 0x80);
        assert_eq!(&set.descriptor.to_bytes()[..], &bytes[13..31]);
    }

    #[test]
    fn test_parse() {
        let bytes = encode(341, 0x80, &[0x00C7, NOT_MAPPED, 0x00E9]);
        let set = parse_symbol_set(&bytes).unwrap();
        assert_eq!(set.id, SymbolSetId::PC_8);
        assert_eq!(set.first_code(), 0x80);
        assert_eq!(set.last_code(), 0x82);
        assert_eq!(set.descriptor.type_id, 1);
        assert_eq!(set.lookup.len(), 0x83);
        assert_eq!(set.lookup[0x41], NOT_MAPPED);
        assert_eq!(set.lookup[0x80], 0x00C7);
        assert_eq!(set.lookup[0x82], 0x00E9);
        assert_eq!(set.kind, SymbolSetType::BoundPc8);
    }

    #[test]
    fn test_bad_introducer() {
        let mut bytes = encode(21, 0x20, &[0x20]);
        bytes[1] = b'&';
        assert!(matches!(
            parse_symbol_set(&bytes),
            Err(SymbolSetFileError::MalformedHeader { offset: 0, .. })
        ));
        assert!(matches!(
            parse_symbol_set(b"\x1B*c21"),
            Err(SymbolSetFileError::MalformedHeader { .. })
        ));
        assert!(matches!(
            parse_symbol_set(b"\x1B*c2x1R"),
            Err(SymbolSetFileError::MalformedHeader { offset: 4, .. })
        ));
        assert!(matches!(
            parse_symbol_set(b"\x1B*c123456789012345R"),
            Err(SymbolSetFileError::MalformedHeader { .. })
        ));
        assert!(matches!(
            parse_symbol_set(b"\x1B*c21R\x1B(s4W"),
            Err(SymbolSetFileError::MalformedHeader { offset: 6, .. })
        ));
    }

    #[test]
    fn test_designator_mismatch() {
        let mut bytes = encode(21, 0x20, &[0x20]);
        // The designator follows "\x1B*c21R\x1B(f20W" and the header size
        bytes[15] = 0x16;
        match parse_symbol_set(&bytes) {
            Err(SymbolSetFileError::Validation { field, actual, .. }) => {
                assert_eq!(field, "symbol set designator");
                assert_eq!(actual, 22);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_first_after_last() {
        let mut bytes = encode(21, 0x20, &[0x20]);
        // first code = 0x0030, last code = 0x0020
        bytes[19] = 0x30;
        assert!(matches!(
            parse_symbol_set(&bytes),
            Err(SymbolSetFileError::Validation {
                field: "first code",
                actual: 0x30,
                ..
            })
        ));
    }

    #[test]
    fn test_inconsistent_length() {
        let bytes = encode(21, 0x20, &[0x20, 0x21]);
        let truncated = &bytes[..bytes.len() - 1];
        assert!(matches!(
            parse_symbol_set(truncated),
            Err(SymbolSetFileError::InconsistentLength {
                field: "data length",
                ..
            })
        ));

        // Claim a range of three codes while carrying data for two
        let mut bytes = bytes;
        bytes[21] = 0x22;
        assert!(matches!(
            parse_symbol_set(&bytes),
            Err(SymbolSetFileError::InconsistentLength {
                expected: 24,
                actual: 22,
                ..
            })
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("win.sym");
        let map = library::win_latin_1().unwrap();
        write_symbol_set_file(
            &path,
            SymbolSetId::WIN_LATIN_1,
            SymbolSetType::BoundPc8,
            &map,
            MapVariant::Standard,
        )
        .unwrap();

        let set = check_symbol_set_file(&path).unwrap();
        assert_eq!(set.id, SymbolSetId::WIN_LATIN_1);
        assert_eq!(set.kind, SymbolSetType::BoundPc8);
        assert_eq!(set.lookup, map.full_lookup(MapVariant::Standard));
    }

    #[test]
    fn test_missing_file() {
        let err = check_symbol_set_file(Path::new("/nonexistent/file.sym")).unwrap_err();
        assert!(matches!(err, SymbolSetFileError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/file.sym"));
    }
}
