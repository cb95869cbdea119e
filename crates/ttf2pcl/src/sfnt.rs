//! Writing `sfnt` containers

use std::collections::BTreeMap;

/// Size of the offset table at the start of the file
const OFFSET_TABLE_SIZE: usize = 12;

/// Size of one table record
const TABLE_RECORD_SIZE: usize = 16;

/// The checksum of a table, summing big endian `u32` words
///
/// ```
/// use ttf2pcl::table_checksum;
///
/// assert_eq!(table_checksum(&[0, 0, 1, 0, 0, 0, 0, 2]), 0x102);
/// assert_eq!(table_checksum(&[1]), 0x0100_0000);
/// ```
pub fn table_checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// Collects tables and writes them with a table directory
#[derive(Debug, Default, Clone)]
pub struct SfntBuilder {
    tables: BTreeMap<[u8; 4], Vec<u8>>,
}

impl SfntBuilder {
    /// An empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a table
    pub fn add_table(&mut self, tag: &[u8; 4], data: Vec<u8>) -> &mut Self {
        self.tables.insert(*tag, data);
        self
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table was added
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Write the offset table, the table records sorted by tag and the
    /// tables, each aligned to 4 bytes.
    pub fn build(&self) -> Vec<u8> {
        let num_tables = self.tables.len() as u16;
        let entry_selector = match num_tables {
            0 => 0,
            n => 15 - n.leading_zeros() as u16,
        };
        let search_range = (1u16 << entry_selector) * TABLE_RECORD_SIZE as u16;
        let range_shift = (num_tables * TABLE_RECORD_SIZE as u16).saturating_sub(search_range);

        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&num_tables.to_be_bytes());
        out.extend_from_slice(&search_range.to_be_bytes());
        out.extend_from_slice(&entry_selector.to_be_bytes());
        out.extend_from_slice(&range_shift.to_be_bytes());

        let mut offset = OFFSET_TABLE_SIZE + TABLE_RECORD_SIZE * self.tables.len();
        for (tag, data) in &self.tables {
            out.extend_from_slice(tag);
            out.extend_from_slice(&table_checksum(data).to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            offset += padded_len(data.len());
        }
        for data in self.tables.values() {
            out.extend_from_slice(data);
            out.resize(out.len() + padded_len(data.len()) - data.len(), 0);
        }
        out
    }
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}
