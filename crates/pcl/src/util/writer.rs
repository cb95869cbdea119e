//! Fixed-size field output with a running checksum

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

/// A byte sum modulo 256
///
/// ```
/// use pcl::util::Checksum;
///
/// let mut sum = Checksum::new();
/// sum.add(&[0x80, 0x90, 0x01]);
/// assert_eq!(sum.value(), 0x11);
/// assert_eq!(sum.complement(), 0xEF);
/// ```
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Checksum(u8);

impl Checksum {
    /// Create an empty sum
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add all bytes of a fragment
    pub fn add(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = self.0.wrapping_add(byte);
        }
    }

    /// The current sum
    pub fn value(&self) -> u8 {
        self.0
    }

    /// The byte that brings the covered region to a sum of zero
    pub fn complement(&self) -> u8 {
        0u8.wrapping_sub(self.0)
    }
}

/// Writes big-endian fields to an inner writer
///
/// While a checksum region is open, every written byte is also added to
/// the running [`Checksum`].
#[derive(Debug)]
pub struct ByteWriter<W> {
    inner: W,
    checksum: Option<Checksum>,
    position: u64,
}

impl<W: Write> ByteWriter<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            checksum: None,
            position: 0,
        }
    }

    /// Number of bytes written so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Unwrap the inner writer
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Start a new checksum region
    pub fn begin_checksum(&mut self) {
        self.checksum = Some(Checksum::new());
    }

    /// Close the current checksum region and return its sum
    pub fn take_checksum(&mut self) -> Checksum {
        self.checksum.take().unwrap_or_default()
    }

    /// Write a slice of raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        if let Some(sum) = &mut self.checksum {
            sum.add(bytes);
        }
        self.position += bytes.len() as u64;
        Ok(())
    }

    /// Write `count` zero bytes
    pub fn write_zeros(&mut self, count: usize) -> io::Result<()> {
        const ZEROS: [u8; 16] = [0; 16];
        let mut left = count;
        while left > 0 {
            let n = left.min(ZEROS.len());
            self.write_bytes(&ZEROS[..n])?;
            left -= n;
        }
        Ok(())
    }

    /// Write a single byte
    pub fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.write_bytes(&[value])
    }

    /// Write a signed byte
    pub fn write_i8(&mut self, value: i8) -> io::Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Write a big-endian `u16`
    pub fn write_u16(&mut self, value: u16) -> io::Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Write a big-endian `i16`
    pub fn write_i16(&mut self, value: i16) -> io::Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Write a big-endian `u32`
    pub fn write_u32(&mut self, value: u32) -> io::Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Write a little-endian `u16` (PCL XL binding)
    pub fn write_u16_le(&mut self, value: u16) -> io::Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a little-endian `u32` (PCL XL binding)
    pub fn write_u32_le(&mut self, value: u32) -> io::Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Flush the inner writer
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for ByteWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Create (or truncate) an output file for binary data
pub fn create_output(path: &Path) -> io::Result<ByteWriter<BufWriter<File>>> {
    let file = File::create(path)?;
    Ok(ByteWriter::new(BufWriter::new(file)))
}
