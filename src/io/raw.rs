//! Row-at-a-time access to raw float rasters.
//!
//! A raw raster is `size_x * size_y` 32-bit floats, rows contiguous in the
//! x direction, in a caller-declared byte order. This is the only contract
//! the image core has with upstream format readers: they locate the pixel
//! data and supply the dimensions and byte order.

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use super::byte_order::{decode_f32s, encode_f32s, ByteOrder, BYTES_PER_SAMPLE};
use crate::error::ImageError;

/// Read until `buf` is full or the stream ends.
///
/// Returns the number of bytes read, which is less than `buf.len()` only at
/// end of stream.
pub fn read_fully<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Sequential reader of raw float rows.
pub struct RawFloatReader<R> {
    reader: R,
    size_x: usize,
    byte_order: ByteOrder,
    /// Scratch buffer holding one encoded row
    bytes: Vec<u8>,
    /// Description of the source for error messages
    context: String,
    next_row: usize,
}

impl<R: Read> RawFloatReader<R> {
    /// Wrap a reader positioned at the first pixel of the raster.
    pub fn new(
        reader: R,
        size_x: usize,
        byte_order: ByteOrder,
        context: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            size_x,
            byte_order,
            bytes: vec![0u8; size_x * BYTES_PER_SAMPLE],
            context: context.into(),
            next_row: 0,
        }
    }

    /// Read the next row into `row`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::ShortRead`] if the stream ends before a full row
    /// was read, or [`ImageError::Io`] on any other read failure.
    pub fn read_row(&mut self, row: &mut [f32]) -> Result<(), ImageError> {
        debug_assert_eq!(row.len(), self.size_x);

        let read = read_fully(&mut self.reader, &mut self.bytes).map_err(|e| {
            ImageError::io(
                format!("reading row {} of {}", self.next_row, self.context),
                e,
            )
        })?;

        if read != self.bytes.len() {
            return Err(ImageError::ShortRead {
                context: format!("reading row {} of {}", self.next_row, self.context),
                expected: self.bytes.len(),
                actual: read,
            });
        }

        decode_f32s(&self.bytes, self.byte_order, row);
        self.next_row += 1;
        Ok(())
    }
}

impl<R: Read + Seek> RawFloatReader<R> {
    /// Position the reader at `row`, where the raster starts at absolute
    /// byte `base_offset` of the stream.
    pub fn seek_to_row(&mut self, base_offset: u64, row: usize) -> Result<(), ImageError> {
        let position = base_offset + (row * self.size_x * BYTES_PER_SAMPLE) as u64;
        self.reader
            .seek(SeekFrom::Start(position))
            .map_err(|e| ImageError::io(format!("seeking to row {} of {}", row, self.context), e))?;
        self.next_row = row;
        Ok(())
    }
}

/// Sequential writer of raw float rows.
pub struct RawFloatWriter<W: Write> {
    writer: W,
    byte_order: ByteOrder,
    bytes: Vec<u8>,
    context: String,
}

impl<W: Write> RawFloatWriter<W> {
    pub fn new(writer: W, byte_order: ByteOrder, context: impl Into<String>) -> Self {
        Self {
            writer,
            byte_order,
            bytes: Vec::new(),
            context: context.into(),
        }
    }

    /// Encode and write one row.
    pub fn write_row(&mut self, row: &[f32]) -> Result<(), ImageError> {
        self.bytes.clear();
        encode_f32s(row, self.byte_order, &mut self.bytes);
        self.writer
            .write_all(&self.bytes)
            .map_err(|e| ImageError::io(format!("writing {}", self.context), e))
    }

    /// Flush buffered output and return the inner writer.
    pub fn finish(mut self) -> Result<W, ImageError> {
        self.writer
            .flush()
            .map_err(|e| ImageError::io(format!("flushing {}", self.context), e))?;
        Ok(self.writer)
    }
}
