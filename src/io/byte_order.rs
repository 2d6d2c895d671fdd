/// Size in bytes of one stored pixel.
pub const BYTES_PER_SAMPLE: usize = std::mem::size_of::<f32>();

/// Byte order of 32-bit float samples in an external file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    /// Byte order of the running process.
    ///
    /// The private tile file is always written in this order.
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }
}

// =============================================================================
// Endian Helper Functions
// =============================================================================

/// Read a little-endian f32 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 4 bytes.
#[inline]
pub fn read_f32_le(bytes: &[u8]) -> f32 {
    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Read a big-endian f32 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 4 bytes.
#[inline]
pub fn read_f32_be(bytes: &[u8]) -> f32 {
    f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Decode `out.len()` samples from `bytes` in the given byte order.
///
/// # Panics
/// Panics if `bytes` holds fewer than `out.len() * 4` bytes.
pub fn decode_f32s(bytes: &[u8], byte_order: ByteOrder, out: &mut [f32]) {
    assert!(
        bytes.len() >= out.len() * BYTES_PER_SAMPLE,
        "need {} bytes to decode {} samples, got {}",
        out.len() * BYTES_PER_SAMPLE,
        out.len(),
        bytes.len()
    );

    let chunks = bytes.chunks_exact(BYTES_PER_SAMPLE);
    match byte_order {
        ByteOrder::LittleEndian => {
            for (value, chunk) in out.iter_mut().zip(chunks) {
                *value = read_f32_le(chunk);
            }
        }
        ByteOrder::BigEndian => {
            for (value, chunk) in out.iter_mut().zip(chunks) {
                *value = read_f32_be(chunk);
            }
        }
    }
}

/// Append `values` to `out` encoded in the given byte order.
pub fn encode_f32s(values: &[f32], byte_order: ByteOrder, out: &mut Vec<u8>) {
    out.reserve(values.len() * BYTES_PER_SAMPLE);
    match byte_order {
        ByteOrder::LittleEndian => {
            for value in values {
                out.extend_from_slice(&value.to_le_bytes());
            }
        }
        ByteOrder::BigEndian => {
            for value in values {
                out.extend_from_slice(&value.to_be_bytes());
            }
        }
    }
}
