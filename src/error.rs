use thiserror::Error;

/// Errors that can occur while building, paging, or exporting a float image.
///
/// Caller contract violations (out-of-range coordinates, even kernel sizes,
/// bad scale factors) are not represented here: they panic.
#[derive(Debug, Error)]
pub enum ImageError {
    /// I/O failure on a source file, the tile store, or an output file
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A read returned fewer bytes than the image layout requires
    #[error("Short read while {context}: expected {expected} bytes, got {actual}")]
    ShortRead {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Failed to encode an exported image
    #[error("Encode error: {message}")]
    Encode { message: String },
}

impl ImageError {
    /// Wrap an `std::io::Error` with a description of what was being done.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ImageError::Io {
            context: context.into(),
            source,
        }
    }
}
