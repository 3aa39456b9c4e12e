use thiserror::Error;

/// Result type alias for CBM image operations
pub type Result<T> = std::result::Result<T, CbmError>;

/// Errors that can occur when decoding CBM disk and tape images
#[derive(Debug, Error)]
pub enum CbmError {
    /// I/O error occurred while reading an image from the host
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Buffer size or magic bytes do not match the expected format
    #[error("Invalid format: {0}")]
    Format(String),

    /// Track/sector reference outside the geometry
    #[error("Illegal sector: track {track}, sector {sector}")]
    IllegalSector {
        /// Track number
        track: u8,
        /// Sector number
        sector: u8,
    },

    /// A sector chain revisits a sector it has already passed through
    #[error("Circular file detected at track {track}, sector {sector}")]
    CircularFile {
        /// Track of the revisited sector
        track: u8,
        /// Sector of the revisited sector
        sector: u8,
    },

    /// No live entry matches the requested name
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Entry index past the end of the live entries
    #[error("Entry index {index} out of range ({count} entries)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of live entries
        count: usize,
    },
}

impl CbmError {
    /// Create a format error
    pub fn format<S: Into<String>>(message: S) -> Self {
        CbmError::Format(message.into())
    }

    /// Create a file-not-found error from a raw PETSCII name
    pub fn not_found(name: &[u8]) -> Self {
        CbmError::FileNotFound(crate::petscii::to_display_string(name))
    }
}
