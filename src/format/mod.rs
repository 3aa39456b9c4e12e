/// CBM image formats, constants and geometry

/// Format constants
pub mod constants;
/// Physical disk geometry
pub mod geometry;

pub use constants::*;
pub use geometry::{Geometry, HeaderLayout};

use std::path::Path;

/// CBM container image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// 1541 disk image, 35 tracks
    D64,
    /// 1541 disk image, 40 tracks
    D64Extended,
    /// 1581 disk image
    D81,
    /// Tape image
    T64,
    /// Bare program file
    Prg,
}

impl ImageFormat {
    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::D64 => "1541 Diskette",
            ImageFormat::D64Extended => "1541 Diskette (40 tracks)",
            ImageFormat::D81 => "1581 Diskette",
            ImageFormat::T64 => "T64 Tape",
            ImageFormat::Prg => "PRG File",
        }
    }

    /// Get the disk geometry, `None` for tapes and bare files
    pub fn geometry(&self) -> Option<Geometry> {
        match self {
            ImageFormat::D64 => Some(Geometry::d64()),
            ImageFormat::D64Extended => Some(Geometry::d64_40()),
            ImageFormat::D81 => Some(Geometry::d81()),
            ImageFormat::T64 | ImageFormat::Prg => None,
        }
    }

    /// Check whether this format is a sector-addressed disk
    pub fn is_disk(&self) -> bool {
        !matches!(self, ImageFormat::T64 | ImageFormat::Prg)
    }
}

/// Detect a disk format from the image length
pub fn detect_disk_format(len: usize) -> Option<ImageFormat> {
    match len {
        D64_SIZE | D64_SIZE_WITH_ERRORS => Some(ImageFormat::D64),
        D64_40_SIZE | D64_40_SIZE_WITH_ERRORS => Some(ImageFormat::D64Extended),
        D81_SIZE | D81_SIZE_WITH_ERRORS => Some(ImageFormat::D81),
        _ => None,
    }
}

/// Detect a format from the image length, falling back to magic bytes
///
/// A buffer of a known disk size is a disk even when its first bytes
/// happen to read "C64".
pub fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    detect_disk_format(data.len())
        .or_else(|| data.starts_with(T64_MAGIC).then_some(ImageFormat::T64))
}

/// Guess a format from a file extension
///
/// `.d64` is reported as [`ImageFormat::D64`]; the 35/40 track variant is
/// settled by the image length once the bytes are read.
pub fn format_from_extension<P: AsRef<Path>>(path: P) -> Option<ImageFormat> {
    let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "d64" => Some(ImageFormat::D64),
        "d81" => Some(ImageFormat::D81),
        "t64" => Some(ImageFormat::T64),
        "prg" => Some(ImageFormat::Prg),
        _ => None,
    }
}
