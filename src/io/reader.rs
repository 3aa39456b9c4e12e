/// CBM image file reader

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::error::{CbmError, Result};
use crate::filesystem::CbmImage;
use crate::format::{detect_format, format_from_extension, ImageFormat};

/// Read and decode an image file
///
/// A known extension picks the format; otherwise the contents are probed.
/// A program file takes its label and entry name from the file stem.
pub fn open_image<P: AsRef<Path>>(path: P) -> Result<CbmImage> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    debug!("read {} bytes from {}", data.len(), path.display());

    let format = choose_format(path, &data).ok_or_else(|| {
        CbmError::format(format!(
            "Unrecognised image {} ({} bytes)",
            path.display(),
            data.len()
        ))
    })?;
    info!("opening {} as {}", path.display(), format.name());

    if format == ImageFormat::Prg {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(CbmImage::named_prg(name, data));
    }
    read_image(format, data)
}

/// Decode bytes already in memory as the given format
pub fn read_image(format: ImageFormat, data: Vec<u8>) -> Result<CbmImage> {
    CbmImage::with_format(format, data)
}

/// Extension wins unless it claims a tape and the magic is missing
fn choose_format(path: &Path, data: &[u8]) -> Option<ImageFormat> {
    match format_from_extension(path) {
        Some(ImageFormat::T64) if !data.starts_with(crate::format::T64_MAGIC) => {
            detect_format(data)
        }
        Some(format) => Some(format),
        None => detect_format(data),
    }
}

/// Check if a file looks like a CBM image, by extension or contents
pub fn is_cbm_file<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    if format_from_extension(path).is_some() {
        return true;
    }
    match fs::read(path) {
        Ok(data) => detect_format(&data).is_some(),
        Err(_) => false,
    }
}
