/// Sector-addressable disk images

/// Sector chain traversal
pub mod chain;
/// Track/sector references
pub mod sector;

pub use chain::{ChainLink, SectorChain};
pub use sector::SectorRef;

use log::debug;

use crate::boot::BootSector;
use crate::error::{CbmError, Result};
use crate::format::{detect_disk_format, Geometry, SECTOR_SIZE};

/// Raw CBM disk image viewed through a geometry
///
/// The image owns its byte buffer and never modifies it. Sector reads
/// return slices into that buffer.
#[derive(Debug, Clone)]
pub struct DiskImage {
    geometry: Geometry,
    data: Vec<u8>,
    has_error_info: bool,
}

impl DiskImage {
    /// Wrap a byte buffer with an explicit geometry
    ///
    /// The buffer must hold exactly the geometry's sectors, optionally
    /// followed by one error byte per sector.
    pub fn new(geometry: Geometry, data: Vec<u8>) -> Result<Self> {
        let has_error_info = if data.len() == geometry.data_size() {
            false
        } else if data.len() == geometry.data_size_with_errors() {
            true
        } else {
            return Err(CbmError::format(format!(
                "{} image should be {} or {} bytes, got {}",
                geometry.name(),
                geometry.data_size(),
                geometry.data_size_with_errors(),
                data.len()
            )));
        };

        debug!(
            "{} image, {} bytes{}",
            geometry.name(),
            data.len(),
            if has_error_info { " with error info" } else { "" }
        );

        Ok(Self {
            geometry,
            data,
            has_error_info,
        })
    }

    /// Wrap a byte buffer, choosing the geometry from its length
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let geometry = detect_disk_format(data.len())
            .and_then(|format| format.geometry())
            .ok_or_else(|| {
                CbmError::format(format!("No disk format is {} bytes long", data.len()))
            })?;
        Self::new(geometry, data)
    }

    /// Get the geometry
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Get the full image bytes, error info included
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Check if the image carries per-sector error bytes
    pub fn has_error_info(&self) -> bool {
        self.has_error_info
    }

    /// Byte offset of a sector within the image
    pub fn byte_offset(&self, track: u8, sector: u8) -> Result<usize> {
        self.geometry.byte_offset(SectorRef::new(track, sector))
    }

    /// Read sector data by track and sector number
    pub fn sector(&self, track: u8, sector: u8) -> Result<&[u8]> {
        self.read_sector(SectorRef::new(track, sector))
    }

    /// Read sector data
    pub fn read_sector(&self, location: SectorRef) -> Result<&[u8]> {
        let offset = self.geometry.byte_offset(location)?;
        Ok(&self.data[offset..offset + SECTOR_SIZE])
    }

    /// Error byte recorded for a sector, `None` when the image has no error info
    ///
    /// A value of 1 means the sector read without error; other values are
    /// drive error codes.
    pub fn sector_error(&self, location: SectorRef) -> Result<Option<u8>> {
        let index = self.geometry.linear_index(location)?;
        if !self.has_error_info {
            return Ok(None);
        }
        Ok(Some(self.data[self.geometry.data_size() + index]))
    }

    /// Start a walk along the sector chain beginning at `start`
    pub fn chain(&self, start: SectorRef) -> SectorChain<'_> {
        SectorChain::new(self, start)
    }

    /// Read the bytes of a file whose first sector is `start`
    pub fn read_file(&self, start: SectorRef) -> Result<Vec<u8>> {
        self.chain(start).read_to_end()
    }

    /// Decode the C128 boot sector at track 1, sector 0
    pub fn boot_sector(&self) -> BootSector {
        match self.read_sector(SectorRef::new(1, 0)) {
            Ok(data) => BootSector::parse(data),
            Err(_) => BootSector::default(),
        }
    }
}
