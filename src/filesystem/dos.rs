/// CBM-DOS disk container
///
/// Composes a geometry-bound [`DiskImage`] with its decoded directory.
/// The directory is read once at construction; file bytes are read on
/// every request by walking the file's sector chain.

use log::debug;

use crate::boot::BootSector;
use crate::error::Result;
use crate::filesystem::{
    DirectoryEntry, DirectoryHeader, DirectorySector, FileContainer,
};
use crate::format::DIR_ENTRIES_PER_SECTOR;
use crate::image::{DiskImage, SectorRef};

/// A CBM-DOS formatted disk (1541 or 1581)
#[derive(Debug, Clone)]
pub struct DosDisk {
    image: DiskImage,
    header: DirectoryHeader,
    directory_sectors: Vec<DirectorySector>,
    raw_entries: Vec<DirectoryEntry>,
    entries: Vec<DirectoryEntry>,
    boot_sector: BootSector,
}

impl DosDisk {
    /// Decode the directory of a disk image
    ///
    /// Fails if the directory chain leaves the geometry or loops.
    pub fn new(image: DiskImage) -> Result<Self> {
        let geometry = image.geometry();
        let header = DirectoryHeader::parse(
            image.read_sector(geometry.directory_header)?,
            &geometry.header_layout,
        );

        let directory_sectors = Self::read_directory(&image, geometry.directory_entries)?;
        let raw_entries: Vec<DirectoryEntry> = directory_sectors
            .iter()
            .flat_map(|s| s.entries.iter().cloned())
            .collect();
        let entries: Vec<DirectoryEntry> =
            raw_entries.iter().filter(|e| e.is_live()).cloned().collect();
        let boot_sector = image.boot_sector();

        debug!(
            "{}: {} directory sectors, {} entries ({} live)",
            geometry.name(),
            directory_sectors.len(),
            raw_entries.len(),
            entries.len()
        );

        Ok(Self {
            image,
            header,
            directory_sectors,
            raw_entries,
            entries,
            boot_sector,
        })
    }

    /// Decode a disk, choosing the geometry from the image length
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::new(DiskImage::from_bytes(data)?)
    }

    /// Walk the directory sector chain
    fn read_directory(image: &DiskImage, start: SectorRef) -> Result<Vec<DirectorySector>> {
        let mut sectors = Vec::new();
        for link in image.chain(start) {
            let link = link?;
            let first_index = sectors.len() * DIR_ENTRIES_PER_SECTOR;
            sectors.push(DirectorySector::parse(link.data, link.location, first_index));
        }
        Ok(sectors)
    }

    /// Get the underlying image
    pub fn image(&self) -> &DiskImage {
        &self.image
    }

    /// Physical format name, e.g. "1541 Diskette"
    pub fn image_type(&self) -> &'static str {
        self.image.geometry().name()
    }

    /// Get the decoded directory header
    pub fn header(&self) -> &DirectoryHeader {
        &self.header
    }

    /// Disk name without padding
    pub fn disk_name(&self) -> &[u8] {
        self.header.disk_name()
    }

    /// Disk id
    pub fn disk_id(&self) -> &[u8] {
        &self.header.disk_id
    }

    /// Directory sectors in chain order
    pub fn directory_sectors(&self) -> &[DirectorySector] {
        &self.directory_sectors
    }

    /// Every directory slot, empty ones included
    pub fn raw_entries(&self) -> &[DirectoryEntry] {
        &self.raw_entries
    }

    /// Raw sector passthrough
    pub fn sector(&self, track: u8, sector: u8) -> Result<&[u8]> {
        self.image.sector(track, sector)
    }

    /// Check for a valid C128 boot sector
    pub fn has_boot_sector(&self) -> bool {
        self.boot_sector.is_valid
    }

    /// Get the decoded boot sector
    pub fn boot_sector(&self) -> &BootSector {
        &self.boot_sector
    }
}

impl FileContainer for DosDisk {
    type Entry = DirectoryEntry;

    fn label(&self) -> &[u8] {
        self.disk_name()
    }

    fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    fn read_entry(&self, entry: &DirectoryEntry) -> Result<Vec<u8>> {
        self.image.read_file(entry.start)
    }
}
