/// Sector chain traversal
///
/// CBM-DOS stores files and the directory as linked sectors: the first two
/// bytes of each sector name the next one. A track of 0 ends the chain, and
/// for file data the sector byte of that final link is the count of valid
/// payload bytes in the last sector.

use log::{trace, warn};

use crate::error::{CbmError, Result};
use crate::format::SECTOR_PAYLOAD_SIZE;
use crate::image::{DiskImage, SectorRef};

/// One sector visited by a chain walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLink<'a> {
    /// Where this sector lives
    pub location: SectorRef,
    /// Raw sector bytes, link included
    pub data: &'a [u8],
    /// The link stored in this sector
    pub next: SectorRef,
}

impl<'a> ChainLink<'a> {
    /// Check if this is the final sector of the chain
    pub fn is_last(&self) -> bool {
        self.next.is_terminal()
    }

    /// File payload carried by this sector
    ///
    /// All 254 bytes after the link for inner sectors; for the final sector
    /// only as many bytes as the link's sector field declares.
    pub fn payload(&self) -> &'a [u8] {
        let len = if self.is_last() {
            (self.next.sector as usize).min(SECTOR_PAYLOAD_SIZE)
        } else {
            SECTOR_PAYLOAD_SIZE
        };
        &self.data[2..2 + len]
    }
}

/// Lazy walk along a sector chain
///
/// Visited sectors are tracked by their linear index on the disk, so a chain
/// that loops back on itself yields a [`CbmError::CircularFile`] instead of
/// running forever. After the first error the walk yields nothing more.
pub struct SectorChain<'a> {
    image: &'a DiskImage,
    next: Option<SectorRef>,
    visited: Vec<bool>,
}

impl<'a> SectorChain<'a> {
    /// Start a new walk at `start`
    pub fn new(image: &'a DiskImage, start: SectorRef) -> Self {
        Self {
            image,
            next: if start.is_terminal() { None } else { Some(start) },
            visited: vec![false; image.geometry().total_sectors()],
        }
    }

    /// Assemble file bytes from the remaining sectors of the chain
    pub fn read_to_end(self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        for link in self {
            data.extend_from_slice(link?.payload());
        }
        Ok(data)
    }

    fn visit(&mut self, location: SectorRef) -> Result<ChainLink<'a>> {
        let image = self.image;
        let index = image
            .geometry()
            .linear_index(location)
            .inspect_err(|_| warn!("sector chain leaves the disk at {}", location))?;
        if self.visited[index] {
            warn!("sector chain loops back to {}", location);
            return Err(CbmError::CircularFile {
                track: location.track,
                sector: location.sector,
            });
        }
        self.visited[index] = true;

        let data = image.read_sector(location)?;
        let next = SectorRef::from_link(data);
        trace!("chain sector {} -> {}", location, next);

        Ok(ChainLink {
            location,
            data,
            next,
        })
    }
}

impl<'a> Iterator for SectorChain<'a> {
    type Item = Result<ChainLink<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let location = self.next.take()?;
        let result = self.visit(location);
        if let Ok(link) = &result {
            if !link.is_last() {
                self.next = Some(link.next);
            }
        }
        Some(result)
    }
}
