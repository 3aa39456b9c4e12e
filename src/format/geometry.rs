/// Physical disk geometry tables

use crate::error::{CbmError, Result};
use crate::format::constants::*;
use crate::image::SectorRef;

/// Byte offsets of the named fields inside a directory header sector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    /// Offset of the DOS format tag ('A' on 1541, 'D' on 1581)
    pub format_tag: usize,
    /// Offset of the 16-byte padded disk name
    pub disk_name: usize,
    /// Offset of the 2-byte disk id
    pub disk_id: usize,
    /// Offset of the 2-byte DOS version tag ("2A", "3D")
    pub dos_version: usize,
}

impl HeaderLayout {
    /// 1541 header: BAM precedes the disk name
    pub const CBM1541: HeaderLayout = HeaderLayout {
        format_tag: 0x02,
        disk_name: 0x90,
        disk_id: 0xA2,
        dos_version: 0xA5,
    };

    /// 1581 header: BAM lives in its own sectors
    pub const CBM1581: HeaderLayout = HeaderLayout {
        format_tag: 0x02,
        disk_name: 0x04,
        disk_id: 0x16,
        dos_version: 0x19,
    };
}

/// Track/sector layout of a physical disk format
///
/// Tracks are numbered from 1. The table is built from zones of
/// `(first_track, last_track, sectors)` so that formats with variable
/// sectors per track (the 1541 speed zones) and constant ones (the 1581)
/// share the same addressing code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    name: &'static str,
    /// Sectors in each track, index 0 unused
    sectors_per_track: Vec<u8>,
    /// Sectors preceding each track, index 0 unused
    track_starts: Vec<usize>,
    /// Location of the directory header
    pub directory_header: SectorRef,
    /// Location of the first directory entries sector
    pub directory_entries: SectorRef,
    /// Field layout of the directory header
    pub header_layout: HeaderLayout,
}

impl Geometry {
    /// Build a geometry from a zone table
    pub fn from_zones(
        name: &'static str,
        zones: &[(u8, u8, u8)],
        directory_header: SectorRef,
        directory_entries: SectorRef,
        header_layout: HeaderLayout,
    ) -> Self {
        let mut sectors_per_track = vec![0u8];
        for &(first, last, sectors) in zones {
            for _ in first..=last {
                sectors_per_track.push(sectors);
            }
        }

        let mut track_starts = Vec::with_capacity(sectors_per_track.len());
        let mut running = 0usize;
        for &count in &sectors_per_track {
            track_starts.push(running);
            running += count as usize;
        }

        Self {
            name,
            sectors_per_track,
            track_starts,
            directory_header,
            directory_entries,
            header_layout,
        }
    }

    /// 1541, 35 tracks
    pub fn d64() -> Self {
        Self::from_zones(
            "1541 Diskette",
            &[(1, 17, 21), (18, 24, 19), (25, 30, 18), (31, 35, 17)],
            SectorRef::new(18, 0),
            SectorRef::new(18, 1),
            HeaderLayout::CBM1541,
        )
    }

    /// 1541, 40 tracks (extended)
    pub fn d64_40() -> Self {
        Self::from_zones(
            "1541 Diskette (40 tracks)",
            &[(1, 17, 21), (18, 24, 19), (25, 30, 18), (31, 40, 17)],
            SectorRef::new(18, 0),
            SectorRef::new(18, 1),
            HeaderLayout::CBM1541,
        )
    }

    /// 1581, 80 tracks of 40 sectors
    pub fn d81() -> Self {
        Self::from_zones(
            "1581 Diskette",
            &[(1, 80, 40)],
            SectorRef::new(40, 0),
            SectorRef::new(40, 3),
            HeaderLayout::CBM1581,
        )
    }

    /// Human-readable format name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of tracks
    pub fn track_count(&self) -> u8 {
        (self.sectors_per_track.len() - 1) as u8
    }

    /// Sectors in the given track, `None` outside the geometry
    pub fn sectors_in_track(&self, track: u8) -> Option<u8> {
        if track == 0 {
            return None;
        }
        self.sectors_per_track.get(track as usize).copied()
    }

    /// Total sectors on the disk
    pub fn total_sectors(&self) -> usize {
        self.sectors_per_track.iter().map(|&s| s as usize).sum()
    }

    /// Bytes of sector data on the disk
    pub fn data_size(&self) -> usize {
        self.total_sectors() * SECTOR_SIZE
    }

    /// Bytes of an image carrying one error byte per sector
    pub fn data_size_with_errors(&self) -> usize {
        self.total_sectors() * (SECTOR_SIZE + 1)
    }

    /// Check a reference lies inside the geometry
    pub fn validate(&self, location: SectorRef) -> Result<()> {
        match self.sectors_in_track(location.track) {
            Some(count) if location.sector < count => Ok(()),
            _ => Err(CbmError::IllegalSector {
                track: location.track,
                sector: location.sector,
            }),
        }
    }

    /// Zero-based index of a sector counted across the whole disk
    pub fn linear_index(&self, location: SectorRef) -> Result<usize> {
        self.validate(location)?;
        Ok(self.track_starts[location.track as usize] + location.sector as usize)
    }

    /// Byte offset of a sector within the image
    pub fn byte_offset(&self, location: SectorRef) -> Result<usize> {
        Ok(self.linear_index(location)? * SECTOR_SIZE)
    }

    /// Iterate over every valid sector in track order
    pub fn sectors(&self) -> impl Iterator<Item = SectorRef> + '_ {
        (1..=self.track_count()).flat_map(move |track| {
            let count = self.sectors_per_track[track as usize];
            (0..count).map(move |sector| SectorRef::new(track, sector))
        })
    }
}
