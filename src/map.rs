/// Sector map visualization

use log::warn;

use crate::filesystem::{DosDisk, FileContainer};
use crate::format::Geometry;
use crate::image::SectorRef;

/// ANSI color codes for sector map
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BRIGHT_WHITE: &str = "\x1b[97m";
    pub const DARK_WHITE: &str = "\x1b[37m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
}

/// What a sector is used for, as seen by following the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorUsage {
    /// Not reached from the directory
    Free,
    /// Directory header (BAM on a 1541)
    Header,
    /// Directory entry sector
    Directory,
    /// Part of the live file at this index
    File(usize),
    /// Claimed by more than one owner
    Conflict,
}

/// Sector usage of a whole disk, indexed in track order
#[derive(Debug, Clone)]
pub struct SectorMap {
    geometry: Geometry,
    usage: Vec<SectorUsage>,
    errors: Vec<bool>,
}

impl SectorMap {
    /// Build the map by walking the directory and every live file chain
    ///
    /// A file chain that breaks is mapped up to the break.
    pub fn new(disk: &DosDisk) -> Self {
        let image = disk.image();
        let geometry = image.geometry().clone();
        let mut map = Self {
            usage: vec![SectorUsage::Free; geometry.total_sectors()],
            errors: vec![false; geometry.total_sectors()],
            geometry,
        };

        map.claim(map.geometry.directory_header, SectorUsage::Header);
        for dir in disk.directory_sectors() {
            map.claim(dir.location, SectorUsage::Directory);
        }

        for (index, entry) in disk.entries().iter().enumerate() {
            for link in image.chain(entry.start) {
                match link {
                    Ok(link) => map.claim(link.location, SectorUsage::File(index)),
                    Err(e) => {
                        warn!("file {} chain stops early: {}", index, e);
                        break;
                    }
                }
            }
        }

        if image.has_error_info() {
            // 0 and 1 both mean no error
            let bad: Vec<SectorRef> = map
                .geometry
                .sectors()
                .filter(|&location| matches!(image.sector_error(location), Ok(Some(code)) if code > 1))
                .collect();
            for location in bad {
                map.set_error(location);
            }
        }

        map
    }

    fn claim(&mut self, location: SectorRef, owner: SectorUsage) {
        if let Ok(index) = self.geometry.linear_index(location) {
            let slot = &mut self.usage[index];
            *slot = match *slot {
                SectorUsage::Free => owner,
                current if current == owner => current,
                _ => SectorUsage::Conflict,
            };
        }
    }

    fn set_error(&mut self, location: SectorRef) {
        if let Ok(index) = self.geometry.linear_index(location) {
            self.errors[index] = true;
        }
    }

    /// Get the usage of a sector, `None` outside the geometry
    pub fn usage(&self, location: SectorRef) -> Option<SectorUsage> {
        let index = self.geometry.linear_index(location).ok()?;
        self.usage.get(index).copied()
    }

    /// Check if the error-info tail flags a sector
    pub fn has_error(&self, location: SectorRef) -> bool {
        self.geometry
            .linear_index(location)
            .map(|i| self.errors[i])
            .unwrap_or(false)
    }

    /// Number of sectors reached from the directory
    pub fn used_count(&self) -> usize {
        self.usage.iter().filter(|u| **u != SectorUsage::Free).count()
    }

    /// Number of sectors claimed twice
    pub fn conflict_count(&self) -> usize {
        self.usage
            .iter()
            .filter(|u| **u == SectorUsage::Conflict)
            .count()
    }

    /// Get the geometry the map covers
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }
}

/// Draw a visual sector map for a disk
pub fn draw_sector_map(disk: &DosDisk) {
    let map = SectorMap::new(disk);
    let geometry = map.geometry();

    let num_tracks = geometry.track_count();
    let max_sectors = (1..=num_tracks)
        .filter_map(|t| geometry.sectors_in_track(t))
        .max()
        .unwrap_or(0);
    if max_sectors == 0 {
        println!("No sectors found.");
        return;
    }

    const BLOCK_NO_DATA: &str = "\u{2591}"; // ░ - Light shade (free)
    const BLOCK_HAS_DATA: &str = "\u{2593}"; // ▓ - Dark shade (in-use)

    println!("=== Sector Map ({}) ===", geometry.name());
    println!(
        "Legend: {}File{} {}Directory{} {}Header{} {}Conflict/Error{}",
        colors::BRIGHT_WHITE, colors::RESET,
        colors::BRIGHT_CYAN, colors::RESET,
        colors::BRIGHT_YELLOW, colors::RESET,
        colors::BRIGHT_RED, colors::RESET
    );
    println!();

    // Sector 0 at the bottom
    for sector in (0..max_sectors).rev() {
        print!("{:>2} ", sector);

        for track in 1..=num_tracks {
            let location = SectorRef::new(track, sector);
            let usage = match map.usage(location) {
                Some(usage) => usage,
                None => {
                    print!(" ");
                    continue;
                }
            };

            let block = if usage == SectorUsage::Free {
                BLOCK_NO_DATA
            } else {
                BLOCK_HAS_DATA
            };
            let color = if map.has_error(location) {
                colors::BRIGHT_RED
            } else {
                match usage {
                    SectorUsage::Free => colors::DARK_WHITE,
                    SectorUsage::Header => colors::BRIGHT_YELLOW,
                    SectorUsage::Directory => colors::BRIGHT_CYAN,
                    SectorUsage::File(_) => colors::BRIGHT_WHITE,
                    SectorUsage::Conflict => colors::BRIGHT_RED,
                }
            };

            print!("{}{}{}", color, block, colors::RESET);
        }
        println!();
    }

    // Track axis, numbered every 5 tracks
    print!("   ");
    let num_tracks = num_tracks as usize;
    let mut printed_cols = vec![false; num_tracks + 1];
    for track in 1..=num_tracks {
        if track % 5 == 0 && !printed_cols[track] {
            for (i, digit) in track.to_string().chars().enumerate() {
                let col = track + i;
                if col <= num_tracks {
                    print!("{}", digit);
                    printed_cols[col] = true;
                }
            }
        } else if !printed_cols[track] {
            print!(" ");
        }
    }
    println!();

    println!(
        "\n{} of {} sectors in use, {} cross-linked",
        map.used_count(),
        geometry.total_sectors(),
        map.conflict_count()
    );
}
