/// Track/sector references

use std::fmt;

/// A (track, sector) pair addressing one 256-byte sector
///
/// Tracks start at 1. Track 0 never names a real sector: in a sector link it
/// marks the end of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectorRef {
    /// Track number (1-based)
    pub track: u8,
    /// Sector number within the track (0-based)
    pub sector: u8,
}

impl SectorRef {
    /// Create a new sector reference
    pub const fn new(track: u8, sector: u8) -> Self {
        Self { track, sector }
    }

    /// Read the link held in the first two bytes of a sector
    pub fn from_link(bytes: &[u8]) -> Self {
        Self {
            track: bytes.first().copied().unwrap_or(0),
            sector: bytes.get(1).copied().unwrap_or(0),
        }
    }

    /// Check if this reference is the end-of-chain sentinel
    pub fn is_terminal(&self) -> bool {
        self.track == 0
    }
}

impl fmt::Display for SectorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.track, self.sector)
    }
}

impl From<(u8, u8)> for SectorRef {
    fn from((track, sector): (u8, u8)) -> Self {
        Self::new(track, sector)
    }
}
