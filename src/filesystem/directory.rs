/// CBM-DOS directory structures
///
/// The directory is a header sector (disk name, id, DOS version, and on the
/// 1541 the BAM) followed by a chain of directory sectors. Each directory
/// sector holds eight 32-byte entries:
///
/// | Offset | Size | Contents                                        |
/// |--------|------|-------------------------------------------------|
/// | 0x00   | 2    | next directory sector (first entry only)        |
/// | 0x02   | 1    | type flags                                      |
/// | 0x03   | 2    | first data track/sector                         |
/// | 0x05   | 16   | name, padded with 0xA0                          |
/// | 0x15   | 3    | REL side sector + record length / GEOS info     |
/// | 0x18   | 1    | GEOS file type                                  |
/// | 0x19   | 5    | GEOS timestamp                                  |
/// | 0x1E   | 2    | size in sectors, little-endian                  |

use std::fmt;

use crate::filesystem::{trim_padding, FileEntry, FileType};
use crate::format::constants::entry;
use crate::format::{
    HeaderLayout, DIR_ENTRIES_PER_SECTOR, DIR_ENTRY_SIZE, NAME_LENGTH, PADDING_BYTE,
    SECTOR_PAYLOAD_SIZE,
};
use crate::image::SectorRef;
use crate::petscii::to_display_string;

const TYPE_FLAG_SAVE_WITH_REPLACE: u8 = 0x20;
const TYPE_FLAG_LOCKED: u8 = 0x40;
const TYPE_FLAG_CLOSED: u8 = 0x80;

/// Decoded directory header sector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryHeader {
    /// Link to the first directory sector, as stored
    pub first_directory: SectorRef,
    /// DOS format tag ('A' for 1541, 'D' for 1581)
    pub format_tag: u8,
    /// Disk name including padding
    pub raw_disk_name: [u8; NAME_LENGTH],
    /// Disk id
    pub disk_id: [u8; 2],
    /// DOS version tag ("2A", "3D")
    pub dos_version: [u8; 2],
}

impl DirectoryHeader {
    /// Decode a header sector with the given field layout
    pub fn parse(data: &[u8], layout: &HeaderLayout) -> Self {
        let mut raw_disk_name = [0u8; NAME_LENGTH];
        raw_disk_name.copy_from_slice(&data[layout.disk_name..layout.disk_name + NAME_LENGTH]);

        Self {
            first_directory: SectorRef::from_link(data),
            format_tag: data[layout.format_tag],
            raw_disk_name,
            disk_id: [data[layout.disk_id], data[layout.disk_id + 1]],
            dos_version: [data[layout.dos_version], data[layout.dos_version + 1]],
        }
    }

    /// Disk name with trailing padding removed
    pub fn disk_name(&self) -> &[u8] {
        trim_padding(&self.raw_disk_name, &[PADDING_BYTE])
    }
}

/// A single 32-byte directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Position in the raw directory, empty slots included
    pub index: usize,
    /// Raw type flags
    pub type_flags: u8,
    /// First data sector
    pub start: SectorRef,
    raw_name: [u8; NAME_LENGTH],
    extra: [u8; 3],
    /// GEOS file type, 0 for non-GEOS files
    pub geos_file_type: u8,
    /// GEOS timestamp bytes: year, month, day, hour, minute
    pub timestamp: [u8; 5],
    /// Size in sectors
    pub size: u16,
}

impl DirectoryEntry {
    /// Decode an entry from a 32-byte record
    pub fn parse(data: &[u8], index: usize) -> Self {
        let mut raw_name = [0u8; NAME_LENGTH];
        raw_name.copy_from_slice(&data[entry::NAME..entry::NAME + NAME_LENGTH]);

        let mut extra = [0u8; 3];
        extra.copy_from_slice(&data[entry::EXTRA..entry::EXTRA + 3]);

        let mut timestamp = [0u8; 5];
        timestamp.copy_from_slice(&data[entry::TIMESTAMP..entry::TIMESTAMP + 5]);

        Self {
            index,
            type_flags: data[entry::TYPE_FLAGS],
            start: SectorRef::new(data[entry::TRACK], data[entry::SECTOR]),
            raw_name,
            extra,
            geos_file_type: data[entry::GEOS_TYPE],
            timestamp,
            size: u16::from_le_bytes([data[entry::SIZE], data[entry::SIZE + 1]]),
        }
    }

    /// File type
    pub fn kind(&self) -> FileType {
        FileType::from_type_flags(self.type_flags)
    }

    /// File was closed properly
    pub fn closed(&self) -> bool {
        self.type_flags & TYPE_FLAG_CLOSED != 0
    }

    /// File was left open ("splat" file, shown with `*`)
    pub fn splat(&self) -> bool {
        !self.closed()
    }

    /// File is locked against scratching (shown with `<`)
    pub fn locked(&self) -> bool {
        self.type_flags & TYPE_FLAG_LOCKED != 0
    }

    /// Save-with-replace in progress (shown with `@`)
    pub fn save_with_replace(&self) -> bool {
        self.type_flags & TYPE_FLAG_SAVE_WITH_REPLACE != 0
    }

    /// Entry counts towards the live directory
    pub fn is_live(&self) -> bool {
        self.size > 0
    }

    /// The three bytes shared by REL and GEOS metadata, uninterpreted
    pub fn extra(&self) -> [u8; 3] {
        self.extra
    }

    /// First REL side sector, for REL files
    pub fn rel_side_sector(&self) -> Option<SectorRef> {
        (self.kind() == FileType::Rel).then(|| SectorRef::new(self.extra[0], self.extra[1]))
    }

    /// REL record length, for REL files
    pub fn rel_record_length(&self) -> Option<u8> {
        (self.kind() == FileType::Rel).then_some(self.extra[2])
    }

    /// Check for GEOS metadata
    pub fn is_geos(&self) -> bool {
        self.geos_file_type != 0
    }

    /// GEOS info block, for GEOS files
    pub fn geos_info_block(&self) -> Option<SectorRef> {
        self.is_geos()
            .then(|| SectorRef::new(self.extra[0], self.extra[1]))
    }

    /// GEOS file structure (0 sequential, 1 VLIR), for GEOS files
    pub fn geos_structure(&self) -> Option<u8> {
        self.is_geos().then_some(self.extra[2])
    }

    /// Upper bound of the file size in bytes
    pub fn approx_size_bytes(&self) -> usize {
        self.size as usize * SECTOR_PAYLOAD_SIZE
    }
}

impl FileEntry for DirectoryEntry {
    fn raw_name(&self) -> &[u8] {
        &self.raw_name
    }

    fn name(&self) -> &[u8] {
        trim_padding(&self.raw_name, &[PADDING_BYTE])
    }

    fn file_type(&self) -> FileType {
        self.kind()
    }

    fn blocks(&self) -> u16 {
        self.size
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted = format!("\"{}\"", to_display_string(self.name()));
        write!(
            f,
            "{:<5}{:<18} {}{}{}",
            self.size,
            quoted,
            if self.splat() { "*" } else { " " },
            self.kind(),
            if self.locked() { "<" } else { "" }
        )
    }
}

/// One directory sector and the entries it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySector {
    /// Where this sector lives
    pub location: SectorRef,
    /// Link to the next directory sector, track 0 when last
    pub next: SectorRef,
    /// The eight entries, empty slots included
    pub entries: Vec<DirectoryEntry>,
}

impl DirectorySector {
    /// Decode a directory sector; entries are numbered from `first_index`
    pub fn parse(data: &[u8], location: SectorRef, first_index: usize) -> Self {
        let entries = data
            .chunks_exact(DIR_ENTRY_SIZE)
            .take(DIR_ENTRIES_PER_SECTOR)
            .enumerate()
            .map(|(i, record)| DirectoryEntry::parse(record, first_index + i))
            .collect();

        Self {
            location,
            next: SectorRef::from_link(&data[entry::NEXT_LINK..]),
            entries,
        }
    }
}
