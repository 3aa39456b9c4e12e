/// CBM image sizes, magic bytes and record layouts

/// Bytes in every CBM-DOS sector
pub const SECTOR_SIZE: usize = 256;

/// Bytes of payload after the 2-byte track/sector link
pub const SECTOR_PAYLOAD_SIZE: usize = SECTOR_SIZE - 2;

/// Size of a directory entry record
pub const DIR_ENTRY_SIZE: usize = 32;

/// Directory entries held by one directory sector
pub const DIR_ENTRIES_PER_SECTOR: usize = SECTOR_SIZE / DIR_ENTRY_SIZE;

/// Length of a padded directory or disk name
pub const NAME_LENGTH: usize = 16;

/// Padding byte ("shifted space") used in names
pub const PADDING_BYTE: u8 = 0xA0;

/// 35-track 1541 image
pub const D64_SIZE: usize = 174_848;

/// 35-track 1541 image with error info (683 bytes)
pub const D64_SIZE_WITH_ERRORS: usize = 175_531;

/// 40-track 1541 image
pub const D64_40_SIZE: usize = 196_608;

/// 40-track 1541 image with error info (768 bytes)
pub const D64_40_SIZE_WITH_ERRORS: usize = 197_376;

/// 1581 image
pub const D81_SIZE: usize = 819_200;

/// 1581 image with error info (3200 bytes)
pub const D81_SIZE_WITH_ERRORS: usize = 822_400;

/// Magic bytes opening a C128 boot sector
pub const BOOT_SECTOR_MAGIC: &[u8] = b"CBM";

/// C128 address the boot sector is loaded to
pub const BOOT_SECTOR_LOAD_ADDRESS: u16 = 0x0B00;

/// Magic bytes opening every T64 tape image
pub const T64_MAGIC: &[u8] = b"C64";

/// Offset of the T64 tape header
pub const T64_HEADER_OFFSET: usize = 0x20;

/// Offset of the first T64 directory entry
pub const T64_DIR_OFFSET: usize = 0x40;

/// Size of a T64 directory entry
pub const T64_ENTRY_SIZE: usize = 32;

/// Length of the T64 tape name
pub const T64_LABEL_LENGTH: usize = 24;

/// Offsets within a directory entry record
pub mod entry {
    /// Next directory sector link (first entry of a sector only)
    pub const NEXT_LINK: usize = 0x00;
    /// File type flags
    pub const TYPE_FLAGS: usize = 0x02;
    /// First data track
    pub const TRACK: usize = 0x03;
    /// First data sector
    pub const SECTOR: usize = 0x04;
    /// Padded file name
    pub const NAME: usize = 0x05;
    /// REL side-sector / GEOS info block triple
    pub const EXTRA: usize = 0x15;
    /// GEOS file type
    pub const GEOS_TYPE: usize = 0x18;
    /// GEOS timestamp (year, month, day, hour, minute)
    pub const TIMESTAMP: usize = 0x19;
    /// File size in sectors, little-endian
    pub const SIZE: usize = 0x1E;
}
