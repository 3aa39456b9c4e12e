/*!
# cbmdisk

A Rust library for reading Commodore disk and tape images.

## Features

- Read D64 (1541, 35 or 40 tracks), D81 (1581) and T64 images
- Open bare PRG files as one-entry containers
- Optional per-sector error bytes on disk images
- Sector chain traversal with circular and out-of-range link detection
- Directory decoding with file types, REL and GEOS metadata
- C128 boot sector decoding
- One container interface for disks, tapes and program files

## Quick Start

```rust,no_run
use cbmdisk::{open_image, CbmImage, FileContainer, FileEntry};

// Open an image; the format comes from the extension or the contents
let image = open_image("games.d64")?;
println!("{} ({})", cbmdisk::petscii::to_display_string(image.label()), image.image_type());

// List live entries
for entry in image.listing() {
    println!("{:>4} {} {}", entry.blocks, cbmdisk::petscii::to_display_string(&entry.name), entry.file_type);
}

// Read a file by index or by name
let first = image.file(0)?;
let loader = image.find(b"LOADER", false)?;

// Disk-only details
if let CbmImage::Disk(disk) = &image {
    let bam = disk.sector(18, 0)?;
    println!("{} files, boot sector: {}", disk.entries().len(), disk.has_boot_sector());
}
# Ok::<(), cbmdisk::CbmError>(())
```

## Modules

- `format`: image formats, constants and disk geometry
- `image`: sector-addressable disk images and sector chains
- `filesystem`: CBM-DOS disks, T64 tapes, PRG files and the shared container interface
- `boot`: C128 boot sector decoding
- `petscii`: PETSCII display conversion
- `map`: sector usage map
- `io`: reading image files from the host filesystem
- `error`: Error types and Result alias
*/

#![warn(missing_docs)]

/// C128 boot sector decoding
pub mod boot;
/// Error types and Result alias
pub mod error;
/// File containers: CBM-DOS disks, T64 tapes and program files
pub mod filesystem;
/// CBM image formats, constants and geometry
pub mod format;
/// Sector-addressable disk images
pub mod image;
/// I/O operations for reading image files
pub mod io;
/// Sector map visualization
pub mod map;
/// PETSCII display conversion
pub mod petscii;

// Re-export common types
pub use boot::BootSector;
pub use error::{CbmError, Result};
pub use filesystem::{
    CbmImage, DirectoryEntry, DirectoryHeader, DirectorySector, DosDisk, FileContainer,
    FileEntry, FileType, ListingEntry, PrgContainer, PrgEntry, TapeEntry, TapeImage,
};
pub use format::{
    detect_disk_format, detect_format, format_from_extension, Geometry, HeaderLayout,
    ImageFormat,
};
pub use image::{ChainLink, DiskImage, SectorChain, SectorRef};
pub use io::{is_cbm_file, open_image, read_image};
pub use map::{SectorMap, SectorUsage};
