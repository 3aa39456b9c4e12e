/// File containers: CBM-DOS disks, T64 tapes and bare program files

pub mod directory;
pub mod dos;
pub mod prg;
pub mod tape;

pub use directory::{DirectoryEntry, DirectoryHeader, DirectorySector};
pub use dos::DosDisk;
pub use prg::{PrgContainer, PrgEntry};
pub use tape::{TapeEntry, TapeImage};

use std::fmt;

use log::debug;

use crate::error::{CbmError, Result};
use crate::format::{detect_disk_format, detect_format, ImageFormat};
use crate::image::DiskImage;
use crate::petscii::to_display_string;

/// CBM-DOS file type, taken from the low nibble of the type flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Deleted
    Del,
    /// Sequential
    Seq,
    /// Program
    Prg,
    /// User
    Usr,
    /// Relative
    Rel,
    /// 1581 partition
    Cbm,
    /// Any other value
    Unknown(u8),
}

impl FileType {
    /// Decode the file type from directory type flags
    pub fn from_type_flags(flags: u8) -> Self {
        match flags & 0x0F {
            0 => FileType::Del,
            1 => FileType::Seq,
            2 => FileType::Prg,
            3 => FileType::Usr,
            4 => FileType::Rel,
            5 => FileType::Cbm,
            other => FileType::Unknown(other),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Del => write!(f, "DEL"),
            FileType::Seq => write!(f, "SEQ"),
            FileType::Prg => write!(f, "PRG"),
            FileType::Usr => write!(f, "USR"),
            FileType::Rel => write!(f, "REL"),
            FileType::Cbm => write!(f, "CBM"),
            FileType::Unknown(code) => write!(f, "?{:X}", code),
        }
    }
}

/// A single entry of a file container
pub trait FileEntry {
    /// Name as stored in the container, padding included
    fn raw_name(&self) -> &[u8];

    /// Name with trailing padding removed
    fn name(&self) -> &[u8];

    /// File type
    fn file_type(&self) -> FileType;

    /// Size in 254-byte blocks, as shown in directory listings
    fn blocks(&self) -> u16;

    /// Name converted for display on the host
    fn display_name(&self) -> String {
        to_display_string(self.name())
    }
}

/// A container of named files (disk or tape)
pub trait FileContainer {
    /// Entry type held by this container
    type Entry: FileEntry;

    /// Container name (disk name or tape label) without padding
    fn label(&self) -> &[u8];

    /// Live entries in directory order
    fn entries(&self) -> &[Self::Entry];

    /// Read the bytes of a live entry
    fn read_entry(&self, entry: &Self::Entry) -> Result<Vec<u8>>;

    /// Read the bytes of the live entry at `index`
    fn file(&self, index: usize) -> Result<Vec<u8>> {
        let entries = self.entries();
        let entry = entries.get(index).ok_or(CbmError::IndexOutOfRange {
            index,
            count: entries.len(),
        })?;
        self.read_entry(entry)
    }

    /// Index of the first live entry whose name matches
    fn position(&self, name: &[u8], ignore_case: bool) -> Option<usize> {
        self.entries()
            .iter()
            .position(|e| names_match(e.name(), name, ignore_case))
    }

    /// Read the bytes of the first live entry named `name`
    ///
    /// Names compare byte for byte unless `ignore_case` is set, in which
    /// case letters compare without regard to case. Both the ASCII
    /// lower-case range and the PETSCII shifted range count as letters.
    fn find(&self, name: &[u8], ignore_case: bool) -> Result<Vec<u8>> {
        let index = self
            .position(name, ignore_case)
            .ok_or_else(|| CbmError::not_found(name))?;
        self.file(index)
    }
}

/// Compare two entry names
pub fn names_match(a: &[u8], b: &[u8], ignore_case: bool) -> bool {
    if ignore_case {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| fold_case(*x) == fold_case(*y))
    } else {
        a == b
    }
}

/// Map ASCII lower-case and PETSCII shifted letters onto $41-$5A
fn fold_case(byte: u8) -> u8 {
    match byte {
        b'a'..=b'z' => byte - 0x20,
        0xC1..=0xDA => byte - 0x80,
        _ => byte,
    }
}

/// Strip trailing bytes found in `padding`
pub(crate) fn trim_padding<'a>(name: &'a [u8], padding: &[u8]) -> &'a [u8] {
    let end = name
        .iter()
        .rposition(|b| !padding.contains(b))
        .map(|i| i + 1)
        .unwrap_or(0);
    &name[..end]
}

/// One line of a directory listing, independent of container kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Position among the live entries
    pub index: usize,
    /// Name without padding
    pub name: Vec<u8>,
    /// File type
    pub file_type: FileType,
    /// Size in blocks
    pub blocks: u16,
}

fn listing_of<C: FileContainer>(container: &C) -> Vec<ListingEntry> {
    container
        .entries()
        .iter()
        .enumerate()
        .map(|(index, e)| ListingEntry {
            index,
            name: e.name().to_vec(),
            file_type: e.file_type(),
            blocks: e.blocks(),
        })
        .collect()
}

/// A loaded CBM container chosen once when the image is opened
#[derive(Debug, Clone)]
pub enum CbmImage {
    /// Sector-chained CBM-DOS disk
    Disk(DosDisk),
    /// Flat-table tape
    Tape(TapeImage),
    /// Single program file
    Prg(PrgContainer),
}

impl CbmImage {
    /// Load an image, probing length then magic bytes
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let format = detect_format(&data).ok_or_else(|| {
            CbmError::format(format!("Unrecognised image ({} bytes)", data.len()))
        })?;
        Self::with_format(format, data)
    }

    /// Load an image as the given format
    ///
    /// For disks the 35/40 track variant is settled by the image length.
    /// A program file loaded this way has an empty label; use
    /// [`CbmImage::named_prg`] to give it one.
    pub fn with_format(format: ImageFormat, data: Vec<u8>) -> Result<Self> {
        debug!("loading {} bytes as {}", data.len(), format.name());
        match format {
            ImageFormat::T64 => return Ok(CbmImage::Tape(TapeImage::new(data)?)),
            ImageFormat::Prg => return Ok(Self::named_prg(Vec::new(), data)),
            _ => {}
        }

        let detected = detect_disk_format(data.len())
            .filter(|d| (*d == ImageFormat::D81) == (format == ImageFormat::D81))
            .ok_or_else(|| {
                CbmError::format(format!(
                    "{} bytes is not a valid {} image size",
                    data.len(),
                    format.name()
                ))
            })?;
        let geometry = detected
            .geometry()
            .ok_or_else(|| CbmError::format("Disk format without geometry"))?;
        Ok(CbmImage::Disk(DosDisk::new(DiskImage::new(geometry, data)?)?))
    }

    /// Wrap a program file whose only entry is called `name`
    pub fn named_prg(name: impl Into<Vec<u8>>, data: Vec<u8>) -> Self {
        CbmImage::Prg(PrgContainer::new(name, data))
    }

    /// Human-readable kind of image
    pub fn image_type(&self) -> &'static str {
        match self {
            CbmImage::Disk(disk) => disk.image_type(),
            CbmImage::Tape(_) => ImageFormat::T64.name(),
            CbmImage::Prg(_) => ImageFormat::Prg.name(),
        }
    }

    /// Disk name or tape label
    pub fn label(&self) -> &[u8] {
        match self {
            CbmImage::Disk(disk) => disk.label(),
            CbmImage::Tape(tape) => tape.label(),
            CbmImage::Prg(prg) => prg.label(),
        }
    }

    /// Live entries as listing lines
    pub fn listing(&self) -> Vec<ListingEntry> {
        match self {
            CbmImage::Disk(disk) => listing_of(disk),
            CbmImage::Tape(tape) => listing_of(tape),
            CbmImage::Prg(prg) => listing_of(prg),
        }
    }

    /// Number of live entries
    pub fn entry_count(&self) -> usize {
        match self {
            CbmImage::Disk(disk) => disk.entries().len(),
            CbmImage::Tape(tape) => tape.entries().len(),
            CbmImage::Prg(prg) => prg.entries().len(),
        }
    }

    /// Read the live entry at `index`
    pub fn file(&self, index: usize) -> Result<Vec<u8>> {
        match self {
            CbmImage::Disk(disk) => disk.file(index),
            CbmImage::Tape(tape) => tape.file(index),
            CbmImage::Prg(prg) => prg.file(index),
        }
    }

    /// Read the first live entry named `name`
    pub fn find(&self, name: &[u8], ignore_case: bool) -> Result<Vec<u8>> {
        match self {
            CbmImage::Disk(disk) => disk.find(name, ignore_case),
            CbmImage::Tape(tape) => tape.find(name, ignore_case),
            CbmImage::Prg(prg) => prg.find(name, ignore_case),
        }
    }

    /// Get the disk, if this is one
    pub fn as_disk(&self) -> Option<&DosDisk> {
        match self {
            CbmImage::Disk(disk) => Some(disk),
            _ => None,
        }
    }

    /// Get the tape, if this is one
    pub fn as_tape(&self) -> Option<&TapeImage> {
        match self {
            CbmImage::Tape(tape) => Some(tape),
            _ => None,
        }
    }

    /// Get the program file, if this is one
    pub fn as_prg(&self) -> Option<&PrgContainer> {
        match self {
            CbmImage::Prg(prg) => Some(prg),
            _ => None,
        }
    }
}
