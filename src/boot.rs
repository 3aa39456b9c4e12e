/// C128 boot sector decoding
///
/// A C128 checks track 1, sector 0 of a disk at power-on. When the sector
/// opens with "CBM" it is loaded to `$0B00` and interpreted:
///
/// - 3 bytes magic "CBM"
/// - 2 bytes load address for the referenced file (little-endian)
/// - 1 byte memory bank
/// - 1 byte disk block count
/// - zero-terminated disk name
/// - zero-terminated file name
/// - machine code, if any, up to the end of the sector

use std::fmt;

use crate::format::{BOOT_SECTOR_LOAD_ADDRESS, BOOT_SECTOR_MAGIC};
use crate::petscii::to_display_string;

/// Decoded C128 boot sector
///
/// Decoding never fails: a sector without the magic is represented with
/// `is_valid == false` and every other field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootSector {
    /// Sector opens with the boot magic
    pub is_valid: bool,
    /// Address the referenced file is loaded to
    pub load_address: u16,
    /// Memory bank for the referenced file
    pub bank: u8,
    /// Disk block count
    pub disk_block: u8,
    /// Disk name shown while booting (PETSCII)
    pub disk_name: Vec<u8>,
    /// File to load after booting (PETSCII)
    pub file_name: Vec<u8>,
    /// Offset of the embedded code from the start of the sector
    pub code_offset: usize,
    /// Embedded code bytes
    pub code: Vec<u8>,
}

impl BootSector {
    /// Decode a boot sector from raw sector bytes
    pub fn parse(data: &[u8]) -> Self {
        if !data.starts_with(BOOT_SECTOR_MAGIC) || data.len() < 7 {
            return Self::default();
        }

        let load_address = u16::from_le_bytes([data[3], data[4]]);
        let bank = data[5];
        let disk_block = data[6];

        let mut pos = 7;
        let disk_name = read_until_zero(data, &mut pos);
        let file_name = read_until_zero(data, &mut pos);
        let code_offset = pos.min(data.len());

        Self {
            is_valid: true,
            load_address,
            bank,
            disk_block,
            disk_name,
            file_name,
            code_offset,
            code: data[code_offset..].to_vec(),
        }
    }

    /// Check if the boot sector carries a program of its own
    pub fn has_code(&self) -> bool {
        matches!(self.code.first(), Some(&b) if b != 0)
    }

    /// Address the embedded code runs at
    pub fn code_address(&self) -> u16 {
        BOOT_SECTOR_LOAD_ADDRESS + self.code_offset as u16
    }
}

/// Read a zero-terminated string, leaving `pos` after the terminator
fn read_until_zero(data: &[u8], pos: &mut usize) -> Vec<u8> {
    let start = (*pos).min(data.len());
    let end = data[start..]
        .iter()
        .position(|&b| b == 0)
        .map(|i| start + i)
        .unwrap_or(data.len());
    *pos = end + 1;
    data[start..end].to_vec()
}

impl fmt::Display for BootSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Valid bootloader: {}", self.is_valid)?;
        if !self.is_valid {
            return Ok(());
        }

        let or_none = |name: &[u8]| {
            if name.is_empty() {
                "<None>".to_string()
            } else {
                to_display_string(name)
            }
        };
        write!(f, "\nDisk name: {}", or_none(&self.disk_name))?;
        write!(f, "\nFile name: {}", or_none(&self.file_name))?;
        if !self.file_name.is_empty() {
            write!(f, "\nFile load address: ${:04x}", self.load_address)?;
        }
        if self.has_code() {
            write!(f, "\nProbable ML address: ${:04x}", self.code_address())?;
        }
        Ok(())
    }
}
