/// Bare program files
///
/// A `.prg` file has no container of its own: it is the two-byte load
/// address followed by the program. Wrapping it as a container of one entry,
/// named after the host file, lets it be listed and read like a disk or tape.

use crate::error::Result;
use crate::filesystem::{FileContainer, FileEntry, FileType};
use crate::format::SECTOR_PAYLOAD_SIZE;

/// The single entry of a bare file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrgEntry {
    raw_name: Vec<u8>,
    len: usize,
}

impl PrgEntry {
    /// File length in bytes, load address included
    pub fn len(&self) -> usize {
        self.len
    }

    /// File holds no bytes at all
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl FileEntry for PrgEntry {
    fn raw_name(&self) -> &[u8] {
        &self.raw_name
    }

    fn name(&self) -> &[u8] {
        &self.raw_name
    }

    fn file_type(&self) -> FileType {
        FileType::Prg
    }

    fn blocks(&self) -> u16 {
        self.len.div_ceil(SECTOR_PAYLOAD_SIZE) as u16
    }
}

/// A bare file seen as a container holding only itself
#[derive(Debug, Clone)]
pub struct PrgContainer {
    data: Vec<u8>,
    entries: [PrgEntry; 1],
}

impl PrgContainer {
    /// Wrap file bytes; `name` becomes both the label and the entry name
    pub fn new(name: impl Into<Vec<u8>>, data: Vec<u8>) -> Self {
        let entry = PrgEntry {
            raw_name: name.into(),
            len: data.len(),
        };
        Self {
            data,
            entries: [entry],
        }
    }

    /// Load address from the first two bytes, if present
    pub fn load_address(&self) -> Option<u16> {
        match self.data.as_slice() {
            [lo, hi, ..] => Some(u16::from_le_bytes([*lo, *hi])),
            _ => None,
        }
    }

    /// Get the full file bytes
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

impl FileContainer for PrgContainer {
    type Entry = PrgEntry;

    fn label(&self) -> &[u8] {
        &self.entries[0].raw_name
    }

    fn entries(&self) -> &[PrgEntry] {
        &self.entries
    }

    fn read_entry(&self, _entry: &PrgEntry) -> Result<Vec<u8>> {
        Ok(self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CbmError;

    fn loader() -> PrgContainer {
        PrgContainer::new("LOADER", vec![0x01, 0x08, 0x0B, 0x08, 0x0A, 0x00])
    }

    #[test]
    fn test_single_entry() {
        let prg = loader();
        assert_eq!(prg.label(), b"LOADER");
        assert_eq!(prg.entries().len(), 1);
        assert_eq!(prg.entries()[0].name(), b"LOADER");
        assert_eq!(prg.entries()[0].file_type(), FileType::Prg);
        assert_eq!(prg.entries()[0].blocks(), 1);
        assert_eq!(prg.load_address(), Some(0x0801));
    }

    #[test]
    fn test_file_by_index() {
        let prg = loader();
        assert_eq!(prg.file(0).unwrap(), prg.bytes().to_vec());
        assert!(matches!(
            prg.file(1),
            Err(CbmError::IndexOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_find_by_label() {
        let prg = loader();
        assert_eq!(prg.find(b"LOADER", false).unwrap().len(), 6);
        assert_eq!(prg.find(b"loader", true).unwrap().len(), 6);
        assert!(matches!(
            prg.find(b"loader", false),
            Err(CbmError::FileNotFound(_))
        ));
        assert!(matches!(
            prg.find(b"OTHER", true),
            Err(CbmError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_short_file() {
        let prg = PrgContainer::new("TINY", vec![0x01]);
        assert_eq!(prg.load_address(), None);
        assert_eq!(prg.entries()[0].len(), 1);
    }
}
