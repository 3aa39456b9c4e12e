/// T64 tape container
///
/// Layout:
/// - 0x00: 32-byte signature, starting "C64"
/// - 0x20: version (2), max entries (2), used entries (2), unused (2),
///   tape name (24, space padded)
/// - 0x40: directory of 32-byte entries, `max entries` long
///
/// Each entry: C64S type (1), CBM-DOS type (1), start address (2),
/// end address (2), unused (2), absolute data offset (4), unused (4),
/// name (16, space padded). File data is stored without its load address.

use log::{debug, warn};

use crate::error::{CbmError, Result};
use crate::filesystem::{trim_padding, FileContainer, FileEntry, FileType};
use crate::format::{
    NAME_LENGTH, PADDING_BYTE, SECTOR_PAYLOAD_SIZE, T64_DIR_OFFSET, T64_ENTRY_SIZE,
    T64_HEADER_OFFSET, T64_LABEL_LENGTH, T64_MAGIC,
};

const TAPE_PADDING: &[u8] = &[b' ', PADDING_BYTE];

/// A single T64 directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeEntry {
    /// Position in the raw directory
    pub index: usize,
    /// C64S entry type, 0 for a free slot
    pub c64s_type: u8,
    /// CBM-DOS file type flags
    pub type_flags: u8,
    /// Load address
    pub start_address: u16,
    /// End address (exclusive)
    pub end_address: u16,
    /// Absolute offset of the data within the tape image
    pub offset: u32,
    raw_name: [u8; NAME_LENGTH],
}

impl TapeEntry {
    /// Decode an entry from a 32-byte record
    pub fn parse(data: &[u8], index: usize) -> Self {
        let mut raw_name = [0u8; NAME_LENGTH];
        raw_name.copy_from_slice(&data[16..32]);

        Self {
            index,
            c64s_type: data[0],
            type_flags: data[1],
            start_address: u16::from_le_bytes([data[2], data[3]]),
            end_address: u16::from_le_bytes([data[4], data[5]]),
            offset: u32::from_le_bytes([data[8], data[9], data[10], data[11]]),
            raw_name,
        }
    }

    /// Slot holds a file with data
    pub fn is_live(&self) -> bool {
        self.c64s_type != 0 && !self.is_empty()
    }

    /// Declared data length in bytes
    pub fn len(&self) -> usize {
        self.end_address.saturating_sub(self.start_address) as usize
    }

    /// Declared data length is zero
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileEntry for TapeEntry {
    fn raw_name(&self) -> &[u8] {
        &self.raw_name
    }

    fn name(&self) -> &[u8] {
        trim_padding(&self.raw_name, TAPE_PADDING)
    }

    fn file_type(&self) -> FileType {
        FileType::from_type_flags(self.type_flags)
    }

    fn blocks(&self) -> u16 {
        // Load address counts towards the size on disk
        let bytes = self.len() + 2;
        bytes.div_ceil(SECTOR_PAYLOAD_SIZE) as u16
    }
}

/// A T64 tape image
#[derive(Debug, Clone)]
pub struct TapeImage {
    data: Vec<u8>,
    /// Tape format version
    pub version: u16,
    /// Directory slots declared by the header
    pub max_entries: u16,
    /// Used slots declared by the header (informational)
    pub used_entries: u16,
    raw_label: [u8; T64_LABEL_LENGTH],
    raw_entries: Vec<TapeEntry>,
    entries: Vec<TapeEntry>,
}

impl TapeImage {
    /// Decode a tape image
    ///
    /// Fails with a format error unless the buffer starts with "C64" and
    /// holds a complete header.
    pub fn new(data: Vec<u8>) -> Result<Self> {
        if !data.starts_with(T64_MAGIC) {
            return Err(CbmError::format("Invalid tape file: missing C64 signature"));
        }
        if data.len() < T64_DIR_OFFSET {
            return Err(CbmError::format(format!(
                "Invalid tape file: {} bytes is shorter than the header",
                data.len()
            )));
        }

        let header = &data[T64_HEADER_OFFSET..T64_DIR_OFFSET];
        let version = u16::from_le_bytes([header[0], header[1]]);
        let max_entries = u16::from_le_bytes([header[2], header[3]]);
        let used_entries = u16::from_le_bytes([header[4], header[5]]);
        let mut raw_label = [0u8; T64_LABEL_LENGTH];
        raw_label.copy_from_slice(&header[8..8 + T64_LABEL_LENGTH]);

        let raw_entries: Vec<TapeEntry> = data[T64_DIR_OFFSET..]
            .chunks_exact(T64_ENTRY_SIZE)
            .take(max_entries as usize)
            .enumerate()
            .map(|(i, record)| TapeEntry::parse(record, i))
            .collect();
        if raw_entries.len() < max_entries as usize {
            warn!(
                "tape declares {} directory entries but only {} fit",
                max_entries,
                raw_entries.len()
            );
        }
        let entries: Vec<TapeEntry> = raw_entries.iter().filter(|e| e.is_live()).cloned().collect();

        debug!(
            "T64 version {:#06x}: {} slots, {} live entries",
            version,
            raw_entries.len(),
            entries.len()
        );

        Ok(Self {
            data,
            version,
            max_entries,
            used_entries,
            raw_label,
            raw_entries,
            entries,
        })
    }

    /// Tape name including padding
    pub fn raw_label(&self) -> &[u8] {
        &self.raw_label
    }

    /// Every directory slot, free ones included
    pub fn raw_entries(&self) -> &[TapeEntry] {
        &self.raw_entries
    }

    /// Get the full tape bytes
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

impl FileContainer for TapeImage {
    type Entry = TapeEntry;

    fn label(&self) -> &[u8] {
        trim_padding(&self.raw_label, TAPE_PADDING)
    }

    fn entries(&self) -> &[TapeEntry] {
        &self.entries
    }

    /// Data runs for `end - start` bytes from the entry offset, cut short at
    /// the end of the tape.
    fn read_entry(&self, entry: &TapeEntry) -> Result<Vec<u8>> {
        let start = entry.offset as usize;
        if start > self.data.len() {
            return Err(CbmError::format(format!(
                "Tape entry {} starts at {} beyond the end of the tape ({} bytes)",
                entry.index,
                start,
                self.data.len()
            )));
        }

        let end = start.saturating_add(entry.len());
        if end > self.data.len() {
            warn!(
                "tape entry {} runs {} bytes past the end of the tape",
                entry.index,
                end - self.data.len()
            );
        }
        Ok(self.data[start..end.min(self.data.len())].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tape(files: &[(&str, Vec<u8>)], slots: u16) -> Vec<u8> {
        let mut data = vec![0u8; T64_DIR_OFFSET + slots as usize * T64_ENTRY_SIZE];
        data[..32].copy_from_slice(b"C64 tape image file\0\0\0\0\0\0\0\0\0\0\0\0\0");
        data[0x20..0x22].copy_from_slice(&0x0101u16.to_le_bytes());
        data[0x22..0x24].copy_from_slice(&slots.to_le_bytes());
        data[0x24..0x26].copy_from_slice(&(files.len() as u16).to_le_bytes());
        data[0x28..0x40].fill(b' ');
        data[0x28..0x2E].copy_from_slice(b"MYTAPE");

        for (i, (name, payload)) in files.iter().enumerate() {
            let offset = data.len() as u32;
            let rec = T64_DIR_OFFSET + i * T64_ENTRY_SIZE;
            data[rec] = 1;
            data[rec + 1] = 0x82;
            data[rec + 2..rec + 4].copy_from_slice(&0x0801u16.to_le_bytes());
            let end = 0x0801 + payload.len() as u16;
            data[rec + 4..rec + 6].copy_from_slice(&end.to_le_bytes());
            data[rec + 8..rec + 12].copy_from_slice(&offset.to_le_bytes());
            data[rec + 16..rec + 32].fill(b' ');
            data[rec + 16..rec + 16 + name.len()].copy_from_slice(name.as_bytes());
            data.extend_from_slice(payload);
        }
        data
    }

    #[test]
    fn test_missing_signature() {
        let result = TapeImage::new(vec![0u8; 128]);
        assert!(matches!(result, Err(CbmError::Format(_))));
    }

    #[test]
    fn test_truncated_header() {
        let result = TapeImage::new(b"C64 tape".to_vec());
        assert!(matches!(result, Err(CbmError::Format(_))));
    }

    #[test]
    fn test_directory() {
        let tape = TapeImage::new(tape(&[("PARADROID", vec![1, 2, 3])], 4)).unwrap();
        assert_eq!(tape.version, 0x0101);
        assert_eq!(tape.max_entries, 4);
        assert_eq!(tape.used_entries, 1);
        assert_eq!(tape.label(), b"MYTAPE");
        assert_eq!(tape.raw_entries().len(), 4);
        assert_eq!(tape.entries().len(), 1);

        let entry = &tape.entries()[0];
        assert_eq!(entry.name(), b"PARADROID");
        assert_eq!(entry.file_type(), FileType::Prg);
        assert_eq!(entry.start_address, 0x0801);
        assert_eq!(entry.len(), 3);
        assert_eq!(entry.blocks(), 1);
    }

    #[test]
    fn test_read_files() {
        let tape = TapeImage::new(tape(&[("ONE", vec![1, 2, 3]), ("TWO", vec![4, 5])], 2)).unwrap();
        assert_eq!(tape.file(0).unwrap(), vec![1, 2, 3]);
        assert_eq!(tape.file(1).unwrap(), vec![4, 5]);
        assert_eq!(tape.find(b"TWO", false).unwrap(), vec![4, 5]);
        assert_eq!(tape.find(b"two", true).unwrap(), vec![4, 5]);
        assert!(matches!(
            tape.find(b"two", false),
            Err(CbmError::FileNotFound(_))
        ));
        assert!(matches!(
            tape.file(2),
            Err(CbmError::IndexOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_data_clamped_to_tape() {
        let mut data = tape(&[("LONG", vec![9, 9, 9, 9])], 1);
        data.truncate(data.len() - 2);
        let tape = TapeImage::new(data).unwrap();
        assert_eq!(tape.file(0).unwrap(), vec![9, 9]);
    }

    #[test]
    fn test_offset_past_end() {
        let mut data = tape(&[("BAD", vec![1])], 1);
        let rec = T64_DIR_OFFSET;
        data[rec + 8..rec + 12].copy_from_slice(&0x10000u32.to_le_bytes());
        let tape = TapeImage::new(data).unwrap();
        assert!(matches!(tape.file(0), Err(CbmError::Format(_))));
    }

    #[test]
    fn test_zero_length_slot_not_live() {
        let tape = TapeImage::new(tape(&[("REAL", vec![1, 2, 3]), ("EMPTY", vec![])], 2)).unwrap();
        assert_eq!(tape.raw_entries().len(), 2);
        assert_eq!(tape.entries().len(), 1);
        assert_eq!(tape.entries()[0].name(), b"REAL");
        assert!(matches!(
            tape.find(b"EMPTY", false),
            Err(CbmError::FileNotFound(_))
        ));
        assert!(matches!(
            tape.file(1),
            Err(CbmError::IndexOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_directory_bounded_by_buffer() {
        let mut data = tape(&[], 1);
        data[0x22..0x24].copy_from_slice(&500u16.to_le_bytes());
        let tape = TapeImage::new(data).unwrap();
        assert_eq!(tape.raw_entries().len(), 1);
        assert!(tape.entries().is_empty());
    }
}
