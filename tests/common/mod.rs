//! Synthetic image fixtures shared by the integration tests

#![allow(dead_code)]

use cbmdisk::{Geometry, SectorRef};

/// A directory slot to lay out on a fixture disk
#[derive(Debug, Clone)]
pub struct FixtureEntry {
    pub name: Vec<u8>,
    pub type_flags: u8,
    pub start: (u8, u8),
    pub blocks: u16,
}

impl FixtureEntry {
    /// A closed PRG file
    pub fn prg(name: &str, start: (u8, u8), blocks: u16) -> Self {
        Self {
            name: name.as_bytes().to_vec(),
            type_flags: 0x82,
            start,
            blocks,
        }
    }

    /// An unused slot
    pub fn empty() -> Self {
        Self {
            name: Vec::new(),
            type_flags: 0,
            start: (0, 0),
            blocks: 0,
        }
    }
}

/// Builds disk images sector by sector
pub struct DiskBuilder {
    geometry: Geometry,
    data: Vec<u8>,
}

impl DiskBuilder {
    pub fn new(geometry: Geometry) -> Self {
        let data = vec![0u8; geometry.data_size()];
        Self { geometry, data }
    }

    pub fn d64() -> Self {
        Self::new(Geometry::d64())
    }

    pub fn d81() -> Self {
        Self::new(Geometry::d81())
    }

    pub fn offset(&self, track: u8, sector: u8) -> usize {
        self.geometry
            .byte_offset(SectorRef::new(track, sector))
            .expect("fixture sector outside geometry")
    }

    /// Overwrite the start of a sector
    pub fn write(&mut self, track: u8, sector: u8, bytes: &[u8]) -> &mut Self {
        let offset = self.offset(track, sector);
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    /// Write the directory header with a padded name and id
    pub fn header(&mut self, name: &str, id: &str) -> &mut Self {
        let layout = self.geometry.header_layout;
        let entries = self.geometry.directory_entries;
        let offset = self.offset(
            self.geometry.directory_header.track,
            self.geometry.directory_header.sector,
        );
        let sector = &mut self.data[offset..offset + 256];
        sector[0] = entries.track;
        sector[1] = entries.sector;
        sector[layout.format_tag] = b'A';
        sector[layout.disk_name..layout.disk_name + 16].fill(0xA0);
        sector[layout.disk_name..layout.disk_name + name.len()].copy_from_slice(name.as_bytes());
        sector[layout.disk_id..layout.disk_id + 2].copy_from_slice(&id.as_bytes()[..2]);
        sector[layout.dos_version..layout.dos_version + 2].copy_from_slice(b"2A");
        self
    }

    /// Lay out directory slots over consecutive sectors of the directory track
    pub fn directory(&mut self, entries: &[FixtureEntry]) -> &mut Self {
        let first = self.geometry.directory_entries;
        let sector_count = entries.len().div_ceil(8).max(1);

        for n in 0..sector_count {
            let sector = first.sector + n as u8;
            let offset = self.offset(first.track, sector);
            if n + 1 < sector_count {
                self.data[offset] = first.track;
                self.data[offset + 1] = sector + 1;
            } else {
                self.data[offset] = 0;
                self.data[offset + 1] = 0xFF;
            }

            for (slot, entry) in entries.iter().skip(n * 8).take(8).enumerate() {
                let rec = offset + slot * 32;
                self.data[rec + 2] = entry.type_flags;
                self.data[rec + 3] = entry.start.0;
                self.data[rec + 4] = entry.start.1;
                self.data[rec + 5..rec + 21].fill(0xA0);
                self.data[rec + 5..rec + 5 + entry.name.len()].copy_from_slice(&entry.name);
                self.data[rec + 30..rec + 32].copy_from_slice(&entry.blocks.to_le_bytes());
            }
        }
        self
    }

    /// Store file bytes in consecutive sectors of one track
    pub fn file(&mut self, track: u8, first_sector: u8, contents: &[u8]) -> &mut Self {
        let chunks: Vec<&[u8]> = contents.chunks(254).collect();
        for (i, chunk) in chunks.iter().enumerate() {
            let sector = first_sector + i as u8;
            let offset = self.offset(track, sector);
            if i + 1 < chunks.len() {
                self.data[offset] = track;
                self.data[offset + 1] = sector + 1;
            } else {
                self.data[offset] = 0;
                self.data[offset + 1] = chunk.len() as u8;
            }
            self.data[offset + 2..offset + 2 + chunk.len()].copy_from_slice(chunk);
        }
        self
    }

    /// Point a sector's link somewhere else
    pub fn link(&mut self, track: u8, sector: u8, next: (u8, u8)) -> &mut Self {
        let offset = self.offset(track, sector);
        self.data[offset] = next.0;
        self.data[offset + 1] = next.1;
        self
    }

    /// Append one error byte per sector, all "no error"
    pub fn with_error_info(&mut self) -> &mut Self {
        let sectors = self.geometry.total_sectors();
        self.data.extend(std::iter::repeat(1u8).take(sectors));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.data.clone()
    }
}

/// Contents of fixture file `i`
pub fn file_contents(i: usize) -> Vec<u8> {
    let mut data = vec![0x01, 0x08];
    data.extend(std::iter::repeat(i as u8).take(10 + i));
    data
}

/// Where fixture file `i` lives on a 1541 disk
pub fn file_start(i: usize) -> (u8, u8) {
    (2 + (i / 20) as u8, (i % 20) as u8)
}

/// 1541 disk "DISK SERVICE": 7 directory sectors, 50 live files and 6 empty slots
///
/// File 0 is "LOADER"; the others are "FILE 01" to "FILE 49".
pub fn disk_service() -> Vec<u8> {
    let mut builder = DiskBuilder::d64();
    builder.header("DISK SERVICE", "DS");

    let mut entries = Vec::new();
    for i in 0..50 {
        let name = if i == 0 {
            "LOADER".to_string()
        } else {
            format!("FILE {:02}", i)
        };
        let start = file_start(i);
        entries.push(FixtureEntry::prg(&name, start, 1));
        builder.file(start.0, start.1, &file_contents(i));
    }
    entries.extend(std::iter::repeat(FixtureEntry::empty()).take(6));
    builder.directory(&entries);
    builder.build()
}

/// 1541 disk with a C128 boot sector at track 1, sector 0
pub fn boot_disk() -> Vec<u8> {
    let mut builder = DiskBuilder::d64();
    builder.header("BOOTABLE", "BT");
    builder.directory(&[FixtureEntry::prg("AUTOSTART", (2, 0), 1)]);
    builder.file(2, 0, &file_contents(0));

    let mut boot = b"CBM".to_vec();
    boot.extend_from_slice(&[0x00, 0x1C, 0x00, 0x00]);
    boot.extend_from_slice(b"BOOT DISK\0AUTOSTART\0");
    boot.extend_from_slice(&[0xA9, 0x00, 0x60]);
    builder.write(1, 0, &boot);
    builder.build()
}

/// 1581 disk with 145 live files in 19 directory sectors from 40/3
pub fn d81_disk() -> Vec<u8> {
    let mut builder = DiskBuilder::d81();
    builder.header("BIG DIRECTORY", "81");

    let mut entries = Vec::new();
    for i in 0..145 {
        let start = (1 + (i / 40) as u8, (i % 40) as u8);
        entries.push(FixtureEntry::prg(&format!("ENTRY {:03}", i), start, 1));
        builder.file(start.0, start.1, &file_contents(i % 100));
    }
    builder.directory(&entries);
    builder.build()
}

/// 1541 disk whose only file loops back to its first sector
pub fn circular_disk() -> Vec<u8> {
    let mut builder = DiskBuilder::d64();
    builder.header("LOOP", "LP");
    builder.directory(&[FixtureEntry::prg("LOOPY", (3, 0), 3)]);
    builder.file(3, 0, &vec![0x55; 254 * 3]);
    builder.link(3, 2, (3, 0));
    builder.build()
}

/// T64 tape with the given files, each loaded at $0801
pub fn tape(label: &str, files: &[(&str, Vec<u8>)], slots: u16) -> Vec<u8> {
    let mut data = vec![0u8; 0x40 + slots as usize * 32];
    let signature = b"C64 tape image file";
    data[..signature.len()].copy_from_slice(signature);
    data[0x20..0x22].copy_from_slice(&0x0101u16.to_le_bytes());
    data[0x22..0x24].copy_from_slice(&slots.to_le_bytes());
    data[0x24..0x26].copy_from_slice(&(files.len() as u16).to_le_bytes());
    data[0x28..0x40].fill(b' ');
    data[0x28..0x28 + label.len()].copy_from_slice(label.as_bytes());

    for (i, (name, contents)) in files.iter().enumerate() {
        let offset = data.len() as u32;
        let rec = 0x40 + i * 32;
        data[rec] = 1;
        data[rec + 1] = 0x82;
        data[rec + 2..rec + 4].copy_from_slice(&0x0801u16.to_le_bytes());
        data[rec + 4..rec + 6].copy_from_slice(&(0x0801 + contents.len() as u16).to_le_bytes());
        data[rec + 8..rec + 12].copy_from_slice(&offset.to_le_bytes());
        data[rec + 16..rec + 32].fill(b' ');
        data[rec + 16..rec + 16 + name.len()].copy_from_slice(name.as_bytes());
        data.extend_from_slice(contents);
    }
    data
}
