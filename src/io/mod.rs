/// I/O operations for reading image files from the host filesystem

/// Reader implementation for D64, D81 and T64 files
pub mod reader;

pub use reader::{is_cbm_file, open_image, read_image};
