//! Types for catalog archive handling

use std::path::PathBuf;

/// Location of one logical game file inside a `.dat` blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path to the `.dat` file holding the bytes.
    pub dat_path: PathBuf,
    /// File name (last game-path segment, lowercased).
    pub name: String,
    /// Size of the file in bytes.
    pub size: u64,
    /// Offset of the first byte from the start of the `.dat` file.
    pub offset: u64,
}

/// An index/data file pair discovered on disk but not loaded yet.
#[derive(Debug, Clone)]
pub struct ArchivePair {
    /// Path to the `.idx` index file.
    pub idx_path: PathBuf,
    /// Path to the paired `.dat` data file.
    pub dat_path: PathBuf,
}
