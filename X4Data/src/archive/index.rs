//! Archive index (`.idx`) parsing.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::vfs::split_game_path;

use super::types::ArchiveEntry;

/// One parsed index line: the directory the entry lives in plus the entry
/// itself.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    /// Game directory segments leading to the file (may be empty).
    pub directory: Vec<String>,
    /// The entry, with its byte window into the paired `.dat` file.
    pub entry: ArchiveEntry,
}

/// Read and parse an index file from disk.
///
/// # Errors
/// Returns an error if the file cannot be read or any line is malformed; a
/// malformed line rejects the whole file so an index is never half-loaded.
pub fn parse_index_file(idx_path: &Path, dat_path: &Path) -> Result<Vec<IndexedEntry>> {
    let text = fs::read_to_string(idx_path)?;
    parse_index(&text, idx_path, dat_path)
}

/// Parse index text into entries referencing `dat_path`.
///
/// Each line is `<path> <size> <timestamp> <hash>`. The path itself may
/// contain spaces, so the line is split from the right. Byte offsets start at
/// zero and accumulate by entry size, which is how the paired `.dat` file is
/// laid out.
///
/// # Errors
/// Returns [`Error::MalformedIndex`] on the first line that does not split
/// into four fields or whose size is not a number; nothing parsed so far is
/// returned.
pub fn parse_index(text: &str, idx_path: &Path, dat_path: &Path) -> Result<Vec<IndexedEntry>> {
    let mut offset = 0u64;
    let mut entries = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        if raw.is_empty() {
            continue;
        }

        let line = raw.to_lowercase();

        let mut fields = line.rsplitn(4, ' ');
        let (Some(_hash), Some(_timestamp), Some(size), Some(game_path)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(Error::MalformedIndex {
                path: idx_path.to_path_buf(),
                line: line_no + 1,
            });
        };

        let size: u64 = size.parse().map_err(|_| Error::MalformedIndex {
            path: idx_path.to_path_buf(),
            line: line_no + 1,
        })?;

        // The offset advances even for entries that end up discarded below,
        // otherwise every following entry would point at the wrong bytes.
        let entry_offset = offset;
        offset += size;

        let mut segments = split_game_path(game_path);
        let Some(name) = segments.pop() else {
            tracing::error!(
                index = %idx_path.display(),
                line = line_no + 1,
                "archive index entry has an empty game path"
            );
            continue;
        };

        entries.push(IndexedEntry {
            directory: segments,
            entry: ArchiveEntry {
                dat_path: dat_path.to_path_buf(),
                name,
                size,
                offset: entry_offset,
            },
        });
    }

    Ok(entries)
}
