//! Plain-directory file system backend.

use std::fs::File;
use std::path::PathBuf;

use crate::error::{Error, Result};

use super::{split_game_path, FileEntry, GameFs, ReadSeek};

/// File system over a game tree previously extracted to disk with a catalog
/// tool. The extracted folder hierarchy must be intact; game paths are
/// resolved by joining them onto the root, with the case sensitivity of the
/// host file system.
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    /// Create a file system rooted at the extracted game files.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(split_game_path(path).join("/"))
    }
}

impl GameFs for DirFs {
    fn open(&mut self, path: &str) -> Result<Box<dyn ReadSeek>> {
        Ok(Box::new(File::open(self.resolve(path))?))
    }

    fn exists(&mut self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn list(&mut self, path: &str) -> Result<Vec<FileEntry>> {
        let dir = self.resolve(path);
        if !dir.is_dir() {
            return Err(Error::NotADirectory(path.to_string()));
        }

        let game_dir = split_game_path(path).join("/");
        let mut out = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let name = entry.file_name().to_string_lossy().into_owned();
                let full = if game_dir.is_empty() {
                    name.clone()
                } else {
                    format!("{game_dir}/{name}")
                };
                out.push(FileEntry { path: full, name });
            }
        }

        Ok(out)
    }

    fn extensions(&self) -> Vec<String> {
        // an extracted tree carries no overlay metadata
        Vec::new()
    }
}
