//! Game file system backends.
//!
//! Game code addresses files by `/`-separated, game-root-relative paths
//! (`assets/units/size_xl/ship_par_xl_carrier_01.xml`). Two backends answer
//! those paths: [`ArchiveFs`] reads the shipped catalog archives directly,
//! [`DirFs`] reads a tree that was extracted to disk beforehand.

mod archive_fs;
mod dir_fs;

use std::io::{Read, Seek};

use crate::error::Result;

pub use archive_fs::ArchiveFs;
pub use dir_fs::DirFs;

/// Byte stream returned by [`GameFs::open`].
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Entry returned by [`GameFs::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full game path of the file.
    pub path: String,
    /// File name only.
    pub name: String,
}

/// A queryable game file namespace.
///
/// Methods take `&mut self` because the archive backend materializes its
/// directory tree lazily while answering queries. Everything is
/// single-threaded, blocking I/O.
pub trait GameFs {
    /// Open a game file as a readable byte stream.
    ///
    /// # Errors
    /// Returns an error if the path cannot be resolved to a file.
    fn open(&mut self, path: &str) -> Result<Box<dyn ReadSeek>>;

    /// Whether the path resolves to a file.
    fn exists(&mut self, path: &str) -> bool;

    /// List the files directly under a game directory.
    ///
    /// # Errors
    /// Returns an error if the path does not resolve to a directory.
    fn list(&mut self, path: &str) -> Result<Vec<FileEntry>>;

    /// Names of the extensions known to this file system.
    fn extensions(&self) -> Vec<String>;
}

impl<T: GameFs + ?Sized> GameFs for Box<T> {
    fn open(&mut self, path: &str) -> Result<Box<dyn ReadSeek>> {
        (**self).open(path)
    }

    fn exists(&mut self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn list(&mut self, path: &str) -> Result<Vec<FileEntry>> {
        (**self).list(path)
    }

    fn extensions(&self) -> Vec<String> {
        (**self).extensions()
    }
}

/// Split a game path into its components, discarding the empty parts caused
/// by doubled slashes.
#[must_use]
pub fn split_game_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
