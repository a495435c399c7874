//! Layered catalog archive file system.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::archive::{parse_index_file, ArchiveEntry, ArchivePair, ArchiveRegion};
use crate::error::{Error, Result};

use super::{split_game_path, FileEntry, GameFs, ReadSeek};

/// Reserved directory under which extension trees are mounted.
const EXTENSIONS_DIR: &str = "extensions";

/// A directory in the merged game tree.
#[derive(Default)]
struct DirNode {
    children: IndexMap<String, Node>,
}

/// A name resolves to exactly one of these; insertion never replaces an
/// existing child, so the first-registered (highest-priority) entry wins.
enum Node {
    Dir(DirNode),
    File(ArchiveEntry),
    Mount(ArchiveFs),
}

/// Outcome of a tree walk over fully-loaded state.
enum Found {
    File(ArchiveEntry),
    Dir,
    /// Walk hit a mounted extension; `next` is the index of the first path
    /// segment the mount itself has to resolve.
    Mount { next: usize },
    Missing,
}

/// File system over the game's numbered catalog archive pairs.
///
/// Pairs are discovered up front but parsed lazily: a lookup that misses in
/// the merged tree pops the next pair off the priority stack, merges its
/// entries and retries, until the lookup succeeds or no pairs remain. Since
/// the highest-numbered pair is loaded first and insertion never overwrites,
/// later archives override earlier ones at matching paths.
///
/// Extensions are self-contained [`ArchiveFs`] instances mounted under
/// `extensions/<name>`; their own `ext_NN` stacks are consulted before a
/// query ever escalates to the base tree.
pub struct ArchiveFs {
    root: PathBuf,
    tree: DirNode,
    /// Pairs not loaded yet, highest priority at the end (top of stack).
    pending: Vec<ArchivePair>,
    /// Index files already merged; guards against double registration.
    loaded: HashSet<PathBuf>,
}

impl ArchiveFs {
    /// Create an empty file system rooted at a directory holding archive
    /// pairs.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tree: DirNode::default(),
            pending: Vec::new(),
            loaded: HashSet::new(),
        }
    }

    /// Scan the root directory for `01.idx`/`01.dat`, `02.idx`/`02.dat`, ...
    /// and queue them for lazy loading. Scanning stops at the first missing
    /// pair. Returns the number of pairs found.
    pub fn load_from_game_root(&mut self) -> usize {
        let pairs = scan_pairs(&self.root, "");
        let found = pairs.len();
        self.queue_pairs(pairs);
        found
    }

    /// Scan for `ext_NN` pairs, the naming an extension tree uses.
    fn load_extension_pairs(&mut self) -> usize {
        let pairs = scan_pairs(&self.root, "ext_");
        let found = pairs.len();
        self.queue_pairs(pairs);
        found
    }

    /// Queue newly discovered pairs below anything already pending, keeping
    /// previously queued pairs at the top of the stack.
    fn queue_pairs(&mut self, mut pairs: Vec<ArchivePair>) {
        pairs.append(&mut self.pending);
        self.pending = pairs;
    }

    /// Mount an extension tree under `extensions/<name>`.
    ///
    /// Returns the number of `ext_NN` archive pairs found in `dir`.
    ///
    /// # Errors
    /// Returns [`Error::ExtensionAlreadyMounted`] if the name is taken.
    pub fn mount_extension(&mut self, name: &str, dir: impl AsRef<Path>) -> Result<usize> {
        let key = name.to_lowercase();

        let exts = match self
            .tree
            .children
            .entry(EXTENSIONS_DIR.to_string())
            .or_insert_with(|| Node::Dir(DirNode::default()))
        {
            Node::Dir(dir) => dir,
            _ => {
                return Err(Error::InvalidPath(format!(
                    "{EXTENSIONS_DIR} is not a directory in this game tree"
                )))
            }
        };

        if exts.children.contains_key(&key) {
            return Err(Error::ExtensionAlreadyMounted(key));
        }

        let mut ext = ArchiveFs::new(dir.as_ref());
        let found = ext.load_extension_pairs();
        tracing::info!(extension = %key, pairs = found, "mounted extension");
        exts.children.insert(key, Node::Mount(ext));
        Ok(found)
    }

    /// Discover and mount every subdirectory of `<root>/extensions`.
    ///
    /// Returns the mounted extension names.
    ///
    /// # Errors
    /// Returns an error if the extensions directory cannot be read or a name
    /// is mounted twice.
    pub fn mount_extensions(&mut self) -> Result<Vec<String>> {
        let exts_dir = self.root.join(EXTENSIONS_DIR);
        let mut mounted = Vec::new();

        if !exts_dir.is_dir() {
            return Ok(mounted);
        }

        for entry in std::fs::read_dir(exts_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let name = entry.file_name().to_string_lossy().into_owned();
                self.mount_extension(&name, entry.path())?;
                mounted.push(name.to_lowercase());
            }
        }

        Ok(mounted)
    }

    /// Number of archive pairs merged into the tree so far.
    #[must_use]
    pub fn loaded_archives(&self) -> usize {
        self.loaded.len()
    }

    /// Number of archive pairs still waiting on the lazy stack.
    #[must_use]
    pub fn pending_archives(&self) -> usize {
        self.pending.len()
    }

    /// Pop and merge the next pair off the stack. Skips pairs whose index was
    /// already merged and pairs whose index is malformed (the latter are
    /// logged and abandoned without touching the tree). Returns false once
    /// the stack is exhausted.
    fn load_next_pair(&mut self) -> bool {
        while let Some(pair) = self.pending.pop() {
            if self.loaded.contains(&pair.idx_path) {
                continue;
            }

            tracing::info!(index = %pair.idx_path.display(), "loading archive index");

            match parse_index_file(&pair.idx_path, &pair.dat_path) {
                Ok(entries) => {
                    for indexed in entries {
                        self.insert(indexed.directory, indexed.entry);
                    }
                    self.loaded.insert(pair.idx_path);
                    return true;
                }
                Err(err) => {
                    tracing::error!(
                        index = %pair.idx_path.display(),
                        error = %err,
                        "skipping unloadable archive index"
                    );
                }
            }
        }

        false
    }

    /// Insert an entry, creating directories as needed. Never overwrites: an
    /// existing child at any point along the path keeps the entry out.
    fn insert(&mut self, directory: Vec<String>, entry: ArchiveEntry) {
        let mut node = &mut self.tree;

        for part in directory {
            node = match node
                .children
                .entry(part)
                .or_insert_with(|| Node::Dir(DirNode::default()))
            {
                Node::Dir(dir) => dir,
                _ => {
                    tracing::warn!(
                        name = %entry.name,
                        "archive entry shadowed by an existing higher-priority file"
                    );
                    return;
                }
            };
        }

        if !node.children.contains_key(&entry.name) {
            node.children.insert(entry.name.clone(), Node::File(entry));
        }
    }

    /// Walk the tree without loading anything. `None` means a segment is
    /// missing and loading another pair might still resolve it.
    fn walk(&self, parts: &[String]) -> Option<Found> {
        let mut node = &self.tree;

        for (i, part) in parts.iter().enumerate() {
            match node.children.get(part) {
                None => return None,
                Some(Node::Dir(dir)) => node = dir,
                Some(Node::File(entry)) => {
                    // a file cannot contain children, and loading more
                    // archives can never change that
                    return Some(if i + 1 == parts.len() {
                        Found::File(entry.clone())
                    } else {
                        Found::Missing
                    });
                }
                Some(Node::Mount(_)) => return Some(Found::Mount { next: i + 1 }),
            }
        }

        Some(Found::Dir)
    }

    /// Resolve a path, pulling archive pairs off the stack until the walk
    /// succeeds or no pairs remain.
    fn resolve(&mut self, parts: &[String]) -> Found {
        loop {
            if let Some(found) = self.walk(parts) {
                return found;
            }
            if !self.load_next_pair() {
                return Found::Missing;
            }
        }
    }

    /// Get the mounted file system whose mount point is the last of `parts`.
    fn mount_child(&mut self, parts: &[String]) -> Option<&mut ArchiveFs> {
        let (last, dirs) = parts.split_last()?;
        let mut node = &mut self.tree;

        for part in dirs {
            match node.children.get_mut(part)? {
                Node::Dir(dir) => node = dir,
                _ => return None,
            }
        }

        match node.children.get_mut(last)? {
            Node::Mount(fs) => Some(fs),
            _ => None,
        }
    }

    fn open_parts(&mut self, parts: &[String], display: &str) -> Result<Box<dyn ReadSeek>> {
        match self.resolve(parts) {
            Found::File(entry) => {
                // a fresh handle per open: regions must never share seek state
                let file = File::open(&entry.dat_path)?;
                Ok(Box::new(ArchiveRegion::new(file, entry.offset, entry.size)?))
            }
            Found::Mount { next } if next < parts.len() => self
                .mount_child(&parts[..next])
                .ok_or_else(|| Error::PathNotFound(display.to_string()))?
                .open_parts(&parts[next..], display),
            Found::Mount { .. } | Found::Dir => Err(Error::NotAFile(display.to_string())),
            Found::Missing => Err(Error::PathNotFound(display.to_string())),
        }
    }

    fn exists_parts(&mut self, parts: &[String]) -> bool {
        match self.resolve(parts) {
            Found::File(_) => true,
            Found::Mount { next } if next < parts.len() => self
                .mount_child(&parts[..next])
                .is_some_and(|mount| mount.exists_parts(&parts[next..])),
            _ => false,
        }
    }

    fn list_parts(&mut self, parts: &[String], display: &str) -> Result<Vec<FileEntry>> {
        match self.resolve(parts) {
            Found::Mount { next } => {
                let mount_path = parts[..next].join("/");
                let entries = self
                    .mount_child(&parts[..next])
                    .ok_or_else(|| Error::PathNotFound(display.to_string()))?
                    .list_parts(&parts[next..], display)?;

                Ok(entries
                    .into_iter()
                    .map(|entry| FileEntry {
                        path: format!("{mount_path}/{}", entry.path),
                        name: entry.name,
                    })
                    .collect())
            }
            Found::Dir => {
                // lazy loading gives no lower bound on completeness, so a
                // listing has to merge every remaining pair first
                while self.load_next_pair() {}

                let mut node = &self.tree;
                for part in parts {
                    match node.children.get(part) {
                        Some(Node::Dir(dir)) => node = dir,
                        _ => return Err(Error::NotADirectory(display.to_string())),
                    }
                }

                let dir_path = parts.join("/");
                let mut out = Vec::new();
                for (name, child) in &node.children {
                    if let Node::File(_) = child {
                        let path = if dir_path.is_empty() {
                            name.clone()
                        } else {
                            format!("{dir_path}/{name}")
                        };
                        out.push(FileEntry {
                            path,
                            name: name.clone(),
                        });
                    }
                }
                Ok(out)
            }
            Found::File(_) => Err(Error::NotADirectory(display.to_string())),
            Found::Missing => Err(Error::PathNotFound(display.to_string())),
        }
    }
}

impl GameFs for ArchiveFs {
    fn open(&mut self, path: &str) -> Result<Box<dyn ReadSeek>> {
        let parts = split_game_path(&path.to_lowercase());
        if parts.is_empty() {
            return Err(Error::EmptyPath(path.to_string()));
        }
        self.open_parts(&parts, path)
    }

    fn exists(&mut self, path: &str) -> bool {
        let parts = split_game_path(&path.to_lowercase());
        !parts.is_empty() && self.exists_parts(&parts)
    }

    fn list(&mut self, path: &str) -> Result<Vec<FileEntry>> {
        let parts = split_game_path(&path.to_lowercase());
        self.list_parts(&parts, path)
    }

    fn extensions(&self) -> Vec<String> {
        match self.tree.children.get(EXTENSIONS_DIR) {
            Some(Node::Dir(dir)) => dir.children.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Look for `{prefix}01.idx`/`.dat`, `{prefix}02.idx`/`.dat`, ... in `dir`,
/// stopping at the first number with either file missing.
fn scan_pairs(dir: &Path, prefix: &str) -> Vec<ArchivePair> {
    let mut pairs = Vec::new();

    for i in 1..=99u32 {
        let idx_path = dir.join(format!("{prefix}{i:02}.idx"));
        let dat_path = dir.join(format!("{prefix}{i:02}.dat"));

        if idx_path.is_file() && dat_path.is_file() {
            pairs.push(ArchivePair { idx_path, dat_path });
        } else {
            break;
        }
    }

    pairs
}
