//! # X4Data
//!
//! A pure-Rust library for reading X4: Foundations game data straight from
//! the shipped catalog archives.
//!
//! ## Supported layers
//!
//! - **Catalog archives** - numbered `NN.idx`/`NN.dat` pairs, merged into one
//!   lazily-materialized virtual file system with extension overlays
//! - **Macro database** - typed asset records with reference-closure loading
//! - **Localization** - `{page,text}` template string resolution over the
//!   game's `t/*.xml` documents
//!
//! ## Quick Start
//!
//! ```no_run
//! use x4data::macros::MacroDatabase;
//! use x4data::vfs::ArchiveFs;
//!
//! // Assemble the game namespace from the install directory
//! let mut fs = ArchiveFs::new("/path/to/X4 Foundations");
//! fs.load_from_game_root();
//! fs.mount_extensions()?;
//!
//! // Load a record and everything it references
//! let mut db = MacroDatabase::new(fs)?;
//! db.load_macro_file("assets/props/engines/macros/engine_arg_s_travel_01_mk1_macro.xml")?;
//! let report = db.resolve_dependencies();
//! println!("{} macros, complete: {}", db.macros().len(), report.complete);
//! # Ok::<(), x4data::Error>(())
//! ```
//!
//! ### Resolving localized strings
//!
//! ```no_run
//! use x4data::lang::LanguageResolver;
//! use x4data::vfs::DirFs;
//!
//! let mut fs = DirFs::new("/path/to/extracted");
//! let mut resolver = LanguageResolver::new();
//! resolver.load_language_from("en", &mut fs, "t/0001-L044.xml")?;
//! let name = resolver.resolve("{20101,30302}", None)?;
//! println!("{}", name.trimmed());
//! # Ok::<(), x4data::Error>(())
//! ```

pub mod archive;
pub mod error;
pub mod lang;
pub mod macros;
pub mod vfs;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::archive::{ArchiveEntry, ArchiveRegion};
    pub use crate::error::{Error, Result};
    pub use crate::lang::{LanguageResolver, ResolvedText};
    pub use crate::macros::{Macro, MacroDatabase, ParserRegistry, Properties, ResolveReport};
    pub use crate::vfs::{ArchiveFs, DirFs, FileEntry, GameFs, ReadSeek};
    pub use crate::xml::{XmlDocument, XmlNode};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
