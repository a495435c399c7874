//! # X4Projector
//!
//! Game object data extraction for X4: Foundations, built on [`x4data`].
//!
//! The library side holds everything the command-line binary composes:
//! per-class extraction tables ([`loaders`]), output formatting
//! ([`export`]) and the language alias table ([`langtable`]).
//!
//! ```no_run
//! use std::rc::Rc;
//!
//! use x4data::lang::LanguageResolver;
//! use x4data::macros::MacroDatabase;
//! use x4data::vfs::ArchiveFs;
//! use x4projector::{export, loaders};
//!
//! let mut fs = ArchiveFs::new("/path/to/X4 Foundations");
//! fs.load_from_game_root();
//!
//! let mut resolver = LanguageResolver::new();
//! resolver.load_language_from("en", &mut fs, "t/0001-L044.xml")?;
//! let resolver = Rc::new(resolver);
//!
//! let mut db = MacroDatabase::with_registry(fs, loaders::registry(Rc::clone(&resolver)))?;
//! loaders::load_engines(&mut db, None);
//! db.resolve_dependencies();
//!
//! export::export_engines(&db, std::io::stdout(), export::Format::Csv)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod export;
pub mod langtable;
pub mod loaders;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
