use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Subcommand, ValueEnum};

use x4data::lang::LanguageResolver;
use x4data::vfs::{ArchiveFs, DirFs, GameFs};
use x4projector::export::Format;
use x4projector::langtable;

pub mod export;
pub mod resolve;

/// Which file system backend reads the game files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Read the shipped catalog archives directly
    Archive,
    /// Read a game tree extracted to disk
    Fs,
}

/// Global options shared by every command.
pub struct Context {
    pub game_root: PathBuf,
    pub backend: Backend,
    pub language: String,
}

/// Exportable object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ObjectKind {
    All,
    Engines,
    Missilelaunchers,
    Shields,
    Ships,
    Wares,
    Weapons,
}

impl ObjectKind {
    /// Output file stem for this kind.
    pub fn file_stem(self) -> &'static str {
        match self {
            ObjectKind::All => "all",
            ObjectKind::Engines => "engines",
            ObjectKind::Missilelaunchers => "missilelaunchers",
            ObjectKind::Shields => "shields",
            ObjectKind::Ships => "ships",
            ObjectKind::Wares => "wares",
            ObjectKind::Weapons => "weapons",
        }
    }

    /// Expand `all` and drop duplicates, keeping the given order otherwise.
    pub fn expand(kinds: &[ObjectKind]) -> Vec<ObjectKind> {
        let mut expanded = Vec::new();
        let mut push = |kind: ObjectKind, out: &mut Vec<ObjectKind>| {
            if !out.contains(&kind) {
                out.push(kind);
            }
        };

        for kind in kinds {
            match kind {
                ObjectKind::All => {
                    for kind in [
                        ObjectKind::Engines,
                        ObjectKind::Missilelaunchers,
                        ObjectKind::Shields,
                        ObjectKind::Ships,
                        ObjectKind::Wares,
                        ObjectKind::Weapons,
                    ] {
                        push(kind, &mut expanded);
                    }
                }
                other => push(*other, &mut expanded),
            }
        }

        expanded
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve language-dependent template strings
    ResolveString {
        /// Template strings, e.g. 'This ship is {20101,30302}'
        strings: Vec<String>,
    },

    /// Export data about game objects
    Export {
        /// What kinds of objects to export
        #[arg(value_enum, default_value = "all")]
        objects: Vec<ObjectKind>,

        /// Directory to export game data to
        #[arg(short = 'd', long, default_value = ".")]
        dir: PathBuf,

        /// Format to export as
        #[arg(short = 'f', long, value_enum, default_value = "csv")]
        format: Format,
    },
}

impl Commands {
    pub fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        match self {
            Commands::ResolveString { strings } => resolve::execute(ctx, strings),
            Commands::Export {
                objects,
                dir,
                format,
            } => export::execute(ctx, objects, dir, *format),
        }
    }
}

/// Build the configured file system backend over the game root.
pub fn build_fs(ctx: &Context) -> anyhow::Result<Box<dyn GameFs>> {
    match ctx.backend {
        Backend::Archive => {
            let mut fs = ArchiveFs::new(&ctx.game_root);
            let pairs = fs.load_from_game_root();
            let mounted = fs.mount_extensions()?;
            tracing::info!(
                root = %ctx.game_root.display(),
                pairs,
                extensions = mounted.len(),
                "scanned game root"
            );
            Ok(Box::new(fs))
        }
        Backend::Fs => Ok(Box::new(DirFs::new(&ctx.game_root))),
    }
}

/// Load the language selected by alias through the game file system.
pub fn load_language(fs: &mut Box<dyn GameFs>, alias: &str) -> anyhow::Result<LanguageResolver> {
    let path = langtable::lang_file_for(alias)
        .with_context(|| format!("unknown language: {alias}"))?;

    let mut resolver = LanguageResolver::new();
    resolver
        .load_language_from(&alias.trim().to_lowercase(), fs, path)
        .with_context(|| format!("cannot load language file {path}"))?;

    Ok(resolver)
}
