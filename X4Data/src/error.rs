//! Error types for `x4data`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `x4data` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Catalog Archive Errors ====================
    /// An index file line did not split into the four `path size timestamp hash`
    /// fields. The whole index file is rejected; nothing from it is merged.
    #[error("malformed archive index {path}: invalid entry on line {line}")]
    MalformedIndex {
        /// Path to the offending `.idx` file.
        path: PathBuf,
        /// 1-indexed line number of the bad entry.
        line: usize,
    },

    /// A game path was empty after discarding empty segments.
    #[error("empty game path: {0:?}")]
    EmptyPath(String),

    /// A path could not be resolved after all loadable archive pairs were
    /// exhausted.
    #[error("path not found: {0}")]
    PathNotFound(String),

    /// The path resolved to something other than a file.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// The path resolved to something other than a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// An extension with this name is already mounted.
    #[error("extension already mounted: {0}")]
    ExtensionAlreadyMounted(String),

    // ==================== Localization Errors ====================
    /// The requested language has not been loaded. There is no fallback.
    #[error("language not loaded: {0}")]
    LanguageNotLoaded(String),

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// A game document parsed but its structure is not what the loader
    /// expects (missing root, missing required attribute, bad number).
    #[error("malformed document {path}: {message}")]
    MalformedDocument {
        /// Game path of the document.
        path: String,
        /// Description of what is malformed.
        message: String,
    },

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

/// A specialized Result type for `x4data` operations.
pub type Result<T> = std::result::Result<T, Error>;
