//! Library Loader.
//!
//! This module reads a design library from disk. The format is chosen by
//! file extension: `.json` files are parsed as JSON, everything else as
//! TOML.

use super::Library;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while loading a library file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read library '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse TOML library '{path}': {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not parse JSON library '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Input formats understood by [`load_library`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryFormat {
    Toml,
    Json,
}

impl LibraryFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => LibraryFormat::Json,
            _ => LibraryFormat::Toml,
        }
    }
}

/// Loads a library file from disk.
///
/// # Arguments
///
/// * `path` - Path to a `.toml` or `.json` library description
///
/// # Returns
///
/// The parsed library, or a `LoadError` naming the file.
pub fn load_library(path: impl AsRef<Path>) -> Result<Library, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let library = parse_library(&content, LibraryFormat::from_path(path), path)?;
    tracing::info!(
        "[Loader] Loaded library {} ({} components, {} designs)",
        path.display(),
        library.components.len(),
        library.designs.len()
    );
    Ok(library)
}

/// Parses library text in the given format.
///
/// `origin` only labels errors.
pub fn parse_library(
    content: &str,
    format: LibraryFormat,
    origin: &Path,
) -> Result<Library, LoadError> {
    match format {
        LibraryFormat::Toml => toml::from_str(content).map_err(|source| LoadError::Toml {
            path: origin.to_path_buf(),
            source,
        }),
        LibraryFormat::Json => serde_json::from_str(content).map_err(|source| LoadError::Json {
            path: origin.to_path_buf(),
            source,
        }),
    }
}
