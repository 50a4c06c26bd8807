//! Configuration sources.
//!
//! A source is where label data comes from before command-line flags are
//! applied: a YAML file (`file://path` or a plain path) or inline data
//! (`query:image=redis&rm=true`). Files are read with capability-oriented
//! filesystem access through `cap_std::fs_utf8`.


use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tracing::debug;

use crate::document::{Document, LabelConfig};
use crate::error::SourceError;
use crate::value::DataBag;

/// File names searched, in order, when no source is given.
pub const SEARCH_PATHS: &[&str] = &["fugu.yml", "fugu.yaml", ".fugu.yml", ".fugu.yaml"];

const FILE_SCHEME: &str = "file://";
const QUERY_SCHEME: &str = "query:";

/// A parsed source URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A YAML document on disk.
    File(Utf8PathBuf),
    /// Inline `key=value&...` data, independent of labels.
    Query(String),
}

impl Source {
    /// Parse a source URI.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnsupportedSource`] for any `scheme://` other
    /// than `file://`, and for an empty URI.
    pub fn parse(uri: &str) -> Result<Self, SourceError> {
        if let Some(path) = uri.strip_prefix(FILE_SCHEME) {
            return Ok(Self::File(Utf8PathBuf::from(path)));
        }
        if let Some(query) = uri.strip_prefix(QUERY_SCHEME) {
            return Ok(Self::Query(query.to_owned()));
        }
        if uri.is_empty() || uri.contains("://") {
            return Err(SourceError::UnsupportedSource {
                uri: uri.to_owned(),
            });
        }
        Ok(Self::File(Utf8PathBuf::from(uri)))
    }

    /// Read and parse the source.
    ///
    /// `env` supplies the values for `$NAME` substitution in documents.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when a file is missing, unreadable, or not a
    /// valid document.
    pub fn load<E: mockable::Env>(&self, env: &E) -> Result<LoadedSource, SourceError> {
        match self {
            Self::File(path) => {
                let raw = read_to_string(path).map_err(|e| read_error(path, &e))?;
                let document =
                    Document::parse(&raw, env).map_err(|e| SourceError::InvalidDocument {
                        path: path.to_string(),
                        source: e,
                    })?;
                debug!(%path, labels = ?document.label_names(), "loaded source document");
                Ok(LoadedSource::Document(document))
            }
            Self::Query(query) => Ok(LoadedSource::Inline(DataBag::from_query(query))),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{FILE_SCHEME}{path}"),
            Self::Query(query) => write!(f, "{QUERY_SCHEME}{query}"),
        }
    }
}

/// A source after loading.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedSource {
    /// A labelled document.
    Document(Document),
    /// Inline data that applies whatever label is selected.
    Inline(DataBag),
}

impl LoadedSource {
    /// Label names defined by this source.
    #[must_use]
    pub fn label_names(&self) -> Vec<String> {
        match self {
            Self::Document(document) => document.label_names(),
            Self::Inline(_) => Vec::new(),
        }
    }

    /// Whether this source defines `label`.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        match self {
            Self::Document(document) => document.has_label(label),
            Self::Inline(_) => false,
        }
    }

    /// The options this source contributes for `label`.
    #[must_use]
    pub fn config_for(&self, label: Option<&str>) -> LabelConfig {
        match self {
            Self::Document(document) => document.resolve(label).config,
            Self::Inline(bag) => bag.to_yaml(),
        }
    }
}

/// Find the first default source file in `dir`.
#[must_use]
pub fn discover(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    SEARCH_PATHS
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Read a UTF-8 file through a capability on its parent directory.
///
/// # Errors
///
/// Returns the underlying I/O error when the directory cannot be opened or
/// the file cannot be read.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path.file_name().unwrap_or(path.as_str());
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}

fn read_error(path: &Utf8Path, error: &io::Error) -> SourceError {
    if error.kind() == io::ErrorKind::NotFound {
        SourceError::SourceNotFound {
            path: path.to_owned(),
        }
    } else {
        SourceError::ReadFailed {
            path: path.to_owned(),
            message: error.to_string(),
        }
    }
}
