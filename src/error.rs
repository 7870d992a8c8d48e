//! Build error taxonomy.
//!
//! Load-time and structural errors are fatal: a partial content set would
//! produce a corrupted cross-document context (broken post listings), so
//! they abort before any output is written. `Render` is the one recoverable
//! variant: it is caught per document in `render::render_all` so a broken
//! template expression in one post cannot block the rest of the site.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the build pipeline.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to load {path}: missing required front matter field '{field}'")]
    MissingMetadata { path: PathBuf, field: String },

    #[error("Failed to load {path}: unknown template '{name}' (expected index, page or post)")]
    UnknownCategory { path: PathBuf, name: String },

    #[error("Failed to load {path}: front matter field '{field}' is reserved for the global context")]
    ReservedField { path: PathBuf, field: String },

    #[error("Failed to load {path}: invalid date '{value}' (expected YYYY-MM-DD or RFC3339 UTC)")]
    InvalidDate { path: PathBuf, value: String },

    #[error("Failed to parse front matter of {path}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("URL collision: {first} and {second} both map to '{url}'")]
    UrlCollision {
        url: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("No template '{template}' in {theme} for '{category}' documents")]
    TemplateNotFound {
        category: &'static str,
        template: &'static str,
        theme: PathBuf,
    },

    #[error("Failed to render {path}")]
    Render {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    #[error("Failed to copy asset {path}")]
    AssetCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Wrap an IO error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
