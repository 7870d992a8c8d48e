//! `[build]` section configuration.
//!
//! Directory layout of the project: where content, theme, static assets
//! and the output tree live. All paths are relative to the project root
//! until `SiteConfig::update_with_cli` normalizes them to absolute.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in mdpress.toml - build paths.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"
/// theme = "theme"
/// static = "static"
/// output = "build"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Project root directory (set from the CLI, not the config file).
    #[serde(skip)]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content directory: one Markdown file per document.
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Theme directory: one template per category plus an `assets/`
    /// subdirectory copied verbatim.
    #[serde(default = "defaults::build::theme")]
    #[educe(Default = defaults::build::theme())]
    pub theme: PathBuf,

    /// Static files mirrored to the output root.
    #[serde(default = "defaults::build::r#static")]
    #[educe(Default = defaults::build::r#static())]
    pub r#static: PathBuf,

    /// Output directory, fully recreated each build.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Hosting pass-through file copied unmodified to the output root.
    #[serde(default = "defaults::build::redirects")]
    #[educe(Default = defaults::build::redirects())]
    pub redirects: PathBuf,
}
