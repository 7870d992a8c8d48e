//! Site configuration management for `mdpress.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                      |
//! |-------------|----------------------------------------------|
//! | `[site]`    | Site metadata (title, author, url)           |
//! | `[build]`   | Directory layout (content, theme, output)    |
//! | `[serve]`   | Development server (port, interface, watch)  |
//! | `[extra]`   | User-defined fields, exposed as `extra`      |
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "My Blog"
//! description = "A personal blog"
//!
//! [build]
//! content = "content"
//! output = "build"
//!
//! [serve]
//! port = 8080
//! ```

mod build;
pub mod defaults;
mod error;
mod serve;
mod site;

use crate::cli::{Cli, Commands};
use anyhow::Result;
use build::BuildSection;
use educe::Educe;
use error::ConfigError;
use serde::{Deserialize, Serialize};
use serve::ServeSection;
use site::SiteSection;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing mdpress.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site metadata, exposed to templates as `site`
    #[serde(default)]
    pub site: SiteSection,

    /// Build paths
    #[serde(default)]
    pub build: BuildSection,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeSection,

    /// User-defined fields, exposed to templates as `extra`
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Update configuration with CLI arguments and normalize all paths
    /// to absolute paths under the project root.
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.root().to_owned());
        let root = normalize_path(&root);

        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.theme, cli.theme.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        self.config_path = normalize_path(&root.join(&cli.config));
        self.build.content = normalize_path(&root.join(&self.build.content));
        self.build.theme = normalize_path(&root.join(&self.build.theme));
        self.build.r#static = normalize_path(&root.join(&self.build.r#static));
        self.build.output = normalize_path(&root.join(&self.build.output));
        self.build.root = Some(root);

        if let Commands::Serve {
            interface,
            port,
            watch,
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.serve.watch, watch.as_ref());
        }
    }

    /// Validate that the source directories a build needs actually exist.
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("content", &self.build.content),
            ("theme", &self.build.theme),
        ] {
            if !path.is_dir() {
                return Err(ConfigError::Validation(format!(
                    "{name} directory not found: {}",
                    path.display()
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }
}

/// Normalize a path to an absolute path (without resolving symlinks).
fn normalize_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
