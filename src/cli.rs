//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mdpress static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Theme directory path (relative to project root)
    #[arg(short, long)]
    pub theme: Option<PathBuf>,

    /// Config file name (default: mdpress.toml)
    #[arg(short = 'C', long, default_value = "mdpress.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Deletes the output directory if there is one and rebuilds the site
    Build,

    /// Serve the site. Rebuild on change automatically
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        /// enable watch
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },
}

impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command() {
        let cli = Cli::parse_from(["mdpress", "build"]);
        assert!(matches!(cli.command, Commands::Build));
        assert!(!cli.is_serve());
        assert_eq!(cli.config, PathBuf::from("mdpress.toml"));
    }

    #[test]
    fn test_serve_command_with_flags() {
        let cli = Cli::parse_from(["mdpress", "serve", "-p", "3000", "-w"]);
        assert!(cli.is_serve());
        match cli.command {
            Commands::Serve { port, watch, .. } => {
                assert_eq!(port, Some(3000));
                assert_eq!(watch, Some(true));
            }
            _ => unreachable!(),
        }
    }
}
