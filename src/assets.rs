//! Static asset mirroring.
//!
//! Copies `static/` into the output root and the theme's `assets/`
//! directory under `<output>/assets/`, byte-for-byte, preserving relative
//! structure. Unlike rendering there is no partial-failure tolerance: a
//! site missing a stylesheet or image is broken in a way a missing page
//! is not, so the first copy failure aborts the build.

use crate::config::SiteConfig;
use crate::content::collect_files;
use crate::error::BuildError;
use crate::log;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Name of the theme subdirectory mirrored to `<output>/assets/`.
const THEME_ASSETS_DIR: &str = "assets";

/// Copy all static assets into the output tree.
pub fn copy_assets(config: &SiteConfig) -> Result<(), BuildError> {
    let output = &config.build.output;

    mirror_dir(&config.build.r#static, output)?;
    mirror_dir(
        &config.build.theme.join(THEME_ASSETS_DIR),
        &output.join(THEME_ASSETS_DIR),
    )?;
    copy_passthrough(config)?;

    Ok(())
}

/// Mirror every file under `src` to the corresponding path under `dest`.
///
/// A missing source directory is fine (nothing to copy).
fn mirror_dir(src: &Path, dest: &Path) -> Result<(), BuildError> {
    if !src.is_dir() {
        return Ok(());
    }

    collect_files(src).par_iter().try_for_each(|path| {
        let rel = path.strip_prefix(src).unwrap_or(path);
        let target = dest.join(rel);
        copy_file(path, &target)?;
        log!("assets"; "{}", rel.display());
        Ok(())
    })
}

/// Copy the hosting pass-through file (redirect rules) to the output
/// root, unmodified, when the project has one.
fn copy_passthrough(config: &SiteConfig) -> Result<(), BuildError> {
    let src = config.root().join(&config.build.redirects);
    if !src.is_file() {
        return Ok(());
    }

    let dest = config.build.output.join(&config.build.redirects);
    copy_file(&src, &dest)?;
    log!("assets"; "{}", config.build.redirects.display());
    Ok(())
}

fn copy_file(src: &Path, dest: &Path) -> Result<(), BuildError> {
    let copy = || -> std::io::Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dest)?;
        Ok(())
    };
    copy().map_err(|source| BuildError::AssetCopy {
        path: src.to_path_buf(),
        source,
    })
}
