//! Site building orchestration.
//!
//! Strictly sequential phases: the output directory is recreated, assets
//! are mirrored, every content file is loaded and validated, the global
//! context is frozen, and only then does rendering start. Nothing renders
//! against a partially loaded content set.
//!
//! ```text
//! build_site()
//!     │
//!     ├── prepare_output() ──► delete + recreate output dir
//!     ├── copy_assets()    ──► static/, theme/assets/, _redirects
//!     ├── load_content()   ──► Vec<ContentDocument> (validated)
//!     ├── GlobalContext::build() ──► frozen posts/pages/site
//!     └── render_all()     ──► one HTML file per document
//! ```

use crate::assets::copy_assets;
use crate::config::SiteConfig;
use crate::content::load_content;
use crate::context::GlobalContext;
use crate::log;
use crate::render::render_all;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Build the entire site from scratch.
///
/// Every build is a full rebuild: the output directory is deleted and
/// recreated first so renamed or removed content leaves no stale files.
/// Returns an error if any load/asset step fails, or - after all
/// documents have been attempted - if any document failed to render.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    prepare_output(&config.build.output)?;

    copy_assets(config)?;

    let documents = load_content(config)?;
    log!("content"; "loaded {} documents", documents.len());

    let ctx = GlobalContext::build(&documents, config)?;
    let failed = render_all(&documents, &ctx, config)?;

    if failed > 0 {
        bail!("{failed} document(s) failed to render");
    }

    log!("build"; "done");
    Ok(())
}

/// Delete and recreate the output directory.
fn prepare_output(output: &Path) -> Result<()> {
    if output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;
    Ok(())
}
