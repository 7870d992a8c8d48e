//! Template rendering.
//!
//! One template per category, resolved from the theme directory. Each
//! document renders with a scope merging its own fields with the frozen
//! global context, and is written to `output + url + ".html"`.
//!
//! Render failures are deliberately softer than everything else in the
//! pipeline: a broken template expression in one post is logged and the
//! remaining documents still build. The caller turns a nonzero failure
//! count into an overall non-zero exit.

use crate::config::SiteConfig;
use crate::content::ContentDocument;
use crate::content::category::Category;
use crate::context::GlobalContext;
use crate::error::BuildError;
use crate::log;
use minijinja::{AutoEscape, Environment, UndefinedBehavior, path_loader};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Render every document, in parallel (output paths are disjoint).
///
/// Returns the number of documents that failed to render.
pub fn render_all(
    documents: &[ContentDocument],
    ctx: &GlobalContext,
    config: &SiteConfig,
) -> Result<usize, BuildError> {
    verify_templates(documents, config)?;

    let env = template_env(&config.build.theme);
    let failed = AtomicUsize::new(0);

    documents.par_iter().for_each(|doc| {
        let dest = output_path(&config.build.output, &doc.url);
        match render_page(doc, ctx, &env, &dest) {
            Ok(()) => log!("content"; "{}", doc.url),
            Err(err) => {
                failed.fetch_add(1, Ordering::Relaxed);
                log!("error"; "{err:#}");
                if let BuildError::Render { source, .. } = &err {
                    log!("error"; "{source:#}");
                }
            }
        }
    });

    Ok(failed.load(Ordering::Relaxed))
}

/// Check that every category present in the content set has a template
/// file, before any document renders.
fn verify_templates(documents: &[ContentDocument], config: &SiteConfig) -> Result<(), BuildError> {
    for &category in Category::ALL {
        let used = documents.iter().any(|d| d.category == category);
        if used && !config.build.theme.join(category.template_file()).is_file() {
            return Err(BuildError::TemplateNotFound {
                category: category.name(),
                template: category.template_file(),
                theme: config.build.theme.clone(),
            });
        }
    }
    Ok(())
}

/// Build the shared template environment.
///
/// Autoescaping is off: `content` holds HTML the Markdown converter
/// already produced, and escaping it again would corrupt it. Undefined
/// variables are strict so a typo fails the document instead of
/// rendering empty text.
fn template_env(theme: &Path) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_loader(path_loader(theme));
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

/// Render one document and write it to its output path.
fn render_page(
    doc: &ContentDocument,
    ctx: &GlobalContext,
    env: &Environment<'_>,
    dest: &Path,
) -> Result<(), BuildError> {
    // Per-document fields first; the global collections keep their
    // reserved names (the loader rejects documents shadowing them)
    let mut scope = doc.template_vars();
    scope.insert("posts".into(), ctx.posts.clone());
    scope.insert("pages".into(), ctx.pages.clone());
    scope.insert("site".into(), ctx.site.clone());
    scope.insert("extra".into(), ctx.extra.clone());

    let render = || -> Result<String, minijinja::Error> {
        let template = env.get_template(doc.category.template_file())?;
        template.render(&scope)
    };
    let html = render().map_err(|source| BuildError::Render {
        path: dest.to_path_buf(),
        source,
    })?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(BuildError::io(parent))?;
    }
    fs::write(dest, html).map_err(BuildError::io(dest))?;

    Ok(())
}

/// Physical output path for a URL: `/foo/bar` → `<output>/foo/bar.html`.
pub fn output_path(output_root: &Path, url: &str) -> PathBuf {
    output_root.join(format!("{}.html", url.trim_start_matches('/')))
}
