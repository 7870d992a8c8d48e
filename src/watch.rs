//! File system watcher for auto-rebuild.
//!
//! Monitors the content, theme and static directories plus the config
//! file, and triggers a full rebuild when any of them change. There is
//! no incremental path: every build starts from a clean output
//! directory, so the watcher's only job is debouncing bursts of editor
//! events and keeping the loop alive across failed builds.

use crate::{build::build_site, config::SiteConfig, log};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

// =============================================================================
// Path Utilities
// =============================================================================

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Format path as relative to the project root for log display.
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: HashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: HashSet::new(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    /// Events collected during cooldown stay pending and flush once the
    /// cooldown expires.
    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && !self.in_cooldown()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        self.pending.drain().collect()
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Event Handler
// =============================================================================

/// Rebuild the whole site, logging the trigger. Returns true on success
/// (for cooldown tracking).
fn handle_changes(paths: &[PathBuf], config: &SiteConfig) -> bool {
    if paths.is_empty() {
        return false;
    }

    let root = config.root();
    let triggers: Vec<String> = paths.iter().map(|p| rel_path(p, root)).collect();
    log!("watch"; "{} changed, rebuilding...", triggers.join(", "));

    match build_site(config) {
        Ok(()) => {
            eprintln!(); // Blank line to separate rebuild sessions
            true
        }
        Err(e) => {
            log!("watch"; "rebuild failed");
            log!("error"; "{e:#}");
            eprintln!();
            false
        }
    }
}

// =============================================================================
// Watcher Setup
// =============================================================================

fn setup_watchers(watcher: &mut impl Watcher, config: &SiteConfig) -> Result<()> {
    let root = config.root();
    let dirs = [
        &config.build.content,
        &config.build.theme,
        &config.build.r#static,
    ];

    let mut watched = Vec::new();
    for dir in dirs {
        if dir.exists() {
            watcher
                .watch(dir, RecursiveMode::Recursive)
                .with_context(|| format!("Failed to watch {}", dir.display()))?;
            watched.push(format!("{}/", rel_path(dir, root)));
        }
    }
    if config.config_path.exists() {
        watcher
            .watch(&config.config_path, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", config.config_path.display()))?;
        watched.push(rel_path(&config.config_path, root));
    }

    log!("watch"; "watching: {}", watched.join(", "));
    eprintln!(); // Blank line to separate init logs from change events
    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

// =============================================================================
// Public API
// =============================================================================

/// Start blocking file watcher with debouncing and full rebuild on change.
pub fn watch_for_changes_blocking(config: &'static SiteConfig) -> Result<()> {
    if !config.serve.watch {
        return Ok(());
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    setup_watchers(&mut watcher, config)?;

    let mut debouncer = Debouncer::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) => {
                debouncer.add(event);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) if debouncer.ready() => {
                if handle_changes(&debouncer.take(), config) {
                    debouncer.mark_rebuild();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            // Other cases: irrelevant events, timeout without ready, etc.
            _ => {}
        }
    }

    Ok(())
}
