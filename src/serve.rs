//! Development server with clean-URL rewriting.
//!
//! A lightweight HTTP server over the build output, built on `tiny_http`:
//!
//! - Static file serving from the output directory
//! - Extensionless URL rewriting (`/about` → `about.html`), matching the
//!   hosting provider's clean-URL convention so local previews behave
//!   like production
//! - File watching and auto-rebuild (via the `watch` module)
//! - Graceful shutdown on Ctrl+C
//!
//! Each request is handled independently and statelessly. Path
//! resolution costs at most one extra filesystem stat per request.

use crate::{config::SiteConfig, log, watch::watch_for_changes_blocking};
use anyhow::{Context, Result};
use std::{
    fs,
    io::Cursor,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the development server with optional file watching.
///
/// Binds the configured interface and port (with auto-retry on port
/// conflict), installs a Ctrl+C handler, spawns the watcher thread when
/// enabled, then blocks in the request loop until shutdown.
pub fn serve_site(config: &'static SiteConfig) -> Result<()> {
    let interface: std::net::IpAddr = config.serve.interface.parse()?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    // Spawn file watcher thread
    if config.serve.watch {
        std::thread::spawn(move || {
            if let Err(err) = watch_for_changes_blocking(config) {
                log!("watch"; "{err}");
            }
        });
    }

    // Handle requests in main thread (blocks until Ctrl+C)
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < max_retries => {
                // Will retry silently
                continue;
            }
            Err(e) => {
                // Last attempt failed
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    max_retries,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

// ============================================================================
// Request Handling
// ============================================================================

/// Handle a single HTTP request.
fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    let serve_root = &config.build.output;

    let Some(url_path) = decode_request_path(request.url()) else {
        return serve_not_found(request);
    };

    let local_path = resolve_request_path(serve_root, &url_path);
    if local_path.is_file() {
        return serve_file(request, &local_path);
    }

    serve_not_found(request)
}

/// Extract the decoded path component of a request URL.
///
/// The query string (e.g., `?t=123456`) is stripped before percent
/// decoding, so an encoded `%3F` in the path stays part of the path.
/// Returns `None` when the path decodes to invalid UTF-8; the caller
/// answers those with a 404.
fn decode_request_path(url: &str) -> Option<String> {
    let path = url.split('?').next().unwrap_or(url);
    urlencoding::decode(path)
        .ok()
        .map(std::borrow::Cow::into_owned)
}

/// Rewrite a request path to its on-disk equivalent.
///
/// Resolution order, mirroring the hosting provider's clean-URL contract:
/// 1. Root path → `index.html` under the output root
/// 2. Path names an existing file verbatim → that file (assets and any
///    extensioned resource)
/// 3. `path + ".html"` exists → that file (clean URLs)
/// 4. Otherwise the original path, letting the caller produce a 404
pub fn resolve_request_path(serve_root: &Path, request_path: &str) -> PathBuf {
    let rel = request_path.trim_matches('/');
    if rel.is_empty() {
        return serve_root.join("index.html");
    }

    let verbatim = serve_root.join(rel);
    if verbatim.is_file() {
        return verbatim;
    }

    // One extra stat, never a directory scan
    let rewritten = serve_root.join(format!("{rel}.html"));
    if rewritten.is_file() {
        return rewritten;
    }

    verbatim
}

// ============================================================================
// Response Helpers
// ============================================================================

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content_type = guess_content_type(path);

    let response = Response::from_data(content)
        .with_header(Header::from_bytes("Content-Type", content_type).unwrap());

    request.respond(response)?;
    Ok(())
}

/// Serve 404 Not Found response.
fn serve_not_found(request: Request) -> Result<()> {
    let response = Response::new(
        StatusCode(404),
        vec![Header::from_bytes("Content-Type", "text/plain").unwrap()],
        Cursor::new("404 Not Found"),
        Some(13),
        None,
    );
    request.respond(response)?;
    Ok(())
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_file(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_resolve_root_serves_index() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "index.html", "home");

        let resolved = resolve_request_path(dir.path(), "/");
        assert_eq!(resolved, dir.path().join("index.html"));
    }

    #[test]
    fn test_resolve_clean_url_rewrites_to_html() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "about.html", "about");

        let resolved = resolve_request_path(dir.path(), "/about");
        assert_eq!(resolved, dir.path().join("about.html"));
    }

    #[test]
    fn test_resolve_existing_file_served_verbatim() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "assets/logo.png", "png");
        // A sibling .html must not shadow an existing file
        write_file(dir.path(), "assets/logo.png.html", "decoy");

        let resolved = resolve_request_path(dir.path(), "/assets/logo.png");
        assert_eq!(resolved, dir.path().join("assets/logo.png"));
    }

    #[test]
    fn test_resolve_missing_page_passes_through() {
        let dir = tempdir().unwrap();

        let resolved = resolve_request_path(dir.path(), "/missing-page");
        assert_eq!(resolved, dir.path().join("missing-page"));
        assert!(!resolved.is_file());
    }

    #[test]
    fn test_resolve_nested_clean_url() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "posts/hello.html", "post");

        let resolved = resolve_request_path(dir.path(), "/posts/hello");
        assert_eq!(resolved, dir.path().join("posts/hello.html"));
    }

    #[test]
    fn test_decode_strips_query_before_decoding() {
        assert_eq!(
            decode_request_path("/about?t=123456").as_deref(),
            Some("/about")
        );
        // An encoded question mark belongs to the path, not the query
        assert_eq!(
            decode_request_path("/a%3Fb?x=1").as_deref(),
            Some("/a?b")
        );
        assert_eq!(
            decode_request_path("/hello%20world").as_deref(),
            Some("/hello world")
        );
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert_eq!(decode_request_path("/%FF"), None);
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(
            guess_content_type(Path::new("a.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(guess_content_type(Path::new("a.png")), "image/png");
        assert_eq!(
            guess_content_type(Path::new("a.unknown")),
            "application/octet-stream"
        );
    }
}
