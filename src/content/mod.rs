//! Content loading and validation.
//!
//! Walks the content directory, splits front matter from Markdown bodies,
//! validates required fields per category, and derives each document's
//! canonical URL. All of it happens before any rendering: templates need
//! the full content set (post listings, navigation) in scope, so loading
//! is a strictly separate phase.
//!
//! # Build Flow
//!
//! ```text
//! collect_files() ──► load one ContentDocument per file ──► collision check
//!       │                        │
//!       ▼                        ▼
//!  sorted paths       front matter + markdown + url
//! ```

pub mod category;
pub mod front_matter;
pub mod markdown;

use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::utils::date::DateTimeUtc;
use category::Category;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use toml::Value as TomlValue;
use toml::value::Table;
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Front matter fields reserved for the global template context.
const RESERVED_FIELDS: &[&str] = &["posts", "pages", "site", "extra"];

/// One parsed content file, immutable after loading.
#[derive(Debug, Clone)]
pub struct ContentDocument {
    /// Originating file, kept for diagnostics.
    pub source: PathBuf,
    /// Category resolved from the `template` front matter field.
    pub category: Category,
    /// Front matter fields, verbatim.
    pub metadata: Table,
    /// Body converted to an HTML fragment.
    pub body_html: String,
    /// Output-relative URL: content root prefix and extension stripped,
    /// always starting with `/`.
    pub url: String,
    /// Parsed `date` field; always present for posts.
    pub date: Option<DateTimeUtc>,
}

impl ContentDocument {
    /// Per-document template variables: front matter fields, then the
    /// computed `content` and `url` (which win over same-named fields).
    pub fn template_vars(&self) -> serde_json::Map<String, JsonValue> {
        let mut vars = serde_json::Map::with_capacity(self.metadata.len() + 2);
        for (key, value) in &self.metadata {
            vars.insert(key.clone(), toml_to_json(value));
        }
        vars.insert("content".into(), JsonValue::String(self.body_html.clone()));
        vars.insert("url".into(), JsonValue::String(self.url.clone()));
        vars
    }
}

/// Collect all content files, lexicographically sorted so repeated
/// builds process files in the same order.
pub fn collect_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Load every content file under the configured content root.
///
/// Fails fast on the first invalid document: a partial content set would
/// corrupt the global context, so nothing is skipped or defaulted.
pub fn load_content(config: &SiteConfig) -> Result<Vec<ContentDocument>, BuildError> {
    let content_root = &config.build.content;

    let mut documents = Vec::new();
    let mut seen_urls: HashMap<String, PathBuf> = HashMap::new();

    for path in collect_files(content_root) {
        let doc = load_document(&path, content_root)?;

        if let Some(first) = seen_urls.insert(doc.url.clone(), path.clone()) {
            return Err(BuildError::UrlCollision {
                url: doc.url,
                first,
                second: path,
            });
        }

        documents.push(doc);
    }

    Ok(documents)
}

/// Load and validate a single content file.
fn load_document(path: &Path, content_root: &Path) -> Result<ContentDocument, BuildError> {
    let raw = fs::read_to_string(path).map_err(BuildError::io(path))?;
    let (metadata, body) = front_matter::split(&raw, path)?;

    let category = resolve_category(path, &metadata)?;

    for &field in category.required_fields() {
        if !metadata.contains_key(field) {
            return Err(BuildError::MissingMetadata {
                path: path.to_path_buf(),
                field: field.into(),
            });
        }
    }

    for &field in RESERVED_FIELDS {
        if metadata.contains_key(field) {
            return Err(BuildError::ReservedField {
                path: path.to_path_buf(),
                field: field.into(),
            });
        }
    }

    let date = match metadata.get("date") {
        Some(value) => Some(parse_date(path, value)?),
        None => None,
    };

    Ok(ContentDocument {
        source: path.to_path_buf(),
        category,
        body_html: markdown::to_html(body),
        url: derive_url(path, content_root),
        metadata,
        date,
    })
}

/// Resolve the category from the `template` front matter field.
fn resolve_category(path: &Path, metadata: &Table) -> Result<Category, BuildError> {
    let Some(value) = metadata.get("template") else {
        return Err(BuildError::MissingMetadata {
            path: path.to_path_buf(),
            field: "template".into(),
        });
    };

    // A non-string value can never name a category; report it verbatim
    let name = match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    };
    Category::from_name(&name).ok_or_else(|| BuildError::UnknownCategory {
        path: path.to_path_buf(),
        name,
    })
}

/// Parse the `date` front matter value, never coercing.
///
/// Accepts a TOML string or a native TOML date/datetime.
fn parse_date(path: &Path, value: &TomlValue) -> Result<DateTimeUtc, BuildError> {
    let text = match value {
        TomlValue::String(s) => s.clone(),
        TomlValue::Datetime(dt) => dt.to_string(),
        other => other.to_string(),
    };

    DateTimeUtc::parse(&text).ok_or_else(|| BuildError::InvalidDate {
        path: path.to_path_buf(),
        value: text,
    })
}

/// Derive the canonical URL from a source path.
///
/// The content root prefix and the file extension are stripped, matching
/// the hosting provider's extensionless URL contract:
/// `content/foo/bar.md` → `/foo/bar`.
pub fn derive_url(path: &Path, content_root: &Path) -> String {
    let relative = path.strip_prefix(content_root).unwrap_or(path);
    let stripped = relative.with_extension("");

    let mut url = String::new();
    for component in stripped.components() {
        url.push('/');
        url.push_str(&component.as_os_str().to_string_lossy());
    }
    url
}

/// Convert a TOML front matter value to its JSON template counterpart.
pub fn toml_to_json(value: &TomlValue) -> JsonValue {
    match value {
        TomlValue::String(s) => JsonValue::String(s.clone()),
        TomlValue::Integer(i) => JsonValue::from(*i),
        TomlValue::Float(f) => {
            serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number)
        }
        TomlValue::Boolean(b) => JsonValue::Bool(*b),
        TomlValue::Datetime(dt) => JsonValue::String(dt.to_string()),
        TomlValue::Array(items) => JsonValue::Array(items.iter().map(toml_to_json).collect()),
        TomlValue::Table(table) => JsonValue::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::tempdir;

    fn write_file(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn config_with_content(content: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.content = content.to_path_buf();
        config
    }

    const POST: &str = "+++\ntemplate = \"post\"\ntitle = \"Hello\"\ndate = \"2024-01-01\"\n+++\n# Hi\n";
    const PAGE: &str = "+++\ntemplate = \"page\"\ntitle = \"About\"\n+++\nAbout me.\n";

    #[test]
    fn test_load_round_trip() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "posts/hello.md", POST);
        let config = config_with_content(dir.path());

        let docs = load_content(&config).unwrap();
        assert_eq!(docs.len(), 1);

        let doc = &docs[0];
        assert_eq!(doc.category, Category::Post);
        assert_eq!(doc.url, "/posts/hello");
        assert_eq!(doc.metadata["title"].as_str(), Some("Hello"));
        assert!(doc.body_html.contains("<h1>Hi</h1>"));
        assert_eq!(doc.date, DateTimeUtc::parse("2024-01-01"));
    }

    #[test]
    fn test_load_empty_directory() {
        let dir = tempdir().unwrap();
        let config = config_with_content(dir.path());
        assert!(load_content(&config).unwrap().is_empty());
    }

    #[test]
    fn test_load_order_is_deterministic() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "b.md", PAGE);
        write_file(dir.path(), "a.md", PAGE);
        write_file(dir.path(), "c/d.md", PAGE);
        let config = config_with_content(dir.path());

        let urls: Vec<String> = load_content(&config)
            .unwrap()
            .into_iter()
            .map(|d| d.url)
            .collect();
        assert_eq!(urls, ["/a", "/b", "/c/d"]);
    }

    #[test]
    fn test_missing_template_field() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "a.md", "+++\ntitle = \"x\"\n+++\nbody\n");
        let config = config_with_content(dir.path());

        let err = load_content(&config).unwrap_err();
        assert!(matches!(err, BuildError::MissingMetadata { ref field, .. } if field == "template"));
    }

    #[test]
    fn test_missing_required_field_names_file_and_field() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "posts/no-date.md",
            "+++\ntemplate = \"post\"\ntitle = \"x\"\n+++\nbody\n",
        );
        let config = config_with_content(dir.path());

        let err = load_content(&config).unwrap_err();
        match err {
            BuildError::MissingMetadata { path, field } => {
                assert!(path.ends_with("posts/no-date.md"));
                assert_eq!(field, "date");
            }
            other => panic!("expected MissingMetadata, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_category() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "a.md",
            "+++\ntemplate = \"gallery\"\ntitle = \"x\"\n+++\nbody\n",
        );
        let config = config_with_content(dir.path());

        let err = load_content(&config).unwrap_err();
        assert!(matches!(err, BuildError::UnknownCategory { ref name, .. } if name == "gallery"));
    }

    #[test]
    fn test_non_string_template_reports_value() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "a.md",
            "+++\ntemplate = 5\ntitle = \"x\"\n+++\nbody\n",
        );
        let config = config_with_content(dir.path());

        let err = load_content(&config).unwrap_err();
        assert!(matches!(err, BuildError::UnknownCategory { ref name, .. } if name == "5"));
    }

    #[test]
    fn test_reserved_field_rejected() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "a.md",
            "+++\ntemplate = \"page\"\ntitle = \"x\"\nposts = \"mine\"\n+++\nbody\n",
        );
        let config = config_with_content(dir.path());

        let err = load_content(&config).unwrap_err();
        assert!(matches!(err, BuildError::ReservedField { ref field, .. } if field == "posts"));
    }

    #[test]
    fn test_extra_field_is_reserved() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "a.md",
            "+++\ntemplate = \"page\"\ntitle = \"x\"\nextra = \"mine\"\n+++\nbody\n",
        );
        let config = config_with_content(dir.path());

        let err = load_content(&config).unwrap_err();
        assert!(matches!(err, BuildError::ReservedField { ref field, .. } if field == "extra"));
    }

    #[test]
    fn test_invalid_date_is_fatal() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "a.md",
            "+++\ntemplate = \"post\"\ntitle = \"x\"\ndate = \"someday\"\n+++\nbody\n",
        );
        let config = config_with_content(dir.path());

        let err = load_content(&config).unwrap_err();
        assert!(matches!(err, BuildError::InvalidDate { ref value, .. } if value == "someday"));
    }

    #[test]
    fn test_toml_native_date_accepted() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "a.md",
            "+++\ntemplate = \"post\"\ntitle = \"x\"\ndate = 2024-06-15\n+++\nbody\n",
        );
        let config = config_with_content(dir.path());

        let docs = load_content(&config).unwrap();
        assert_eq!(docs[0].date, DateTimeUtc::parse("2024-06-15"));
    }

    #[test]
    fn test_url_collision_detected() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "about.md", PAGE);
        write_file(dir.path(), "about.txt", PAGE);
        let config = config_with_content(dir.path());

        let err = load_content(&config).unwrap_err();
        match err {
            BuildError::UrlCollision { url, first, second } => {
                assert_eq!(url, "/about");
                assert_ne!(first, second);
            }
            other => panic!("expected UrlCollision, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_extension_still_loaded() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "notes.markdown2", PAGE);
        let config = config_with_content(dir.path());

        let docs = load_content(&config).unwrap();
        assert_eq!(docs[0].url, "/notes");
    }

    #[test]
    fn test_derive_url_nested() {
        let url = derive_url(
            Path::new("content/foo/bar.md"),
            Path::new("content"),
        );
        assert_eq!(url, "/foo/bar");
    }

    #[test]
    fn test_derive_url_root_file() {
        let url = derive_url(Path::new("content/index.md"), Path::new("content"));
        assert_eq!(url, "/index");
    }

    #[test]
    fn test_template_vars_computed_fields_win() {
        let dir = tempdir().unwrap();
        // A `url` front matter field is overridden by the derived URL
        write_file(
            dir.path(),
            "a.md",
            "+++\ntemplate = \"page\"\ntitle = \"x\"\nurl = \"/elsewhere\"\n+++\nbody\n",
        );
        let config = config_with_content(dir.path());

        let docs = load_content(&config).unwrap();
        let vars = docs[0].template_vars();
        assert_eq!(vars["url"], JsonValue::String("/a".into()));
        assert!(vars["content"].as_str().unwrap().contains("body"));
    }
}
