//! Global template context.
//!
//! Cross-document data shared by every render: the full post list (sorted
//! by ascending date), the page list, and site metadata. Built once after
//! loading completes and frozen; rendering only ever borrows it, so there
//! is no partial-population hazard and no mutation during the render
//! phase.

use crate::config::SiteConfig;
use crate::content::{ContentDocument, toml_to_json};
use crate::content::category::Category;
use crate::error::BuildError;
use serde_json::Value as JsonValue;

/// Immutable cross-document context, keyed by the reserved template names
/// `posts`, `pages`, `site` and `extra`.
#[derive(Debug)]
pub struct GlobalContext {
    /// All posts as template variables, ascending by date (stable).
    pub posts: JsonValue,
    /// All pages as template variables, in discovery order.
    pub pages: JsonValue,
    /// Site metadata from `[site]` in the config.
    pub site: JsonValue,
    /// User-defined fields from `[extra]` in the config, verbatim.
    pub extra: JsonValue,
}

impl GlobalContext {
    /// Aggregate loaded documents into the global context.
    ///
    /// The loader guarantees every post carries a parsed date; a post
    /// without one here is reported as missing metadata rather than
    /// silently coerced into some sort position.
    pub fn build(
        documents: &[ContentDocument],
        config: &SiteConfig,
    ) -> Result<Self, BuildError> {
        let mut posts: Vec<&ContentDocument> = Vec::new();
        let mut pages: Vec<&ContentDocument> = Vec::new();

        for doc in documents {
            match doc.category {
                Category::Post => posts.push(doc),
                Category::Page => pages.push(doc),
                Category::Index => {}
            }
        }

        for post in &posts {
            if post.date.is_none() {
                return Err(BuildError::MissingMetadata {
                    path: post.source.clone(),
                    field: "date".into(),
                });
            }
        }

        // Stable: equal dates keep discovery order
        posts.sort_by_key(|post| post.date);

        Ok(Self {
            posts: to_array(&posts),
            pages: to_array(&pages),
            site: serde_json::to_value(&config.site).unwrap_or(JsonValue::Null),
            extra: JsonValue::Object(
                config
                    .extra
                    .iter()
                    .map(|(k, v)| (k.clone(), toml_to_json(v)))
                    .collect(),
            ),
        })
    }
}

fn to_array(documents: &[&ContentDocument]) -> JsonValue {
    JsonValue::Array(
        documents
            .iter()
            .map(|doc| JsonValue::Object(doc.template_vars()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::DateTimeUtc;
    use std::path::PathBuf;
    use toml::value::Table;

    fn doc(category: Category, url: &str, date: Option<&str>) -> ContentDocument {
        let mut metadata = Table::new();
        metadata.insert("title".into(), toml::Value::String(url.into()));
        if let Some(date) = date {
            metadata.insert("date".into(), toml::Value::String(date.into()));
        }
        ContentDocument {
            source: PathBuf::from(format!("content{url}.md")),
            category,
            metadata,
            body_html: String::new(),
            url: url.into(),
            date: date.and_then(DateTimeUtc::parse),
        }
    }

    fn urls(value: &JsonValue) -> Vec<&str> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["url"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_posts_sorted_ascending_by_date() {
        let docs = vec![
            doc(Category::Post, "/posts/c", Some("2024-03-01")),
            doc(Category::Post, "/posts/a", Some("2024-01-01")),
            doc(Category::Post, "/posts/b", Some("2024-02-01")),
        ];
        let ctx = GlobalContext::build(&docs, &SiteConfig::default()).unwrap();
        assert_eq!(urls(&ctx.posts), ["/posts/a", "/posts/b", "/posts/c"]);
    }

    #[test]
    fn test_posts_sort_is_stable_for_equal_dates() {
        let docs = vec![
            doc(Category::Post, "/posts/first", Some("2024-01-01")),
            doc(Category::Post, "/posts/second", Some("2024-01-01")),
            doc(Category::Post, "/posts/earlier", Some("2023-01-01")),
        ];
        let ctx = GlobalContext::build(&docs, &SiteConfig::default()).unwrap();
        assert_eq!(
            urls(&ctx.posts),
            ["/posts/earlier", "/posts/first", "/posts/second"]
        );
    }

    #[test]
    fn test_pages_keep_discovery_order() {
        let docs = vec![
            doc(Category::Page, "/b", None),
            doc(Category::Page, "/a", None),
        ];
        let ctx = GlobalContext::build(&docs, &SiteConfig::default()).unwrap();
        assert_eq!(urls(&ctx.pages), ["/b", "/a"]);
    }

    #[test]
    fn test_index_documents_join_no_collection() {
        let docs = vec![doc(Category::Index, "/index", None)];
        let ctx = GlobalContext::build(&docs, &SiteConfig::default()).unwrap();
        assert!(ctx.posts.as_array().unwrap().is_empty());
        assert!(ctx.pages.as_array().unwrap().is_empty());
    }

    #[test]
    fn test_extra_config_fields_pass_through() {
        let mut config = SiteConfig::default();
        config
            .extra
            .insert("analytics_id".into(), toml::Value::String("UA-12345".into()));

        let ctx = GlobalContext::build(&[], &config).unwrap();
        assert_eq!(ctx.extra["analytics_id"], JsonValue::String("UA-12345".into()));
    }

    #[test]
    fn test_post_without_date_is_error() {
        // Unreachable through the loader, but the sort must not coerce
        let docs = vec![doc(Category::Post, "/posts/a", None)];
        let err = GlobalContext::build(&docs, &SiteConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::MissingMetadata { ref field, .. } if field == "date"));
    }
}
