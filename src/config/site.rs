//! `[site]` section configuration.
//!
//! Site metadata, exposed to every template as the `site` variable.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in mdpress.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [site]
/// title = "My Blog"
/// description = "A personal blog about nothing in particular"
/// author = "Alice"
/// url = "https://myblog.com"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Site title displayed in browser tab and headers.
    #[serde(default)]
    pub title: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: String,

    /// Author name.
    #[serde(default)]
    pub author: String,

    /// Base URL of the published site.
    #[serde(default = "defaults::site::url")]
    #[educe(Default = defaults::site::url())]
    pub url: Option<String>,
}
