//! Content categories.
//!
//! The category set is closed: each variant statically carries its
//! required front matter fields and the template file it renders with,
//! so an unrecognized `template` value can never slip past validation.

use std::fmt;

/// Content category, selected by the `template` front matter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Site landing pages (`template = "index"`).
    Index,
    /// Standalone pages (`template = "page"`).
    Page,
    /// Dated blog posts (`template = "post"`).
    Post,
}

impl Category {
    /// All categories, in template-resolution order.
    pub const ALL: &[Self] = &[Self::Index, Self::Page, Self::Post];

    /// Resolve a `template` front matter value to a category.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "index" => Some(Self::Index),
            "page" => Some(Self::Page),
            "post" => Some(Self::Post),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Page => "page",
            Self::Post => "post",
        }
    }

    /// Front matter fields that must be present for this category.
    pub const fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Index | Self::Page => &["title"],
            Self::Post => &["title", "date"],
        }
    }

    /// Template file name under the theme directory.
    pub const fn template_file(self) -> &'static str {
        match self {
            Self::Index => "index.html",
            Self::Page => "page.html",
            Self::Post => "post.html",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
