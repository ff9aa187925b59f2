//! Post editing vocabulary: the slug route parameter, submitted intents, and
//! required-field validation for submitted post forms.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Route parameter value that addresses the "create a new post" editor.
pub const NEW_POST_SENTINEL: &str = "new";

pub const TITLE_REQUIRED: &str = "Title is required!";
pub const SLUG_REQUIRED: &str = "Slug is required!";
pub const MARKDOWN_REQUIRED: &str = "Markdown is required!";
pub const SLUG_NOT_URL_SAFE: &str =
    "Slug may only contain letters, digits, dashes and underscores!";

/// Slug segment of an admin editor route: either an existing post or the
/// `new` sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugParam {
    New,
    Existing(String),
}

impl SlugParam {
    /// Parse a raw route segment. An empty segment breaks the route contract.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::invariant("slug is required"));
        }

        if raw == NEW_POST_SENTINEL {
            Ok(Self::New)
        } else {
            Ok(Self::Existing(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::New => NEW_POST_SENTINEL,
            Self::Existing(slug) => slug.as_str(),
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }
}

impl Display for SlugParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutation requested by a submitted editor form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostIntent {
    Create,
    Update,
    Delete,
}

impl PostIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Intent implied by the editor when the form omits one.
    pub fn default_for(slug_param: &SlugParam) -> Self {
        if slug_param.is_new() {
            Self::Create
        } else {
            Self::Update
        }
    }
}

impl Display for PostIntent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostIntent {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(DomainError::validation(format!("unknown intent `{other}`"))),
        }
    }
}

/// Raw editor fields as submitted; any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostFormFields {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub markdown: Option<String>,
}

/// Per-field validation outcome. Every key is always present; `None` means valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub title: Option<&'static str>,
    pub slug: Option<&'static str>,
    pub markdown: Option<&'static str>,
}

impl ValidationErrors {
    pub fn is_valid(&self) -> bool {
        self.title.is_none() && self.slug.is_none() && self.markdown.is_none()
    }
}

/// Fully validated post content ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub markdown: String,
}

impl PostFormFields {
    /// Check that every field is present and non-empty, and that the slug
    /// can be used as a path segment without escaping.
    pub fn validate(&self) -> Result<PostDraft, ValidationErrors> {
        let title = required(self.title.as_deref()).ok_or(TITLE_REQUIRED);
        let slug = required(self.slug.as_deref())
            .ok_or(SLUG_REQUIRED)
            .and_then(|slug| {
                if is_url_safe_slug(slug) {
                    Ok(slug)
                } else {
                    Err(SLUG_NOT_URL_SAFE)
                }
            });
        let markdown = required(self.markdown.as_deref()).ok_or(MARKDOWN_REQUIRED);

        match (title, slug, markdown) {
            (Ok(title), Ok(slug), Ok(markdown)) => Ok(PostDraft {
                title: title.to_string(),
                slug: slug.to_string(),
                markdown: markdown.to_string(),
            }),
            (title, slug, markdown) => Err(ValidationErrors {
                title: title.err(),
                slug: slug.err(),
                markdown: markdown.err(),
            }),
        }
    }
}

fn required(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn is_url_safe_slug(slug: &str) -> bool {
    slug.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
