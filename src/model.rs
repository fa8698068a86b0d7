//! Value types produced by a parse: [`Channel`], [`Item`] and [`Url`].
//!
//! Every parse builds a fresh object graph. A `Channel` owns its items and each
//! item owns its URLs, so nothing here is shared between parses.
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

// ============================================================================
// Url
// ============================================================================

/// A URL as it appeared in the feed.
///
/// No validation happens here. Malformed values are carried through untouched
/// and only fail once something tries to dereference them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Url(String);

impl Url {
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Url {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Url {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Url {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Item
// ============================================================================

/// Raw per-entry fields gathered by the generic traversal and handed to
/// [`Adapter::create_item`](crate::feed::Adapter::create_item).
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    pub title: String,
    pub link: Option<Url>,
    pub comments: Option<String>,
    pub published: NaiveDateTime,
    pub guid: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub categories: Vec<String>,
}

/// One feed entry after adaptation.
///
/// `published` is a timezone-naive local timestamp (see
/// [`feed::timestamp`](crate::feed::timestamp)).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub title: String,
    pub link: Option<Url>,
    pub thumb_url: Option<Url>,
    pub comments: Option<String>,
    pub published: NaiveDateTime,
    pub guid: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub categories: Vec<String>,
    /// Source-specific fields. The generic pipeline never looks at these.
    #[serde(skip_serializing_if = "ItemExtension::is_none")]
    pub extension: ItemExtension,
}

impl Item {
    /// Builds a plain item from raw fields with no thumbnail and no extension.
    pub fn from_raw(raw: RawItem) -> Self {
        Self {
            title: raw.title,
            link: raw.link,
            thumb_url: None,
            comments: raw.comments,
            published: raw.published,
            guid: raw.guid,
            description: raw.description,
            content: raw.content,
            categories: raw.categories,
            extension: ItemExtension::None,
        }
    }

    pub fn with_thumb(mut self, thumb_url: Url) -> Self {
        self.thumb_url = Some(thumb_url);
        self
    }

    pub fn with_extension(mut self, extension: ItemExtension) -> Self {
        self.extension = extension;
        self
    }

    pub fn nablog(&self) -> Option<&NaBlogMedia> {
        match &self.extension {
            ItemExtension::NaBlog(media) => Some(media),
            ItemExtension::None => None,
        }
    }
}

/// Source-specific data attached to an [`Item`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ItemExtension {
    #[default]
    None,
    NaBlog(NaBlogMedia),
}

impl ItemExtension {
    pub fn is_none(&self) -> bool {
        matches!(self, ItemExtension::None)
    }
}

/// Media fields recovered from a NaBlog post body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NaBlogMedia {
    /// Target of the first anchor in the post (the full-size title picture).
    pub title_picture_url: Url,
    /// Text of the first `<em>` mentioning "Released", label included.
    pub release_date: Option<String>,
    pub preview_link_url: Option<Url>,
    pub preview_thumb_url: Option<Url>,
    pub size: String,
    pub duration: String,
    pub video: String,
    pub audio: String,
    pub download_links: Vec<Url>,
}

// ============================================================================
// Channel
// ============================================================================

/// One parsed feed. Items keep the order of the source document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    pub title: String,
    /// Location the feed document was fetched from.
    pub link: Url,
    /// The website the feed belongs to, when the feed names one.
    pub site: Option<Url>,
    pub description: String,
    pub updated: NaiveDateTime,
    pub items: Vec<Item>,
}

impl Channel {
    pub fn new(
        title: String,
        link: Url,
        site: Option<Url>,
        description: String,
        updated: NaiveDateTime,
    ) -> Self {
        Self {
            title,
            link,
            site,
            description,
            updated,
            items: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn published() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn raw() -> RawItem {
        RawItem {
            title: "Post".to_string(),
            link: Some(Url::new("https://example.com/post")),
            comments: None,
            published: published(),
            guid: Some("guid-1".to_string()),
            description: None,
            content: Some("<p>hi</p>".to_string()),
            categories: vec!["a".to_string()],
        }
    }

    #[test]
    fn test_url_keeps_invalid_input() {
        let url = Url::new("not a url at all");
        assert_eq!(url.as_str(), "not a url at all");
        assert_eq!(url.to_string(), "not a url at all");
    }

    #[test]
    fn test_url_equality_is_raw_string() {
        assert_eq!(Url::from("https://a/"), Url::new("https://a/".to_string()));
        assert_ne!(Url::from("https://a/"), Url::from("https://a"));
    }

    #[test]
    fn test_item_from_raw_has_no_extension() {
        let item = Item::from_raw(raw());
        assert_eq!(item.title, "Post");
        assert!(item.thumb_url.is_none());
        assert!(item.extension.is_none());
        assert!(item.nablog().is_none());
        assert_eq!(item.categories, vec!["a".to_string()]);
    }

    #[test]
    fn test_new_channel_is_empty() {
        let channel = Channel::new(
            "Feed".into(),
            Url::from("https://example.com/feed"),
            None,
            String::new(),
            published(),
        );
        assert!(channel.items.is_empty());
    }

    #[test]
    fn test_serialized_item_omits_empty_extension() {
        let item = Item::from_raw(raw()).with_thumb(Url::from("https://example.com/t.jpg"));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["thumb_url"], "https://example.com/t.jpg");
        assert!(json.get("extension").is_none());
    }
}
