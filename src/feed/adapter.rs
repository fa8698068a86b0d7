//! The capability set every feed source implements.
//!
//! [`FeedParser`](super::FeedParser) only ever talks to a `dyn Adapter`. Whether
//! a source serves RSS or Atom, keeps its dates in `pubDate` or `<updated>`, or
//! hides half its data inside HTML, is the adapter's business.
use crate::feed::FeedDocument;
use crate::model::{Item, RawItem, Url};
use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Feed, Text};
use thiserror::Error;

/// Why an entry's embedded HTML could not be turned into an item.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The entry carries no content body to extract from.
    #[error("entry has no content body")]
    MissingContent,

    /// The positional anchor/image structure the source always uses is absent.
    #[error("missing title picture: {0}")]
    MissingTitlePicture(&'static str),

    /// Size/Duration/Video/Audio labels are missing, split across parents, or out of order.
    #[error("malformed video-info block: {0}")]
    MalformedVideoInfo(String),
}

/// Source-specific field access plus the item factory.
///
/// Implementations are bound to one remote URL and hold no per-parse state.
pub trait Adapter: Send + Sync {
    /// Display name of the source.
    fn name(&self) -> &'static str;

    /// The feed URL this adapter was built for.
    fn remote_url(&self) -> &str;

    fn updated(&self, doc: &FeedDocument) -> Option<DateTime<Utc>>;

    fn link(&self, doc: &FeedDocument) -> Url;

    /// The part of the document holding channel metadata.
    fn channel<'a>(&self, doc: &'a FeedDocument) -> &'a Feed;

    fn title_field(&self, channel: &Feed) -> String;

    fn description(&self, channel: &Feed) -> String;

    fn site(&self, channel: &Feed) -> Option<Url>;

    fn item_title(&self, entry: &Entry) -> String;

    fn item_link(&self, entry: &Entry) -> Option<Url>;

    /// `index` is the entry's position in `doc.feed.entries`.
    fn item_comments(&self, doc: &FeedDocument, index: usize, entry: &Entry) -> Option<String>;

    fn item_updated(&self, entry: &Entry) -> Option<DateTime<Utc>>;

    fn item_guid(&self, entry: &Entry) -> Option<String>;

    fn item_description(&self, entry: &Entry) -> Option<String>;

    /// Body of the entry's first content element.
    fn item_content(&self, entry: &Entry) -> Option<String>;

    fn item_categories(&self, entry: &Entry) -> Vec<String>;

    /// Builds an item from the raw fields.
    ///
    /// `Ok(None)` means the entry is not usable for this source and is dropped
    /// quietly. `Err` means the entry looked like one of ours but its embedded
    /// markup broke an assumption.
    fn create_item(&self, raw: RawItem) -> Result<Option<Item>, ExtractError>;
}

// ============================================================================
// Field helpers shared by adapters
// ============================================================================

pub(crate) fn text(t: Option<&Text>) -> Option<String> {
    t.map(|t| t.content.clone())
}

/// First link without a `rel`, or with `rel="alternate"`.
pub(crate) fn alternate_link(links: &[feed_rs::model::Link]) -> Option<Url> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .map(|l| Url::new(l.href.clone()))
}

pub(crate) fn link_with_rel(links: &[feed_rs::model::Link], rel: &str) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.as_deref() == Some(rel))
        .map(|l| l.href.clone())
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn content_body(entry: &Entry) -> Option<String> {
    entry.content.as_ref().and_then(|c| c.body.clone())
}

pub(crate) fn category_terms(entry: &Entry) -> Vec<String> {
    entry.categories.iter().map(|c| c.term.clone()).collect()
}
