//! r/EarthPorn: a Reddit Atom feed of landscape photos.
//!
//! Only posts that embed an image are kept; the first `<img>` becomes the
//! thumbnail.
use crate::adapters::html::first_image;
use crate::feed::adapter::{alternate_link, category_terms, content_body, non_empty, text};
use crate::feed::{Adapter, ExtractError, FeedDocument};
use crate::model::{Item, RawItem, Url};
use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Feed};
use scraper::Html;

/// Whether `url` points at the r/EarthPorn feed.
pub fn can_parse(url: &str) -> bool {
    url.to_ascii_lowercase().contains("earthporn")
}

pub struct EarthPornAdapter {
    remote_url: String,
}

impl EarthPornAdapter {
    pub fn new(remote_url: impl Into<String>) -> Self {
        Self {
            remote_url: remote_url.into(),
        }
    }
}

impl Adapter for EarthPornAdapter {
    fn name(&self) -> &'static str {
        "Earth Porn"
    }

    fn remote_url(&self) -> &str {
        &self.remote_url
    }

    fn updated(&self, doc: &FeedDocument) -> Option<DateTime<Utc>> {
        doc.feed.updated
    }

    fn link(&self, doc: &FeedDocument) -> Url {
        Url::new(doc.href.clone())
    }

    fn channel<'a>(&self, doc: &'a FeedDocument) -> &'a Feed {
        &doc.feed
    }

    fn title_field(&self, channel: &Feed) -> String {
        text(channel.title.as_ref()).unwrap_or_else(|| self.name().to_string())
    }

    // Atom <subtitle>
    fn description(&self, channel: &Feed) -> String {
        text(channel.description.as_ref()).unwrap_or_default()
    }

    fn site(&self, channel: &Feed) -> Option<Url> {
        alternate_link(&channel.links)
    }

    fn item_title(&self, entry: &Entry) -> String {
        text(entry.title.as_ref()).unwrap_or_else(|| "Untitled".to_string())
    }

    fn item_link(&self, entry: &Entry) -> Option<Url> {
        alternate_link(&entry.links)
    }

    fn item_comments(
        &self,
        _doc: &FeedDocument,
        _index: usize,
        _entry: &Entry,
    ) -> Option<String> {
        None
    }

    fn item_updated(&self, entry: &Entry) -> Option<DateTime<Utc>> {
        entry.updated
    }

    fn item_guid(&self, entry: &Entry) -> Option<String> {
        non_empty(&entry.id)
    }

    fn item_description(&self, _entry: &Entry) -> Option<String> {
        None
    }

    fn item_content(&self, entry: &Entry) -> Option<String> {
        content_body(entry)
    }

    fn item_categories(&self, entry: &Entry) -> Vec<String> {
        category_terms(entry)
    }

    fn create_item(&self, raw: RawItem) -> Result<Option<Item>, ExtractError> {
        let Some(body) = raw.content.as_deref() else {
            return Ok(None);
        };
        let Some(thumb) = first_image(&Html::parse_fragment(body)) else {
            return Ok(None);
        };
        Ok(Some(Item::from_raw(raw).with_thumb(thumb)))
    }
}
