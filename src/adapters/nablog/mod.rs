//! NaBlog: a WordPress RSS feed whose posts embed all media details in HTML.
pub mod extract;

use crate::feed::adapter::{
    alternate_link, category_terms, content_body, link_with_rel, non_empty, text,
};
use crate::feed::{Adapter, ExtractError, FeedDocument};
use crate::model::{Item, ItemExtension, NaBlogMedia, RawItem, Url};
use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Feed};
use scraper::Html;

/// Whether `url` points at a NaBlog feed.
pub fn can_parse(url: &str) -> bool {
    url.contains("nablog") || url.contains("naughtyblog")
}

pub struct NaBlogAdapter {
    remote_url: String,
}

impl NaBlogAdapter {
    pub fn new(remote_url: impl Into<String>) -> Self {
        Self {
            remote_url: remote_url.into(),
        }
    }
}

impl Adapter for NaBlogAdapter {
    fn name(&self) -> &'static str {
        "NABlog"
    }

    fn remote_url(&self) -> &str {
        &self.remote_url
    }

    fn updated(&self, doc: &FeedDocument) -> Option<DateTime<Utc>> {
        doc.feed.updated.or(doc.feed.published)
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

    fn item_comments(&self, doc: &FeedDocument, index: usize, entry: &Entry) -> Option<String> {
        doc.item_comments(index)
            .map(str::to_string)
            .or_else(|| link_with_rel(&entry.links, "replies"))
    }

    fn item_updated(&self, entry: &Entry) -> Option<DateTime<Utc>> {
        entry.published.or(entry.updated)
    }

    fn item_guid(&self, entry: &Entry) -> Option<String> {
        non_empty(&entry.id)
    }

    fn item_description(&self, entry: &Entry) -> Option<String> {
        text(entry.summary.as_ref())
    }

    fn item_content(&self, entry: &Entry) -> Option<String> {
        content_body(entry)
    }

    fn item_categories(&self, entry: &Entry) -> Vec<String> {
        category_terms(entry)
    }

    fn create_item(&self, raw: RawItem) -> Result<Option<Item>, ExtractError> {
        let body = raw.content.as_deref().ok_or(ExtractError::MissingContent)?;
        let doc = Html::parse_fragment(body);

        let thumb_url = extract::title_picture_thumb(&doc)?;
        let title_picture_url = extract::title_picture_url(&doc)?;
        let release_date = extract::release_date(&doc);
        let preview = extract::preview_urls(&doc);
        let video = extract::video_info(&doc)?;
        let download_links = extract::download_links(&doc);

        let (preview_link_url, preview_thumb_url) = match preview {
            Some(p) => (p.link, p.thumb),
            None => (None, None),
        };

        let media = NaBlogMedia {
            title_picture_url,
            release_date,
            preview_link_url,
            preview_thumb_url,
            size: video.size,
            duration: video.duration,
            video: video.video,
            audio: video.audio,
            download_links,
        };

        Ok(Some(
            Item::from_raw(raw)
                .with_thumb(thumb_url)
                .with_extension(ItemExtension::NaBlog(media)),
        ))
    }
}
