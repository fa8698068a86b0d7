use crate::config::{FetchConfig, ItemErrorPolicy};
use crate::feed::adapter::{Adapter, ExtractError};
use crate::feed::fetcher::{fetch_document, FeedDocument, FetchError};
use crate::feed::timestamp::{self, TimestampError};
use crate::model::{Channel, RawItem};
use std::fmt;
use thiserror::Error;

/// Where in a parse an error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Channel,
    /// Zero-based position of the entry in the document.
    Entry(usize),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch => f.write_str("fetch"),
            Stage::Channel => f.write_str("channel"),
            Stage::Entry(index) => write!(f, "entry #{index}"),
        }
    }
}

/// Fatal errors from [`FeedParser::parse`]. Each names the feed URL and stage.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{url}: fetch failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("{url}: {stage} is missing required field `{field}`")]
    MissingField {
        url: String,
        stage: Stage,
        field: &'static str,
    },

    #[error("{url}: {stage} has an unusable timestamp: {source}")]
    Timestamp {
        url: String,
        stage: Stage,
        #[source]
        source: TimestampError,
    },

    #[error("{url}: {stage} could not be extracted: {source}")]
    Item {
        url: String,
        stage: Stage,
        #[source]
        source: ExtractError,
    },
}

impl ParseError {
    pub fn stage(&self) -> Stage {
        match self {
            ParseError::Fetch { .. } => Stage::Fetch,
            ParseError::MissingField { stage, .. }
            | ParseError::Timestamp { stage, .. }
            | ParseError::Item { stage, .. } => *stage,
        }
    }
}

/// Generic feed traversal driven by an [`Adapter`].
///
/// The parser never inspects feed shape itself; every field comes through the
/// adapter, and the adapter decides which entries become items.
pub struct FeedParser {
    adapter: Box<dyn Adapter>,
    on_item_error: ItemErrorPolicy,
}

impl FeedParser {
    pub fn new(adapter: Box<dyn Adapter>) -> Self {
        Self {
            adapter,
            on_item_error: ItemErrorPolicy::default(),
        }
    }

    pub fn with_item_error_policy(mut self, policy: ItemErrorPolicy) -> Self {
        self.on_item_error = policy;
        self
    }

    /// Fetches the adapter's feed once and traverses it.
    pub async fn parse(
        &self,
        client: &reqwest::Client,
        config: &FetchConfig,
    ) -> Result<Channel, ParseError> {
        let url = self.adapter.remote_url();
        tracing::info!(url = %url, adapter = self.adapter.name(), "Parsing feed");

        let doc = fetch_document(client, url, config)
            .await
            .map_err(|source| ParseError::Fetch {
                url: url.to_string(),
                source,
            })?;

        self.parse_document(&doc)
    }

    /// Traverses an already fetched document.
    ///
    /// Entries whose `create_item` returns `None` are dropped. Entries whose
    /// extraction fails are skipped or abort the parse depending on the
    /// configured [`ItemErrorPolicy`].
    pub fn parse_document(&self, doc: &FeedDocument) -> Result<Channel, ParseError> {
        let adapter = self.adapter.as_ref();
        let url = adapter.remote_url();

        let updated = adapter.updated(doc).ok_or_else(|| ParseError::MissingField {
            url: url.to_string(),
            stage: Stage::Channel,
            field: "updated",
        })?;
        let updated = timestamp::normalize(updated).map_err(|source| ParseError::Timestamp {
            url: url.to_string(),
            stage: Stage::Channel,
            source,
        })?;
        let link = adapter.link(doc);

        let channel_meta = adapter.channel(doc);
        let mut channel = Channel::new(
            adapter.title_field(channel_meta),
            link,
            adapter.site(channel_meta),
            adapter.description(channel_meta),
            updated,
        );

        let mut dropped = 0usize;
        let mut failed = 0usize;

        for (index, entry) in doc.feed.entries.iter().enumerate() {
            let stage = Stage::Entry(index);
            let published = adapter
                .item_updated(entry)
                .ok_or_else(|| ParseError::MissingField {
                    url: url.to_string(),
                    stage,
                    field: "published",
                })?;
            let published = timestamp::normalize(published).map_err(|source| {
                ParseError::Timestamp {
                    url: url.to_string(),
                    stage,
                    source,
                }
            })?;

            let raw = RawItem {
                title: adapter.item_title(entry),
                link: adapter.item_link(entry),
                comments: adapter.item_comments(doc, index, entry),
                published,
                guid: adapter.item_guid(entry),
                description: adapter.item_description(entry),
                content: adapter.item_content(entry),
                categories: adapter.item_categories(entry),
            };

            match adapter.create_item(raw) {
                Ok(Some(item)) => channel.items.push(item),
                Ok(None) => {
                    dropped += 1;
                    tracing::debug!(url = %url, entry = index, "Entry not adaptable, dropped");
                }
                Err(source) => match self.on_item_error {
                    ItemErrorPolicy::Skip => {
                        failed += 1;
                        tracing::warn!(
                            url = %url,
                            entry = index,
                            error = %source,
                            "Skipping entry with malformed embedded content"
                        );
                    }
                    ItemErrorPolicy::Abort => {
                        return Err(ParseError::Item {
                            url: url.to_string(),
                            stage,
                            source,
                        });
                    }
                },
            }
        }

        tracing::info!(
            url = %url,
            items = channel.items.len(),
            dropped = dropped,
            failed = failed,
            "Feed parsed"
        );

        Ok(channel)
    }
}
