//! Feed retrieval and the generic traversal.
//!
//! - [`fetcher`] - single HTTP request with timeout and size cap, decoded by `feed-rs`
//! - `rss_comments` - the RSS `<comments>` element `feed-rs` leaves out
//! - [`adapter`] - the [`Adapter`] trait every source implements
//! - [`parser`] - [`FeedParser`], which walks a document through an adapter
//! - [`registry`] - choosing the adapter for a URL
//! - [`timestamp`] - the local-time normalization applied to every date
//!
//! # Example
//!
//! ```ignore
//! use feedsift::config::Config;
//! use feedsift::feed::{build_client, select_adapter, FeedParser};
//!
//! let config = Config::default();
//! let adapter = select_adapter(url, config.selection).expect("no adapter");
//! let client = build_client(&config.fetch)?;
//! let channel = FeedParser::new(adapter).parse(&client, &config.fetch).await?;
//! ```

pub mod adapter;
mod fetcher;
mod parser;
pub mod registry;
mod rss_comments;
pub mod timestamp;

pub use adapter::{Adapter, ExtractError};
pub use fetcher::{build_client, fetch_document, FeedDocument, FetchError};
pub use parser::{FeedParser, ParseError, Stage};
pub use registry::{get_parser, select_adapter, AdapterSpec, Registry};
