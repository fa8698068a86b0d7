//! Fetches RSS/Atom feeds and recovers the media fields some sources only
//! publish inside the HTML of each entry.
//!
//! A [`feed::FeedParser`] walks any feed through a source-specific
//! [`feed::Adapter`]; [`feed::select_adapter`] picks that adapter from the feed
//! URL. The result is a [`model::Channel`].

pub mod adapters;
pub mod config;
pub mod feed;
pub mod model;
pub mod util;
