//! Selector plumbing shared by the HTML-scraping adapters.
use crate::model::Url;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Compiles a selector literal.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

pub(crate) static IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img"));

/// `src` of the first image anywhere in the markup.
pub fn first_image(doc: &Html) -> Option<Url> {
    doc.select(&IMAGE)
        .find_map(|img| img.value().attr("src"))
        .map(Url::from)
}
