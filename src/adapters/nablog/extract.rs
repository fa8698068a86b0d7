//! Field recovery from NaBlog post bodies.
//!
//! A NaBlog post is free-form HTML, but the blog's template is stable enough to
//! rely on position: the first linked image is the title picture, a paragraph
//! headed "Preview:" carries the preview, and one block holds the bold
//! Size/Duration/Video/Audio labels with their values in between.
use crate::adapters::html::{selector, IMAGE};
use crate::feed::ExtractError;
use crate::model::Url;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static ANCHOR_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("a > img"));
static EMPHASIS: LazyLock<Selector> = LazyLock::new(|| selector("em"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static BOLD: LazyLock<Selector> = LazyLock::new(|| selector("strong, b"));

const PREVIEW_LABEL: &str = "Preview:";
const RELEASE_MARKER: &str = "Released";
const VIDEO_LABELS: [&str; 4] = ["Size:", "Duration:", "Video:", "Audio:"];

/// Link and image of the "Preview:" paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub link: Option<Url>,
    pub thumb: Option<Url>,
}

/// Values following the four bold video labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub size: String,
    pub duration: String,
    pub video: String,
    pub audio: String,
}

/// `href` of the first anchor in the post.
pub fn title_picture_url(doc: &Html) -> Result<Url, ExtractError> {
    let anchor = doc
        .select(&ANCHOR)
        .next()
        .ok_or(ExtractError::MissingTitlePicture("post has no anchor"))?;
    anchor
        .value()
        .attr("href")
        .map(Url::from)
        .ok_or(ExtractError::MissingTitlePicture("first anchor has no href"))
}

/// `src` of the first image wrapped directly in an anchor.
pub fn title_picture_thumb(doc: &Html) -> Result<Url, ExtractError> {
    let image = doc
        .select(&ANCHOR_IMAGE)
        .next()
        .ok_or(ExtractError::MissingTitlePicture("post has no linked image"))?;
    image
        .value()
        .attr("src")
        .map(Url::from)
        .ok_or(ExtractError::MissingTitlePicture("linked image has no src"))
}

/// Text of the first `<em>` mentioning the release, e.g. `"Released: 2024-03-01"`.
///
/// The label is left in place.
pub fn release_date(doc: &Html) -> Option<String> {
    doc.select(&EMPHASIS)
        .map(|em| em.text().collect::<String>())
        .find(|text| text.contains(RELEASE_MARKER))
}

/// The first paragraph whose bold header reads exactly "Preview:".
pub fn preview_urls(doc: &Html) -> Option<Preview> {
    doc.select(&PARAGRAPH).find_map(|paragraph| {
        let header = paragraph
            .select(&BOLD)
            .map(|b| b.text().collect::<String>().trim().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        if header != PREVIEW_LABEL {
            return None;
        }

        Some(Preview {
            link: first_attr(paragraph, &ANCHOR, "href"),
            thumb: first_attr(paragraph, &IMAGE, "src"),
        })
    })
}

fn first_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<Url> {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(Url::from)
}

/// Size, duration, video and audio values.
///
/// The four labels must sit under one parent element. The values are whatever
/// lies between consecutive labels in that parent's serialized markup, which
/// copes with stray text and inline tags between them.
pub fn video_info(doc: &Html) -> Result<VideoInfo, ExtractError> {
    let mut labels = Vec::with_capacity(VIDEO_LABELS.len());
    for name in VIDEO_LABELS {
        let label = doc
            .select(&BOLD)
            .find(|b| b.text().collect::<String>().contains(name))
            .ok_or_else(|| ExtractError::MalformedVideoInfo(format!("no `{name}` label")))?;
        labels.push(label);
    }

    let parent = labels[0]
        .parent()
        .and_then(ElementRef::wrap)
        .ok_or_else(|| ExtractError::MalformedVideoInfo("labels have no parent element".into()))?;
    if labels
        .iter()
        .any(|label| label.parent().map(|p| p.id()) != Some(parent.id()))
    {
        return Err(ExtractError::MalformedVideoInfo(
            "Size, Duration, Video and Audio not in same parent".into(),
        ));
    }

    let parent_html = parent.html();
    let pattern = format!(
        "(?s).*{}(.*){}(.*){}(.*){}(.*)",
        regex::escape(&labels[0].html()),
        regex::escape(&labels[1].html()),
        regex::escape(&labels[2].html()),
        regex::escape(&labels[3].html()),
    );
    let re = Regex::new(&pattern).map_err(|e| ExtractError::MalformedVideoInfo(e.to_string()))?;
    let captures = re.captures(&parent_html).ok_or_else(|| {
        ExtractError::MalformedVideoInfo("labels are not in Size, Duration, Video, Audio order".into())
    })?;

    let closing_tag = format!("</{}>", parent.value().name());
    let field = |group: usize| {
        let raw = captures.get(group).map_or("", |m| m.as_str());
        clean_video_field(raw, &closing_tag)
    };

    Ok(VideoInfo {
        size: field(1),
        duration: field(2),
        video: field(3),
        audio: field(4),
    })
}

/// Cuts a captured value at the parent's closing tag and at the first `|`
/// (which starts a free-form note), then trims it.
fn clean_video_field(raw: &str, closing_tag: &str) -> String {
    let value = raw.find(closing_tag).map_or(raw, |i| &raw[..i]);
    let value = value.find('|').map_or(value, |i| &value[..i]);
    value.trim().to_string()
}

/// Hoster download links. Not extracted yet; always empty.
pub fn download_links(_doc: &Html) -> Vec<Url> {
    Vec::new()
}
