//! End-to-end tests: adapter selection, HTTP fetch against a mock server, and
//! traversal into a `Channel`.
//!
//! Each test starts its own `MockServer`. Feed paths embed the source name so
//! that URL-based adapter selection works against the mock host.

use feedsift::config::{FetchConfig, ItemErrorPolicy, SelectionMode};
use feedsift::feed::{get_parser, select_adapter, FeedParser, FetchError, ParseError, Stage};
use feedsift::model::Url;
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetch_config() -> FetchConfig {
    FetchConfig {
        allow_private_hosts: true,
        ..FetchConfig::default()
    }
}

fn nablog_post(n: usize) -> String {
    format!(
        r#"<p><a href="https://img.example/full/{n}.jpg"><img src="https://img.example/thumb/{n}.jpg"/></a></p>
<p><em>Released: 2024-03-0{n}</em></p>
<p><strong>Size:</strong> {n}00 MB <strong>Duration:</strong> 00:1{n}:00 <strong>Video:</strong> 1280x720 <strong>Audio:</strong> AAC | stereo</p>"#
    )
}

const SPLIT_POST: &str = r#"<p><a href="https://img.example/full/x.jpg"><img src="https://img.example/thumb/x.jpg"/></a></p>
<div><strong>Size:</strong> 1 GB</div><div><strong>Duration:</strong> 1:00 <strong>Video:</strong> SD <strong>Audio:</strong> MP3</div>"#;

fn nablog_rss(bodies: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/"><channel>
<title>NaBlog</title>
<link>https://www.nablog.example/</link>
<description>Latest posts</description>
<lastBuildDate>Tue, 05 Mar 2024 18:45:30 +0000</lastBuildDate>
"#,
    );
    for (i, body) in bodies.iter().enumerate() {
        xml.push_str(&format!(
            "<item><title>Post {i}</title><link>https://www.nablog.example/p{i}/</link>\
             <guid>https://www.nablog.example/?p={i}</guid>\
             <comments>https://www.nablog.example/p{i}/#respond</comments>\
             <pubDate>Mon, 04 Mar 2024 1{i}:00:00 +0000</pubDate>\
             <content:encoded><![CDATA[{body}]]></content:encoded></item>\n"
        ));
    }
    xml.push_str("</channel></rss>");
    xml
}

async fn serve(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("Content-Type", "application/rss+xml"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_nablog_feed_end_to_end() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/nablog/feed/",
        nablog_rss(&[nablog_post(1), nablog_post(2)]),
    )
    .await;

    let url = format!("{}/nablog/feed/", server.uri());
    let adapter = get_parser(&url).expect("nablog adapter");
    let client = reqwest::Client::new();
    let channel = FeedParser::new(adapter)
        .parse(&client, &fetch_config())
        .await
        .unwrap();

    assert_eq!(channel.title, "NaBlog");
    assert_eq!(channel.link, Url::new(url.clone()));
    assert_eq!(
        channel.updated.format("%Y-%m-%d %H:%M:%S").to_string(),
        "2024-03-05 18:45:30"
    );
    assert_eq!(channel.items.len(), 2);

    let second = &channel.items[1];
    assert_eq!(second.title, "Post 1");
    assert_eq!(
        second.comments.as_deref(),
        Some("https://www.nablog.example/p1/#respond")
    );
    assert_eq!(
        second.published.format("%Y-%m-%d %H:%M").to_string(),
        "2024-03-04 11:00"
    );
    assert_eq!(
        second.thumb_url,
        Some(Url::from("https://img.example/thumb/2.jpg"))
    );
    let media = second.nablog().expect("nablog media");
    assert_eq!(media.size, "200 MB");
    assert_eq!(media.duration, "00:12:00");
    assert_eq!(media.video, "1280x720");
    assert_eq!(media.audio, "AAC");
    assert_eq!(media.release_date.as_deref(), Some("Released: 2024-03-02"));
    assert_eq!(media.preview_link_url, None);
}

#[tokio::test]
async fn test_malformed_item_skipped_or_fatal_by_policy() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/nablog/feed/",
        nablog_rss(&[nablog_post(1), SPLIT_POST.to_string(), nablog_post(3)]),
    )
    .await;

    let url = format!("{}/nablog/feed/", server.uri());
    let client = reqwest::Client::new();

    let channel = FeedParser::new(get_parser(&url).unwrap())
        .parse(&client, &fetch_config())
        .await
        .unwrap();
    let titles: Vec<_> = channel.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Post 0", "Post 2"]);

    let err = FeedParser::new(get_parser(&url).unwrap())
        .with_item_error_policy(ItemErrorPolicy::Abort)
        .parse(&client, &fetch_config())
        .await
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Entry(1));
    assert!(err.to_string().contains(&url));
}

#[tokio::test]
async fn test_first_image_feed_drops_text_posts() {
    let entry = |id: &str, content: &str| {
        format!(
            r#"<entry><id>{id}</id><title>{id}</title>
<link href="https://www.reddit.com/r/EarthPorn/comments/{id}/"/>
<updated>2024-05-01T09:00:00+00:00</updated>
<content type="html">{content}</content></entry>"#
        )
    };
    let img = |src: &str| format!("&lt;a href=&quot;x&quot;&gt;&lt;img src=&quot;{src}&quot;/&gt;&lt;/a&gt;");
    let atom = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
<title>EarthPorn</title>
<updated>2024-05-01T12:00:00+00:00</updated>
<id>/r/EarthPorn/.rss</id>
{}
{}
{}
{}
</feed>"#,
        entry("a", &img("https://i.redd.it/a.jpg")),
        entry("b", "&lt;p&gt;text only&lt;/p&gt;"),
        entry("c", &img("https://i.redd.it/c.jpg")),
        entry("d", &img("https://i.redd.it/d.jpg")),
    );

    let server = MockServer::start().await;
    serve(&server, "/r/EarthPorn/.rss", atom).await;

    let url = format!("{}/r/EarthPorn/.rss", server.uri());
    let adapter = select_adapter(&url, SelectionMode::Discovery).expect("earthporn adapter");
    assert_eq!(adapter.name(), "Earth Porn");

    let client = reqwest::Client::new();
    let channel = FeedParser::new(adapter)
        .parse(&client, &fetch_config())
        .await
        .unwrap();

    assert_eq!(channel.items.len(), 3);
    let thumbs: Vec<_> = channel
        .items
        .iter()
        .map(|i| i.thumb_url.as_ref().map(Url::as_str).unwrap_or_default())
        .collect();
    assert_eq!(
        thumbs,
        vec![
            "https://i.redd.it/a.jpg",
            "https://i.redd.it/c.jpg",
            "https://i.redd.it/d.jpg"
        ]
    );
}

#[tokio::test]
async fn test_channel_link_follows_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nablog/old/"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("Location", format!("{}/nablog/feed/", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    serve(&server, "/nablog/feed/", nablog_rss(&[nablog_post(1)])).await;

    let url = format!("{}/nablog/old/", server.uri());
    let client = reqwest::Client::new();
    let channel = FeedParser::new(get_parser(&url).unwrap())
        .parse(&client, &fetch_config())
        .await
        .unwrap();

    assert_eq!(
        channel.link,
        Url::new(format!("{}/nablog/feed/", server.uri()))
    );
    assert_eq!(channel.items.len(), 1);
}

#[tokio::test]
async fn test_fetch_failure_names_url_and_stage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/nablog/feed/", server.uri());
    let client = reqwest::Client::new();
    let err = FeedParser::new(get_parser(&url).unwrap())
        .parse(&client, &fetch_config())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Fetch);
    assert!(err.to_string().contains(&url));
    match err {
        ParseError::Fetch {
            source: FetchError::HttpStatus(503),
            ..
        } => {}
        e => panic!("Expected Fetch(HttpStatus(503)), got {:?}", e),
    }
}

#[tokio::test]
async fn test_empty_feed_yields_empty_channel() {
    let server = MockServer::start().await;
    serve(&server, "/nablog/feed/", nablog_rss(&[])).await;

    let url = format!("{}/nablog/feed/", server.uri());
    let client = reqwest::Client::new();
    let channel = FeedParser::new(get_parser(&url).unwrap())
        .parse(&client, &fetch_config())
        .await
        .unwrap();

    assert_eq!(channel.description, "Latest posts");
    assert!(channel.items.is_empty());
}
