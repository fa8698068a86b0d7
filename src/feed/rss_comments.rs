//! Recovers the RSS 2.0 `<comments>` element, which `feed-rs` does not model.
//!
//! The scan only tracks `<item>` boundaries and the direct `<comments>` child of
//! each item, so the result lines up with `Feed::entries` by position. Prefixed
//! elements such as WordPress's `<slash:comments>` count are not matched.
use quick_xml::events::Event;
use quick_xml::Reader;

/// One slot per `<item>` in document order, `None` where the item has no
/// non-empty `<comments>`.
///
/// Returns an empty list if the bytes cannot be scanned; callers treat that the
/// same as a feed without comments.
pub(crate) fn scan(bytes: &[u8]) -> Vec<Option<String>> {
    match scan_items(bytes) {
        Ok(comments) => comments,
        Err(e) => {
            tracing::debug!(error = %e, "Skipping RSS comments scan");
            Vec::new()
        }
    }
}

fn scan_items(bytes: &[u8]) -> Result<Vec<Option<String>>, String> {
    // quick-xml (0.37) never expands DOCTYPE entity declarations; only the XML
    // builtins are unescaped.
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut comments = Vec::new();
    let mut buf = Vec::new();
    let mut in_item = false;
    // Element depth below the current <item>.
    let mut depth: usize = 0;
    let mut capture: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf).map_err(|e| e.to_string())? {
            Event::Start(e) => {
                if !in_item {
                    if e.local_name().as_ref() == b"item" {
                        in_item = true;
                        depth = 0;
                        comments.push(None);
                    }
                } else {
                    depth += 1;
                    if depth == 1 && e.name().as_ref() == b"comments" {
                        capture = Some(String::new());
                    }
                }
            }
            Event::Empty(e) if !in_item && e.local_name().as_ref() == b"item" => {
                comments.push(None);
            }
            Event::End(_) if in_item => {
                if depth == 0 {
                    in_item = false;
                } else {
                    if depth == 1 {
                        if let Some(text) = capture.take() {
                            let text = text.trim();
                            if let Some(slot) = comments.last_mut() {
                                *slot = (!text.is_empty()).then(|| text.to_string());
                            }
                        }
                    }
                    depth -= 1;
                }
            }
            Event::Text(t) => {
                if let Some(acc) = capture.as_mut() {
                    acc.push_str(&t.unescape().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(c) => {
                if let Some(acc) = capture.as_mut() {
                    acc.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(comments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WORDPRESS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
    xmlns:wfw="http://wellformedweb.org/CommentAPI/"
    xmlns:slash="http://purl.org/rss/1.0/modules/slash/">
<channel>
<title>Blog</title>
<item>
  <title>First</title>
  <link>https://blog.example/first/</link>
  <comments>https://blog.example/first/#respond</comments>
  <wfw:commentRss>https://blog.example/first/feed/</wfw:commentRss>
  <slash:comments>4</slash:comments>
</item>
<item>
  <title>Second</title>
  <slash:comments>0</slash:comments>
</item>
<item>
  <title>Third</title>
  <comments><![CDATA[https://blog.example/third/?a=1&b=2]]></comments>
</item>
<item>
  <title>Fourth</title>
  <comments>https://blog.example/fourth/?a=1&amp;b=2</comments>
</item>
</channel>
</rss>"#;

    #[test]
    fn test_wordpress_comments_by_position() {
        assert_eq!(
            scan(WORDPRESS.as_bytes()),
            vec![
                Some("https://blog.example/first/#respond".to_string()),
                None,
                Some("https://blog.example/third/?a=1&b=2".to_string()),
                Some("https://blog.example/fourth/?a=1&b=2".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_comments_element_ignored() {
        let xml = "<rss><channel><item><media:group><comments>x</comments></media:group></item>\
                   <item><comments>  </comments></item></channel></rss>";
        assert_eq!(scan(xml.as_bytes()), vec![None, None]);
    }

    #[test]
    fn test_atom_has_no_items() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><id>a</id></entry></feed>"#;
        assert!(scan(xml.as_bytes()).is_empty());
    }

    #[test]
    fn test_broken_xml_yields_nothing() {
        assert!(scan(b"<rss><channel><item></channel>").is_empty());
    }
}
