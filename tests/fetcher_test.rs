use netnews::fetcher::{entries_from_response, parse_entries};
use reqwest::StatusCode;

const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Tech Wire</title>
    <link>https://example.com</link>
    <description>Technology headlines</description>
    <item>
      <title>First Story</title>
      <link>https://example.com/1</link>
      <description>Body of the first story.</description>
    </item>
    <item>
      <title>Second Story</title>
      <link>https://example.com/2</link>
      <description>Body of the second story.</description>
    </item>
    <item>
      <title>Bare Story</title>
      <link>https://example.com/3</link>
    </item>
  </channel>
</rss>
"#;

#[test]
fn parses_entries_in_feed_order() {
    let entries = parse_entries(RSS_SAMPLE).expect("sample feed should parse");

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].title.as_deref(), Some("First Story"));
    assert_eq!(
        entries[0].description.as_deref(),
        Some("Body of the first story.")
    );
    assert_eq!(entries[0].link.as_deref(), Some("https://example.com/1"));
    assert_eq!(entries[1].title.as_deref(), Some("Second Story"));
}

#[test]
fn missing_description_stays_absent() {
    let entries = parse_entries(RSS_SAMPLE).expect("sample feed should parse");

    // Validation happens in the processor; the fetcher just reports what the
    // feed carried.
    assert_eq!(entries[2].title.as_deref(), Some("Bare Story"));
    assert!(entries[2].description.is_none());
}

#[test]
fn non_feed_content_is_a_parse_error() {
    let result = parse_entries("<html><body>service temporarily unavailable</body></html>");
    assert!(result.is_err());
}

#[test]
fn non_success_status_with_parseable_body_still_yields_entries() {
    // Graceful degradation: some feed servers pair partial content with an
    // error status. The status is only a warning.
    let entries = entries_from_response(StatusCode::INTERNAL_SERVER_ERROR, RSS_SAMPLE)
        .expect("parseable body should win over the status");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].title.as_deref(), Some("First Story"));
}

#[test]
fn non_success_status_with_unparseable_body_is_a_failure() {
    let result = entries_from_response(StatusCode::BAD_GATEWAY, "upstream unavailable");
    assert!(result.is_err());
}
