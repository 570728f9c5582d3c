// ABOUTME: Integration tests for parsing feeds and building the episode payload.
// ABOUTME: Covers podcast RSS, Atom, guid-less entries, date fallbacks and JSON round-trips.

use chrono::{TimeZone, Utc};
use episodes_feed::{
    build_payload, parse_feed_bytes, read_payload, to_json_string, write_payload, BuildOptions,
    DurationValue, Payload,
};
use pretty_assertions::assert_eq;

const PODCAST_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
    <channel>
        <title>Tech Podcast</title>
        <link>https://podcast.example.com</link>
        <description>A podcast about technology</description>
        <item>
            <title>Episode 1</title>
            <link>https://podcast.example.com/ep1</link>
            <guid>episode-1</guid>
            <pubDate>Mon, 15 Jan 2024 10:00:00 +0000</pubDate>
            <description><![CDATA[<p>Welcome to the <b>podcast</b>!</p>]]></description>
            <enclosure url="https://cdn.example.com/ep1.mp3" type="audio/mpeg" length="12345"/>
            <itunes:duration>01:02:03</itunes:duration>
        </item>
        <item>
            <title>  Episode 2  </title>
            <link>https://podcast.example.com/ep2</link>
            <pubDate>Tue, 20 Feb 2024 08:30:00 -0500</pubDate>
            <description>Second &amp;amp; better</description>
            <enclosure url="https://cdn.example.com/ep2.mp3" type="audio/mpeg" length="999"/>
            <itunes:duration>3600</itunes:duration>
        </item>
        <item>
            <title>Bonus</title>
            <guid>bonus</guid>
            <itunes:duration>n/a</itunes:duration>
        </item>
    </channel>
</rss>"#;

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
}

fn build(xml: &str, limit: Option<usize>) -> Payload {
    let feed = parse_feed_bytes(xml.as_bytes()).unwrap();
    build_payload(
        &feed,
        "https://podcast.example.com/feed.xml",
        fixed_now(),
        &BuildOptions { limit },
    )
}

#[test]
fn test_podcast_feed_raw_entries() {
    let feed = parse_feed_bytes(PODCAST_RSS.as_bytes()).unwrap();

    assert_eq!(feed.title.as_deref(), Some("Tech Podcast"));
    assert_eq!(feed.entries.len(), 3);

    let first = &feed.entries[0];
    assert_eq!(first.id.as_deref(), Some("episode-1"));
    assert_eq!(
        first.duration,
        Some(DurationValue::Text("01:02:03".to_string()))
    );
    assert_eq!(
        first.published_raw.as_deref(),
        Some("Mon, 15 Jan 2024 10:00:00 +0000")
    );
    assert_eq!(
        first.published_parsed,
        Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap())
    );
    assert_eq!(first.enclosures.len(), 1);
    assert_eq!(first.enclosures[0].length, Some(12345));

    assert_eq!(feed.entries[1].id, None);
}

#[test]
fn test_podcast_feed_payload() {
    let payload = build(PODCAST_RSS, None);

    assert_eq!(payload.podcast.title, "Tech Podcast");
    assert_eq!(payload.podcast.source_rss, "https://podcast.example.com/feed.xml");
    assert_eq!(payload.podcast.generated_at, "2025-01-02T03:04:05Z");

    let titles: Vec<&str> = payload.episodes.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Episode 2", "Episode 1", "Bonus"]);

    let ep2 = &payload.episodes[0];
    assert_eq!(ep2.published.as_deref(), Some("2024-02-20T13:30:00Z"));
    assert_eq!(ep2.description, "Second & better");
    assert_eq!(ep2.duration, Some(3600));
    assert_eq!(ep2.audio_url.as_deref(), Some("https://cdn.example.com/ep2.mp3"));
    assert_eq!(ep2.id.len(), 64);

    let ep1 = &payload.episodes[1];
    assert_eq!(ep1.id, "episode-1");
    assert_eq!(ep1.description, "Welcome to the podcast !");
    assert_eq!(ep1.published.as_deref(), Some("2024-01-15T10:00:00Z"));
    assert_eq!(ep1.duration, Some(3723));

    let bonus = &payload.episodes[2];
    assert_eq!(bonus.id, "bonus");
    assert_eq!(bonus.published, None);
    assert_eq!(bonus.audio_url, None);
    assert_eq!(bonus.duration, None);
    assert_eq!(bonus.description, "");
}

#[test]
fn test_fallback_ids_are_stable_across_runs() {
    let a = build(PODCAST_RSS, None);
    let b = build(PODCAST_RSS, None);
    assert_eq!(a.episodes, b.episodes);
}

#[test]
fn test_limit_before_title_filter() {
    let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
    <channel>
        <title>Limits</title>
        <item><title></title><guid>a</guid></item>
        <item><title>B</title><guid>b</guid></item>
    </channel>
</rss>"#;

    assert!(build(rss, Some(1)).episodes.is_empty());
    assert_eq!(build(rss, None).episodes.len(), 1);
}

#[test]
fn test_atom_updated_only() {
    let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Atom Cast</title>
    <id>urn:feed</id>
    <updated>2024-02-01T12:00:00Z</updated>
    <entry>
        <id>urn:entry:1</id>
        <title>Only updated</title>
        <updated>2024-02-01T12:00:00+01:00</updated>
        <summary type="html">&lt;i&gt;Atom&lt;/i&gt; notes</summary>
        <link rel="enclosure" type="audio/mpeg" href="https://example.com/one.mp3"/>
    </entry>
</feed>"#;

    let payload = build(atom, None);
    let ep = &payload.episodes[0];
    assert_eq!(ep.id, "urn:entry:1");
    assert_eq!(ep.published.as_deref(), Some("2024-02-01T11:00:00Z"));
    assert_eq!(ep.description, "Atom notes");
    assert_eq!(ep.audio_url.as_deref(), Some("https://example.com/one.mp3"));
}

#[test]
fn test_missing_feed_title_uses_fallback() {
    let rss = r#"<rss version="2.0"><channel><item><title>Solo</title></item></channel></rss>"#;
    let payload = build(rss, None);
    assert_eq!(payload.podcast.title, "Podcast");
    assert_eq!(payload.episodes.len(), 1);
}

#[test]
fn test_json_round_trip() {
    let payload = build(PODCAST_RSS, None);

    let json = to_json_string(&payload).unwrap();
    let reparsed: Payload = serde_json::from_str(&json).unwrap();
    assert_eq!(reparsed, payload);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resources").join("episodes.json");
    write_payload(&path, &payload).unwrap();
    assert_eq!(read_payload(&path).unwrap(), payload);
}

#[test]
fn test_atom_fractional_seconds_dropped() {
    let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Atom Cast</title>
    <id>urn:feed</id>
    <entry>
        <title>Half second</title>
        <published>2024-01-01T00:00:00.5Z</published>
        <link rel="enclosure" type="audio/mpeg" href="https://example.com/half.mp3"/>
    </entry>
</feed>"#;

    let payload = build(atom, None);
    let ep = &payload.episodes[0];
    assert_eq!(ep.published.as_deref(), Some("2024-01-01T00:00:00Z"));
    assert_eq!(
        ep.id,
        episodes_feed::build_episode_id(
            &parse_feed_bytes(atom.as_bytes()).unwrap().entries[0],
            Some("https://example.com/half.mp3"),
            Some("2024-01-01T00:00:00Z"),
        )
    );
}
