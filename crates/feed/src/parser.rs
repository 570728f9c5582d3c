// ABOUTME: Feed parsing implementation using feed-rs.
// ABOUTME: Maps feed-rs entries to RawEntry records, merged with values from the raw XML scan.

use crate::error::FeedError;
use crate::models::{DurationValue, Enclosure, RawEntry, RawFeed};
use crate::xml_scan::{scan_entries, ScannedEntry};
use feed_rs::model::{Entry, Link};

/// Parses feed bytes (RSS, Atom, or JSON Feed) into a RawFeed.
///
/// Entries keep document order. Fields that are missing or empty in the
/// source are reported as `None`; nothing is normalized here.
pub fn parse_feed_bytes(data: &[u8]) -> Result<RawFeed, FeedError> {
    let parsed = feed_rs::parser::parse(data).map_err(FeedError::parse)?;

    // Raw pass only helps when it saw exactly the entries feed-rs did.
    let scanned = scan_entries(data);
    let aligned = scanned.len() == parsed.entries.len();
    if !aligned && !scanned.is_empty() {
        tracing::debug!(
            scanned = scanned.len(),
            parsed = parsed.entries.len(),
            "raw XML scan misaligned with feed-rs entries; using feed-rs values only"
        );
    }

    let entries = parsed
        .entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let scan = if aligned { scanned.get(idx) } else { None };
            map_entry(entry, scan)
        })
        .collect();

    Ok(RawFeed {
        title: parsed.title.map(|t| t.content).filter(|t| !t.is_empty()),
        entries,
    })
}

/// Maps a feed-rs Entry to a RawEntry.
fn map_entry(entry: &Entry, scan: Option<&ScannedEntry>) -> RawEntry {
    // feed-rs invents an id for entries without one; only keep native ids.
    let id = match scan {
        Some(s) if !s.has_native_id => None,
        _ => non_empty(entry.id.clone()),
    };

    let summary = entry
        .summary
        .as_ref()
        .map(|t| t.content.clone())
        .and_then(non_empty)
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()).and_then(non_empty));

    let enclosures = match scan {
        Some(s) => s.enclosures.clone(),
        None => extract_enclosures(entry),
    };

    RawEntry {
        id,
        title: entry.title.as_ref().map(|t| t.content.clone()),
        summary,
        link: extract_item_url(&entry.links),
        published_raw: scan.and_then(|s| s.published_raw.clone()),
        published_parsed: entry.published,
        updated_raw: scan.and_then(|s| s.updated_raw.clone()),
        updated_parsed: entry.updated,
        duration: match scan {
            Some(s) => s.duration.clone().map(DurationValue::Text),
            None => extract_duration(entry),
        },
        enclosures,
    }
}

/// Checks if a link is an enclosure link.
fn is_enclosure_link(link: &Link) -> bool {
    link.rel.as_deref() == Some("enclosure")
}

/// Extracts the item URL from entry links.
/// Prefers rel="alternate", otherwise the first non-enclosure link.
fn extract_item_url(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate"))
        .or_else(|| links.iter().find(|l| !is_enclosure_link(l)))
        .map(|l| l.href.clone())
        .and_then(non_empty)
}

/// Enclosures as feed-rs exposes them: rel=enclosure links, then media content.
/// Used when the raw scan is unavailable (JSON Feed, misaligned XML).
fn extract_enclosures(entry: &Entry) -> Vec<Enclosure> {
    let links = entry
        .links
        .iter()
        .filter(|link| is_enclosure_link(link))
        .map(|link| Enclosure {
            url: non_empty(link.href.clone()),
            mime_type: link.media_type.clone(),
            length: link.length,
        });

    let media = entry.media.iter().flat_map(|m| m.content.iter()).filter_map(|content| {
        content.url.as_ref().map(|url| Enclosure {
            url: non_empty(url.to_string()),
            mime_type: content.content_type.as_ref().map(|m| m.to_string()),
            length: content.size,
        })
    });

    links.chain(media).collect()
}

/// `itunes:duration` as feed-rs exposes it, in whole seconds.
/// Used when the raw scan is unavailable.
fn extract_duration(entry: &Entry) -> Option<DurationValue> {
    entry
        .media
        .iter()
        .find_map(|m| m.duration)
        .map(|d| DurationValue::Seconds(d.as_secs()))
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
