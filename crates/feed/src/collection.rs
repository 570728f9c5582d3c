// ABOUTME: Episode collection builder: normalize, limit, filter, sort and wrap into a Payload.
// ABOUTME: The limit applies to leading feed entries before untitled episodes are dropped.

use chrono::{DateTime, Utc};

use crate::models::{Episode, Payload, PodcastMeta, RawEntry, RawFeed};
use crate::normalize::normalize_entry;
use crate::time_parse::format_iso_utc;

/// Podcast title used when the feed title is missing or empty.
/// Whitespace-only titles are kept as-is.
pub const FALLBACK_PODCAST_TITLE: &str = "Podcast";

/// Options controlling which episodes end up in the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Keep at most this many leading feed entries. None = unlimited.
    pub limit: Option<usize>,
}

/// Normalizes entries and returns the ordered episode list.
///
/// Steps: normalize every entry in feed order, truncate to `limit`, drop
/// episodes with an empty title, then stable-sort newest first. Missing or
/// unreadable dates sort as the Unix epoch.
pub fn build_episodes(entries: &[RawEntry], options: &BuildOptions) -> Vec<Episode> {
    let mut episodes: Vec<Episode> = entries.iter().map(normalize_entry).collect();
    let normalized = episodes.len();

    if let Some(limit) = options.limit {
        episodes.truncate(limit);
    }
    let limited = episodes.len();

    episodes.retain(|ep| !ep.title.is_empty());

    // sort_by_key is stable; Reverse keeps ties in feed order.
    episodes.sort_by_key(|ep| std::cmp::Reverse(sort_key(ep)));

    tracing::info!(
        entries = normalized,
        truncated = normalized - limited,
        untitled = limited - episodes.len(),
        kept = episodes.len(),
        "built episode list"
    );

    episodes
}

/// Builds the complete payload for one run.
pub fn build_payload(
    feed: &RawFeed,
    source_rss: &str,
    generated_at: DateTime<Utc>,
    options: &BuildOptions,
) -> Payload {
    let title = feed
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(FALLBACK_PODCAST_TITLE)
        .to_string();

    Payload {
        podcast: PodcastMeta {
            title,
            source_rss: source_rss.to_string(),
            generated_at: format_iso_utc(&generated_at),
        },
        episodes: build_episodes(&feed.entries, options),
    }
}

/// Microseconds since the epoch of `published`, or 0 when absent/unparseable.
fn sort_key(episode: &Episode) -> i64 {
    episode
        .published
        .as_deref()
        .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
        .map(|dt| dt.timestamp_micros())
        .unwrap_or(0)
}
