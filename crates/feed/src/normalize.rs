// ABOUTME: Entry normalizer mapping one RawEntry to one canonical Episode.
// ABOUTME: Pure and total: every field degrades to None/empty instead of failing.

use chrono::SubsecRound;
use sha2::{Digest, Sha256};

use crate::duration_parse::parse_duration;
use crate::html_utils::strip_html;
use crate::models::{Episode, RawEntry};
use crate::time_parse::{format_iso_utc, parse_flexible_time};

/// Normalizes a raw feed entry into an Episode.
pub fn normalize_entry(entry: &RawEntry) -> Episode {
    let published = to_iso_datetime(entry);
    let audio_url = extract_audio_url(entry);
    let duration = parse_duration(entry.duration.as_ref());
    if duration.is_none() && entry.duration.is_some() {
        tracing::debug!(duration = ?entry.duration, "unparseable duration");
    }

    Episode {
        id: build_episode_id(entry, audio_url.as_deref(), published.as_deref()),
        title: entry.title.as_deref().unwrap_or_default().trim().to_string(),
        description: strip_html(entry.summary.as_deref()),
        published,
        link: entry.link.clone(),
        audio_url,
        duration,
    }
}

/// Picks the entry's publication time and renders it as UTC ISO-8601.
///
/// Order: parsed published, parsed updated, then the raw published (or, if
/// absent, raw updated) string through the flexible parser. Structured times
/// are rendered to whole seconds.
pub fn to_iso_datetime(entry: &RawEntry) -> Option<String> {
    if let Some(dt) = entry.published_parsed.or(entry.updated_parsed) {
        return Some(format_iso_utc(&dt.trunc_subsecs(0)));
    }

    let raw = [&entry.published_raw, &entry.updated_raw]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())?;

    let parsed = parse_flexible_time(raw);
    if parsed.is_none() {
        tracing::debug!(raw = %raw, "unparseable entry date");
    }
    parsed.map(|dt| format_iso_utc(&dt))
}

/// Returns the first enclosure URL that is present and non-empty.
pub fn extract_audio_url(entry: &RawEntry) -> Option<String> {
    entry
        .enclosures
        .iter()
        .filter_map(|enc| enc.url.as_deref())
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

/// Uses the native id verbatim, or a SHA-256 of `title|published|audio_url`.
///
/// The title is used as supplied (untrimmed), matching what identifies the
/// entry in the feed rather than the normalized display title.
pub fn build_episode_id(entry: &RawEntry, audio_url: Option<&str>, published: Option<&str>) -> String {
    if let Some(id) = entry.id.as_deref().filter(|id| !id.is_empty()) {
        return id.to_string();
    }

    let base = format!(
        "{}|{}|{}",
        entry.title.as_deref().unwrap_or_default(),
        published.unwrap_or_default(),
        audio_url.unwrap_or_default()
    );
    format!("{:x}", Sha256::digest(base.as_bytes()))
}
