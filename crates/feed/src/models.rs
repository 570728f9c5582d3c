// ABOUTME: Data models for raw feed entries and the canonical episode payload.
// ABOUTME: RawEntry is loosely typed input; Episode/PodcastMeta/Payload are the JSON output shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A media attachment reference on a feed entry (typically the audio file).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enclosure {
    pub url: Option<String>,
    pub mime_type: Option<String>,
    pub length: Option<u64>,
}

impl Enclosure {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }
}

/// Duration metadata as supplied by the feed, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

/// One feed item prior to normalization. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    /// Native guid/id only; never a parser-synthesised identifier.
    pub id: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub published_raw: Option<String>,
    pub published_parsed: Option<DateTime<Utc>>,
    pub updated_raw: Option<String>,
    pub updated_parsed: Option<DateTime<Utc>>,
    pub duration: Option<DurationValue>,
    pub enclosures: Vec<Enclosure>,
}

/// Parser output: feed-level title plus entries in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeed {
    pub title: Option<String>,
    pub entries: Vec<RawEntry>,
}

/// Canonical, normalized record for a single episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published: Option<String>,
    pub link: Option<String>,
    pub audio_url: Option<String>,
    pub duration: Option<u64>,
}

/// Feed-level metadata recorded alongside the episodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastMeta {
    pub title: String,
    pub source_rss: String,
    pub generated_at: String,
}

/// The final artifact written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub podcast: PodcastMeta,
    pub episodes: Vec<Episode>,
}
