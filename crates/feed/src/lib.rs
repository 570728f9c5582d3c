// ABOUTME: Podcast feed normalization library for episodes-core.
// ABOUTME: Parses feeds into raw entries, normalizes them to canonical episodes, and writes stable JSON.

pub mod collection;
pub mod duration_parse;
pub mod error;
pub mod html_utils;
pub mod models;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod time_parse;
pub mod xml_scan;

pub use collection::{build_episodes, build_payload, BuildOptions, FALLBACK_PODCAST_TITLE};
pub use duration_parse::{parse_duration, parse_duration_str};
pub use error::{FeedError, OutputError};
pub use html_utils::{decode_entities, strip_html};
pub use models::{DurationValue, Enclosure, Episode, Payload, PodcastMeta, RawEntry, RawFeed};
pub use normalize::{build_episode_id, extract_audio_url, normalize_entry, to_iso_datetime};
pub use output::{read_payload, to_json_string, write_payload};
pub use parser::parse_feed_bytes;
pub use time_parse::{format_iso_utc, parse_flexible_time};
