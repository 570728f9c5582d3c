// ABOUTME: Error types for feed parsing and payload output.
// ABOUTME: Provides FeedError for unparseable feeds and OutputError for serialization/file failures.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during feed parsing.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Failed to parse the feed data (malformed XML/JSON).
    #[error("failed to parse feed: {0}")]
    Parse(String),
}

impl FeedError {
    /// Creates a Parse error from an underlying feed-rs error.
    pub fn parse(err: impl fmt::Display) -> Self {
        FeedError::Parse(err.to_string())
    }
}

/// Errors that can occur while serializing or writing the payload.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OutputError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        OutputError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
