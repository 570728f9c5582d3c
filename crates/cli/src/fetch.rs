// ABOUTME: Blocking HTTP fetch of raw feed bytes.
// ABOUTME: Fails on invalid URLs, transport errors, timeouts and non-2xx responses.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default bound on the whole request, connect through body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("episodes-cli/", env!("CARGO_PKG_VERSION"));

/// Settings for a single feed fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid feed URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme {scheme:?} in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("fetching {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("fetching {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Downloads the feed at `url` and returns the response body.
pub fn fetch_feed_bytes(url: &str, options: &FetchOptions) -> Result<Vec<u8>, FetchError> {
    let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::UnsupportedScheme {
            url: url.to_string(),
            scheme: parsed.scheme().to_string(),
        });
    }

    let transport = |source: reqwest::Error| FetchError::Transport {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .build()
        .map_err(transport)?;

    tracing::debug!(%url, timeout_secs = options.timeout.as_secs(), "fetching feed");
    let resp = client.get(parsed).send().map_err(transport)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let bytes = resp.bytes().map_err(transport)?;
    tracing::debug!(%url, bytes = bytes.len(), "fetched feed");
    Ok(bytes.to_vec())
}
