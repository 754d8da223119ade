//! HTTP GET transport.

use std::fmt;
use std::time::Duration;

use url::Url;

use super::classify::classify_curl_error;
use super::FailureKind;

/// Performs a single GET and returns the final HTTP status code.
///
/// Implementations block the calling thread; the dispatcher runs them on its
/// own worker threads.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<u32, TransportError>;
}

/// Transport-level failure: no status code was obtained.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub kind: FailureKind,
    pub detail: String,
}

impl TransportError {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

impl std::error::Error for TransportError {}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        Self::new(classify_curl_error(&e), e.to_string())
    }
}

/// Per-request curl settings.
#[derive(Debug, Clone)]
pub struct CurlOptions {
    /// Wall-clock deadline for the whole request (connect + transfer).
    pub timeout: Duration,
    pub follow_redirects: bool,
    /// Redirect hops allowed when `follow_redirects` is set.
    pub max_redirects: u32,
    pub user_agent: String,
}

/// Same hop limit as python-requests.
pub const DEFAULT_MAX_REDIRECTS: u32 = 30;

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            follow_redirects: true,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: concat!("dirprobe/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// libcurl-backed transport. Uses a fresh `Easy` handle per request so it can
/// be shared across worker threads without locking.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    opts: CurlOptions,
}

impl CurlTransport {
    pub fn new(opts: CurlOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &CurlOptions {
        &self.opts
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str) -> Result<u32, TransportError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(&wire_url(url))?;
        easy.get(true)?;
        easy.follow_location(self.opts.follow_redirects)?;
        easy.max_redirections(self.opts.max_redirects)?;
        easy.connect_timeout(self.opts.timeout)?;
        easy.timeout(self.opts.timeout)?;
        easy.useragent(&self.opts.user_agent)?;

        {
            let mut transfer = easy.transfer();
            // Body is not inspected; drain it so the transfer completes.
            transfer.write_function(|data| Ok(data.len()))?;
            transfer.perform()?;
        }

        Ok(easy.response_code()?)
    }
}

/// Percent-encodes characters libcurl would reject (spaces, non-ASCII, ...).
/// The caller keeps the unencoded string for reporting. Anything `url` cannot
/// parse is passed through as-is and left for curl to judge.
pub fn wire_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.as_str().to_string(),
        Err(_) => url.to_string(),
    }
}
