//! Single-probe types and the HTTP transport seam.
//!
//! A probe is one GET against `target/entry`. Its terminal result is an
//! [`Outcome`]: either the status code the server answered with (any code,
//! 4xx/5xx included) or a classified transport failure.

mod classify;
mod transport;

pub use classify::classify_curl_error;
pub use transport::{wire_url, CurlOptions, CurlTransport, Transport, TransportError, DEFAULT_MAX_REDIRECTS};

use std::fmt;

/// Why a probe produced no status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection refused, DNS failure, TLS handshake failure.
    ConnectionFailed,
    /// Per-request deadline exceeded.
    Timeout,
    /// Any other transport-level failure.
    RequestFailed,
    /// The probe itself blew up (panicked) before producing a result.
    UnknownFailure,
}

impl FailureKind {
    /// User-facing line for a failed probe against `url`.
    pub fn message(self, url: &str, detail: &str) -> String {
        match self {
            FailureKind::ConnectionFailed => {
                format!("Could not connect to '{}'. Please ensure the URL exists.", url)
            }
            FailureKind::Timeout => format!("Request to '{}' timed out.", url),
            FailureKind::RequestFailed => format!(
                "An unexpected error occurred while checking '{}': {}",
                url, detail
            ),
            FailureKind::UnknownFailure => format!(
                "An unknown error occurred while checking '{}': {}",
                url, detail
            ),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::ConnectionFailed => "connection failed",
            FailureKind::Timeout => "timeout",
            FailureKind::RequestFailed => "request failed",
            FailureKind::UnknownFailure => "unknown failure",
        };
        f.write_str(s)
    }
}

/// Terminal result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        url: String,
        status: u32,
    },
    Failure {
        url: String,
        kind: FailureKind,
        message: String,
    },
}

impl Outcome {
    pub fn failure(url: String, kind: FailureKind, detail: &str) -> Self {
        let message = kind.message(&url, detail);
        Outcome::Failure { url, kind, message }
    }

    pub fn url(&self) -> &str {
        match self {
            Outcome::Success { url, .. } | Outcome::Failure { url, .. } => url,
        }
    }
}

/// Runs one probe through `transport` and turns the result into an [`Outcome`].
pub fn probe<T: Transport + ?Sized>(transport: &T, url: String) -> Outcome {
    match transport.get(&url) {
        Ok(status) => Outcome::Success { url, status },
        Err(e) => Outcome::failure(url, e.kind, &e.detail),
    }
}
