//! Target URL validation.
//!
//! A target without a scheme gets `https://` prepended. Whatever string
//! passes validation is kept verbatim, so probe URLs are built from exactly
//! what the user typed.

use std::fmt;

use url::{ParseError, Url};

use crate::error::ScanError;

const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Validated absolute base URL (scheme and host present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl(String);

impl TargetUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, as used for output alignment.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Probe URL for one wordlist entry: `target + "/" + entry`.
    pub fn join(&self, entry: &str) -> String {
        format!("{}/{}", self.0, entry)
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates `raw` as a scan target.
///
/// - no scheme: `https://` is prepended and the result must have a host
/// - scheme without a host: rejected
/// - anything else that parses: returned unchanged
///
/// Normalizing an already-normalized target returns it unchanged.
pub fn normalize(raw: &str) -> Result<TargetUrl, ScanError> {
    let invalid = || ScanError::InvalidUrl(raw.to_string());

    match Url::parse(raw) {
        Ok(parsed) if has_host(&parsed) => Ok(TargetUrl(raw.to_string())),
        Ok(_) => Err(invalid()),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let prefixed = format!("{}{}", DEFAULT_SCHEME_PREFIX, raw);
            match Url::parse(&prefixed) {
                Ok(parsed) if has_host(&parsed) => {
                    tracing::debug!("no scheme in target, using {}", prefixed);
                    Ok(TargetUrl(prefixed))
                }
                _ => Err(invalid()),
            }
        }
        Err(_) => Err(invalid()),
    }
}

fn has_host(url: &Url) -> bool {
    url.host_str().is_some_and(|h| !h.is_empty())
}
