//! Origin classification for proxy-served documents.
//!
//! A proxy serves a publisher's document from its own host, encoding the
//! publisher host in the path:
//!
//! ```text
//! https://<anything>.<proxy-suffix>/<kind>/[s/]<publisher-host>/<path...>
//! ```
//!
//! `<kind>` is a short lowercase content-kind segment (`c`, `v`, `a`, ...);
//! a following `s` segment means the publisher origin is `https`.

use url::Url;

use crate::error::CidError;

/// Proxy host suffixes recognised when no configuration overrides them.
pub const DEFAULT_PROXY_SUFFIXES: &[&str] = &["cdn.ampproject.org", "bing-amp.com"];

/// Decides whether a document is proxy-served and recovers its source origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginClassifier {
    suffixes: Vec<String>,
}

impl Default for OriginClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_PROXY_SUFFIXES.iter().map(|s| (*s).to_string()).collect())
    }
}

impl OriginClassifier {
    /// Creates a classifier matching the given host suffixes (case-insensitive).
    #[must_use]
    pub fn new(suffixes: Vec<String>) -> Self {
        let suffixes = suffixes
            .into_iter()
            .map(|s| s.trim_start_matches('.').to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { suffixes }
    }

    /// Returns `true` when `url` is served from a proxy host.
    #[must_use]
    pub fn is_proxy_origin(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        self.suffixes
            .iter()
            .any(|suffix| host == *suffix || host.ends_with(&format!(".{suffix}")))
    }

    /// Extracts the publisher origin from a proxy URL.
    ///
    /// # Errors
    ///
    /// Returns [`CidError::NotProxyOrigin`] when `url` is not proxy-served or
    /// its path does not carry a publisher host.
    pub fn get_proxy_source_origin(&self, url: &Url) -> Result<String, CidError> {
        if !self.is_proxy_origin(url) {
            return Err(CidError::NotProxyOrigin(url.to_string()));
        }
        let malformed = || CidError::NotProxyOrigin(url.to_string());
        let mut segments = url.path_segments().ok_or_else(malformed)?;

        let kind = segments.next().ok_or_else(malformed)?;
        if kind.is_empty() || kind.len() > 2 || !kind.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(malformed());
        }

        let mut host = segments.next().ok_or_else(malformed)?;
        let scheme = if host == "s" {
            host = segments.next().ok_or_else(malformed)?;
            "https"
        } else {
            "http"
        };
        if host.is_empty() {
            return Err(malformed());
        }

        // Round-trip through the URL parser to normalise case and reject junk.
        let origin = Url::parse(&format!("{scheme}://{host}")).map_err(|_| malformed())?;
        Ok(origin.origin().ascii_serialization())
    }
}

/// Parses a document URL.
///
/// # Errors
///
/// Returns [`CidError::InvalidUrl`] when `raw` is not an absolute URL.
pub fn parse_document_url(raw: &str) -> Result<Url, CidError> {
    Url::parse(raw)
        .map_err(|e| CidError::InvalidUrl { url: raw.to_string(), reason: e.to_string() })
}
