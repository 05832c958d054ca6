//! URL utilities for addressing backend endpoints.
//!
//! The backend API lives under a path prefix (`/api/v1`), so endpoint
//! paths are always joined relative to a base URL whose path ends in `/`.

use anyhow::{Result, anyhow};
use url::Url;

/// Parse and normalize the backend base URL
///
/// Adds `http://` when no scheme is present and guarantees a trailing
/// slash so that relative joins keep the API prefix.
pub fn normalize_base_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Base URL must not be empty"));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let mut url =
        Url::parse(&with_scheme).map_err(|e| anyhow!("Invalid base URL '{trimmed}': {e}"))?;

    if url.host_str().is_none() {
        return Err(anyhow!("Base URL has no host: {trimmed}"));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Resolve an endpoint path against a normalized base URL
pub fn endpoint_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    base.join(path.trim_start_matches('/'))
}
