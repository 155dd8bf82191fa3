//! Shared HTTP plumbing for the price source clients

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use url::Url;

/// Build the HTTP client shared by all price sources
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

/// Validate a configured base URL and strip any trailing slash
pub fn normalize_base_url(source: &str, base_url: &str) -> Result<String> {
    let parsed = Url::parse(base_url)
        .with_context(|| format!("{}: invalid URL '{}'", source, base_url))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => anyhow::bail!("{}: unsupported URL scheme '{}'", source, scheme),
    }

    Ok(base_url.trim_end_matches('/').to_string())
}

/// Map reqwest errors to readable messages
///
/// The request URL is stripped; query strings carry API keys.
pub fn map_request_error(source: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        anyhow::anyhow!("{} request timed out", source)
    } else if error.is_connect() {
        anyhow::anyhow!("Unable to connect to {}", source)
    } else {
        anyhow::anyhow!("{} request failed: {}", source, error.without_url())
    }
}

/// Map a body decoding failure, without the request URL
pub fn map_body_error(source: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow::anyhow!("Failed to parse {} response: {}", source, error.without_url())
}

/// Check response status and return appropriate errors
pub fn check_response_status(source: &str, response: &Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    match status.as_u16() {
        401 | 403 => anyhow::bail!("{} rejected the API credentials", source),
        429 => anyhow::bail!("{} rate limit exceeded", source),
        404 => anyhow::bail!("{} quote not found", source),
        status => anyhow::bail!("{} API error: HTTP {}", source, status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("Gold-API", "https://www.goldapi.io/api/").unwrap(),
            "https://www.goldapi.io/api"
        );
        assert!(normalize_base_url("Gold-API", "not a url").is_err());
        assert!(normalize_base_url("Gold-API", "ftp://example.com").is_err());
    }
}
