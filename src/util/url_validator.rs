use std::net::IpAddr;
use thiserror::Error;
use url::{Host, Url};

/// Reasons an article link is refused before it reaches the system browser.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Article has no URL")]
    Empty,
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
    #[error("Localhost not allowed")]
    Localhost,
    #[error("Private IP address not allowed: {0}")]
    PrivateIp(IpAddr),
}

/// Check a server-supplied article URL before opening it.
///
/// Only `http`/`https` links to public hosts pass. Loopback, private,
/// link-local and unspecified addresses are refused, as is `localhost`.
///
/// ```
/// use deep_report::util::validate_article_url;
///
/// assert!(validate_article_url("https://news.example.com/a/1").is_ok());
/// assert!(validate_article_url("javascript:alert(1)").is_err());
/// assert!(validate_article_url("http://10.0.0.8/admin").is_err());
/// ```
pub fn validate_article_url(raw: &str) -> Result<Url, UrlValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    let ip = match url.host() {
        None => return Err(UrlValidationError::MissingHost),
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.');
            if domain.eq_ignore_ascii_case("localhost")
                || domain.to_ascii_lowercase().ends_with(".localhost")
            {
                return Err(UrlValidationError::Localhost);
            }
            return Ok(url);
        }
        Some(Host::Ipv4(v4)) => IpAddr::V4(v4),
        Some(Host::Ipv6(v6)) => IpAddr::V6(v6),
    };

    if ip.is_loopback() {
        return Err(UrlValidationError::Localhost);
    }
    if is_private_ip(&ip) {
        return Err(UrlValidationError::PrivateIp(ip));
    }
    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_link_local() || v4.is_unspecified(),
        IpAddr::V6(v6) => {
            if v6.is_unspecified() {
                return true;
            }
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return mapped.is_loopback() || is_private_ip(&IpAddr::V4(mapped));
            }
            let first = v6.segments()[0];
            // fc00::/7 unique local, fe80::/10 link local
            (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
        }
    }
}
