//! URL validation for provider endpoints and callback targets.
//!
//! Two kinds of URL reach this crate from user configuration:
//! - the Deepgram base URL override (self-hosted / on-premises deployments)
//! - the transcription `callback` option, which Deepgram calls when an
//!   asynchronous transcription completes
//!
//! Both must be absolute `http`/`https` URLs with a host. Private hosts are
//! allowed for the base URL (self-hosted deployments commonly live on a
//! private network) but are flagged for callbacks, since the cloud API
//! cannot reach them.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Errors that can occur during URL validation
#[derive(Debug, Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be http or https, got: {0}")]
    UnsupportedScheme(String),

    #[error("URL must have a host")]
    MissingHost,

    #[error("Base URL must not contain a query string or fragment")]
    UnexpectedQuery,
}

/// Checks if an IPv4 address is private/internal
///
/// Private addresses include loopback, RFC 1918 ranges, link-local,
/// unspecified and the CGNAT shared range (100.64.0.0/10).
pub fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    if ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified() {
        return true;
    }
    // Shared address space (CGNAT) 100.64.0.0/10
    let octets = ip.octets();
    octets[0] == 100 && (octets[1] & 0xC0) == 64
}

/// Checks if an IPv6 address is private/internal
pub fn is_private_ipv6(ip: &Ipv6Addr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return true;
    }
    let segments = ip.segments();

    // Link-local (fe80::/10)
    if segments[0] & 0xFFC0 == 0xFE80 {
        return true;
    }

    // Unique local address (fc00::/7)
    if segments[0] & 0xFE00 == 0xFC00 {
        return true;
    }

    if let Some(ipv4) = ip.to_ipv4_mapped() {
        return is_private_ipv4(&ipv4);
    }

    false
}

/// Checks if an IP address is private/internal
pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => is_private_ipv4(ipv4),
        IpAddr::V6(ipv6) => is_private_ipv6(ipv6),
    }
}

fn parse_http_url(url: &str) -> Result<Url, UrlValidationError> {
    let parsed = Url::parse(url.trim())?;

    let scheme = parsed.scheme();
    if scheme != "https" && scheme != "http" {
        return Err(UrlValidationError::UnsupportedScheme(scheme.to_string()));
    }

    if parsed.host().is_none() {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(parsed)
}

/// Validates a provider base URL override and returns it normalized
/// (trailing `/` removed) so endpoint paths can be appended directly.
///
/// # Example
/// ```rust
/// use waav_nodes::utils::url_validation::validate_base_url;
///
/// assert_eq!(
///     validate_base_url("http://localhost:8080/").unwrap(),
///     "http://localhost:8080"
/// );
/// assert!(validate_base_url("ftp://example.com").is_err());
/// ```
pub fn validate_base_url(url: &str) -> Result<String, UrlValidationError> {
    let parsed = parse_http_url(url)?;

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(UrlValidationError::UnexpectedQuery);
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Validates a transcription callback URL.
///
/// Callbacks pointing at raw private IPs are accepted but logged, since they
/// only work against a self-hosted deployment on the same network.
pub fn validate_callback_url(url: &str) -> Result<(), UrlValidationError> {
    let parsed = parse_http_url(url)?;

    let private_ip = match parsed.host() {
        Some(url::Host::Ipv4(ip)) => is_private_ipv4(&ip),
        Some(url::Host::Ipv6(ip)) => is_private_ipv6(&ip),
        Some(url::Host::Domain(domain)) => domain == "localhost",
        None => return Err(UrlValidationError::MissingHost),
    };

    if private_ip {
        warn!(
            callback = %parsed,
            "Callback URL points at a private address; the cloud API will not be able to reach it"
        );
    }

    Ok(())
}
