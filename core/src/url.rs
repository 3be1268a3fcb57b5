//! Splits a URL string into the host, port and path a request needs.
//!
//! Only structural parsing happens here. A URL without an authority (no
//! `//`) resolves to an empty host, and the request then fails at connect
//! time instead of being rejected up front.

use std::fmt;

use crate::error::ClientError;

pub const DEFAULT_PORT: u16 = 80;

/// Connection target derived from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub host: String,
    pub port: u16,
    /// Request target sent on the request line; never empty.
    pub path: String,
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.host, self.port, self.path)
    }
}

/// Resolve `url` into host, port (default 80) and path (default `/`).
///
/// Userinfo is dropped from the authority and any `#fragment` is dropped
/// from the path. A query string stays on the path.
pub fn resolve(url: &str) -> Result<ParsedUrl, ClientError> {
    let (authority, rest) = split_authority(url);
    let authority = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => (host, parse_port(url, port)?),
        None => (authority, DEFAULT_PORT),
    };

    let path = rest.split_once('#').map_or(rest, |(path, _)| path);
    let path = if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('?') {
        format!("/{path}")
    } else {
        path.to_string()
    };

    Ok(ParsedUrl {
        host: host.to_string(),
        port,
        path,
    })
}

/// Split into (authority, everything after it).
fn split_authority(url: &str) -> (&str, &str) {
    let after_scheme = match url.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => match url.strip_prefix("//") {
            Some(rest) => rest,
            None => return ("", url),
        },
    };
    let end = after_scheme
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(after_scheme.len());
    after_scheme.split_at(end)
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn parse_port(url: &str, port: &str) -> Result<u16, ClientError> {
    if port.is_empty() {
        return Ok(DEFAULT_PORT);
    }
    port.parse().map_err(|_| ClientError::Resolution {
        url: url.to_string(),
        reason: format!("invalid port {port:?}"),
    })
}
