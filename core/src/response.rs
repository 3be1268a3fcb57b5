//! Splitting raw response text into status code, header block and body.
//!
//! The body is everything after the first blank line, untouched. There is no
//! chunked reassembly and no `Content-Length` truncation.

use std::fmt;

use serde::Serialize;

use crate::error::{ClientError, ParseError};

const DELIMITER: &str = "\r\n\r\n";

/// Fallback body for a response that arrived but could not be parsed.
pub const NOT_FOUND_BODY: &str = "File not found";

/// What a request returns to callers of `get`, `post` and `command`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub status_code: u16,
    pub body: String,
}

impl Response {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// Collapse a failed request into the fallback response: 404 with
    /// "File not found" for unparseable replies, 404 with an empty body for
    /// everything else.
    pub fn from_error(err: &ClientError) -> Self {
        match err {
            ClientError::Parse(_) => Self::new(404, NOT_FOUND_BODY),
            _ => Self::new(404, ""),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.status_code, self.body)
    }
}

/// A fully parsed response, headers included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub status_code: u16,
    pub headers: String,
    pub body: String,
}

impl ParsedResponse {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let (headers, body) = split(raw)?;
        Ok(Self {
            status_code: status_code(headers)?,
            headers: headers.to_string(),
            body: body.to_string(),
        })
    }

    /// First header named `name`, ignoring ASCII case. The status line and
    /// lines without a colon are skipped.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .split("\r\n")
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
    }
}

impl From<ParsedResponse> for Response {
    fn from(parsed: ParsedResponse) -> Self {
        Self {
            status_code: parsed.status_code,
            body: parsed.body,
        }
    }
}

/// Header block: everything before the first blank line.
pub fn get_headers(raw: &str) -> Result<&str, ParseError> {
    split(raw).map(|(headers, _)| headers)
}

/// Body: everything after the first blank line.
pub fn get_body(raw: &str) -> Result<&str, ParseError> {
    split(raw).map(|(_, body)| body)
}

/// Status code from the status line of `raw`.
pub fn get_code(raw: &str) -> Result<u16, ParseError> {
    get_headers(raw).and_then(status_code)
}

/// Parse `raw` into the caller-facing `Response`.
pub fn parse_response(raw: &str) -> Result<Response, ClientError> {
    Ok(ParsedResponse::parse(raw)?.into())
}

fn split(raw: &str) -> Result<(&str, &str), ParseError> {
    raw.split_once(DELIMITER).ok_or(ParseError::MissingDelimiter)
}

fn status_code(headers: &str) -> Result<u16, ParseError> {
    let status_line = headers.split("\r\n").next().unwrap_or_default();
    let code = status_line
        .split(' ')
        .nth(1)
        .ok_or_else(|| ParseError::MalformedStatusLine(status_line.to_string()))?;
    code.parse()
        .map_err(|_| ParseError::InvalidStatusCode(code.to_string()))
}
