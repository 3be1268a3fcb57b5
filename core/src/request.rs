//! HTTP/1.1 request framing.
//!
//! # Design
//! `HttpRequest` is plain data, the same shape the bytes take on the wire.
//! `to_bytes` is the only place the request line and headers are written.
//! Every request asks the server to close the connection, because the
//! transport treats that close as the end of the response.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ClientError;
use crate::url::ParsedUrl;

/// Form parameters for a POST body.
pub type Params = BTreeMap<String, String>;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }

    /// Exactly `"POST"` selects POST; every other string is GET.
    pub fn from_command(command: &str) -> Self {
        if command == "POST" {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready to be written to a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub host: String,
    pub path: String,
    /// Form-encoded body; always `Some` for POST, `None` for GET.
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(target: &ParsedUrl) -> Self {
        Self {
            method: HttpMethod::Get,
            host: target.host.clone(),
            path: target.path.clone(),
            body: None,
        }
    }

    /// Build a POST whose body is `params` form-encoded. Absent params give
    /// an empty body, still sent with `Content-length: 0`.
    pub fn post(target: &ParsedUrl, params: Option<&Params>) -> Result<Self, ClientError> {
        let body = match params {
            Some(params) => encode_params(params)?,
            None => String::new(),
        };
        Ok(Self {
            method: HttpMethod::Post,
            host: target.host.clone(),
            path: target.path.clone(),
            body: Some(body),
        })
    }

    /// Byte length of the body as sent in `Content-length`.
    pub fn content_length(&self) -> Option<usize> {
        self.body.as_ref().map(String::len)
    }

    /// Serialize to the exact bytes sent over the socket.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!("{} {} HTTP/1.1\r\nHost: {}\r\n", self.method, self.path, self.host);
        if let Some(body) = &self.body {
            out.push_str(&format!("Content-Type: {FORM_CONTENT_TYPE}\r\n"));
            out.push_str(&format!("Content-length: {}\r\n", body.len()));
        }
        out.push_str("Accept-Charset: UTF-8\r\nConnection: close\r\n\r\n");
        if let Some(body) = &self.body {
            out.push_str(body);
        }
        out.into_bytes()
    }
}

/// `application/x-www-form-urlencoded` encoding of `params`.
pub fn encode_params(params: &Params) -> Result<String, ClientError> {
    serde_urlencoded::to_string(params).map_err(|e| ClientError::Request(e.to_string()))
}
