//! Error types for the socket HTTP client.
//!
//! # Design
//! Every failure inside a request is one of five kinds. `ClientError::kind`
//! exposes the kind so callers of `HttpClient::execute` can tell "could not
//! reach the server" apart from "reached it but could not read the reply".
//! The public `get`/`post`/`command` methods collapse these into a fallback
//! `Response` via `Response::from_error`.

use std::io;

use thiserror::Error;

/// Coarse classification of a `ClientError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The URL could not be split into host, port and path.
    Resolution,
    /// The request could not be built (params, or GET args rejected).
    Request,
    /// The TCP connect failed.
    Connection,
    /// Send, receive or text decoding failed mid-exchange.
    Transport,
    /// The response text was not a parseable HTTP response.
    Parse,
}

/// Errors produced while executing a single request.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot resolve url {url:?}: {reason}")]
    Resolution { url: String, reason: String },

    #[error("cannot build request: {0}")]
    Request(String),

    #[error("connect to {host}:{port} failed: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Resolution { .. } => ErrorKind::Resolution,
            ClientError::Request(_) => ErrorKind::Request,
            ClientError::Connection { .. } => ErrorKind::Connection,
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Parse(_) => ErrorKind::Parse,
        }
    }
}

/// Failures on an already open connection.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("send failed: {0}")]
    Write(#[source] io::Error),

    #[error("receive failed after {received} bytes: {source}")]
    Read {
        received: usize,
        #[source]
        source: io::Error,
    },

    #[error("response is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

/// The raw response text could not be split into status, headers and body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no blank line between headers and body")]
    MissingDelimiter,

    #[error("malformed status line {0:?}")]
    MalformedStatusLine(String),

    #[error("invalid status code {0:?}")]
    InvalidStatusCode(String),
}

/// Invalid configuration values, reported by `ClientConfig::from_env`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be one of {expected}, got {value:?}")]
    InvalidChoice {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}
