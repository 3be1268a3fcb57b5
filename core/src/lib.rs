//! Blocking HTTP/1.1 GET/POST client written directly against TCP sockets.
//!
//! # Overview
//! A request resolves its URL, opens one `Connection`, writes a hand-framed
//! HTTP/1.1 request, reads until the server closes the socket, and splits
//! the text into status code, header block and body. No HTTP library is
//! involved.
//!
//! # Design
//! - `HttpClient` carries only `ClientConfig`; connections never outlive a
//!   single request and are never shared.
//! - `HttpClient::execute` returns `Result<Response, ClientError>` with an
//!   `ErrorKind` per failure. `get`, `post` and `command` map errors to the
//!   fallback `Response` (404 with an empty body, or 404 "File not found"
//!   when the reply could not be parsed).
//! - Every request sends `Connection: close`; the response ends when the
//!   peer closes. Keep-alive, chunked bodies, redirects and TLS are out of
//!   scope.

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;
pub mod url;

pub use client::HttpClient;
pub use config::{ClientConfig, GetArgsPolicy, TransportConfig};
pub use error::{ClientError, ConfigError, ErrorKind, ParseError, TransportError};
pub use request::{HttpMethod, HttpRequest, Params};
pub use response::{get_body, get_code, get_headers, ParsedResponse, Response};
pub use url::{resolve, ParsedUrl};
