//! Request orchestration: resolve, connect, send, receive, parse, close.
//!
//! # Design
//! `HttpClient` holds only its configuration. Each call opens its own
//! `Connection`, owns it for the whole exchange and closes it before
//! returning. `execute` reports failures as `ClientError`; `get`, `post` and
//! `command` turn those into the fallback `Response` so callers always get a
//! value back.

use tracing::{debug, trace, warn};

use crate::config::{ClientConfig, GetArgsPolicy};
use crate::error::ClientError;
use crate::request::{HttpMethod, HttpRequest, Params};
use crate::response::{parse_response, Response};
use crate::transport::Connection;
use crate::url;

#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: ClientConfig,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET `url`. What happens to `args` depends on `GetArgsPolicy`.
    pub fn get(&self, url: &str, args: Option<&Params>) -> Response {
        self.respond(HttpMethod::Get, url, args)
    }

    /// POST `args` form-encoded to `url`.
    pub fn post(&self, url: &str, args: Option<&Params>) -> Response {
        self.respond(HttpMethod::Post, url, args)
    }

    /// POST when `method` is exactly `"POST"`, GET otherwise.
    pub fn command(&self, url: &str, method: &str, args: Option<&Params>) -> Response {
        self.respond(HttpMethod::from_command(method), url, args)
    }

    /// Run one request and report failures with their kind.
    pub fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        args: Option<&Params>,
    ) -> Result<Response, ClientError> {
        let target = url::resolve(url)?;
        debug!(%method, host = %target.host, port = target.port, path = %target.path, "resolved");

        let request = match method {
            HttpMethod::Get => {
                self.check_get_args(args)?;
                HttpRequest::get(&target)
            }
            HttpMethod::Post => HttpRequest::post(&target, args)?,
        };
        let bytes = request.to_bytes();
        trace!(request = %String::from_utf8_lossy(&bytes), "built");

        let mut conn = Connection::connect(&target.host, target.port, &self.config.transport)?;
        let outcome = conn
            .send_all(&bytes)
            .and_then(|()| conn.receive_all())
            .map_err(ClientError::from)
            .and_then(|raw| {
                trace!(response = %raw, "raw");
                parse_response(&raw)
            });
        conn.close();

        if let Ok(response) = &outcome {
            debug!(status = response.status_code, body_len = response.body.len(), "done");
        }
        outcome
    }

    fn respond(&self, method: HttpMethod, url: &str, args: Option<&Params>) -> Response {
        self.execute(method, url, args).unwrap_or_else(|err| {
            warn!(%method, url, kind = ?err.kind(), error = %err, "request failed");
            Response::from_error(&err)
        })
    }

    fn check_get_args(&self, args: Option<&Params>) -> Result<(), ClientError> {
        let supplied = args.is_some_and(|args| !args.is_empty());
        match self.config.get_args {
            GetArgsPolicy::Reject if supplied => Err(ClientError::Request(
                "GET does not take args".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
