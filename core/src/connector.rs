//! The network boundary.
//!
//! # Design
//! A `Connector` executes a prepared `HttpRequest` and hands back whatever
//! the server said, success or not. `Err` is reserved for the cases where
//! no response exists at all. Classifying statuses is the `Transport`'s job,
//! so the HTTP library is configured not to turn 4xx/5xx into errors.

use std::time::Duration;

use ureq::http;
use ureq::{Agent, AsSendBody};

use crate::error::BoxError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one prepared request, blocking until a response or failure.
pub trait Connector: Send + Sync {
    /// `timeout` bounds the whole call when set.
    fn send(&self, request: HttpRequest, timeout: Option<Duration>) -> Result<HttpResponse, BoxError>;
}

/// Blocking connector backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqConnector {
    agent: Agent,
}

impl UreqConnector {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a caller-configured agent. It must have `http_status_as_error`
    /// turned off, or error statuses surface as connection failures.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }

    fn with_deadline<S: AsSendBody>(&self, request: http::Request<S>, timeout: Option<Duration>) -> http::Request<S> {
        match timeout {
            Some(timeout) => self
                .agent
                .configure_request(request)
                .timeout_global(Some(timeout))
                .build(),
            None => request,
        }
    }
}

impl Default for UreqConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for UreqConnector {
    fn send(&self, request: HttpRequest, timeout: Option<Duration>) -> Result<HttpResponse, BoxError> {
        let mut builder = http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = match request.body {
            Some(body) => {
                let outbound = self.with_deadline(builder.body(body.to_vec())?, timeout);
                self.agent.run(outbound)?
            }
            None => {
                let outbound = self.with_deadline(builder.body(())?, timeout);
                self.agent.run(outbound)?
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        let body = response.body_mut().with_config().limit(u64::MAX).read_to_vec()?;

        Ok(HttpResponse { status, headers, body })
    }
}
