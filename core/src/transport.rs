//! Authenticated dispatch of request specs.
//!
//! # Design
//! `Transport` holds the credentials, the base URL and a `Connector`, and
//! nothing mutable. A call is one linear pass: prepare the request from the
//! spec, send it, then either wrap the response or classify the failure.
//! There are no retries and no intermediate states, so one `Transport` can
//! serve concurrent calls from several threads.
//!
//! Every network-originating failure leaves as a `TransportError`, after a
//! debug event recording the method, path, query, body and diagnostic.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::auth::Credentials;
use crate::connector::{Connector, UreqConnector};
use crate::error::{EncodeError, Result, TransportError};
use crate::http::{merge_headers, HttpMethod, HttpRequest};
use crate::logging::enable_debug_logging;
use crate::request::RequestSpec;
use crate::response::Response;

/// Production base URL for version 2 of the API.
pub const CALLFIRE_V2_BASE_URL: &str = "https://api.callfire.com/v2";

#[derive(Clone)]
pub struct Transport {
    credentials: Credentials,
    base_url: String,
    timeout: Option<Duration>,
    connector: Arc<dyn Connector>,
}

impl Transport {
    /// Transport for the production API with the default connector.
    pub fn new(username: &str, password: &str) -> Self {
        Self::builder(username, password).build()
    }

    pub fn builder(username: &str, password: &str) -> TransportBuilder {
        TransportBuilder::new(Credentials::new(username, password))
    }

    /// Credentials from `CALLFIRE_USERNAME` / `CALLFIRE_PASSWORD`.
    pub fn from_env() -> Result<Self> {
        Ok(TransportBuilder::new(Credentials::from_env()?).build())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn get<S: RequestSpec + ?Sized>(&self, spec: &mut S) -> Result<Response> {
        self.execute(spec, HttpMethod::Get)
    }

    pub fn post<S: RequestSpec + ?Sized>(&self, spec: &mut S) -> Result<Response> {
        self.execute(spec, HttpMethod::Post)
    }

    pub fn put<S: RequestSpec + ?Sized>(&self, spec: &mut S) -> Result<Response> {
        self.execute(spec, HttpMethod::Put)
    }

    pub fn delete<S: RequestSpec + ?Sized>(&self, spec: &mut S) -> Result<Response> {
        self.execute(spec, HttpMethod::Delete)
    }

    /// Send `spec` with `method`, bounded by the transport's default timeout.
    pub fn execute<S: RequestSpec + ?Sized>(&self, spec: &mut S, method: HttpMethod) -> Result<Response> {
        self.dispatch(spec, method, self.timeout)
    }

    /// Like [`Transport::execute`] with a deadline for this call only.
    pub fn execute_with_timeout<S: RequestSpec + ?Sized>(
        &self,
        spec: &mut S,
        method: HttpMethod,
        timeout: Duration,
    ) -> Result<Response> {
        self.dispatch(spec, method, Some(timeout))
    }

    /// Build the outbound request without sending it.
    ///
    /// Headers start with `Authorization`; the request spec's own headers are merged
    /// over them and win on a name collision.
    pub fn prepare<S: RequestSpec + ?Sized>(
        &self,
        spec: &mut S,
        method: HttpMethod,
    ) -> std::result::Result<HttpRequest, EncodeError> {
        let url = spec.url(&self.base_url);
        let mut headers = vec![("Authorization".to_string(), self.credentials.basic_auth_header())];
        merge_headers(&mut headers, spec.additional_headers()?);
        let body = spec.prepared_body()?;
        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    fn dispatch<S: RequestSpec + ?Sized>(
        &self,
        spec: &mut S,
        method: HttpMethod,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        let request = self.prepare(spec, method)?;
        debug!(%method, url = %request.url, "dispatching request");

        let err = match self.connector.send(request, timeout) {
            Ok(response) if response.is_success() => return Ok(Response::from(response)),
            Ok(response) => {
                TransportError::http_status(response.status, String::from_utf8_lossy(&response.body))
            }
            Err(cause) => TransportError::connection(cause),
        };

        debug!(
            %method,
            path = spec.path(),
            query = %spec.query().map(|q| q.encode()).unwrap_or_default(),
            body = %spec.body_summary(),
            error = %err,
            "request failed"
        );
        Err(err.into())
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

pub struct TransportBuilder {
    credentials: Credentials,
    base_url: String,
    debug: bool,
    timeout: Option<Duration>,
    connector: Option<Arc<dyn Connector>>,
}

impl TransportBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: CALLFIRE_V2_BASE_URL.to_string(),
            debug: false,
            timeout: None,
            connector: None,
        }
    }

    /// Point at another deployment. A trailing `/` is dropped since paths
    /// carry their own leading separator.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Attach the process-wide stderr debug sink on `build`.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Default deadline for every call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn build(self) -> Transport {
        if self.debug {
            enable_debug_logging();
        }
        Transport {
            credentials: self.credentials,
            base_url: self.base_url,
            timeout: self.timeout,
            connector: self
                .connector
                .unwrap_or_else(|| Arc::new(UreqConnector::new())),
        }
    }
}
