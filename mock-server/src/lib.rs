//! In-process stand-in for the CallFire v2 API.
//!
//! Every request is recorded verbatim (method, path, raw query, headers and
//! body bytes) so tests can assert on exactly what went over the wire.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};

pub const BAD_REQUEST_PATH: &str = "/v2/errors/bad-request";
pub const BAD_REQUEST_BODY: &str = r#"{"error": "Bad Request"}"#;
pub const SUCCESS_BODY: &str = r#"{"success": true}"#;
pub const UNAUTHORIZED_BODY: &str = r#"{"error": "Unauthorized"}"#;

/// Payload served for recording downloads. Deliberately not valid UTF-8.
pub const MEDIA_BYTES: &[u8] = b"ID3\x04\x00\x00\xff\xfb\x90\x64";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Case-insensitive header lookup. Returns the first value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Number of headers sent under `name`.
    pub fn header_count(&self, name: &str) -> usize {
        self.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case(name)).count()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MockState {
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    expected_auth: Option<Arc<str>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any request whose `Authorization` header differs from `auth`.
    pub fn with_expected_auth(auth: &str) -> Self {
        Self {
            requests: Arc::default(),
            expected_auth: Some(Arc::from(auth)),
        }
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Snapshot for callers outside the server runtime.
    pub fn blocking_requests(&self) -> Vec<RecordedRequest> {
        self.requests.blocking_read().clone()
    }

    async fn admit(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: Bytes) -> Option<Response> {
        let recorded = RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers: headers
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
                .collect(),
            body: body.to_vec(),
        };
        self.requests.write().await.push(recorded);

        let expected = self.expected_auth.as_deref()?;
        let actual = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
        if actual == Some(expected) {
            None
        } else {
            Some(json_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED_BODY))
        }
    }
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route(BAD_REQUEST_PATH, any(bad_request))
        .route("/v2/calls/recordings/{file}", get(recording))
        .fallback(success)
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

fn json_response(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn bad_request(State(state): State<MockState>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    if let Some(rejected) = state.admit(method, &uri, &headers, body).await {
        return rejected;
    }
    json_response(StatusCode::BAD_REQUEST, BAD_REQUEST_BODY)
}

async fn recording(State(state): State<MockState>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    if let Some(rejected) = state.admit(method, &uri, &headers, body).await {
        return rejected;
    }
    ([(header::CONTENT_TYPE, "audio/mpeg")], MEDIA_BYTES).into_response()
}

async fn success(State(state): State<MockState>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    if let Some(rejected) = state.admit(method, &uri, &headers, body).await {
        return rejected;
    }
    json_response(StatusCode::OK, SUCCESS_BODY)
}
