//! HTTP request/response values exchanged with a `Connector`.
//!
//! # Design
//! A prepared request is plain data: method, absolute URL, ordered headers
//! and an optional body. `Transport::prepare` builds it without touching the
//! network and a `Connector` executes it. Keeping the boundary as data makes
//! URL composition, header merging and body encoding testable on their own.

use std::fmt;

use bytes::Bytes;

/// Ordered header list. Names compare case-insensitively.
pub type Headers = Vec<(String, String)>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully addressed, authenticated outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A response as returned by a `Connector`, whatever its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub(crate) fn find_header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Merge `overrides` into `base`. On a name collision the override replaces
/// the existing value in place; new names are appended.
pub(crate) fn merge_headers(base: &mut Headers, overrides: Headers) {
    for (name, value) in overrides {
        match base.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some(existing) => *existing = (name, value),
            None => base.push((name, value)),
        }
    }
}
