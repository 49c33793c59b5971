//! Successful response handle.

use std::io::{Cursor, Read};
use std::str::Utf8Error;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::http::{find_header, Headers, HttpResponse};

/// A 2xx response. The body is held as raw bytes; JSON decoding only
/// happens when [`Response::json`] is called, so binary downloads never go
/// through a JSON parser.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: Headers,
    body: Bytes,
}

impl Response {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    pub fn text(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.body)
    }

    /// Stream-style access to the body.
    pub fn reader(&self) -> impl Read {
        Cursor::new(self.body.clone())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

impl From<HttpResponse> for Response {
    fn from(response: HttpResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers,
            body: Bytes::from(response.body),
        }
    }
}
