//! Request specifications: what to call, and how to encode the body.
//!
//! # Design
//! `RequestSpec` is the capability contract every body encoding satisfies:
//! the extra headers it needs and the encoded body bytes. The `Transport`
//! composes everything else (URL, authentication, method) and never looks
//! inside a spec's body, so a new encoding plugs in without touching it.
//!
//! Specs are built right before dispatch and handed to the `Transport` by
//! `&mut`. Encoding may consume a stream, which is why the capabilities take
//! `&mut self`.

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::error::EncodeError;
use crate::http::Headers;
use crate::query::Query;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// One logical API call plus its body encoding strategy.
pub trait RequestSpec {
    /// API-relative path, starting with `/`.
    fn path(&self) -> &str;

    fn query(&self) -> Option<&Query>;

    /// Headers the encoding requires. They take precedence over the
    /// transport's own headers.
    fn additional_headers(&mut self) -> Result<Headers, EncodeError>;

    /// The encoded body, or `None` when there is nothing to send.
    fn prepared_body(&mut self) -> Result<Option<Bytes>, EncodeError>;

    /// Short rendition of the body for diagnostics.
    fn body_summary(&self) -> String;

    /// `base_url` + path, plus `?query` when parameters are present. The
    /// path is appended verbatim.
    fn url(&self, base_url: &str) -> String {
        let mut url = format!("{base_url}{}", self.path());
        if let Some(query) = self.query().filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(&query.encode());
        }
        url
    }
}

/// A request whose body, if any, is sent as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRequest {
    path: String,
    query: Option<Query>,
    body: Option<Value>,
}

impl JsonRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
            body: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<Query>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Convert any serializable value into the body.
    pub fn with_serialized_body<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, EncodeError> {
        let value = serde_json::to_value(body)?;
        Ok(self.with_body(value))
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

impl RequestSpec for JsonRequest {
    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    fn additional_headers(&mut self) -> Result<Headers, EncodeError> {
        Ok(vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())])
    }

    fn prepared_body(&mut self) -> Result<Option<Bytes>, EncodeError> {
        match &self.body {
            Some(body) => Ok(Some(Bytes::from(serde_json::to_vec(body)?))),
            None => Ok(None),
        }
    }

    fn body_summary(&self) -> String {
        match &self.body {
            Some(body) => body.to_string(),
            None => "None".to_string(),
        }
    }
}
