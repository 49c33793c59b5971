//! Single-file `multipart/form-data` bodies.
//!
//! The boundary token is the fixed string `boundary`. A body carries exactly
//! one part named `file`; this is not a general multipart builder.

use std::fmt;
use std::io::{self, Cursor, Read};

use bytes::Bytes;

use crate::error::EncodeError;
use crate::http::Headers;
use crate::query::Query;
use crate::request::RequestSpec;

pub const BOUNDARY: &str = "boundary";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data; boundary=boundary";

const DISPOSITION: &[u8] = b"Content-Disposition: form-data; name=\"file\"; filename=\"file\"\r\n";
const CRLF: &[u8] = b"\r\n";

/// Encode the whole of `payload` as one form-data part.
///
/// Layout: `--boundary`, the disposition line and a blank line, the payload
/// bytes, `--boundary--`, and a trailing empty segment, joined with CRLF.
pub fn encode(payload: &mut dyn Read) -> io::Result<Vec<u8>> {
    let mut content = Vec::new();
    payload.read_to_end(&mut content)?;

    let delimiter = format!("--{BOUNDARY}");
    let closing = format!("--{BOUNDARY}--");
    let segments: [&[u8]; 5] = [
        delimiter.as_bytes(),
        DISPOSITION,
        &content,
        closing.as_bytes(),
        b"",
    ];
    Ok(segments.join(CRLF))
}

/// A request whose body is a single uploaded file.
///
/// The payload stream is read once, on the first call to either capability;
/// the encoded body is kept for as long as the request lives.
pub struct MultipartRequest {
    path: String,
    query: Option<Query>,
    payload: Option<Box<dyn Read + Send>>,
    prepared: Option<Bytes>,
}

impl MultipartRequest {
    pub fn new(path: impl Into<String>, payload: impl Read + Send + 'static) -> Self {
        Self {
            path: path.into(),
            query: None,
            payload: Some(Box::new(payload)),
            prepared: None,
        }
    }

    pub fn from_bytes(path: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self::new(path, Cursor::new(payload.into()))
    }

    pub fn with_query(mut self, query: impl Into<Query>) -> Self {
        self.query = Some(query.into());
        self
    }

    fn encoded(&mut self) -> Result<Bytes, EncodeError> {
        if let Some(prepared) = &self.prepared {
            return Ok(prepared.clone());
        }
        let body = match self.payload.as_mut() {
            Some(payload) => encode(payload)?,
            None => encode(&mut io::empty())?,
        };
        let body = Bytes::from(body);
        self.payload = None;
        self.prepared = Some(body.clone());
        Ok(body)
    }
}

impl fmt::Debug for MultipartRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultipartRequest")
            .field("path", &self.path)
            .field("query", &self.query)
            .field("prepared_len", &self.prepared.as_ref().map(Bytes::len))
            .finish_non_exhaustive()
    }
}

impl RequestSpec for MultipartRequest {
    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    fn additional_headers(&mut self) -> Result<Headers, EncodeError> {
        let length = self.encoded()?.len();
        Ok(vec![
            ("Content-Type".to_string(), MULTIPART_CONTENT_TYPE.to_string()),
            ("Content-Length".to_string(), length.to_string()),
        ])
    }

    fn prepared_body(&mut self) -> Result<Option<Bytes>, EncodeError> {
        self.encoded().map(Some)
    }

    fn body_summary(&self) -> String {
        match &self.prepared {
            Some(body) => format!("<multipart body, {} bytes>", body.len()),
            None => "<multipart payload, not yet read>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    fn expected(payload: &[u8]) -> Vec<u8> {
        let mut out = b"--boundary\r\nContent-Disposition: form-data; name=\"file\"; filename=\"file\"\r\n\r\n".to_vec();
        out.extend_from_slice(payload);
        out.extend_from_slice(b"\r\n--boundary--\r\n");
        out
    }

    #[test]
    fn encodes_exact_layout() {
        let payloads: [&[u8]; 4] = [b"abc", b"", b"\r\n--boundary\r\n", &[0, 255, 13, 10]];
        for payload in payloads {
            let body = encode(&mut Cursor::new(payload)).unwrap();
            assert_eq!(body, expected(payload));
        }
    }

    #[test]
    fn empty_payload_is_well_formed() {
        let mut spec = MultipartRequest::from_bytes("/media", Vec::<u8>::new());
        let body = spec.prepared_body().unwrap().unwrap();
        assert_eq!(&body[..], &expected(b"")[..]);
    }

    #[test]
    fn content_length_matches_encoded_body() {
        let mut spec = MultipartRequest::from_bytes("/media", b"abc".to_vec());
        let headers = spec.additional_headers().unwrap();
        let body = spec.prepared_body().unwrap().unwrap();
        assert_eq!(
            headers,
            vec![
                ("Content-Type".to_string(), "multipart/form-data; boundary=boundary".to_string()),
                ("Content-Length".to_string(), body.len().to_string()),
            ]
        );
        assert!(body.len() > 3);
    }

    #[test]
    fn body_is_memoized_after_stream_is_exhausted() {
        let mut spec = MultipartRequest::new("/campaigns/sounds/files", Cursor::new(b"sound data".to_vec()));
        let first = spec.prepared_body().unwrap().unwrap();
        let second = spec.prepared_body().unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(&first[..], &expected(b"sound data")[..]);
        assert!(spec.payload.is_none());
    }

    #[test]
    fn headers_then_body_read_payload_once() {
        let mut spec = MultipartRequest::from_bytes("/media", b"xyz".to_vec());
        let headers = spec.additional_headers().unwrap();
        let body = spec.prepared_body().unwrap().unwrap();
        assert_eq!(headers[1].1, body.len().to_string());
        assert_eq!(&body[..], &expected(b"xyz")[..]);
    }

    #[test]
    fn read_failure_is_an_encode_error() {
        let mut spec = MultipartRequest::new("/media", Broken);
        let err = spec.prepared_body().unwrap_err();
        assert!(matches!(err, EncodeError::Read(_)));
        assert!(spec.prepared.is_none());
    }

    #[test]
    fn summary_reports_size_once_encoded() {
        let mut spec = MultipartRequest::from_bytes("/media", b"abc".to_vec());
        assert_eq!(spec.body_summary(), "<multipart payload, not yet read>");
        let len = spec.prepared_body().unwrap().unwrap().len();
        assert_eq!(spec.body_summary(), format!("<multipart body, {len} bytes>"));
    }
}
