//! Blocking client core for the CallFire v2 REST API.
//!
//! # Overview
//! A call is described by a [`RequestSpec`] (path, query, body and how to
//! encode it) and handed to a [`Transport`] together with an HTTP method.
//! The transport attaches Basic authentication, dispatches through a
//! [`Connector`] and returns either a [`Response`] or a single normalized
//! [`TransportError`].
//!
//! # Design
//! - Body encodings are `RequestSpec` implementations: [`JsonRequest`] and
//!   the single-part [`MultipartRequest`]. The transport never inspects a
//!   body, so adding an encoding does not touch it.
//! - `Transport::prepare` builds the outbound request as plain data; the
//!   connector is the only piece that does I/O, which keeps everything else
//!   deterministic and testable with a fake connector.
//! - Failures are classified at the transport boundary into connection and
//!   HTTP-status kinds. The original cause stays attached.
//! - [`CallFireClient`] is a thin endpoint layer over the transport.
//!
//! ```no_run
//! use callfire_core::{CallFireClient, Query, Transport};
//!
//! let client = CallFireClient::new(Transport::new("api-login", "api-password"));
//! let calls: serde_json::Value = client.find_calls(Query::new().with("limit", 5))?.json()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod auth;
pub mod client;
pub mod connector;
pub mod error;
pub mod http;
pub mod logging;
pub mod multipart;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;

pub use auth::Credentials;
pub use client::CallFireClient;
pub use connector::{Connector, UreqConnector};
pub use error::{ConfigError, EncodeError, Error, FailureKind, HttpStatusError, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use logging::enable_debug_logging;
pub use multipart::MultipartRequest;
pub use query::{Query, QueryValue};
pub use request::{JsonRequest, RequestSpec};
pub use response::Response;
pub use transport::{Transport, TransportBuilder, CALLFIRE_V2_BASE_URL};
