//! A uniform JSON envelope for HTTP response bodies
//!
//! Every response is wrapped in the same four-key object: the status code,
//! its canonical status text, optional error details and the result payload.
//! The envelope is written to a [`Sink`]; when the sink is backed by an HTTP
//! response it also receives the `Content-Type` header and the status line.
//! The same shape can be parsed back from any byte stream.
//!
//! # Example
//!
//! ```
//! use micro_envelope::{Envelope, ResponseWriter};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User {
//!     name: &'static str,
//! }
//!
//! let writer = Envelope::new(ResponseWriter::new(Vec::new()))
//!     .set_result(200, User { name: "zava" })
//!     .output()
//!     .unwrap();
//!
//! let expected = "HTTP/1.1 200 OK\r\n\
//!     content-type: application/json\r\n\
//!     content-length: 84\r\n\
//!     \r\n\
//!     {\"status_code\":200,\"status_text\":\"OK\",\"error_details\":null,\"result\":{\"name\":\"zava\"}}";
//! assert_eq!(std::str::from_utf8(writer.get_ref()).unwrap(), expected);
//! ```
//!
//! # Architecture
//!
//! - [`Envelope`]: the data holder, its builders, `output` and the parsers
//! - [`sink`]: the [`Sink`] / [`Transport`] capability pair and provided sinks
//! - [`status_text`]: the status code to reason phrase table
//! - [`EnvelopeError`]: everything that can go wrong
//!
//! # Error Handling
//!
//! Nothing in this crate panics on bad data. Serializing a result that can
//! not be represented as JSON, or parsing input that is not an envelope,
//! returns an [`EnvelopeError`]; callers that consider this a defect are
//! free to unwrap.

mod body;
mod envelope;
mod error;
mod status;

pub mod sink;

pub use envelope::Envelope;
pub use error::EnvelopeError;
pub use sink::{Plain, ResponseRecorder, ResponseWriter, Sink, Transport};
pub use status::status_text;
