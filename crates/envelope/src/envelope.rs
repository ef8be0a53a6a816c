//! The response envelope and its JSON wire format.
//!
//! Every response body produced through this crate has the same shape:
//!
//! ```json
//! {
//!   "status_code": 200,
//!   "status_text": "OK",
//!   "error_details": null,
//!   "result": {"value_one": "foo"}
//! }
//! ```
//!
//! All four keys are always present. `status_text` is never set on its own:
//! it is looked up from the status table whenever a status code is assigned.
//!
//! # Lifecycle
//!
//! An [`Envelope`] starts out as `500 Internal Server Error` with no result,
//! so a handler that bails out before setting anything still reports a
//! server error instead of an empty success. The handler then calls
//! [`Envelope::set_result`], optionally [`Envelope::with_error_details`], and
//! finally [`Envelope::output`], which consumes the envelope.
//!
//! ```
//! use micro_envelope::{Envelope, ResponseRecorder};
//!
//! let recorder = Envelope::new(ResponseRecorder::new())
//!     .set_result(400, ())
//!     .with_error_details("Missing Parameter 'name'")
//!     .output()
//!     .unwrap();
//!
//! assert_eq!(recorder.status(), Some(400));
//! assert_eq!(
//!     recorder.body(),
//!     r#"{"status_code":400,"status_text":"Bad Request","error_details":"Missing Parameter 'name'","result":null}"#
//! );
//! ```

use crate::error::EnvelopeError;
use crate::sink::Sink;
use crate::status::{status_text, INTERNAL_SERVER_ERROR};
use bytes::Bytes;
use http::{header, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::io::{Read, Write};
use tracing::{debug, trace};

pub(crate) const APPLICATION_JSON: HeaderValue = HeaderValue::from_static("application/json");

/// A uniform response body bound to the sink it will be written to.
///
/// `S` is the sink and is never serialized; a parsed envelope uses `()`.
/// `T` is the result payload, an arbitrary JSON value unless a concrete
/// type is chosen through [`Envelope::set_result`].
///
/// Envelopes compare equal when their four data fields are equal, whatever
/// their sinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "S: Default, T: Deserialize<'de> + Default"))]
pub struct Envelope<S = (), T = Value> {
    #[serde(skip)]
    sink: S,
    #[serde(default, deserialize_with = "null_as_default")]
    status_code: u16,
    #[serde(default, deserialize_with = "null_as_default")]
    status_text: String,
    #[serde(default)]
    error_details: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    result: T,
}

/// An explicit `null` leaves the field at its zero value, like a missing key.
fn null_as_default<'de, D, X>(deserializer: D) -> Result<X, D::Error>
where
    D: Deserializer<'de>,
    X: Deserialize<'de> + Default,
{
    Option::<X>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl<S: Sink> Envelope<S> {
    /// Creates an envelope in the `500 Internal Server Error` state.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            status_code: INTERNAL_SERVER_ERROR,
            status_text: status_text(INTERNAL_SERVER_ERROR).to_owned(),
            error_details: None,
            result: Value::Null,
        }
    }
}

impl<S, T> Envelope<S, T> {
    /// Attaches a human readable explanation beyond the status code.
    ///
    /// Most useful with ambiguous codes such as `400 Bad Request`; a
    /// `404 Not Found` rarely needs one.
    #[must_use]
    pub fn with_error_details(mut self, error_details: impl Into<String>) -> Self {
        self.error_details = Some(error_details.into());
        self
    }

    /// Sets the status code and the result payload.
    ///
    /// The status text is recomputed from the status table; codes without a
    /// canonical phrase are accepted and get an empty text. Calling this
    /// again replaces both, while error details are kept.
    #[must_use]
    pub fn set_result<U>(self, status_code: u16, result: U) -> Envelope<S, U> {
        Envelope {
            sink: self.sink,
            status_code,
            status_text: status_text(status_code).to_owned(),
            error_details: self.error_details,
            result,
        }
    }

    /// Moves the envelope onto another sink, keeping its data untouched.
    ///
    /// This is how a parsed envelope gets relayed as is.
    pub fn attach<S2>(self, sink: S2) -> Envelope<S2, T> {
        Envelope {
            sink,
            status_code: self.status_code,
            status_text: self.status_text,
            error_details: self.error_details,
            result: self.result,
        }
    }

    /// The status code, as set by [`Envelope::set_result`] or parsed.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The canonical phrase of [`Envelope::status_code`], empty for unknown codes.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// The details attached with [`Envelope::with_error_details`], if any.
    pub fn error_details(&self) -> Option<&str> {
        self.error_details.as_deref()
    }

    /// The result payload.
    pub fn result(&self) -> &T {
        &self.result
    }

    /// Consumes the envelope and returns the result payload.
    pub fn into_result(self) -> T {
        self.result
    }

    /// The sink this envelope will be written to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink, e.g. to set extra response headers
    /// before [`Envelope::output`].
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Whether the status code is in the `2xx` range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

impl<S, T: Serialize> Envelope<S, T> {
    /// Serializes the four data fields.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Serialize`] when the result can not be
    /// represented as JSON.
    pub fn to_vec(&self) -> Result<Vec<u8>, EnvelopeError> {
        serde_json::to_vec(self).map_err(|e| {
            debug!(cause = %e, status_code = self.status_code, "failed to serialize envelope");
            EnvelopeError::serialize(e)
        })
    }

    /// Same as [`Envelope::to_vec`] but returns `Bytes`.
    ///
    /// # Errors
    ///
    /// See [`Envelope::to_vec`].
    pub fn to_bytes(&self) -> Result<Bytes, EnvelopeError> {
        self.to_vec().map(Bytes::from)
    }
}

impl<S: Sink, T: Serialize> Envelope<S, T> {
    /// Writes the envelope to its sink and hands the sink back.
    ///
    /// When the sink exposes a [`Transport`](crate::Transport), the
    /// `Content-Type: application/json` header and the status are written
    /// first. The body then goes out in a single write followed by a flush.
    ///
    /// The body is serialized before anything touches the sink, so a failed
    /// serialization leaves the sink exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Serialize`] when the result can not be
    /// represented as JSON and [`EnvelopeError::Io`] when the sink fails.
    pub fn output(mut self) -> Result<S, EnvelopeError> {
        let body = self.to_vec()?;

        if let Some(transport) = self.sink.transport() {
            transport.headers_mut().insert(header::CONTENT_TYPE, APPLICATION_JSON);
            transport.write_status(self.status_code)?;
            trace!(status_code = self.status_code, "response head written");
        }

        self.sink.write_all(&body)?;
        self.sink.flush()?;

        debug!(status_code = self.status_code, size = body.len(), "envelope written");
        Ok(self.sink)
    }
}

impl<T: DeserializeOwned + Default> Envelope<(), T> {
    /// Reads `reader` to the end and parses the content as an envelope.
    ///
    /// Keys are matched exactly and unknown keys are ignored. A key that is
    /// missing takes its zero value.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Io`] when reading fails and
    /// [`EnvelopeError::Deserialize`] when the content is not valid JSON or a
    /// field has the wrong type.
    pub fn parse<R: Read>(mut reader: R) -> Result<Self, EnvelopeError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Self::from_slice(&buf)
    }

    /// Parses an envelope from an in-memory buffer.
    ///
    /// # Errors
    ///
    /// See [`Envelope::parse`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        trace!(size = bytes.len(), "parsing envelope");
        serde_json::from_slice(bytes).map_err(|e| {
            debug!(cause = %e, "failed to parse envelope");
            EnvelopeError::deserialize(e)
        })
    }
}

impl<S, S2, T: PartialEq> PartialEq<Envelope<S2, T>> for Envelope<S, T> {
    fn eq(&self, other: &Envelope<S2, T>) -> bool {
        self.status_code == other.status_code
            && self.status_text == other.status_text
            && self.error_details == other.error_details
            && self.result == other.result
    }
}
