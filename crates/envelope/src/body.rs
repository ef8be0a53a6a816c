//! Bridges between envelopes and the `http` / `http-body` ecosystem.
//!
//! Parsing here follows the same rule as [`Envelope::parse`]: the whole
//! input is collected first and only then handed to the JSON parser.

use crate::envelope::{Envelope, APPLICATION_JSON};
use crate::error::EnvelopeError;
use bytes::Bytes;
use http::{header, HeaderMap, Response, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt, Full};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error as StdError;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

impl<T: DeserializeOwned + Default> Envelope<(), T> {
    /// Reads `reader` to EOF and parses the content as an envelope.
    ///
    /// # Errors
    ///
    /// See [`Envelope::parse`].
    pub async fn parse_async<R: AsyncRead + Unpin>(mut reader: R) -> Result<Self, EnvelopeError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Self::from_slice(&buf)
    }

    /// Collects an HTTP body and parses it as an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidBody`] when the body yields an error
    /// and [`EnvelopeError::Deserialize`] when the collected bytes are not an
    /// envelope.
    pub async fn parse_body<B>(body: B) -> Result<Self, EnvelopeError>
    where
        B: Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let bytes = body.collect().await.map_err(EnvelopeError::invalid_body)?.to_bytes();
        Self::from_slice(&bytes)
    }

    /// Parses the body of an HTTP response as an envelope.
    ///
    /// The envelope's own `status_code` is authoritative; the status line
    /// and headers of `response` are not consulted beyond a debug event
    /// when the content type is not JSON.
    ///
    /// # Errors
    ///
    /// See [`Envelope::parse_body`].
    pub async fn parse_response<B>(response: Response<B>) -> Result<Self, EnvelopeError>
    where
        B: Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        if !is_json(response.headers()) {
            debug!(status = response.status().as_u16(), "parsing envelope from a non json response");
        }
        Self::parse_body(response.into_body()).await
    }
}

impl<S, T: Serialize> Envelope<S, T> {
    /// Builds a `http::Response` carrying this envelope as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidStatus`] when the status code does not
    /// fit a status line and [`EnvelopeError::Serialize`] when the result can
    /// not be represented as JSON.
    pub fn into_response(self) -> Result<Response<Full<Bytes>>, EnvelopeError> {
        let status_code = self.status_code();
        let status = StatusCode::from_u16(status_code).ok().ok_or_else(|| EnvelopeError::invalid_status(status_code))?;

        let mut response = Response::new(Full::new(self.to_bytes()?));
        *response.status_mut() = status;
        response.headers_mut().insert(header::CONTENT_TYPE, APPLICATION_JSON);
        Ok(response)
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .is_some_and(|content_type| content_type.essence_str() == mime::APPLICATION_JSON.essence_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use http_body::Frame;
    use serde_json::{json, Value};
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::AsyncWriteExt;

    const PONG: &str = r#"{"status_code":200,"status_text":"OK","error_details":null,"result":"pong"}"#;

    struct FailingBody;

    impl Body for FailingBody {
        type Data = Bytes;
        type Error = io::Error;

        fn poll_frame(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
            Poll::Ready(Some(Err(io::Error::other("connection reset"))))
        }
    }

    #[tokio::test]
    async fn test_parse_async_slice() {
        let envelope: Envelope = Envelope::parse_async(PONG.as_bytes()).await.unwrap();
        assert_eq!(envelope.status_code(), 200);
        assert_eq!(envelope.result(), &json!("pong"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_parse_async_reads_to_eof() {
        let (mut writer, reader) = tokio::io::duplex(8);

        let handle = tokio::spawn(async move {
            for chunk in PONG.as_bytes().chunks(5) {
                writer.write_all(chunk).await.unwrap();
            }
        });

        let envelope: Envelope = Envelope::parse_async(reader).await.unwrap();
        handle.await.unwrap();

        assert_eq!(envelope.status_text(), "OK");
        assert_eq!(envelope.result(), &json!("pong"));
    }

    #[tokio::test]
    async fn test_parse_body() {
        let envelope: Envelope = Envelope::parse_body(Full::new(Bytes::from_static(PONG.as_bytes()))).await.unwrap();
        assert_eq!(envelope.status_code(), 200);
    }

    #[tokio::test]
    async fn test_parse_body_error() {
        let err = Envelope::<(), Value>::parse_body(FailingBody).await.unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidBody { .. }));
        assert_eq!(err.to_string(), "invalid body: connection reset");
    }

    #[tokio::test]
    async fn test_parse_body_type_mismatch() {
        let body = Full::new(Bytes::from_static(br#"{"status_code":"hello world"}"#));
        let err = Envelope::<(), Value>::parse_body(body).await.unwrap_err();
        assert!(err.is_deserialize());
    }

    #[tokio::test]
    async fn test_parse_response() {
        let mut response = Response::new(Full::new(Bytes::from_static(PONG.as_bytes())));
        response.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));

        assert!(is_json(response.headers()));
        let envelope: Envelope = Envelope::parse_response(response).await.unwrap();
        assert_eq!(envelope.result(), &json!("pong"));
    }

    #[tokio::test]
    async fn test_into_response() {
        let response = Envelope::new(Vec::new())
            .set_result(400, Value::Null)
            .with_error_details("Missing Parameter 'name'")
            .into_response()
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), mime::APPLICATION_JSON.as_ref());

        let envelope: Envelope = Envelope::parse_response(response).await.unwrap();
        assert_eq!(envelope.status_code(), 400);
        assert_eq!(envelope.error_details(), Some("Missing Parameter 'name'"));
    }

    #[test]
    fn test_into_response_invalid_status() {
        let err = Envelope::new(Vec::new()).set_result(42, "too small").into_response().unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidStatus { status_code: 42 }));
    }

    #[test]
    fn test_is_json() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(is_json(&headers));
    }
}
