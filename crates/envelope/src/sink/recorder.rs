use crate::error::EnvelopeError;
use crate::sink::{Sink, Transport};
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, Response, StatusCode};
use std::io;
use std::io::Write;

/// An in-memory response transport.
///
/// Records the status, the headers and every individual write call, so the
/// exact sequence produced by an envelope can be inspected afterwards.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<u16>,
    headers: HeaderMap,
    writes: Vec<Bytes>,
    body_before_status: bool,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status written through [`Transport::write_status`], if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Each write call in the order it was made.
    pub fn writes(&self) -> &[Bytes] {
        &self.writes
    }

    /// Whether body bytes were written before any status.
    pub fn body_before_status(&self) -> bool {
        self.body_before_status
    }

    pub fn body(&self) -> Bytes {
        match self.writes.as_slice() {
            [] => Bytes::new(),
            [single] => single.clone(),
            writes => {
                let mut body = BytesMut::with_capacity(writes.iter().map(Bytes::len).sum());
                writes.iter().for_each(|w| body.extend_from_slice(w));
                body.freeze()
            }
        }
    }

    /// Builds the recorded exchange as a `http::Response`.
    ///
    /// A missing status becomes `200 OK`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidStatus`] when the recorded status is
    /// outside of what a status line can carry.
    pub fn into_response(self) -> Result<Response<Bytes>, EnvelopeError> {
        let status = match self.status {
            Some(code) => StatusCode::from_u16(code).ok().ok_or_else(|| EnvelopeError::invalid_status(code))?,
            None => StatusCode::OK,
        };

        let body = self.body();
        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = self.headers;
        Ok(response)
    }
}

impl Write for ResponseRecorder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.body_before_status = true;
        }
        self.writes.push(Bytes::copy_from_slice(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for ResponseRecorder {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status_code: u16) -> io::Result<()> {
        self.status = Some(status_code);
        Ok(())
    }
}

impl Sink for ResponseRecorder {
    fn transport(&mut self) -> Option<&mut dyn Transport> {
        Some(self)
    }
}
