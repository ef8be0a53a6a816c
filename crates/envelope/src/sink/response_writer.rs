//! HTTP/1.1 response sink.
//!
//! [`ResponseWriter`] collects the response head through [`Transport`] and
//! the body through [`Write`]. Nothing reaches the underlying writer until
//! [`Write::flush`] is called: at that point the status line, the headers
//! (with a computed `Content-Length`), the blank separator line and the body
//! are encoded into one buffer and written together. Statuses that forbid a
//! body (1xx, `204 No Content`, `304 Not Modified`) are sent head only,
//! without `Content-Length`.

use crate::sink::{Sink, Transport};
use crate::status::status_text;
use bytes::{BufMut, BytesMut};
use http::{header, HeaderMap, Response, StatusCode};
use std::io;
use std::io::{ErrorKind, Write};
use tracing::{debug, error, trace};

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

const DEFAULT_BUFFER_SIZE: usize = 4 * 1024;

/// Response head before the body is attached.
type ResponseHead = Response<()>;

/// A [`Sink`] that writes a complete HTTP/1.1 response to `W`.
///
/// The status defaults to `200 OK` when [`Transport::write_status`] is never
/// called. A writer produces exactly one response; writing body bytes after
/// it has been flushed is an error, and a write that failed half way is never
/// retried by a later flush.
///
/// # Example
///
/// ```
/// use micro_envelope::{Envelope, ResponseWriter};
///
/// let writer = ResponseWriter::new(Vec::new());
/// let writer = Envelope::new(writer).set_result(204, ()).output().unwrap();
///
/// let bytes = writer.into_inner();
/// assert_eq!(bytes, b"HTTP/1.1 204 No Content\r\ncontent-type: application/json\r\n\r\n");
/// ```
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    head: ResponseHead,
    body: BytesMut,
    finished: bool,
}

impl<W: Write> ResponseWriter<W> {
    /// Creates a writer with a 4 KiB body buffer.
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, DEFAULT_BUFFER_SIZE)
    }

    /// Creates a writer whose body buffer starts with `buffer_size` bytes.
    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self { writer, head: Response::new(()), body: BytesMut::with_capacity(buffer_size), finished: false }
    }

    /// The status that will be written on the status line.
    pub fn status(&self) -> StatusCode {
        self.head.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.head.headers()
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Whether the response has already been written out.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the underlying writer, discarding anything not yet flushed.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn encode(&mut self, dst: &mut BytesMut) -> io::Result<()> {
        dst.reserve(INIT_HEADER_SIZE + self.body.len());

        let status = self.head.status();
        let reason = match status_text(status.as_u16()) {
            "" => status.canonical_reason().unwrap_or_default(),
            reason => reason,
        };
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), reason)?;

        let with_body = allows_body(status);
        if with_body {
            let content_length = self.body.len();
            self.head.headers_mut().insert(header::CONTENT_LENGTH, content_length.into());
        } else {
            self.head.headers_mut().remove(header::CONTENT_LENGTH);
            if !self.body.is_empty() {
                debug!(status = status.as_u16(), size = self.body.len(), "drop body of a bodiless status");
            }
        }

        for (header_name, header_value) in self.head.headers() {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        if with_body {
            dst.put_slice(&self.body);
        }
        Ok(())
    }
}

/// 1xx, 204 and 304 responses never carry a body.
fn allows_body(status: StatusCode) -> bool {
    !(status.is_informational() || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED)
}

impl<W: Write> Write for ResponseWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.finished {
            error!("receive body bytes but the response has been sent");
            return Err(io::Error::new(ErrorKind::InvalidInput, "response has already been sent"));
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.finished {
            let mut dst = BytesMut::new();
            self.encode(&mut dst)?;
            // a failed write may have sent part of the response, never resend it
            self.finished = true;
            self.body.clear();
            self.writer.write_all(&dst)?;
            trace!(status = self.head.status().as_u16(), size = dst.len(), "response written");
        }
        self.writer.flush()
    }
}

impl<W: Write> Transport for ResponseWriter<W> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.head.headers_mut()
    }

    fn write_status(&mut self, status_code: u16) -> io::Result<()> {
        let status = StatusCode::from_u16(status_code).map_err(|e| {
            error!(status_code, "status code can not be written to a status line");
            io::Error::new(ErrorKind::InvalidInput, e)
        })?;
        *self.head.status_mut() = status;
        Ok(())
    }
}

impl<W: Write> Sink for ResponseWriter<W> {
    fn transport(&mut self) -> Option<&mut dyn Transport> {
        Some(self)
    }
}

/// Writes into a `BytesMut` that already has enough space reserved.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
