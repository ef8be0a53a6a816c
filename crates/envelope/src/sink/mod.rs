//! Output sinks an envelope can be written to.
//!
//! Every sink is a plain [`std::io::Write`]. A sink that sits in front of an
//! HTTP response can additionally expose a [`Transport`], which lets the
//! envelope set its `Content-Type` header and status line before the body
//! goes out. The capability is discovered at runtime through
//! [`Sink::transport`]; byte-only sinks simply keep the default `None`.
//!
//! # Provided sinks
//!
//! - `Vec<u8>` and [`Plain`]: body bytes only
//! - [`ResponseWriter`]: an HTTP/1.1 response over any writer
//! - [`ResponseRecorder`]: an in-memory response for inspection

use http::HeaderMap;
use std::io;
use std::io::Write;

mod recorder;
mod response_writer;

pub use recorder::ResponseRecorder;
pub use response_writer::ResponseWriter;

/// A destination for serialized envelopes.
pub trait Sink: Write {
    /// Returns the response transport behind this sink, if there is one.
    fn transport(&mut self) -> Option<&mut dyn Transport> {
        None
    }
}

/// Response head operations of an HTTP transport.
///
/// Both methods are called before any body byte is written.
pub trait Transport {
    /// Headers of the response being built.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Sets the status of the response.
    ///
    /// # Errors
    ///
    /// Fails when the transport can not carry `status_code`.
    fn write_status(&mut self, status_code: u16) -> io::Result<()>;
}

impl Sink for Vec<u8> {}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn transport(&mut self) -> Option<&mut dyn Transport> {
        (**self).transport()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn transport(&mut self) -> Option<&mut dyn Transport> {
        (**self).transport()
    }
}

/// Wraps any writer as a byte-only sink.
#[derive(Debug, Default)]
pub struct Plain<W> {
    inner: W,
}

impl<W: Write> Plain<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for Plain<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> Sink for Plain<W> {}
