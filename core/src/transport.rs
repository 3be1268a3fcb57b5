//! One blocking TCP connection, used for exactly one request.
//!
//! # Design
//! `Connection` is a plain value owned by the request that opened it.
//! `close` consumes it, so a connection cannot be closed twice or used after
//! closing. The end of a response is the peer closing its side: `receive_all`
//! reads until a zero-length read and does not look at `Content-Length`.
//!
//! `Connection` is generic over `Stream` so the read loop can run against
//! scripted in-memory streams in tests.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::TransportConfig;
use crate::error::{ClientError, TransportError};

/// A byte stream a `Connection` can run over.
pub trait Stream: Read + Write {
    /// Release the underlying socket. No-op by default.
    fn shutdown(&self) -> io::Result<()> {
        Ok(())
    }
}

impl Stream for TcpStream {
    fn shutdown(&self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

#[derive(Debug)]
pub struct Connection<S: Stream = TcpStream> {
    stream: S,
    chunk_size: usize,
}

impl Connection<TcpStream> {
    /// Open a TCP connection to `host:port`.
    ///
    /// DNS failures, refusals and connect timeouts all come back as
    /// `ClientError::Connection`.
    pub fn connect(host: &str, port: u16, config: &TransportConfig) -> Result<Self, ClientError> {
        let connection_error = |source| ClientError::Connection {
            host: host.to_string(),
            port,
            source,
        };

        let stream = open_stream(host, port, config.connect_timeout).map_err(connection_error)?;
        stream
            .set_read_timeout(config.read_timeout)
            .and_then(|()| stream.set_write_timeout(config.write_timeout))
            .map_err(connection_error)?;

        debug!(host, port, "connected");
        Ok(Self::from_stream(stream, config.chunk_size))
    }
}

impl<S: Stream> Connection<S> {
    pub fn from_stream(stream: S, chunk_size: usize) -> Self {
        Self {
            stream,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Write all of `bytes`, blocking until done.
    pub fn send_all(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.stream
            .write_all(bytes)
            .and_then(|()| self.stream.flush())
            .map_err(TransportError::Write)?;
        trace!(len = bytes.len(), "request sent");
        Ok(())
    }

    /// Read fixed-size chunks until the peer closes, then decode as UTF-8.
    ///
    /// On a read error the bytes received so far are discarded.
    pub fn receive_all(&mut self) -> Result<String, TransportError> {
        let mut buffer = Vec::new();
        let mut chunk = vec![0u8; self.chunk_size];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => buffer.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(TransportError::Read {
                        received: buffer.len(),
                        source,
                    })
                }
            }
        }
        debug!(len = buffer.len(), "response received");
        Ok(String::from_utf8(buffer)?)
    }

    /// Release the socket. A failed shutdown is not an error: the peer has
    /// usually closed already.
    pub fn close(self) {
        if let Err(err) = self.stream.shutdown() {
            debug!(error = %err, "shutdown after response");
        }
    }
}

fn open_stream(host: &str, port: u16, timeout: Option<Duration>) -> io::Result<TcpStream> {
    let Some(timeout) = timeout else {
        return TcpStream::connect((host, port));
    };

    let mut last_err = None;
    for addr in (host, port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, format!("{host} resolved to no addresses"))
    }))
}
