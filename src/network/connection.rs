//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::{GoalLogError, Result};
use crate::protocol::{
    body_framing, read_body, read_request_head, write_continue, write_response, BodyFraming,
    Method, Request, Response,
};
use crate::service::LogService;

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Request handlers
    service: LogService,

    /// Largest request body accepted
    max_body_size: usize,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O; timeouts are configured separately
    pub fn new(stream: TcpStream, service: LogService, max_body_size: usize) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            service,
            max_body_size,
            peer_addr,
        })
    }

    /// Configure connection timeouts
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads requests in a loop and sends responses. Returns when the
    /// client disconnects, asks to close, or an error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            // Read next request
            let request = match self.read_next() {
                Ok(req) => req,
                Err(GoalLogError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Err(GoalLogError::Io(ref e)) if is_timeout(e.kind()) => {
                    // Idle keep-alive connection
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    // Framing is lost, answer if possible and close
                    if !e.status().is_server_error() {
                        let _ = self.send_response(&Response::from_error(&e), &Method::Get, false);
                    }
                    return Err(e);
                }
            };

            tracing::trace!(
                "Received {} {} from {}",
                request.method.as_str(),
                request.target,
                self.peer_addr
            );

            let keep_alive = request.keep_alive();
            let response = self.service.handle(&request);

            tracing::trace!(
                "{} {} -> {}",
                request.method.as_str(),
                request.target,
                response.status.as_u16()
            );

            if let Err(e) = self.send_response(&response, &request.method, keep_alive) {
                // The client went away before the response was written
                if let GoalLogError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }

            if !keep_alive {
                tracing::debug!("Closing connection to {}", self.peer_addr);
                return Ok(());
            }
        }
    }

    /// Read one request, answering `Expect: 100-continue` before the body
    fn read_next(&mut self) -> Result<Request> {
        let mut request = read_request_head(&mut self.reader)?;
        let framing = body_framing(&request, self.max_body_size)?;

        if framing != BodyFraming::Empty && request.expects_continue() {
            write_continue(&mut self.writer)?;
        }

        request.body = read_body(&mut self.reader, framing, self.max_body_size)?;
        Ok(request)
    }

    /// Send a response to the client
    fn send_response(&mut self, response: &Response, method: &Method, keep_alive: bool) -> Result<()> {
        write_response(&mut self.writer, response, method, keep_alive)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: std::io::ErrorKind) -> bool {
    matches!(
        kind,
        std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe
    )
}

// Windows reports TimedOut where Unix reports WouldBlock
fn is_timeout(kind: std::io::ErrorKind) -> bool {
    matches!(
        kind,
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}
