//! TCP Server
//!
//! Accepts connections and gives each one its own thread.
//!
//! ## Concurrency Model
//! - The thread calling `run` accepts
//! - Every accepted connection is served on a dedicated thread, so an
//!   idle keep-alive client only ever holds its own thread
//! - At most `max_connections` connections are open at once; beyond
//!   that a connection gets `503` and is closed
//! - On shutdown open sockets are shut down and `run` waits for their
//!   threads to finish

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::sync::WaitGroup;
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{GoalLogError, Result};
use crate::protocol::{write_response, Method, Response, StatusCode};
use crate::service::LogService;

use super::Connection;

/// Streams of open connections, kept so shutdown can unblock their reads
type OpenConnections = Arc<Mutex<HashMap<u64, TcpStream>>>;

/// HTTP server for goallog
pub struct Server {
    config: Config,
    service: LogService,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
    open: OpenConnections,
}

/// Stops a running server from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    /// Signal the server to shutdown gracefully
    ///
    /// The acceptor is blocked in `accept`, so a throwaway connection is
    /// made to wake it up.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
        let _ = TcpStream::connect(self.wake_addr);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// One open connection's claim on the server; released on drop
struct ConnectionSlot {
    id: u64,
    active: Arc<AtomicUsize>,
    open: OpenConnections,
    _drained: WaitGroup,
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.open.lock().remove(&self.id);
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Server {
    /// Bind the listen address from the config
    ///
    /// The config's `missing_update` policy is applied to `service`.
    pub fn bind(config: Config, service: LogService) -> Result<Self> {
        if config.max_connections == 0 {
            return Err(GoalLogError::Config("max_connections must be at least 1".to_string()));
        }

        let listener = TcpListener::bind(&config.listen_addr)?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        let service = service.with_missing_update(config.missing_update);

        Ok(Self {
            config,
            service,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
            open: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Handle for stopping the server from another thread
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        let mut wake_addr = self.local_addr()?;
        if wake_addr.ip().is_unspecified() {
            let loopback: IpAddr = match wake_addr {
                SocketAddr::V4(_) => Ipv4Addr::LOCALHOST.into(),
                SocketAddr::V6(_) => Ipv6Addr::LOCALHOST.into(),
            };
            wake_addr.set_ip(loopback);
        }

        Ok(ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            wake_addr,
        })
    }

    /// Start the server (blocking until shutdown)
    pub fn run(&self) -> Result<()> {
        let drained = WaitGroup::new();
        let mut next_id: u64 = 0;

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::SeqCst) {
                tracing::info!("Shutdown requested, no longer accepting connections");
                break;
            }

            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            if self.active.load(Ordering::SeqCst) >= self.config.max_connections {
                tracing::warn!(
                    "Connection limit ({}) reached, rejecting {:?}",
                    self.config.max_connections,
                    stream.peer_addr().ok()
                );
                self.reject(stream);
                continue;
            }

            next_id += 1;
            if let Err(e) = self.spawn_connection(next_id, stream, drained.clone()) {
                tracing::warn!("Failed to start connection thread: {}", e);
            }
        }

        // Unblock reads on idle connections, then wait for their threads
        for (_, stream) in self.open.lock().drain() {
            let _ = stream.shutdown(Shutdown::Both);
        }
        drained.wait();

        Ok(())
    }

    fn spawn_connection(&self, id: u64, stream: TcpStream, drained: WaitGroup) -> Result<()> {
        self.active.fetch_add(1, Ordering::SeqCst);
        let slot = ConnectionSlot {
            id,
            active: Arc::clone(&self.active),
            open: Arc::clone(&self.open),
            _drained: drained,
        };
        self.open.lock().insert(id, stream.try_clone()?);

        let service = self.service.clone();
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;
        let max_body_size = self.config.max_body_size;

        thread::Builder::new()
            .name(format!("goallog-conn-{}", id))
            .spawn(move || {
                let _slot = slot;
                let result = Connection::new(stream, service, max_body_size).and_then(|mut conn| {
                    conn.set_timeouts(read_ms, write_ms)?;
                    conn.handle()
                });

                if let Err(e) = result {
                    tracing::debug!("Connection ended with error: {}", e);
                }
            })?;

        Ok(())
    }

    /// Answer 503 on a connection over the limit and close it
    fn reject(&self, mut stream: TcpStream) {
        let _ = stream.set_write_timeout(Some(Duration::from_millis(500)));
        let response = Response::error(StatusCode::SERVICE_UNAVAILABLE, "Too many connections");
        let _ = write_response(&mut stream, &response, &Method::Get, false);
    }
}
