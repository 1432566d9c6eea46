//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One thread per open connection, capped by `max_connections`
//! - Requests routed through LogService

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
