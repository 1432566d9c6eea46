//! # goallog
//!
//! A small HTTP service for daily logs and goals:
//! - CRUD over an in-memory, insertion-ordered log store
//! - Date validation (`YYYY-MM-DD`)
//! - Thread-per-connection HTTP/1.1 server with keep-alive
//! - Blocking client for scripts and the CLI
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Server                             │
//! │             (acceptor + connection threads)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Router / LogService                          │
//! │        (collection handler, by-id handler)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Validator  │          │  LogStore   │
//!   │ (dates)     │          │  (RwLock)   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ IdGenerator │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod id;
pub mod validate;
pub mod store;
pub mod protocol;
pub mod router;
pub mod service;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{GoalLogError, Result};
pub use config::{Config, MissingUpdatePolicy};
pub use model::Log;
pub use service::LogService;
pub use store::{LogStore, MemoryStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of goallog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
