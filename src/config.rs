//! Configuration for goallog
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for a goallog server instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max connections open at once (each is served on its own thread)
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Request Configuration
    // -------------------------------------------------------------------------
    /// Largest request body accepted (in bytes)
    pub max_body_size: usize,

    /// What a PUT to an unknown id answers
    pub missing_update: MissingUpdatePolicy,
}

/// Behaviour of `PUT /{id}` when no log has that id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingUpdatePolicy {
    /// Complete the request with an empty 200 and no body
    #[default]
    Silent,

    /// Answer 404 with the same message as a failed GET
    NotFound,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            max_connections: 1024,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            max_body_size: 1024 * 1024, // 1 MB
            missing_update: MissingUpdatePolicy::Silent,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of open connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the maximum request body size (in bytes)
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Set the policy for updates addressing an unknown id
    pub fn missing_update(mut self, policy: MissingUpdatePolicy) -> Self {
        self.config.missing_update = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
