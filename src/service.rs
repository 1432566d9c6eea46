//! Service Module
//!
//! The request handlers: routes a parsed request and runs it against the
//! store.
//!
//! ## Dispatch
//! - `/`     : GET lists, POST creates
//! - `/{id}` : GET fetches, PUT replaces
//! - other methods on either shape answer 405, other shapes 404

use std::sync::Arc;

use crate::config::MissingUpdatePolicy;
use crate::error::{GoalLogError, Result};
use crate::protocol::{Method, Request, Response};
use crate::model::Log;
use crate::router::Route;
use crate::store::LogStore;
use crate::validate::validate;

/// Request handlers over a shared store
#[derive(Clone)]
pub struct LogService {
    /// Shared log store
    store: Arc<dyn LogStore>,

    /// Answer for PUT on an unknown id
    missing_update: MissingUpdatePolicy,
}

impl LogService {
    /// Create a service over the given store
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            store,
            missing_update: MissingUpdatePolicy::default(),
        }
    }

    /// Set the policy for updates addressing an unknown id
    pub fn with_missing_update(mut self, policy: MissingUpdatePolicy) -> Self {
        self.missing_update = policy;
        self
    }

    /// Handle one request, turning every error into its response
    pub fn handle(&self, request: &Request) -> Response {
        match self.dispatch(request) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("{} {} -> {}", request.method.as_str(), request.target, e);
                Response::from_error(&e)
            }
        }
    }

    /// Route and execute a request
    pub fn dispatch(&self, request: &Request) -> Result<Response> {
        match Route::of(request)? {
            Route::Collection => self.handle_collection(request),
            Route::Item(id) => self.handle_item(request, &id),
            Route::Invalid => Err(GoalLogError::InvalidPath),
        }
    }

    /// Access the underlying store
    pub fn store(&self) -> &Arc<dyn LogStore> {
        &self.store
    }

    // =========================================================================
    // Collection Handler
    // =========================================================================

    fn handle_collection(&self, request: &Request) -> Result<Response> {
        match request.method {
            Method::Get => Ok(Response::json(&self.store.list())),
            Method::Post => self.create(request),
            _ => Err(GoalLogError::MethodNotAllowed),
        }
    }

    fn create(&self, request: &Request) -> Result<Response> {
        let log = decode_valid_log(request)?;
        let stored = self.store.append(log);

        tracing::info!("Created log {}", stored.id);
        Ok(Response::json(&stored))
    }

    // =========================================================================
    // ById Handler
    // =========================================================================

    fn handle_item(&self, request: &Request, id: &str) -> Result<Response> {
        match request.method {
            Method::Get => self
                .store
                .find_by_id(id)
                .map(|log| Response::json(&log))
                .ok_or_else(|| GoalLogError::NotFound(id.to_string())),
            Method::Put => self.update(request, id),
            _ => Err(GoalLogError::MethodNotAllowed),
        }
    }

    /// Replace a log; the response carries the record as it was before
    fn update(&self, request: &Request, id: &str) -> Result<Response> {
        let log = decode_valid_log(request)?;

        match self.store.replace_by_id(id, log) {
            Some(previous) => {
                tracing::info!("Updated log {}", id);
                Ok(Response::json(&previous))
            }
            None => match self.missing_update {
                MissingUpdatePolicy::Silent => {
                    tracing::debug!("Update for unknown log {} ignored", id);
                    Ok(Response::empty())
                }
                MissingUpdatePolicy::NotFound => Err(GoalLogError::NotFound(id.to_string())),
            },
        }
    }
}

/// Decode the request body as a log and check its date
fn decode_valid_log(request: &Request) -> Result<Log> {
    let log = Log::from_body(&request.body)?;
    if !validate(&log) {
        return Err(GoalLogError::InvalidLog);
    }
    Ok(log)
}
