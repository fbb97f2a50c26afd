//! Backend abstraction for managing deployment lifecycles.
//!
//! The resource adapter drives a [`DeploymentBackend`] rather than the HTTP
//! client directly so the lifecycle can be exercised against scripted
//! doubles.

use std::future::Future;
use std::pin::Pin;

use tokio::time::Instant;

use crate::deployment::types::{ApiKey, DeploymentId};

/// Result of refreshing a deployment by identifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadOutcome {
    /// The backend still knows the deployment.
    Present,
    /// The backend reported the deployment as missing; the stored identifier
    /// should be dropped.
    Gone,
}

/// Per-call options supplied by the caller.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CallOptions {
    /// Point in time after which the call is abandoned.
    pub deadline: Option<Instant>,
}

impl CallOptions {
    /// Options without a deadline; the client's request timeout still applies.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { deadline: None }
    }

    /// Options that abandon the call once `deadline` passes.
    #[must_use]
    pub const fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }
}

/// Future returned by backend operations.
pub type BackendFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Minimal interface implemented by deployment backends.
pub trait DeploymentBackend {
    /// Provider specific error type returned by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates a deployment from the raw JSON configuration and returns the
    /// identifier assigned by the backend.
    fn create<'a>(
        &'a self,
        api_key: &'a ApiKey,
        config: &'a str,
        options: CallOptions,
    ) -> BackendFuture<'a, DeploymentId, Self::Error>;

    /// Refreshes a deployment, reporting whether it still exists.
    fn read<'a>(
        &'a self,
        api_key: &'a ApiKey,
        id: &'a DeploymentId,
        options: CallOptions,
    ) -> BackendFuture<'a, ReadOutcome, Self::Error>;

    /// Replaces the configuration of an existing deployment.
    fn update<'a>(
        &'a self,
        api_key: &'a ApiKey,
        config: &'a str,
        id: &'a DeploymentId,
        options: CallOptions,
    ) -> BackendFuture<'a, (), Self::Error>;

    /// Requests shutdown of a deployment. Returns once the request has been
    /// accepted, not once the deployment is torn down.
    fn shutdown<'a>(
        &'a self,
        api_key: &'a ApiKey,
        id: &'a DeploymentId,
        options: CallOptions,
    ) -> BackendFuture<'a, (), Self::Error>;

    /// Requests shutdown and blocks until the backend reports the deployment
    /// as stopped or gone.
    fn shutdown_and_wait<'a>(
        &'a self,
        api_key: &'a ApiKey,
        id: &'a DeploymentId,
        options: CallOptions,
    ) -> BackendFuture<'a, (), Self::Error>;
}
