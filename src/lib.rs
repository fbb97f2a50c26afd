//! Core library for the `cluster_config` deployment resource.
//!
//! The crate exposes an HTTP client for a deployment management API, a
//! backend abstraction over the four lifecycle operations, and the provider
//! resource that records deployment identifiers across the lifecycle
//! (create → read/update → shutdown).

pub mod backend;
pub mod config;
pub mod config_source;
pub mod deployment;
pub mod logging;
pub mod resource;
pub mod test_support;

pub use backend::{BackendFuture, CallOptions, DeploymentBackend, ReadOutcome};
pub use config::{ConfigError, ProviderConfig};
pub use config_source::{ConfigSource, ConfigSourceError, resolve_deployment_config};
pub use deployment::types::{ApiKey, DeploymentId};
pub use deployment::{DeploymentClient, DeploymentConfig, DeploymentError};
pub use resource::{
    ClusterConfigResource, ResourceData, ResourceError, ResourceSchema, ShutdownMode,
};
