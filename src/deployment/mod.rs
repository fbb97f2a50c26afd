//! HTTP client for the deployment management API.

mod error;
mod lifecycle;
mod payload;
pub mod types;

use std::time::Duration;

use reqwest::Url;

use crate::backend::{BackendFuture, CallOptions, DeploymentBackend, ReadOutcome};
use crate::config::ProviderConfig;
use types::{ApiKey, DeploymentId};

pub use error::DeploymentError;
pub use payload::DeploymentConfig;

/// Client that manages deployments through the REST API.
///
/// Holds no per-call state: the API key travels with every call, so one
/// client can serve any number of deployments in parallel.
#[derive(Clone, Debug)]
pub struct DeploymentClient {
    http: reqwest::Client,
    base_url: Url,
    prune_orphans_field: String,
    request_timeout: Duration,
    poll_interval: Duration,
    wait_timeout: Duration,
}

impl DeploymentClient {
    /// Constructs a client from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentError::Config`] when the configuration fails
    /// validation or the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, DeploymentError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| DeploymentError::Config(err.to_string()))?;
        Ok(Self {
            http,
            base_url: config.parsed_base_url()?,
            prune_orphans_field: config.prune_orphans_field.trim().to_owned(),
            request_timeout: config.request_timeout(),
            poll_interval: config.shutdown_poll_interval(),
            wait_timeout: config.shutdown_wait_timeout(),
        })
    }

    /// Overrides the shutdown polling interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Overrides the shutdown wait timeout.
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }
}

impl DeploymentBackend for DeploymentClient {
    type Error = DeploymentError;

    fn create<'a>(
        &'a self,
        api_key: &'a ApiKey,
        config: &'a str,
        options: CallOptions,
    ) -> BackendFuture<'a, DeploymentId, Self::Error> {
        Box::pin(async move { self.create_deployment(api_key, config, options).await })
    }

    fn read<'a>(
        &'a self,
        api_key: &'a ApiKey,
        id: &'a DeploymentId,
        options: CallOptions,
    ) -> BackendFuture<'a, ReadOutcome, Self::Error> {
        Box::pin(async move { self.read_deployment(api_key, id, options).await })
    }

    fn update<'a>(
        &'a self,
        api_key: &'a ApiKey,
        config: &'a str,
        id: &'a DeploymentId,
        options: CallOptions,
    ) -> BackendFuture<'a, (), Self::Error> {
        Box::pin(async move { self.update_deployment(api_key, config, id, options).await })
    }

    fn shutdown<'a>(
        &'a self,
        api_key: &'a ApiKey,
        id: &'a DeploymentId,
        options: CallOptions,
    ) -> BackendFuture<'a, (), Self::Error> {
        Box::pin(async move { self.shutdown_deployment(api_key, id, options).await })
    }

    fn shutdown_and_wait<'a>(
        &'a self,
        api_key: &'a ApiKey,
        id: &'a DeploymentId,
        options: CallOptions,
    ) -> BackendFuture<'a, (), Self::Error> {
        Box::pin(async move {
            self.shutdown_deployment(api_key, id, options).await?;
            self.wait_until_stopped(api_key, id, options).await
        })
    }
}
