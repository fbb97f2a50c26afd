//! The `cluster_config` provider resource.
//!
//! The lifecycle driver owns persisted state and calls one of the four
//! operations per transition. This module reads the resource attributes,
//! invokes the backend, and records or clears the deployment identifier:
//!
//! ```text
//! absent --create--> provisioned --update--> provisioned --delete--> absent
//! provisioned --read--> provisioned | absent (when the backend reports 404)
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::backend::{CallOptions, DeploymentBackend, ReadOutcome};
use crate::deployment::types::{ApiKey, DeploymentId};

/// Name under which the resource is registered with the provider.
pub const RESOURCE_NAME: &str = "cluster_config";

/// Attribute names understood by the resource.
pub const API_KEY_ATTRIBUTE: &str = "api_key";
/// Cluster name attribute; required but not sent to the API.
pub const CLUSTER_NAME_ATTRIBUTE: &str = "cluster_name";
/// JSON-encoded deployment configuration attribute.
pub const CONFIG_ATTRIBUTE: &str = "config";

/// Value type of a schema attribute.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// UTF-8 string.
    String,
}

/// Schema entry for one attribute.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: &'static str,
    /// Value type.
    #[serde(rename = "type")]
    pub kind: AttributeType,
    /// Whether the attribute must be set.
    pub required: bool,
    /// Whether the value must be hidden from plan output.
    pub sensitive: bool,
}

/// Schema describing the resource.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ResourceSchema {
    /// Resource type name.
    pub name: &'static str,
    /// Attributes accepted by the resource.
    pub attributes: Vec<Attribute>,
}

/// Schema for the resource: three required string attributes, with the API
/// key marked sensitive.
#[must_use]
pub fn schema() -> ResourceSchema {
    let required = |name: &'static str, sensitive: bool| Attribute {
        name,
        kind: AttributeType::String,
        required: true,
        sensitive,
    };
    ResourceSchema {
        name: RESOURCE_NAME,
        attributes: vec![
            required(API_KEY_ATTRIBUTE, true),
            required(CLUSTER_NAME_ATTRIBUTE, false),
            required(CONFIG_ATTRIBUTE, false),
        ],
    }
}

/// Attribute values and persisted identifier for one resource instance.
///
/// `Debug` output never includes the API key.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct ResourceData {
    /// API key used for every call.
    pub api_key: String,
    /// Cluster name; validated but otherwise unused.
    pub cluster_name: String,
    /// JSON-encoded deployment configuration.
    pub config: String,
    /// Identifier recorded after a successful create.
    pub id: Option<DeploymentId>,
}

impl fmt::Debug for ResourceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceData")
            .field("api_key", &"***")
            .field("cluster_name", &self.cluster_name)
            .field("config", &self.config)
            .field("id", &self.id)
            .finish()
    }
}

impl ResourceData {
    fn require<E>(value: &str, attribute: &'static str) -> Result<(), ResourceError<E>>
    where
        E: std::error::Error + 'static,
    {
        if value.trim().is_empty() {
            return Err(ResourceError::MissingAttribute(attribute));
        }
        Ok(())
    }

    fn api_key<E>(&self) -> Result<ApiKey, ResourceError<E>>
    where
        E: std::error::Error + 'static,
    {
        Self::require(&self.api_key, API_KEY_ATTRIBUTE)?;
        Ok(ApiKey::new(self.api_key.clone()))
    }

    fn validate_configuration<E>(&self) -> Result<(), ResourceError<E>>
    where
        E: std::error::Error + 'static,
    {
        Self::require(&self.cluster_name, CLUSTER_NAME_ATTRIBUTE)?;
        Self::require(&self.config, CONFIG_ATTRIBUTE)
    }
}

/// Errors surfaced by resource lifecycle operations.
#[derive(Debug, Error)]
pub enum ResourceError<BackendError>
where
    BackendError: std::error::Error + 'static,
{
    /// Raised when a required attribute is empty.
    #[error("missing required attribute `{0}`")]
    MissingAttribute(&'static str),
    /// Raised when read, update, or delete runs before an identifier exists.
    #[error("resource has no deployment id; create it first")]
    MissingId,
    /// Raised when the backend call fails.
    #[error("{operation} failed: {source}")]
    Backend {
        /// Lifecycle operation being performed.
        operation: &'static str,
        /// Backend error.
        #[source]
        source: BackendError,
    },
}

/// Delete behaviour for the resource.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ShutdownMode {
    /// Return once the shutdown request is accepted.
    #[default]
    Accept,
    /// Poll until the deployment is stopped or gone.
    Wait,
}

/// The `cluster_config` resource bound to a deployment backend.
#[derive(Clone, Debug)]
pub struct ClusterConfigResource<B> {
    backend: B,
    shutdown_mode: ShutdownMode,
    options: CallOptions,
}

impl<B> ClusterConfigResource<B>
where
    B: DeploymentBackend,
{
    /// Creates the resource with fire-and-forget deletes and no deadline.
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            shutdown_mode: ShutdownMode::Accept,
            options: CallOptions::unbounded(),
        }
    }

    /// Selects how delete waits for shutdown.
    #[must_use]
    pub const fn with_shutdown_mode(mut self, mode: ShutdownMode) -> Self {
        self.shutdown_mode = mode;
        self
    }

    /// Applies per-call options (for example a deadline) to every operation.
    #[must_use]
    pub const fn with_call_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    /// Borrows the underlying backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Provisions a deployment and records its identifier in `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] when an attribute is empty
    /// and [`ResourceError::Backend`] when the backend fails; `data.id` is
    /// left untouched on error.
    pub async fn create(&self, data: &mut ResourceData) -> Result<(), ResourceError<B::Error>> {
        let api_key = data.api_key()?;
        data.validate_configuration()?;
        let id = self
            .backend
            .create(&api_key, &data.config, self.options)
            .await
            .map_err(|source| ResourceError::Backend {
                operation: "create",
                source,
            })?;
        info!(deployment_id = %id, cluster_name = %data.cluster_name, "recorded deployment id");
        data.id = Some(id);
        Ok(())
    }

    /// Refreshes the deployment, clearing the identifier if it is gone.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] before create and
    /// [`ResourceError::Backend`] when the backend fails.
    pub async fn read(&self, data: &mut ResourceData) -> Result<ReadOutcome, ResourceError<B::Error>> {
        let api_key = data.api_key()?;
        let id = data.id.as_ref().ok_or(ResourceError::MissingId)?;
        let outcome = self
            .backend
            .read(&api_key, id, self.options)
            .await
            .map_err(|source| ResourceError::Backend {
                operation: "read",
                source,
            })?;
        if outcome == ReadOutcome::Gone {
            info!(deployment_id = %id, "clearing id of missing deployment");
            data.id = None;
        }
        Ok(outcome)
    }

    /// Pushes the current configuration to the deployment.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] before create,
    /// [`ResourceError::MissingAttribute`] when an attribute is empty, and
    /// [`ResourceError::Backend`] when the backend fails.
    pub async fn update(&self, data: &ResourceData) -> Result<(), ResourceError<B::Error>> {
        let api_key = data.api_key()?;
        data.validate_configuration()?;
        let id = data.id.as_ref().ok_or(ResourceError::MissingId)?;
        self.backend
            .update(&api_key, &data.config, id, self.options)
            .await
            .map_err(|source| ResourceError::Backend {
                operation: "update",
                source,
            })
    }

    /// Shuts the deployment down and clears the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] before create and
    /// [`ResourceError::Backend`] when the backend fails; the identifier is
    /// kept on error so the delete can be retried.
    pub async fn delete(&self, data: &mut ResourceData) -> Result<(), ResourceError<B::Error>> {
        let api_key = data.api_key()?;
        let id = data.id.as_ref().ok_or(ResourceError::MissingId)?;
        let result = match self.shutdown_mode {
            ShutdownMode::Accept => self.backend.shutdown(&api_key, id, self.options).await,
            ShutdownMode::Wait => {
                self.backend
                    .shutdown_and_wait(&api_key, id, self.options)
                    .await
            }
        };
        result.map_err(|source| ResourceError::Backend {
            operation: "delete",
            source,
        })?;
        data.id = None;
        Ok(())
    }
}
