//! Deployment shutdown.
//!
//! The API models deletion as an asynchronous `_shutdown` action rather than
//! a `DELETE` verb. Acceptance of the action does not mean the deployment is
//! gone; see the wait helpers for completion polling.

use reqwest::{Method, StatusCode};
use tracing::info;

use crate::backend::CallOptions;
use crate::deployment::types::{ApiKey, DeploymentId};

use super::super::{DeploymentClient, DeploymentError};
use super::ApiRequest;

const OPERATION: &str = "shutdown";

impl DeploymentClient {
    /// Requests shutdown of a deployment with an empty `POST`.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentError::NotFound`] for a 404 and
    /// [`DeploymentError::Transport`] or [`DeploymentError::Api`] for other
    /// failures.
    pub async fn shutdown_deployment(
        &self,
        api_key: &ApiKey,
        id: &DeploymentId,
        options: CallOptions,
    ) -> Result<(), DeploymentError> {
        let request = ApiRequest {
            operation: OPERATION,
            method: Method::POST,
            url: self.shutdown_endpoint(id.as_str())?,
            body: None,
        };

        let response = self.execute(api_key, request, options).await?;
        if response.status == StatusCode::NOT_FOUND {
            return Err(DeploymentError::NotFound {
                deployment_id: id.to_string(),
            });
        }
        if !response.status.is_success() {
            return Err(response.into_api_error(OPERATION));
        }

        info!(deployment_id = %id, "deployment shutdown accepted");
        Ok(())
    }
}
