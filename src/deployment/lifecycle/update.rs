//! Deployment update.

use reqwest::{Method, StatusCode};
use tracing::info;

use crate::backend::CallOptions;
use crate::deployment::payload::DeploymentConfig;
use crate::deployment::types::{ApiKey, DeploymentId};

use super::super::{DeploymentClient, DeploymentError};
use super::ApiRequest;

const OPERATION: &str = "update";

impl DeploymentClient {
    /// Replaces the configuration of an existing deployment.
    ///
    /// The orchestration flag is always sent; when the caller omitted it the
    /// client sends `false`.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentError::InvalidConfig`] before any request is sent
    /// when `config` is malformed, [`DeploymentError::NotFound`] for a 404,
    /// and [`DeploymentError::Transport`] or [`DeploymentError::Api`] for
    /// other failures.
    pub async fn update_deployment(
        &self,
        api_key: &ApiKey,
        config: &str,
        id: &DeploymentId,
        options: CallOptions,
    ) -> Result<(), DeploymentError> {
        let parsed = DeploymentConfig::parse(config, &self.prune_orphans_field)?;
        let request = ApiRequest {
            operation: OPERATION,
            method: Method::PUT,
            url: self.endpoint(&[id.as_str()])?,
            body: Some(parsed.update_body(&self.prune_orphans_field).to_string()),
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

        info!(deployment_id = %id, "deployment updated");
        Ok(())
    }
}
