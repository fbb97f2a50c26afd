//! Deployment creation.
//!
//! The orchestration flag is not a valid creation argument, so it is dropped
//! from the body. A successful response must carry the new identifier in a
//! string `id` field; anything else leaves a deployment the caller cannot
//! track and is reported loudly.

use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};

use crate::backend::CallOptions;
use crate::deployment::payload::DeploymentConfig;
use crate::deployment::types::{ApiKey, DeploymentId};

use super::super::{DeploymentClient, DeploymentError};
use super::ApiRequest;

const OPERATION: &str = "create";

impl DeploymentClient {
    /// Creates a deployment and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentError::InvalidConfig`] before any request is sent
    /// when `config` is malformed, [`DeploymentError::Transport`] or
    /// [`DeploymentError::Api`] when the request fails, and
    /// [`DeploymentError::MissingDeploymentId`] when the response lacks a
    /// usable `id`.
    pub async fn create_deployment(
        &self,
        api_key: &ApiKey,
        config: &str,
        options: CallOptions,
    ) -> Result<DeploymentId, DeploymentError> {
        let parsed = DeploymentConfig::parse(config, &self.prune_orphans_field)?;
        let request = ApiRequest {
            operation: OPERATION,
            method: Method::POST,
            url: self.endpoint(&[])?,
            body: Some(parsed.creation_body().to_string()),
        };

        let response = self.execute(api_key, request, options).await?;
        if !response.status.is_success() {
            return Err(response.into_api_error(OPERATION));
        }

        let id = Self::extract_deployment_id(&response.body)?;
        info!(deployment_id = %id, "deployment created");
        Ok(id)
    }

    pub(in crate::deployment) fn extract_deployment_id(
        body: &str,
    ) -> Result<DeploymentId, DeploymentError> {
        let parsed: Value = serde_json::from_str(body).map_err(|err| {
            warn!(
                response = body,
                "create succeeded but the response is not JSON; the deployment may need manual shutdown"
            );
            DeploymentError::MalformedResponse {
                operation: OPERATION,
                message: err.to_string(),
            }
        })?;

        match parsed.get("id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => Ok(DeploymentId::from(id)),
            _ => {
                warn!(
                    response = body,
                    "create succeeded without a deployment id; the deployment may need manual shutdown"
                );
                Err(DeploymentError::MissingDeploymentId {
                    body: body.to_owned(),
                })
            }
        }
    }
}
