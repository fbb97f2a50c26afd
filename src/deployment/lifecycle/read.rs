//! Deployment refresh.

use reqwest::{Method, StatusCode};
use tracing::info;

use crate::backend::{CallOptions, ReadOutcome};
use crate::deployment::types::{ApiKey, DeploymentId};

use super::super::{DeploymentClient, DeploymentError};
use super::{ApiRequest, ApiResponse};

const OPERATION: &str = "read";

impl DeploymentClient {
    /// Checks whether a deployment still exists. The response body is not
    /// inspected.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentError::Transport`] when the request fails and
    /// [`DeploymentError::Api`] for any status other than success or 404.
    pub async fn read_deployment(
        &self,
        api_key: &ApiKey,
        id: &DeploymentId,
        options: CallOptions,
    ) -> Result<ReadOutcome, DeploymentError> {
        let response = self.fetch_deployment(api_key, id, options).await?;
        if response.status == StatusCode::NOT_FOUND {
            info!(deployment_id = %id, "deployment no longer exists");
            return Ok(ReadOutcome::Gone);
        }
        if response.status.is_success() {
            return Ok(ReadOutcome::Present);
        }
        Err(response.into_api_error(OPERATION))
    }

    pub(in crate::deployment) async fn fetch_deployment(
        &self,
        api_key: &ApiKey,
        id: &DeploymentId,
        options: CallOptions,
    ) -> Result<ApiResponse, DeploymentError> {
        let request = ApiRequest {
            operation: OPERATION,
            method: Method::GET,
            url: self.endpoint(&[id.as_str()])?,
            body: None,
        };
        self.execute(api_key, request, options).await
    }
}
