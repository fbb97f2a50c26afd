//! Deployment lifecycle helpers for the HTTP client.
//!
//! Every operation funnels through [`DeploymentClient::execute`], which
//! attaches the two required headers, applies the per-request timeout, and
//! enforces the caller's deadline.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use tokio::time::timeout_at;
use tracing::debug;

mod create;
mod read;
mod shutdown;
mod update;
mod wait;

use crate::backend::CallOptions;
use crate::deployment::types::ApiKey;

use super::{DeploymentClient, DeploymentError};

const DEPLOYMENTS_PATH: &str = "deployments";
const SHUTDOWN_ACTION: &str = "_shutdown";

/// A single request against the deployment API.
#[derive(Debug)]
pub(in crate::deployment) struct ApiRequest {
    pub(in crate::deployment) operation: &'static str,
    pub(in crate::deployment) method: Method,
    pub(in crate::deployment) url: Url,
    pub(in crate::deployment) body: Option<String>,
}

/// Status and body of an API response.
#[derive(Debug)]
pub(in crate::deployment) struct ApiResponse {
    pub(in crate::deployment) status: StatusCode,
    pub(in crate::deployment) body: String,
}

impl ApiResponse {
    pub(in crate::deployment) fn into_api_error(self, operation: &'static str) -> DeploymentError {
        DeploymentError::Api {
            operation,
            status: self.status,
            body: self.body,
        }
    }
}

impl DeploymentClient {
    /// Builds `<base>/deployments[/<segment>...]`, percent-encoding each
    /// segment so identifiers cannot escape their path position.
    pub(in crate::deployment) fn endpoint(&self, segments: &[&str]) -> Result<Url, DeploymentError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                DeploymentError::Config(format!("base URL {} cannot carry a path", self.base_url))
            })?;
            path.pop_if_empty().push(DEPLOYMENTS_PATH);
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    pub(in crate::deployment) fn shutdown_endpoint(&self, id: &str) -> Result<Url, DeploymentError> {
        self.endpoint(&[id, SHUTDOWN_ACTION])
    }

    /// Sends a request and reads the full response body.
    pub(in crate::deployment) async fn execute(
        &self,
        api_key: &ApiKey,
        request: ApiRequest,
        options: CallOptions,
    ) -> Result<ApiResponse, DeploymentError> {
        let ApiRequest {
            operation,
            method,
            url,
            body,
        } = request;
        debug!(operation, %method, %url, "sending deployment request");

        let mut builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, api_key.authorization_header())
            .timeout(self.request_timeout);
        if let Some(payload) = body {
            builder = builder.body(payload);
        }

        let exchange = async move {
            let response = builder
                .send()
                .await
                .map_err(|err| DeploymentError::Transport {
                    operation,
                    message: err.to_string(),
                })?;
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|err| DeploymentError::Transport {
                    operation,
                    message: err.to_string(),
                })?;
            Ok::<_, DeploymentError>(ApiResponse { status, body: text })
        };

        let response = match options.deadline {
            Some(deadline) => timeout_at(deadline, exchange)
                .await
                .map_err(|_| DeploymentError::DeadlineExceeded { operation })??,
            None => exchange.await?,
        };
        debug!(operation, status = %response.status, "deployment API responded");
        Ok(response)
    }
}

#[cfg(test)]
mod tests;
