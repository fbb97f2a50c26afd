//! Shutdown completion polling.

use reqwest::StatusCode;
use serde_json::Value;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::backend::CallOptions;
use crate::deployment::types::{ApiKey, DeploymentId};

use super::super::{DeploymentClient, DeploymentError};

const STOPPED: &str = "stopped";

/// Shutdown state derived from a deployment read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(in crate::deployment) enum ShutdownProgress {
    Gone,
    Stopped,
    Pending,
}

impl DeploymentClient {
    pub(in crate::deployment) async fn shutdown_progress(
        &self,
        api_key: &ApiKey,
        id: &DeploymentId,
        options: CallOptions,
    ) -> Result<ShutdownProgress, DeploymentError> {
        let response = self.fetch_deployment(api_key, id, options).await?;
        if response.status == StatusCode::NOT_FOUND {
            return Ok(ShutdownProgress::Gone);
        }
        if !response.status.is_success() {
            return Err(response.into_api_error("read"));
        }

        let body: Value =
            serde_json::from_str(&response.body).map_err(|err| DeploymentError::MalformedResponse {
                operation: "read",
                message: err.to_string(),
            })?;
        if Self::all_resources_stopped(&body) {
            Ok(ShutdownProgress::Stopped)
        } else {
            Ok(ShutdownProgress::Pending)
        }
    }

    /// True when the deployment lists at least one resource and every
    /// resource reports `info.status == "stopped"`.
    pub(in crate::deployment) fn all_resources_stopped(body: &Value) -> bool {
        let Some(kinds) = body.get("resources").and_then(Value::as_object) else {
            return false;
        };
        let statuses: Vec<Option<&str>> = kinds
            .values()
            .filter_map(Value::as_array)
            .flatten()
            .map(|resource| resource.pointer("/info/status").and_then(Value::as_str))
            .collect();
        !statuses.is_empty() && statuses.iter().all(|status| *status == Some(STOPPED))
    }

    /// Polls the deployment until it is stopped or gone.
    ///
    /// A wait timeout too large to represent as an instant disables the
    /// limit. The final pause is shortened so the limit is not overshot.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentError::Timeout`] when the deployment is still
    /// running after the wait timeout, or any error raised while reading.
    pub async fn wait_until_stopped(
        &self,
        api_key: &ApiKey,
        id: &DeploymentId,
        options: CallOptions,
    ) -> Result<(), DeploymentError> {
        let limit = Instant::now().checked_add(self.wait_timeout);
        loop {
            match self.shutdown_progress(api_key, id, options).await? {
                ShutdownProgress::Gone | ShutdownProgress::Stopped => {
                    info!(deployment_id = %id, "deployment stopped");
                    return Ok(());
                }
                ShutdownProgress::Pending => {
                    debug!(deployment_id = %id, "deployment still stopping");
                }
            }

            let pause = match limit {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(DeploymentError::Timeout {
                            action: String::from("shutdown"),
                            deployment_id: id.to_string(),
                        });
                    }
                    self.poll_interval.min(remaining)
                }
                None => self.poll_interval,
            };
            sleep(pause).await;
        }
    }
}
