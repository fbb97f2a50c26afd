//! Typed model of the caller's deployment configuration.
//!
//! The configuration is an opaque JSON object forwarded to the API. The one
//! field the client interprets is the orchestration flag (`prune_orphans` by
//! default): it is not accepted at creation time, and update requests must
//! carry it explicitly.

use serde_json::{Map, Value};

use super::error::DeploymentError;

/// Deployment configuration split into the orchestration flag and every
/// other field, kept verbatim.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeploymentConfig {
    /// Orchestration flag, when the caller supplied one.
    pub prune_orphans: Option<bool>,
    /// Remaining fields forwarded to the API unchanged.
    pub extra: Map<String, Value>,
}

impl DeploymentConfig {
    /// Parses raw JSON text, extracting the flag named `flag_field`.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentError::InvalidConfig`] when the text is not valid
    /// JSON, is not an object, or carries a non-boolean flag.
    pub fn parse(raw: &str, flag_field: &str) -> Result<Self, DeploymentError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|err| DeploymentError::InvalidConfig {
                message: err.to_string(),
            })?;
        let Value::Object(mut extra) = value else {
            return Err(DeploymentError::InvalidConfig {
                message: format!("expected a JSON object, got {}", kind_of(&value)),
            });
        };

        let prune_orphans = match extra.remove(flag_field) {
            None => None,
            Some(Value::Bool(flag)) => Some(flag),
            Some(other) => {
                return Err(DeploymentError::InvalidConfig {
                    message: format!("`{flag_field}` must be a boolean, got {}", kind_of(&other)),
                });
            }
        };

        Ok(Self {
            prune_orphans,
            extra,
        })
    }

    /// Body sent when creating a deployment: the flag is dropped.
    #[must_use]
    pub fn creation_body(&self) -> Value {
        Value::Object(self.extra.clone())
    }

    /// Body sent when updating a deployment: the flag is included, defaulting
    /// to `false` when the caller omitted it.
    #[must_use]
    pub fn update_body(&self, flag_field: &str) -> Value {
        let mut body = self.extra.clone();
        body.insert(
            flag_field.to_owned(),
            Value::Bool(self.prune_orphans.unwrap_or(false)),
        );
        Value::Object(body)
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
