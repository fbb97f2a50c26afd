//! Command-line interface definitions for the `ecdeploy` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser};

/// Top-level CLI for the `ecdeploy` binary.
#[derive(Debug, Parser)]
#[command(
    name = "ecdeploy",
    about = "Create, refresh, update, and shut down cloud deployments",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Create a deployment and print its id.
    #[command(name = "create", about = "Create a deployment and print its id")]
    Create(CreateCommand),
    /// Check whether a deployment still exists.
    #[command(name = "read", about = "Check whether a deployment still exists")]
    Read(ReadCommand),
    /// Replace the configuration of a deployment.
    #[command(name = "update", about = "Replace the configuration of a deployment")]
    Update(UpdateCommand),
    /// Request shutdown of a deployment.
    #[command(name = "delete", about = "Request shutdown of a deployment")]
    Delete(DeleteCommand),
    /// Print the resource schema as JSON.
    #[command(name = "schema", about = "Print the resource schema as JSON")]
    Schema,
}

/// Credential shared by every API subcommand.
#[derive(Debug, Args)]
pub(crate) struct Credential {
    /// API key sent as `Authorization: ApiKey <key>`.
    #[arg(long, env = "EC_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub(crate) api_key: String,
}

/// Deadline shared by every API subcommand.
#[derive(Debug, Args)]
pub(crate) struct CallLimit {
    /// Abandon each API call once this many seconds have passed since the
    /// command started.
    #[arg(long, value_name = "SECS")]
    pub(crate) deadline_secs: Option<u64>,
}

/// Deployment configuration supplied inline or from a file.
#[derive(Debug, Args)]
pub(crate) struct ConfigInput {
    /// Deployment configuration as a JSON object.
    #[arg(long, value_name = "JSON", conflicts_with = "config_file")]
    pub(crate) config: Option<String>,
    /// Read the deployment configuration from a JSON file.
    #[arg(long, value_name = "PATH", conflicts_with = "config")]
    pub(crate) config_file: Option<String>,
}

/// Arguments for `ecdeploy create`.
#[derive(Debug, Args)]
pub(crate) struct CreateCommand {
    #[command(flatten)]
    pub(crate) credential: Credential,
    #[command(flatten)]
    pub(crate) limit: CallLimit,
    /// Cluster name recorded with the resource.
    #[arg(long, value_name = "NAME")]
    pub(crate) cluster_name: String,
    #[command(flatten)]
    pub(crate) input: ConfigInput,
}

/// Arguments for `ecdeploy read`.
#[derive(Debug, Args)]
pub(crate) struct ReadCommand {
    #[command(flatten)]
    pub(crate) credential: Credential,
    #[command(flatten)]
    pub(crate) limit: CallLimit,
    /// Deployment id returned by `create`.
    #[arg(long, value_name = "ID")]
    pub(crate) id: String,
}

/// Arguments for `ecdeploy update`.
#[derive(Debug, Args)]
pub(crate) struct UpdateCommand {
    #[command(flatten)]
    pub(crate) credential: Credential,
    #[command(flatten)]
    pub(crate) limit: CallLimit,
    /// Deployment id returned by `create`.
    #[arg(long, value_name = "ID")]
    pub(crate) id: String,
    /// Cluster name recorded with the resource.
    #[arg(long, value_name = "NAME")]
    pub(crate) cluster_name: String,
    #[command(flatten)]
    pub(crate) input: ConfigInput,
}

/// Arguments for `ecdeploy delete`.
#[derive(Debug, Args)]
pub(crate) struct DeleteCommand {
    #[command(flatten)]
    pub(crate) credential: Credential,
    #[command(flatten)]
    pub(crate) limit: CallLimit,
    /// Deployment id returned by `create`.
    #[arg(long, value_name = "ID")]
    pub(crate) id: String,
    /// Wait until the deployment reports stopped or gone.
    ///
    /// Without this flag the command returns once the shutdown request is
    /// accepted, unless `wait_for_shutdown` is enabled in configuration.
    #[arg(long)]
    pub(crate) wait: bool,
}
