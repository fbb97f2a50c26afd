//! Binary entry point for the `ecdeploy` CLI.

use std::io::{self, Write};
use std::process;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tokio::time::Instant;

use ecdeploy::config_source::{ConfigSourceError, resolve_deployment_config};
use ecdeploy::{
    CallOptions, ClusterConfigResource, DeploymentClient, DeploymentError, DeploymentId, ProviderConfig,
    ReadOutcome, ResourceData, ResourceError, ShutdownMode, logging, resource,
};

mod cli;

use cli::{CallLimit, Cli, ConfigInput, CreateCommand, DeleteCommand, ReadCommand, UpdateCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    ConfigSource(#[from] ConfigSourceError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Resource(#[from] ResourceError<DeploymentError>),
    #[error("failed to write output: {0}")]
    Output(String),
}

#[tokio::main]
async fn main() {
    logging::init();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli, &mut io::stdout()).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

async fn dispatch(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    match cli {
        Cli::Create(command) => create(command, out).await,
        Cli::Read(command) => read(command, out).await,
        Cli::Update(command) => update(command).await,
        Cli::Delete(command) => delete(command).await,
        Cli::Schema => write_schema(out),
    }
}

fn load_resource(
    wait: bool,
    limit: &CallLimit,
) -> Result<ClusterConfigResource<DeploymentClient>, CliError> {
    let options = call_options(limit.deadline_secs)?;
    let config =
        ProviderConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    let client = DeploymentClient::new(&config).map_err(|err| CliError::Config(err.to_string()))?;
    let mode = if wait || config.wait_for_shutdown {
        ShutdownMode::Wait
    } else {
        ShutdownMode::Accept
    };
    Ok(ClusterConfigResource::new(client)
        .with_shutdown_mode(mode)
        .with_call_options(options))
}

fn call_options(deadline_secs: Option<u64>) -> Result<CallOptions, CliError> {
    let Some(secs) = deadline_secs else {
        return Ok(CallOptions::unbounded());
    };
    if secs == 0 {
        return Err(CliError::InvalidArgument(String::from(
            "--deadline-secs must be greater than zero",
        )));
    }
    Instant::now()
        .checked_add(Duration::from_secs(secs))
        .map(CallOptions::with_deadline)
        .ok_or_else(|| CliError::InvalidArgument(format!("--deadline-secs {secs} is too large")))
}

fn resolve_input(input: &ConfigInput) -> Result<String, CliError> {
    Ok(resolve_deployment_config(
        input.config.as_deref(),
        input.config_file.as_deref(),
    )?)
}

fn parse_id(raw: &str) -> Result<DeploymentId, CliError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::InvalidArgument(String::from(
            "deployment id must not be empty",
        )));
    }
    Ok(DeploymentId::from(trimmed))
}

async fn create(command: CreateCommand, out: &mut impl Write) -> Result<(), CliError> {
    let config = resolve_input(&command.input)?;
    let resource = load_resource(false, &command.limit)?;
    let mut data = ResourceData {
        api_key: command.credential.api_key,
        cluster_name: command.cluster_name,
        config,
        id: None,
    };
    resource.create(&mut data).await?;
    let id = data.id.ok_or_else(|| {
        CliError::InvalidArgument(String::from("create returned without an id"))
    })?;
    writeln!(out, "id={id}").map_err(|err| CliError::Output(err.to_string()))
}

async fn read(command: ReadCommand, out: &mut impl Write) -> Result<(), CliError> {
    let id = parse_id(&command.id)?;
    let resource = load_resource(false, &command.limit)?;
    let mut data = ResourceData {
        api_key: command.credential.api_key,
        id: Some(id),
        ..ResourceData::default()
    };
    let outcome = resource.read(&mut data).await?;
    write_outcome(out, outcome)
}

async fn update(command: UpdateCommand) -> Result<(), CliError> {
    let id = parse_id(&command.id)?;
    let config = resolve_input(&command.input)?;
    let resource = load_resource(false, &command.limit)?;
    let data = ResourceData {
        api_key: command.credential.api_key,
        cluster_name: command.cluster_name,
        config,
        id: Some(id),
    };
    Ok(resource.update(&data).await?)
}

async fn delete(command: DeleteCommand) -> Result<(), CliError> {
    let id = parse_id(&command.id)?;
    let resource = load_resource(command.wait, &command.limit)?;
    let mut data = ResourceData {
        api_key: command.credential.api_key,
        id: Some(id),
        ..ResourceData::default()
    };
    Ok(resource.delete(&mut data).await?)
}

fn write_outcome(out: &mut impl Write, outcome: ReadOutcome) -> Result<(), CliError> {
    let status = match outcome {
        ReadOutcome::Present => "present",
        ReadOutcome::Gone => "absent",
    };
    writeln!(out, "status={status}").map_err(|err| CliError::Output(err.to_string()))
}

fn write_schema(out: &mut impl Write) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(&resource::schema())
        .map_err(|err| CliError::Output(err.to_string()))?;
    writeln!(out, "{rendered}").map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
