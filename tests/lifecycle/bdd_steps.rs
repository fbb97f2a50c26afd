//! BDD step definitions for the resource lifecycle.

use ecdeploy::test_support::BackendCall;
use ecdeploy::{CallOptions, DeploymentId, ReadOutcome, ShutdownMode};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

use super::test_helpers::{LifecycleContext, StepOutcome};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("failed to start runtime: {0}")]
    Runtime(String),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

fn runtime() -> Result<Runtime, StepError> {
    Runtime::new().map_err(|err| StepError::Runtime(err.to_string()))
}

fn record<E: std::fmt::Display>(
    mut lifecycle_context: LifecycleContext,
    result: Result<(), E>,
) -> LifecycleContext {
    lifecycle_context.outcome = Some(match result {
        Ok(()) => StepOutcome::Succeeded,
        Err(err) => StepOutcome::Failed(err.to_string()),
    });
    lifecycle_context
}

#[given("a resource with a complete configuration")]
fn complete_resource(lifecycle_context: LifecycleContext) -> LifecycleContext {
    lifecycle_context
}

#[given("a resource tracking deployment \"{id}\"")]
fn tracked_resource(mut lifecycle_context: LifecycleContext, id: String) -> LifecycleContext {
    lifecycle_context.data.id = Some(DeploymentId::new(id));
    lifecycle_context
}

#[given("the backend assigns id \"{id}\"")]
fn backend_assigns_id(lifecycle_context: LifecycleContext, id: String) -> LifecycleContext {
    lifecycle_context.backend.returns_id(id);
    lifecycle_context
}

#[given("the backend reports the deployment as gone")]
fn backend_reports_gone(lifecycle_context: LifecycleContext) -> LifecycleContext {
    lifecycle_context.backend.reports(ReadOutcome::Gone);
    lifecycle_context
}

#[given("the backend fails on \"{operation}\"")]
fn backend_fails_on(
    lifecycle_context: LifecycleContext,
    operation: String,
) -> Result<LifecycleContext, StepError> {
    let known = match operation.as_str() {
        "create" => "create",
        "read" => "read",
        "update" => "update",
        "shutdown" => "shutdown",
        other => {
            return Err(StepError::Assertion(format!(
                "unknown backend operation `{other}`"
            )));
        }
    };
    lifecycle_context.backend.fail_on(known);
    Ok(lifecycle_context)
}

#[given("delete waits for shutdown")]
fn delete_waits(mut lifecycle_context: LifecycleContext) -> LifecycleContext {
    lifecycle_context.shutdown_mode = ShutdownMode::Wait;
    lifecycle_context
}

#[given("the cluster name is blank")]
fn blank_cluster_name(mut lifecycle_context: LifecycleContext) -> LifecycleContext {
    lifecycle_context.data.cluster_name = String::from("  ");
    lifecycle_context
}

#[when("I create the resource")]
fn create_resource(lifecycle_context: LifecycleContext) -> Result<LifecycleContext, StepError> {
    let resource = lifecycle_context.resource();
    let mut data = lifecycle_context.data.clone();
    let result = runtime()?.block_on(resource.create(&mut data));
    let mut updated = record(lifecycle_context, result);
    updated.data = data;
    Ok(updated)
}

#[when("I read the resource")]
fn read_resource(lifecycle_context: LifecycleContext) -> Result<LifecycleContext, StepError> {
    let resource = lifecycle_context.resource();
    let mut data = lifecycle_context.data.clone();
    let result = runtime()?
        .block_on(resource.read(&mut data))
        .map(|_outcome| ());
    let mut updated = record(lifecycle_context, result);
    updated.data = data;
    Ok(updated)
}

#[when("I update the resource")]
fn update_resource(lifecycle_context: LifecycleContext) -> Result<LifecycleContext, StepError> {
    let resource = lifecycle_context.resource();
    let data = lifecycle_context.data.clone();
    let result = runtime()?.block_on(resource.update(&data));
    Ok(record(lifecycle_context, result))
}

#[when("I delete the resource")]
fn delete_resource(lifecycle_context: LifecycleContext) -> Result<LifecycleContext, StepError> {
    let resource = lifecycle_context.resource();
    let mut data = lifecycle_context.data.clone();
    let result = runtime()?.block_on(resource.delete(&mut data));
    let mut updated = record(lifecycle_context, result);
    updated.data = data;
    Ok(updated)
}

#[then("the operation succeeds")]
fn operation_succeeds(lifecycle_context: &LifecycleContext) -> Result<(), StepError> {
    match &lifecycle_context.outcome {
        Some(StepOutcome::Succeeded) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected success, got {other:?}"
        ))),
    }
}

#[then("the operation fails mentioning \"{fragment}\"")]
fn operation_fails(lifecycle_context: &LifecycleContext, fragment: String) -> Result<(), StepError> {
    match &lifecycle_context.outcome {
        Some(StepOutcome::Failed(message)) if message.contains(fragment.as_str()) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected failure mentioning `{fragment}`, got {other:?}"
        ))),
    }
}

#[then("the recorded id is \"{id}\"")]
fn recorded_id(lifecycle_context: &LifecycleContext, id: String) -> Result<(), StepError> {
    match &lifecycle_context.data.id {
        Some(actual) if actual.as_str() == id => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected id `{id}`, got {other:?}"
        ))),
    }
}

#[then("no id is recorded")]
fn no_id_recorded(lifecycle_context: &LifecycleContext) -> Result<(), StepError> {
    match &lifecycle_context.data.id {
        None => Ok(()),
        Some(id) => Err(StepError::Assertion(format!("id `{id}` is still recorded"))),
    }
}

#[then("the backend saw a waited shutdown of \"{id}\"")]
fn waited_shutdown(lifecycle_context: &LifecycleContext, id: String) -> Result<(), StepError> {
    let expected = BackendCall::Shutdown {
        id,
        waited: true,
        options: CallOptions::unbounded(),
    };
    let calls = lifecycle_context.backend.calls();
    if calls == vec![expected] {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "unexpected backend calls: {calls:?}"
        )))
    }
}

#[then("the backend saw no calls")]
fn no_calls(lifecycle_context: &LifecycleContext) -> Result<(), StepError> {
    let calls = lifecycle_context.backend.calls();
    if calls.is_empty() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected no backend calls, got {calls:?}"
        )))
    }
}
