//! BDD scenarios for the resource lifecycle.

use rstest_bdd_macros::scenario;

use super::test_helpers::{LifecycleContext, lifecycle_context};

#[scenario(
    path = "tests/features/lifecycle.feature",
    name = "Record the id returned by create"
)]
fn scenario_record_created_id(lifecycle_context: LifecycleContext) {
    let _ = lifecycle_context;
}

#[scenario(
    path = "tests/features/lifecycle.feature",
    name = "Forget deployments that no longer exist"
)]
fn scenario_forget_gone_deployments(lifecycle_context: LifecycleContext) {
    let _ = lifecycle_context;
}

#[scenario(
    path = "tests/features/lifecycle.feature",
    name = "Keep the id when shutdown fails"
)]
fn scenario_keep_id_on_failed_shutdown(lifecycle_context: LifecycleContext) {
    let _ = lifecycle_context;
}

#[scenario(
    path = "tests/features/lifecycle.feature",
    name = "Wait for shutdown when configured"
)]
fn scenario_wait_for_shutdown(lifecycle_context: LifecycleContext) {
    let _ = lifecycle_context;
}

#[scenario(
    path = "tests/features/lifecycle.feature",
    name = "Reject updates before create"
)]
fn scenario_reject_update_before_create(lifecycle_context: LifecycleContext) {
    let _ = lifecycle_context;
}

#[scenario(
    path = "tests/features/lifecycle.feature",
    name = "Reject create without a cluster name"
)]
fn scenario_reject_blank_cluster_name(lifecycle_context: LifecycleContext) {
    let _ = lifecycle_context;
}
