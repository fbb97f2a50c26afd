//! Shared fixtures for lifecycle BDD scenarios.

use ecdeploy::test_support::ScriptedBackend;
use ecdeploy::{ClusterConfigResource, ResourceData, ShutdownMode};
use rstest::fixture;

#[derive(Clone, Debug)]
pub struct LifecycleContext {
    pub backend: ScriptedBackend,
    pub shutdown_mode: ShutdownMode,
    pub data: ResourceData,
    pub outcome: Option<StepOutcome>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepOutcome {
    Succeeded,
    Failed(String),
}

impl LifecycleContext {
    pub fn resource(&self) -> ClusterConfigResource<ScriptedBackend> {
        ClusterConfigResource::new(self.backend.clone()).with_shutdown_mode(self.shutdown_mode)
    }
}

#[fixture]
pub fn lifecycle_context() -> LifecycleContext {
    LifecycleContext {
        backend: ScriptedBackend::new(),
        shutdown_mode: ShutdownMode::Accept,
        data: complete_data(),
        outcome: None,
    }
}

pub fn complete_data() -> ResourceData {
    ResourceData {
        api_key: String::from("essu_key=="),
        cluster_name: String::from("logs"),
        config: String::from(r#"{"name":"logs","prune_orphans":true}"#),
        id: None,
    }
}
