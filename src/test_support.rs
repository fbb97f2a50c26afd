//! Test support utilities shared across unit and integration tests.

use std::collections::BTreeSet;
use std::env;
use std::ffi::OsString;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard as StdMutexGuard};

use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use crate::backend::{BackendFuture, CallOptions, DeploymentBackend, ReadOutcome};
use crate::deployment::types::{ApiKey, DeploymentId};

/// Identifier returned by [`ScriptedBackend`] unless overridden.
pub const SCRIPTED_DEPLOYMENT_ID: &str = "scripted-id";

/// Records a single call made through [`ScriptedBackend`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BackendCall {
    /// `create` with the raw configuration.
    Create {
        /// API key passed by the caller.
        api_key: String,
        /// Raw configuration text.
        config: String,
        /// Options forwarded by the caller.
        options: CallOptions,
    },
    /// `read` of an identifier.
    Read {
        /// Identifier read.
        id: String,
        /// Options forwarded by the caller.
        options: CallOptions,
    },
    /// `update` of an identifier with the raw configuration.
    Update {
        /// Identifier updated.
        id: String,
        /// Raw configuration text.
        config: String,
        /// Options forwarded by the caller.
        options: CallOptions,
    },
    /// `shutdown` or `shutdown_and_wait` of an identifier.
    Shutdown {
        /// Identifier shut down.
        id: String,
        /// Whether the caller waited for completion.
        waited: bool,
        /// Options forwarded by the caller.
        options: CallOptions,
    },
}

/// Error returned by [`ScriptedBackend`] for operations scripted to fail.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("scripted {operation} failure")]
pub struct ScriptedBackendError {
    /// Operation that failed.
    pub operation: &'static str,
}

#[derive(Debug)]
struct State {
    next_id: String,
    read_outcome: ReadOutcome,
    failing: BTreeSet<&'static str>,
    calls: Vec<BackendCall>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            next_id: String::from(SCRIPTED_DEPLOYMENT_ID),
            read_outcome: ReadOutcome::Present,
            failing: BTreeSet::new(),
            calls: Vec::new(),
        }
    }
}

/// Scripted deployment backend that records calls and allows controlled
/// failures per operation.
#[derive(Clone, Debug, Default)]
pub struct ScriptedBackend {
    state: Arc<StdMutex<State>>,
}

impl ScriptedBackend {
    /// Creates a backend that succeeds everywhere.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> StdMutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|err| panic!("scripted backend lock poisoned: {err}"))
    }

    /// Sets the identifier returned by the next creates.
    pub fn returns_id(&self, id: impl Into<String>) {
        self.state().next_id = id.into();
    }

    /// Sets the outcome reported by reads.
    pub fn reports(&self, outcome: ReadOutcome) {
        self.state().read_outcome = outcome;
    }

    /// Makes `operation` (`create`, `read`, `update`, or `shutdown`) fail.
    pub fn fail_on(&self, operation: &'static str) {
        self.state().failing.insert(operation);
    }

    /// Returns a snapshot of all calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state().calls.clone()
    }

    fn record(&self, call: BackendCall, operation: &'static str) -> Result<(), ScriptedBackendError> {
        let mut state = self.state();
        state.calls.push(call);
        if state.failing.contains(operation) {
            return Err(ScriptedBackendError { operation });
        }
        Ok(())
    }
}

impl DeploymentBackend for ScriptedBackend {
    type Error = ScriptedBackendError;

    fn create<'a>(
        &'a self,
        api_key: &'a ApiKey,
        config: &'a str,
        options: CallOptions,
    ) -> BackendFuture<'a, DeploymentId, Self::Error> {
        Box::pin(async move {
            self.record(
                BackendCall::Create {
                    api_key: api_key.expose().to_owned(),
                    config: config.to_owned(),
                    options,
                },
                "create",
            )?;
            Ok(DeploymentId::new(self.state().next_id.clone()))
        })
    }

    fn read<'a>(
        &'a self,
        _api_key: &'a ApiKey,
        id: &'a DeploymentId,
        options: CallOptions,
    ) -> BackendFuture<'a, ReadOutcome, Self::Error> {
        Box::pin(async move {
            self.record(BackendCall::Read {
                    id: id.to_string(),
                    options,
                }, "read")?;
            Ok(self.state().read_outcome)
        })
    }

    fn update<'a>(
        &'a self,
        _api_key: &'a ApiKey,
        config: &'a str,
        id: &'a DeploymentId,
        options: CallOptions,
    ) -> BackendFuture<'a, (), Self::Error> {
        Box::pin(async move {
            self.record(
                BackendCall::Update {
                    id: id.to_string(),
                    config: config.to_owned(),
                    options,
                },
                "update",
            )
        })
    }

    fn shutdown<'a>(
        &'a self,
        _api_key: &'a ApiKey,
        id: &'a DeploymentId,
        options: CallOptions,
    ) -> BackendFuture<'a, (), Self::Error> {
        Box::pin(async move {
            self.record(
                BackendCall::Shutdown {
                    id: id.to_string(),
                    waited: false,
                    options,
                },
                "shutdown",
            )
        })
    }

    fn shutdown_and_wait<'a>(
        &'a self,
        _api_key: &'a ApiKey,
        id: &'a DeploymentId,
        options: CallOptions,
    ) -> BackendFuture<'a, (), Self::Error> {
        Box::pin(async move {
            self.record(
                BackendCall::Shutdown {
                    id: id.to_string(),
                    waited: true,
                    options,
                },
                "shutdown",
            )
        })
    }
}

/// Global mutex used to serialise environment mutation in tests.
pub static ENV_LOCK: Mutex<()> = Mutex::const_new(());

/// Guard that holds the env mutex and restores variables on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets multiple environment variables while holding a global mutex.
    pub async fn set_vars(pairs: &[(&str, &str)]) -> Self {
        debug_assert!(
            {
                let mut seen = BTreeSet::new();
                pairs.iter().all(|(key, _)| seen.insert(*key))
            },
            "duplicate environment variable keys passed to EnvGuard::set_vars"
        );

        let guard = ENV_LOCK.lock().await;
        let mut previous = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let old = env::var_os(key);
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`, preventing races.
            unsafe { env::set_var(key, value) };
            previous.push(((*key).to_owned(), old));
        }

        Self {
            previous,
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.previous {
            // SAFETY: Environment mutation is serialised by holding `_guard`.
            unsafe {
                match old {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
