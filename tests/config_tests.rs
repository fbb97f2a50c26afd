//! Tests for provider configuration loading and validation.

use std::time::Duration;

use ecdeploy::config::{
    ConfigError, DEFAULT_BASE_URL, DEFAULT_PRUNE_ORPHANS_FIELD, MAX_DURATION_SECS,
};
use ecdeploy::test_support::EnvGuard;
use ecdeploy::{DeploymentClient, DeploymentError, ProviderConfig};
use rstest::*;

#[fixture]
fn valid_config() -> ProviderConfig {
    ProviderConfig::default()
}

#[rstest]
fn defaults_target_the_public_api(valid_config: ProviderConfig) {
    assert_eq!(valid_config.base_url, DEFAULT_BASE_URL);
    assert_eq!(valid_config.prune_orphans_field, DEFAULT_PRUNE_ORPHANS_FIELD);
    assert_eq!(valid_config.request_timeout(), Duration::from_secs(30));
    assert!(!valid_config.wait_for_shutdown);
    assert!(valid_config.validate().is_ok());
}

#[rstest]
#[case::base_url("EC_BASE_URL", |cfg: &mut ProviderConfig| cfg.base_url = String::from(" "))]
#[case::flag_field("EC_PRUNE_ORPHANS_FIELD", |cfg: &mut ProviderConfig| cfg.prune_orphans_field = String::new())]
#[case::request_timeout("EC_REQUEST_TIMEOUT_SECS", |cfg: &mut ProviderConfig| cfg.request_timeout_secs = 0)]
#[case::poll_interval("EC_SHUTDOWN_POLL_INTERVAL_SECS", |cfg: &mut ProviderConfig| cfg.shutdown_poll_interval_secs = 0)]
#[case::wait_timeout("EC_SHUTDOWN_WAIT_TIMEOUT_SECS", |cfg: &mut ProviderConfig| cfg.shutdown_wait_timeout_secs = 0)]
fn validation_names_env_var_and_config_file(
    valid_config: ProviderConfig,
    #[case] env_var: &str,
    #[case] mutate: fn(&mut ProviderConfig),
) {
    let mut cfg = valid_config;
    mutate(&mut cfg);

    let err = cfg.validate().expect_err("invalid field should be rejected");
    let ConfigError::MissingField(ref message) = err else {
        panic!("expected MissingField, got {err:?}");
    };
    assert!(message.contains(env_var), "message: {message}");
    assert!(message.contains("ecdeploy.toml"), "message: {message}");
}

#[rstest]
fn validation_rejects_relative_base_url(valid_config: ProviderConfig) {
    let cfg = ProviderConfig {
        base_url: String::from("not a url"),
        ..valid_config
    };

    let err = cfg.validate().expect_err("relative URL should fail");
    assert!(matches!(err, ConfigError::InvalidUrl { ref value, .. } if value == "not a url"));
}

#[rstest]
fn client_construction_surfaces_config_errors(valid_config: ProviderConfig) {
    let cfg = ProviderConfig {
        request_timeout_secs: 0,
        ..valid_config
    };

    let err = DeploymentClient::new(&cfg).expect_err("zero timeout should fail");
    assert!(
        matches!(err, DeploymentError::Config(ref message) if message.contains("EC_REQUEST_TIMEOUT_SECS")),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn environment_overrides_defaults() {
    let _guard = EnvGuard::set_vars(&[
        ("EC_BASE_URL", "http://127.0.0.1:8080/api/v1"),
        ("EC_REQUEST_TIMEOUT_SECS", "7"),
        ("EC_WAIT_FOR_SHUTDOWN", "true"),
    ])
    .await;

    let cfg = ProviderConfig::load_without_cli_args()
        .expect("configuration should load from environment");

    assert_eq!(cfg.base_url, "http://127.0.0.1:8080/api/v1");
    assert_eq!(cfg.request_timeout(), Duration::from_secs(7));
    assert!(cfg.wait_for_shutdown);
    assert_eq!(cfg.prune_orphans_field, DEFAULT_PRUNE_ORPHANS_FIELD);
}

#[rstest]
#[case::request_timeout("EC_REQUEST_TIMEOUT_SECS", |cfg: &mut ProviderConfig| cfg.request_timeout_secs = MAX_DURATION_SECS + 1)]
#[case::poll_interval("EC_SHUTDOWN_POLL_INTERVAL_SECS", |cfg: &mut ProviderConfig| cfg.shutdown_poll_interval_secs = u64::MAX)]
#[case::wait_timeout("EC_SHUTDOWN_WAIT_TIMEOUT_SECS", |cfg: &mut ProviderConfig| cfg.shutdown_wait_timeout_secs = u64::MAX)]
fn validation_bounds_durations(
    valid_config: ProviderConfig,
    #[case] env_var: &str,
    #[case] mutate: fn(&mut ProviderConfig),
) {
    let mut cfg = valid_config;
    mutate(&mut cfg);

    let err = DeploymentClient::new(&cfg).expect_err("oversized duration should be rejected");
    assert!(
        matches!(err, DeploymentError::Config(ref message) if message.contains(env_var) && message.contains("at most")),
        "unexpected error: {err:?}"
    );
    assert!(matches!(cfg.validate(), Err(ConfigError::OutOfRange(_))));
}

#[rstest]
fn validation_accepts_the_duration_bound(valid_config: ProviderConfig) {
    let cfg = ProviderConfig {
        shutdown_wait_timeout_secs: MAX_DURATION_SECS,
        ..valid_config
    };
    assert!(cfg.validate().is_ok());
}
