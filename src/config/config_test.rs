use serial_test::serial;
use temp_env::with_vars;

use super::*;

fn cleanup_all_observer_env_vars() {
    for (key, _) in std::env::vars() {
        if key.starts_with("OBSERVER__") || key == "CONFIG_PATH" {
            std::env::remove_var(&key);
        }
    }
}

#[test]
#[serial]
fn default_config_should_initialize_with_hardcoded_values() {
    let config = ObserverConfig::default();

    assert_eq!(config.controller.operator_config_name, "instance");
    assert_eq!(config.controller.workers, 1);
    assert_eq!(config.rate_limit.qps, 0.05);
    assert_eq!(config.rate_limit.burst, 4);
    assert_eq!(config.retry.backoff.base_delay_ms, 5);
    assert_eq!(config.retry.backoff.max_delay_ms, 1_000_000);
    assert_eq!(config.sources.etcd_client_port, 2379);
    assert_eq!(config.sources.target_namespace, "openshift-apiserver");
}

#[test]
#[serial]
fn new_should_merge_environment_overrides() {
    cleanup_all_observer_env_vars();
    with_vars(
        vec![
            ("OBSERVER__RATE_LIMIT__BURST", Some("8")),
            ("OBSERVER__SOURCES__ETCD_ENDPOINTS_NAME", Some("etcd-client")),
        ],
        || {
            let config = ObserverConfig::new().unwrap();

            assert_eq!(config.rate_limit.burst, 8);
            assert_eq!(config.sources.etcd_endpoints_name, "etcd-client");
            assert_eq!(config.sources.etcd_namespace, "kube-system");
        },
    );
}

#[test]
#[serial]
fn new_should_read_file_named_by_config_path() {
    cleanup_all_observer_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("observer.toml");
    std::fs::write(
        &config_path,
        r#"
        [controller]
        operator_config_name = "cluster"

        [retry.backoff]
        base_delay_ms = 20
        "#,
    )
    .unwrap();

    with_vars(vec![("CONFIG_PATH", Some(config_path.to_str().unwrap()))], || {
        let config = ObserverConfig::new().unwrap().validate().unwrap();

        assert_eq!(config.controller.operator_config_name, "cluster");
        assert_eq!(config.retry.backoff.base_delay_ms, 20);
        assert_eq!(config.retry.backoff.max_delay_ms, 1_000_000);
    });
}

#[test]
#[serial]
fn with_override_config_should_merge_file_settings() {
    cleanup_all_observer_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("override.toml");
    std::fs::write(
        &config_path,
        r#"
        [rate_limit]
        qps = 0.5

        [sources]
        image_config_name = "default"
        "#,
    )
    .unwrap();

    let empty_vars: Vec<(&str, Option<&str>)> = vec![];
    with_vars(empty_vars, || {
        let base_config = ObserverConfig::new().expect("success");
        let config = base_config
            .with_override_config(config_path.to_str().unwrap())
            .unwrap();

        assert_eq!(config.rate_limit.qps, 0.5);
        assert_eq!(config.rate_limit.burst, 4);
        assert_eq!(config.sources.image_config_name, "default");
    });
}

#[test]
#[serial]
fn environment_should_take_priority_over_override_file() {
    cleanup_all_observer_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("override.toml");
    std::fs::write(&config_path, "[rate_limit]\nburst = 2\n").unwrap();

    with_vars(vec![("OBSERVER__RATE_LIMIT__BURST", Some("6"))], || {
        let config = ObserverConfig::default()
            .with_override_config(config_path.to_str().unwrap())
            .unwrap();
        assert_eq!(config.rate_limit.burst, 6);
    });
}

#[test]
fn validation_should_pass_for_defaults() {
    assert!(ObserverConfig::default().validate().is_ok());
}

#[test]
fn validation_should_fail_with_zero_qps() {
    let mut config = ObserverConfig::default();
    config.rate_limit.qps = 0.0;

    let result = config.validate();
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn validation_should_fail_with_zero_burst() {
    let mut config = ObserverConfig::default();
    config.retry.overall.burst = 0;

    assert!(config.validate().is_err());
}

#[test]
fn validation_should_fail_when_base_delay_exceeds_ceiling() {
    let mut config = ObserverConfig::default();
    config.retry.backoff.base_delay_ms = 10;
    config.retry.backoff.max_delay_ms = 5;

    assert!(config.validate().is_err());
}

#[test]
fn validation_should_fail_with_blank_source_name() {
    let mut config = ObserverConfig::default();
    config.sources.public_info_config_map = "  ".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn validation_should_fail_with_blank_operator_config_name() {
    let mut config = ObserverConfig::default();
    config.controller.operator_config_name = String::new();

    assert!(config.validate().is_err());
}
