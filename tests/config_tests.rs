//! Unit tests for configuration parsing
//!
//! These tests parse TOML fragments directly, mirroring what
//! `Config::load()` reads from `config/relayer.toml`.

use general_message_relayer::config::{Config, ConfigError};

#[path = "helpers.rs"]
mod helpers;
use helpers::*;

const FULL_CONFIG: &str = r#"
[plugin]
target_address = "0000000000000000000000000000000000000000000000000000000000000815"
max_retries = 4

[[plugin.spy_service_filters]]
chain_id = 10
emitter_address = "0x000000000000000000000000f1277d1ed8ad466beddf92ef448a132661956621"

[staging]
lock_timeout_ms = 1500

[[chains.evm]]
chain_id = 16
rpc_url = "http://127.0.0.1:8545"
wallet_address = "0x0000000000000000000000000000000000000001"
"#;

#[test]
fn parses_full_configuration() {
    let config: Config = toml::from_str(FULL_CONFIG).expect("full config should parse");

    assert_eq!(config.plugin.max_retries, 4);
    assert_eq!(config.plugin.spy_service_filters.len(), 1);
    assert_eq!(config.plugin.spy_service_filters[0].chain_id, 10);
    assert_eq!(config.staging.lock_timeout_ms, 1500);
    assert_eq!(config.chains.evm.len(), 1);
    assert_eq!(config.chains.evm[0].chain_id, 16);
}

#[test]
fn omitted_sections_fall_back_to_defaults() {
    let minimal = r#"
[plugin]
target_address = "0000000000000000000000000000000000000000000000000000000000000815"
"#;
    let config: Config = toml::from_str(minimal).expect("minimal config should parse");

    assert_eq!(config.plugin.max_retries, 10);
    assert!(config.plugin.spy_service_filters.is_empty());
    assert_eq!(config.staging.lock_timeout_ms, 5000);
    assert!(config.chains.evm.is_empty());
}

#[test]
fn target_address_bytes_decodes_hex() {
    let config = build_test_config();
    assert_eq!(
        config.target_address_bytes().expect("valid address"),
        target_address()
    );
}

#[test]
fn target_address_bytes_rejects_wrong_length() {
    let mut config = build_test_config();
    config.plugin.target_address = "0815".to_string();
    assert!(matches!(
        config.target_address_bytes(),
        Err(ConfigError::InvalidTargetAddress(_))
    ));
}

#[test]
fn target_address_bytes_rejects_non_hex() {
    let mut config = build_test_config();
    config.plugin.target_address = "zz".repeat(32);
    assert!(matches!(
        config.target_address_bytes(),
        Err(ConfigError::InvalidTargetAddress(_))
    ));
}

#[test]
fn committed_template_parses() {
    let content = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/config/relayer.template.toml"
    ))
    .expect("template file exists");
    let config: Config = toml::from_str(&content).expect("template should parse");
    assert!(!config.plugin.spy_service_filters.is_empty());
    assert!(config.target_address_bytes().is_ok());
}
