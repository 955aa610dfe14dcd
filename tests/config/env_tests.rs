// Environment configuration tests - dotenv loading and connection resolution
//
// These tests mutate the process environment and run serially.

use foundry_core::config::{
    AppConfig, ConfigError, ConnectionDescriptor, LaunchOptions, load_env_file, load_requested_env,
};
use foundry_core::constants::{
    API_KEY_VAR, API_VERSION_VAR, DEPLOYMENT_VAR, ENDPOINT_VAR, GITHUB_TOKEN_VAR,
};
use secrecy::ExposeSecret;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const ALL_VARS: [&str; 5] = [
    ENDPOINT_VAR,
    API_KEY_VAR,
    API_VERSION_VAR,
    DEPLOYMENT_VAR,
    GITHUB_TOKEN_VAR,
];

fn clear_env() {
    for key in ALL_VARS {
        unsafe { env::remove_var(key) };
    }
}

fn write_env(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join(".env");
    fs::write(&path, content).expect("Failed to write env file");
    path
}

const FULL_ENV: &str = "\
AZURE_OPENAI_ENDPOINT=https://demo.openai.azure.com
AZURE_OPENAI_API_KEY=file-key
AZURE_OPENAI_API_VERSION=2024-10-21
AZURE_OPENAI_CHAT_DEPLOYMENT_NAME=gpt-4o
";

#[test]
#[serial]
fn loads_connection_from_env_file() {
    clear_env();
    let dir = tempdir().expect("tempdir");
    let path = write_env(dir.path(), FULL_ENV);

    assert!(load_env_file(&path).expect("load"));
    let connection = ConnectionDescriptor::resolve().expect("resolve");

    assert_eq!(connection.endpoint(), "https://demo.openai.azure.com");
    assert_eq!(connection.credential().expose_secret(), "file-key");
    assert_eq!(connection.api_version(), "2024-10-21");
    assert_eq!(connection.deployment(), "gpt-4o");
    clear_env();
}

#[test]
#[serial]
fn existing_variables_win_over_env_file() {
    clear_env();
    unsafe { env::set_var(DEPLOYMENT_VAR, "from-process") };
    let dir = tempdir().expect("tempdir");
    let path = write_env(dir.path(), FULL_ENV);

    load_env_file(&path).expect("load");
    let connection = ConnectionDescriptor::resolve().expect("resolve");

    assert_eq!(connection.deployment(), "from-process");
    clear_env();
}

#[test]
#[serial]
fn missing_env_file_is_not_an_error() {
    clear_env();
    let dir = tempdir().expect("tempdir");

    let loaded = load_env_file(&dir.path().join("absent.env")).expect("load");

    assert!(!loaded);
}

#[test]
#[serial]
fn malformed_env_file_is_reported() {
    clear_env();
    let dir = tempdir().expect("tempdir");
    let path = write_env(dir.path(), "AZURE_OPENAI_ENDPOINT='unterminated\n");

    let result = load_env_file(&path);

    assert!(matches!(result, Err(ConfigError::EnvFile { .. })));
    clear_env();
}

#[test]
#[serial]
fn partial_environment_lists_missing_variables() {
    clear_env();
    unsafe {
        env::set_var(ENDPOINT_VAR, "https://demo.openai.azure.com");
        env::set_var(API_KEY_VAR, "key");
    }

    let err = ConnectionDescriptor::resolve().expect_err("incomplete");

    assert_eq!(err.missing_variables(), &[API_VERSION_VAR, DEPLOYMENT_VAR]);
    let message = err.to_string();
    assert!(message.contains(API_VERSION_VAR));
    assert!(message.contains(DEPLOYMENT_VAR));
    clear_env();
}

#[test]
#[serial]
fn environment_changes_are_seen_on_each_resolve() {
    clear_env();
    let dir = tempdir().expect("tempdir");
    load_env_file(&write_env(dir.path(), FULL_ENV)).expect("load");
    let first = ConnectionDescriptor::resolve().expect("first");

    unsafe { env::set_var(DEPLOYMENT_VAR, "gpt-4o-mini") };
    let second = ConnectionDescriptor::resolve().expect("second");

    assert_eq!(first.deployment(), "gpt-4o");
    assert_eq!(second.deployment(), "gpt-4o-mini");
    clear_env();
}

#[test]
#[serial]
fn app_config_picks_up_source_control_token() {
    clear_env();
    let dir = tempdir().expect("tempdir");
    let content = format!("{FULL_ENV}GITHUB_TOKEN=ghp_example\n");
    load_env_file(&write_env(dir.path(), &content)).expect("load");

    let config = AppConfig::from_env(LaunchOptions::default()).expect("config");

    let token = config.source_control_token.expect("token");
    assert_eq!(token.expose_secret(), "ghp_example");
    clear_env();
}

#[test]
#[serial]
fn blank_source_control_token_counts_as_absent() {
    clear_env();
    let dir = tempdir().expect("tempdir");
    let content = format!("{FULL_ENV}GITHUB_TOKEN=\n");
    load_env_file(&write_env(dir.path(), &content)).expect("load");

    let config = AppConfig::from_env(LaunchOptions::default()).expect("config");

    assert!(config.source_control_token.is_none());
    clear_env();
}

#[test]
#[serial]
fn named_env_file_that_is_missing_is_an_error() {
    clear_env();
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("typo.env");

    let err = load_requested_env(Some(&path)).expect_err("missing named file");

    assert!(matches!(err, ConfigError::EnvFileNotFound { .. }));
    assert!(err.to_string().contains("typo.env"));
    assert!(ConnectionDescriptor::resolve().is_err());
}

#[test]
#[serial]
fn named_env_file_feeds_connection() {
    clear_env();
    let dir = tempdir().expect("tempdir");
    let path = write_env(dir.path(), FULL_ENV);

    load_requested_env(Some(&path)).expect("load");

    assert_eq!(ConnectionDescriptor::resolve().expect("resolve").deployment(), "gpt-4o");
    clear_env();
}
