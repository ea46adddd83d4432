//! Configuration loading, environment overlay, and validation.

use std::io::Write;
use std::sync::Mutex;

use gateward::config::{Config, Exchange};
use gateward::error::ConfigError;

/// Environment-variable mutations are process-global; serialize the tests
/// that touch them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const ENV_VARS: &[&str] = &[
    "BINANCE_API_KEY",
    "BINANCE_API_SECRET",
    "BYBIT_API_KEY",
    "BYBIT_SECRET_KEY",
    "TESTNET",
];

fn scrub_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_a_full_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    scrub_env();

    let file = write_config(
        r#"
        [exchange]
        profile = "binance"
        testnet = false
        default_symbol = "ETHUSDT"
        api_key = "file-key"
        api_secret = "file-secret"

        [rate_limit]
        requests_per_second = 5

        [retry]
        max_retries = 2
        initial_backoff_ms = 100
        backoff_multiplier = 3.0
        max_backoff_ms = 2000

        [http]
        timeout_ms = 3000
        connect_timeout_ms = 1000

        [logging]
        level = "debug"
        format = "json"
        "#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.exchange.profile, Exchange::Binance);
    assert!(!config.exchange.testnet);
    assert_eq!(config.exchange.default_symbol, "ETHUSDT");
    assert_eq!(config.rate_limit.requests_per_second, 5);
    assert_eq!(config.retry.max_retries, 2);
    assert_eq!(config.http.timeout_ms, 3000);

    let credentials = config.credentials().unwrap();
    assert_eq!(credentials.api_key(), "file-key");
    assert!(!credentials.testnet());
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    scrub_env();

    let file = write_config(
        r#"
        [exchange]
        profile = "bybit"
        api_key = "k"
        api_secret = "s"
        "#,
    );

    let config = Config::load(file.path()).unwrap();
    assert!(config.exchange.testnet);
    assert_eq!(config.exchange.default_symbol, "BTCUSDT");
    assert_eq!(config.rate_limit.requests_per_second, 10);
    assert_eq!(config.retry.max_retries, 3);
}

#[test]
fn environment_overrides_file_credentials() {
    let _guard = ENV_LOCK.lock().unwrap();
    scrub_env();
    std::env::set_var("BYBIT_API_KEY", "env-key");
    std::env::set_var("BYBIT_SECRET_KEY", "env-secret");

    let file = write_config(
        r#"
        [exchange]
        profile = "bybit"
        api_key = "file-key"
        api_secret = "file-secret"
        "#,
    );

    let config = Config::load(file.path()).unwrap();
    let credentials = config.credentials().unwrap();
    assert_eq!(credentials.api_key(), "env-key");
    assert_eq!(credentials.api_secret(), "env-secret");

    scrub_env();
}

#[test]
fn profile_selects_its_own_env_vars() {
    let _guard = ENV_LOCK.lock().unwrap();
    scrub_env();
    // Bybit vars must not leak into a Binance profile.
    std::env::set_var("BYBIT_API_KEY", "bybit-key");
    std::env::set_var("BYBIT_SECRET_KEY", "bybit-secret");

    let file = write_config(
        r#"
        [exchange]
        profile = "binance"
        api_key = "binance-file-key"
        api_secret = "binance-file-secret"
        "#,
    );

    let config = Config::load(file.path()).unwrap();
    let credentials = config.credentials().unwrap();
    assert_eq!(credentials.api_key(), "binance-file-key");

    scrub_env();
}

#[test]
fn testnet_env_flag_overrides_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    scrub_env();
    std::env::set_var("TESTNET", "false");

    let file = write_config(
        r#"
        [exchange]
        profile = "bybit"
        testnet = true
        api_key = "k"
        api_secret = "s"
        "#,
    );

    let config = Config::load(file.path()).unwrap();
    assert!(!config.exchange.testnet);

    scrub_env();
}

#[test]
fn unparseable_testnet_flag_is_a_config_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    scrub_env();
    std::env::set_var("TESTNET", "definitely");

    let file = write_config(
        r#"
        [exchange]
        profile = "bybit"
        api_key = "k"
        api_secret = "s"
        "#,
    );

    let result = Config::load(file.path());
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            field: "testnet",
            ..
        })
    ));

    scrub_env();
}

#[test]
fn missing_file_is_a_read_error() {
    let result = Config::load("/nonexistent/gateward.toml");
    assert!(matches!(result, Err(ConfigError::ReadFile(_))));
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let file = write_config("this is not toml [");
    assert!(matches!(
        Config::load(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn empty_credentials_fail_at_the_credentials_accessor() {
    let _guard = ENV_LOCK.lock().unwrap();
    scrub_env();

    let file = write_config(
        r#"
        [exchange]
        profile = "binance"
        "#,
    );

    let config = Config::load(file.path()).unwrap();
    assert!(matches!(
        config.credentials(),
        Err(ConfigError::MissingField { field: "api_key" })
    ));
}
