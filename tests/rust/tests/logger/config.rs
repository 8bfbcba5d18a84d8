//! Tests for configuration loading

use pretty_assertions::assert_eq;
use std::time::Duration;

use tests::fixtures::TestLogger;
use tests::{LogLevel, LoggerChannel, LoggerConfig, Mode};

#[test]
fn json_config_drives_the_logger() -> anyhow::Result<()> {
    let config = LoggerConfig::from_json_str(
        r#"{
            "level": 3,
            "appName": "orders",
            "correlation": "req-7",
            "session": "s1",
            "userId": "u1",
            "identifier": "node-b",
            "mode": "list",
            "decoratorCount": 25,
            "queueWindowMs": 500
        }"#,
    )?;

    assert_eq!(config.queue_window(), Duration::from_millis(500));
    let t = TestLogger::new(config);

    assert_eq!(t.logger.level(), LogLevel::Warn);
    assert_eq!(t.logger.mode(), Mode::List);
    assert_eq!(t.channel.max_subscribers(), 25);
    assert_eq!(t.logger.identity().app_name.as_deref(), Some("orders"));
    assert_eq!(t.logger.identity().identifier.as_deref(), Some("node-b"));
    assert!(t.logger.trace().as_str().starts_with("req-7-"));
    Ok(())
}

#[test]
fn missing_keys_take_defaults() -> anyhow::Result<()> {
    let config = LoggerConfig::from_json_str("{}")?;
    assert_eq!(config, LoggerConfig::default());
    assert_eq!(config.mode, Mode::Queue);
    assert_eq!(config.level, LogLevel::Debug);
    Ok(())
}

#[test]
fn invalid_values_are_rejected() {
    assert!(LoggerConfig::from_json_str(r#"{"level": 9}"#).is_err());
    assert!(LoggerConfig::from_json_str(r#"{"mode": "stream"}"#).is_err());
}

#[test]
fn subscriber_ceiling_is_advisory() {
    let channel = LoggerChannel::for_config(&LoggerConfig::default().with_decorator_count(2));

    let subscriptions: Vec<_> = (0..4).map(|_| channel.subscribe()).collect();
    assert_eq!(channel.subscriber_count(), 4);

    drop(subscriptions);
    assert_eq!(channel.subscriber_count(), 0);
}
