//! Tests for identity rotation

use pretty_assertions::assert_eq;

use tests::fixtures::{full_identity, TestLogger};
use tests::{Identity, IdentityUpdate, LoggerConfig, Mode, SinkEvent, SinkLevel};

#[test]
fn refresh_merges_only_provided_fields() {
    let config = LoggerConfig::new(Mode::Cascade)
        .with_identity(Identity::new().with_session("s1").with_user_id("u1"));
    let t = TestLogger::new(config);

    let second = t.logger.refresh_instance(IdentityUpdate::new().session("s2"));
    assert_eq!(second.identity().session.as_deref(), Some("s2"));
    assert_eq!(second.identity().user_id.as_deref(), Some("u1"));

    let third = second.refresh_instance(IdentityUpdate::default());
    assert_eq!(third.identity().session.as_deref(), Some("s2"));
    assert_eq!(third.identity().user_id.as_deref(), Some("u1"));
}

#[test]
fn empty_strings_do_not_clear_fields() {
    let t = TestLogger::new(LoggerConfig::new(Mode::List).with_identity(full_identity()));

    let refreshed = t
        .logger
        .refresh_instance(IdentityUpdate::new().session("").user_id("u9"));
    assert_eq!(refreshed.identity().session.as_deref(), Some("s1"));
    assert_eq!(refreshed.identity().user_id.as_deref(), Some("u9"));
}

#[test]
fn every_refresh_rotates_the_trace() {
    let t = TestLogger::new(LoggerConfig::new(Mode::List).with_identity(full_identity()));

    let second = t.logger.refresh_instance(IdentityUpdate::default());
    let third = second.refresh_instance(IdentityUpdate::default());

    assert_ne!(t.logger.trace(), second.trace());
    assert_ne!(second.trace(), third.trace());
    for logger in [&t.logger, &second, &third] {
        assert_eq!(logger.trace().correlation(), "req-1");
    }
}

#[test]
fn correlation_update_changes_trace_prefix() {
    let t = TestLogger::with_mode(Mode::List);
    assert!(t.logger.trace().as_str().starts_with("UNSET-"));

    let refreshed = t
        .logger
        .refresh_instance(IdentityUpdate::new().correlation("req-42"));
    assert!(refreshed.trace().as_str().starts_with("req-42-"));
}

#[test]
fn refresh_publishes_on_the_channel() {
    let t = TestLogger::with_mode(Mode::Cascade);
    let site = t.channel.subscribe();
    assert!(!site.is_bound());

    let refreshed = t.logger.refresh_instance(IdentityUpdate::new().session("s1"));
    let current = site.current().expect("bound after refresh");
    assert_eq!(current.trace(), refreshed.trace());
    assert_eq!(t.channel.current().map(|l| l.trace().clone()), Some(refreshed.trace().clone()));
}

#[test]
fn refreshed_loggers_share_the_strategy() {
    let t = TestLogger::with_mode(Mode::Cascade);

    t.logger.start("outer", None);
    let refreshed = t.logger.refresh_instance(IdentityUpdate::new().session("s2"));
    assert_eq!(refreshed.depth(), 1);

    refreshed.start("inner", None);
    refreshed.end("inner", None);
    refreshed.end("outer", None);

    assert_eq!(t.logger.depth(), 0);
    assert_eq!(t.sink.group_depth(), 0);

    let records = t.sink.records(SinkLevel::Info);
    assert_eq!(records[0].trace, *t.logger.trace());
    assert_eq!(records[0].session, None);
    assert_eq!(records[1].trace, *refreshed.trace());
    assert_eq!(records[1].session.as_deref(), Some("s2"));
    assert_eq!(records[3].trace, *t.logger.trace(), "outer closes under its own trace");

    let mut started = Vec::new();
    let mut ended = Vec::new();
    for event in t.sink.events() {
        match event {
            SinkEvent::Time(label) => started.push(label),
            SinkEvent::TimeEnd(label) => ended.push(label),
            _ => {}
        }
    }
    assert_eq!(started.len(), 2);
    for label in &started {
        assert!(ended.contains(label), "timer {label} never stopped");
    }
    assert_eq!(ended.last(), Some(&format!("outer - {}", t.logger.trace())));
}

#[test]
fn publish_without_refresh_binds_subscribers() {
    let t = TestLogger::with_mode(Mode::List);
    let a = t.channel.subscribe();
    let b = t.channel.subscribe();

    assert_eq!(t.logger.publish(), 2);
    assert_eq!(a.current().map(|l| l.trace().clone()), Some(t.logger.trace().clone()));
    assert!(b.is_bound());
}

#[test]
fn refresh_after_channel_dropped_is_harmless() {
    let TestLogger { logger, sink, channel } = TestLogger::with_mode(Mode::Cascade);
    drop(channel);

    let refreshed = logger.refresh_instance(IdentityUpdate::new().session("s2"));
    assert_eq!(refreshed.publish(), 0);

    refreshed.start("a", None);
    refreshed.end("a", None);
    assert_eq!(sink.records(SinkLevel::Info).len(), 2);
}
