//! Tests for the queue strategy
//!
//! Run on a paused clock; `advance` moves time forward deterministically.

use pretty_assertions::assert_eq;
use std::time::Duration;

use tests::async_helpers::{advance, QUEUE_WINDOW};
use tests::fixtures::TestLogger;
use tests::{Boom, IdentityUpdate, LoggerConfig, Mode};

const JUST_BEFORE: Duration = Duration::from_millis(9_999);
const TICK: Duration = Duration::from_millis(2);

async fn settle(duration: Duration) {
    advance(duration).await;
    tokio::task::yield_now().await;
}

#[tokio::test(start_paused = true)]
async fn flushes_after_quiet_window() {
    let t = TestLogger::with_mode(Mode::Queue);

    t.logger.start("a", None);
    t.logger.end("a", None);

    settle(JUST_BEFORE).await;
    assert!(t.blocks().is_empty(), "no flush before the window elapses");

    settle(TICK).await;
    let blocks = t.blocks();
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].contains(&format!("\"a - {}\"", t.logger.trace())));
}

#[tokio::test(start_paused = true)]
async fn new_flow_postpones_flush() {
    let t = TestLogger::with_mode(Mode::Queue);

    t.logger.start("a", None);
    t.logger.end("a", None);
    settle(Duration::from_secs(5)).await;

    t.logger.start("b", None);
    t.logger.end("b", None);

    // The first deadline passes without a flush
    settle(Duration::from_secs(6)).await;
    assert!(t.blocks().is_empty());

    settle(Duration::from_secs(4) + TICK).await;
    let blocks = t.blocks();
    assert_eq!(blocks.len(), 1, "both flows land in one block");
    assert!(blocks[0].contains("a - "));
    assert!(blocks[0].contains("b - "));
}

#[tokio::test(start_paused = true)]
async fn open_flow_is_never_flushed_by_timer() {
    let t = TestLogger::with_mode(Mode::Queue);

    t.logger.start("a", None);
    t.logger.end("a", None);
    t.logger.start("long", None);

    settle(QUEUE_WINDOW * 3).await;
    assert!(t.blocks().is_empty());
    assert_eq!(t.logger.depth(), 1);

    t.logger.end("long", None);
    settle(QUEUE_WINDOW + TICK).await;
    assert_eq!(t.blocks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn error_line_is_buffered_like_a_call() {
    let t = TestLogger::with_mode(Mode::Queue);

    t.logger.start("save", None);
    t.logger.error("save", &Boom::new("disk full"), None);

    let buffered = t.logger.buffered();
    assert_eq!(buffered.len(), 1);
    assert_eq!(
        buffered[0],
        format!("Error: save - {} - disk full", t.logger.trace())
    );

    settle(QUEUE_WINDOW + TICK).await;
    assert_eq!(t.blocks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn rotation_flushes_old_trace_first() {
    let t = TestLogger::published(Mode::Queue);
    let first = t.logger.clone();

    first.start("a", None);
    first.end("a", None);

    let second = first.refresh_instance(IdentityUpdate::new().session("s2"));
    second.start("b", None);
    assert_eq!(t.blocks().len(), 1, "old trace flushed on rotation");
    assert!(t.blocks()[0].starts_with(&format!("\n{} => ", first.trace())));
    assert_eq!(second.buffered(), vec![format!("b - {}", second.trace())]);

    second.end("b", None);
    settle(QUEUE_WINDOW + TICK).await;

    let blocks = t.blocks();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[1].starts_with(&format!("\n{} => ", second.trace())));
    assert!(!blocks[1].contains(first.trace().as_str()));
}

#[tokio::test(start_paused = true)]
async fn output_log_flushes_now_and_cancels_timer() {
    let t = TestLogger::with_mode(Mode::Queue);

    t.logger.start("a", None);
    t.logger.end("a", None);
    t.logger.output_log();
    t.logger.output_log();
    assert_eq!(t.blocks().len(), 1);

    settle(QUEUE_WINDOW + TICK).await;
    assert_eq!(t.blocks().len(), 1, "the pending flush has nothing left");
}

#[tokio::test(start_paused = true)]
async fn window_is_configurable() {
    let config = LoggerConfig::new(Mode::Queue).with_queue_window(Duration::from_millis(250));
    let t = TestLogger::new(config);

    t.logger.start("a", None);
    t.logger.end("a", None);

    settle(Duration::from_millis(200)).await;
    assert!(t.blocks().is_empty());
    settle(Duration::from_millis(60)).await;
    assert_eq!(t.blocks().len(), 1);
}

#[test]
fn flushes_immediately_without_runtime() {
    let t = TestLogger::with_mode(Mode::Queue);

    t.logger.start("a", None);
    t.logger.end("a", None);

    assert_eq!(t.blocks().len(), 1);
}
