#![allow(dead_code)]

use futures::{Stream, StreamExt};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TestError {
    #[error("operation failed: {0}")]
    Operation(String),
    #[error("upstream failed")]
    Upstream,
}

/// How long a test waits before concluding that nothing else will be emitted.
pub const QUIET_PERIOD: Duration = Duration::from_millis(50);

/// Reads the next `count` items, failing the test if any of them takes too long.
pub async fn take_states<S>(stream: &mut S, count: usize) -> Vec<S::Item>
where
    S: Stream + Unpin,
{
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        let item = tokio::time::timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("timed out waiting for a state")
            .expect("stream ended early");
        items.push(item);
    }
    items
}

/// Asserts that the stream stays silent for [`QUIET_PERIOD`].
pub async fn assert_quiet<S>(stream: &mut S)
where
    S: Stream + Unpin,
    S::Item: std::fmt::Debug,
{
    if let Ok(item) = tokio::time::timeout(QUIET_PERIOD, stream.next()).await {
        panic!("expected no emission, got {item:?}");
    }
}
