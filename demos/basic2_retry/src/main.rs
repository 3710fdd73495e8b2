use crate::tracing_setup::tracing_init;
use futures::StreamExt;
use requeststate::{RequestError, RequestStateConfig, RetryableStream, StopIfExt};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

mod tracing_setup;

#[tokio::main]
async fn main() {
    tracing_init();

    info!("==========================================");
    warn!("A. First attempt fails, a retry recovers");

    let attempts = Arc::new(AtomicU32::new(0));
    let counter = attempts.clone();
    let flaky: RetryableStream<String> = RetryableStream::new(RequestStateConfig::default(), move || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            debug!("Worker | attempt {attempt}");
            sleep(Duration::from_millis(100)).await;
            if attempt == 1 {
                Err(RequestError::message("connection reset"))
            } else {
                Ok(format!("payload from attempt {attempt}"))
            }
        }
    });

    let retry = flaky.retry_handle();
    flaky
        .subscribe()
        .stop_if(|state| state.is_success())
        .for_each(|state| {
            info!("Main | Current state: {:?}", state);
            if state.is_failure() {
                retry.retry();
            }
            async {}
        })
        .await;

    info!("==========================================");
    warn!("B. Rapid retries supersede the pending run");

    let slow: RetryableStream<u32> = RetryableStream::new(RequestStateConfig::default(), move || {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            sleep(Duration::from_millis(200)).await;
            Ok(attempt)
        }
    });
    let mut states = slow.subscribe();
    info!("Main | Current state: {:?}", states.next().await);
    for _ in 0..3 {
        slow.retry();
        sleep(Duration::from_millis(20)).await;
    }
    drop(slow);
    while let Some(state) = states.next().await {
        info!("Main | Current state: {:?}", state);
    }

    info!("==========================================");
    warn!("C. Deferred until the first retry");

    let on_demand: RetryableStream<&'static str> = RetryableStream::new(
        RequestStateConfig::default().with_defer_until_retry(true),
        || async { Ok("submitted") },
    );
    let trigger = on_demand.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(300)).await;
        info!("Worker | Submit pressed");
        trigger.retry();
    });
    on_demand
        .subscribe()
        .stop_if(|state| state.is_complete())
        .for_each(|state| {
            info!("Main | Current state: {:?}", state);
            async {}
        })
        .await;

    info!("==========================================");
    info!("Main | Finish");
}
