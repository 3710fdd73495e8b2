use futures::{stream, StreamExt};
use futures_signals::signal::{Mutable, SignalExt};
use requeststate::{
    RequestError, RequestState, RequestStateConfig, RequestStateSignalExt, RequestStateStreamExt,
    RetryableStream,
};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(Level::DEBUG)
        .init();

    info!("==========================================");
    warn!("A. A search query drives the request");

    let query = Mutable::new("rust".to_string());
    let search: RetryableStream<Vec<String>> = RetryableStream::from_signal(
        query.clone(),
        RequestStateConfig::default(),
        |query: String| async move {
            sleep(Duration::from_millis(150)).await;
            Ok((1..=3).map(|n| format!("{query} result {n}")).collect())
        },
    );

    let results: Mutable<RequestState<Vec<String>>> = Mutable::new(RequestState::NotStarted);
    let binding = search.bind(&results);

    let typist = query.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(50)).await;
        // Typed before the first search finished; that search is abandoned.
        typist.set("tokio".to_string());
    });

    let mut counts = results
        .signal_cloned()
        .map_success(|results| results.len())
        .to_stream();
    while let Some(state) = counts.next().await {
        info!("Main | Result count: {:?}", state);
        if state.is_complete() {
            break;
        }
    }
    info!("Main | Results: {:?}", results.get_cloned());
    binding.cancel();

    info!("==========================================");
    warn!("B. A streaming download, one chunk per state");

    let download: RetryableStream<usize> = RetryableStream::flat(RequestStateConfig::default(), || async {
        let chunks = stream::iter(1..=5usize).then(|chunk| async move {
            sleep(Duration::from_millis(40)).await;
            if chunk == 4 {
                Err(RequestError::message("checksum mismatch"))
            } else {
                Ok(chunk * 1024)
            }
        });
        Ok(chunks)
    });
    let states = download.subscribe();
    drop(download);

    let received: Vec<Option<usize>> = states
        .inspect(|state| info!("Main | Current state: {:?}", state))
        .unwrap_or_none()
        .collect()
        .await;
    info!("Main | Bytes per state: {:?}", received);

    info!("==========================================");
    info!("Main | Finish");
}
