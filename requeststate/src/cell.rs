use crate::RequestState;
use futures_signals::signal::Mutable;
use std::future::Future;
use tracing::debug;

/// Runs `computation` once and publishes its lifecycle into `cell`.
///
/// With `show_loading` set, `Loading` is published before the computation is
/// awaited; pass `false` for background refreshes that should keep showing the
/// previous state until the result arrives. The cell itself is owned by the
/// caller and is only ever written here.
pub async fn execute_into<T, E, F>(cell: &Mutable<RequestState<T, E>>, show_loading: bool, computation: F)
where
    F: Future<Output = Result<T, E>>,
{
    if show_loading {
        cell.set(RequestState::Loading);
    }
    let state = RequestState::from(computation.await);
    if state.is_failure() {
        debug!("single-shot operation failed");
    }
    cell.set(state);
}
