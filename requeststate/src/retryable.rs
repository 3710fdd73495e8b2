use crate::{FlatOperation, Operation, RequestError, RequestState, RequestStateConfig, SingleOperation};
use futures::future::{self, FutureExt};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use futures_signals::signal::{Mutable, SignalExt};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, trace};

type Subscribe<T, E> =
    dyn Fn(watch::Receiver<u64>) -> BoxStream<'static, RequestState<T, E>> + Send + Sync;

/// A restartable stream of [`RequestState`]s around an asynchronous operation.
///
/// Every call to [`subscribe`](Self::subscribe) starts an independent run: the
/// upstream source is opened, and each value it emits starts a new generation in
/// which the operation runs once, and again on every [`retry`](Self::retry). A
/// newer generation or retry abandons the execution it supersedes; nothing from
/// the abandoned execution is ever delivered.
///
/// Clones share the same retry control. A subscription completes by itself once
/// its upstream is exhausted, the last execution has settled and every clone
/// has been dropped.
pub struct RetryableStream<T, E = RequestError> {
    retry_tx: Arc<watch::Sender<u64>>,
    subscribe: Arc<Subscribe<T, E>>,
}

impl<T, E> Clone for RetryableStream<T, E> {
    fn clone(&self) -> Self {
        RetryableStream {
            retry_tx: self.retry_tx.clone(),
            subscribe: self.subscribe.clone(),
        }
    }
}

impl<T, E> fmt::Debug for RetryableStream<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryableStream")
            .field("subscriptions", &self.retry_tx.receiver_count())
            .finish_non_exhaustive()
    }
}

impl<T, E> RetryableStream<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Wraps an operation that has no upstream input.
    pub fn new<F, Fut>(config: RequestStateConfig, operation: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::with_upstream(single_unit, config, move |()| operation())
    }

    /// Wraps an operation that runs once per value of an upstream source.
    ///
    /// `upstream` is called on every subscription to open a fresh source.
    pub fn with_upstream<U, Up, S, F, Fut>(upstream: Up, config: RequestStateConfig, operation: F) -> Self
    where
        Up: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = Result<U, E>> + Send + 'static,
        U: Clone + Send + 'static,
        F: Fn(U) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::from_operation(upstream, config, SingleOperation::new(operation))
    }

    /// Uses the current and every following value of `cell` as the upstream.
    pub fn from_signal<U, F, Fut>(cell: Mutable<U>, config: RequestStateConfig, operation: F) -> Self
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(U) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::with_upstream(
            move || cell.signal_cloned().to_stream().map(Ok),
            config,
            operation,
        )
    }

    /// Wraps an operation producing a stream; each element becomes a `Success`.
    pub fn flat<F, Fut, S>(config: RequestStateConfig, operation: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S, E>> + Send + 'static,
        S: Stream<Item = Result<T, E>> + Send + 'static,
    {
        Self::flat_with_upstream(single_unit, config, move |()| operation())
    }

    /// Flattening counterpart of [`with_upstream`](Self::with_upstream).
    pub fn flat_with_upstream<U, Up, UpS, F, Fut, S>(
        upstream: Up,
        config: RequestStateConfig,
        operation: F,
    ) -> Self
    where
        Up: Fn() -> UpS + Send + Sync + 'static,
        UpS: Stream<Item = Result<U, E>> + Send + 'static,
        U: Clone + Send + 'static,
        F: Fn(U) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S, E>> + Send + 'static,
        S: Stream<Item = Result<T, E>> + Send + 'static,
    {
        Self::from_operation(upstream, config, FlatOperation::new(operation))
    }

    /// Builds a stream around any [`Operation`].
    pub fn from_operation<U, Up, S, O>(upstream: Up, config: RequestStateConfig, operation: O) -> Self
    where
        Up: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = Result<U, E>> + Send + 'static,
        U: Clone + Send + 'static,
        O: Operation<U, T, E>,
    {
        let operation = Arc::new(operation);
        let (retry_tx, _) = watch::channel(0u64);
        let subscribe = move |retry_rx: watch::Receiver<u64>| {
            Subscription::new(upstream().boxed(), retry_rx, operation.clone(), config).into_stream()
        };
        RetryableStream {
            retry_tx: Arc::new(retry_tx),
            subscribe: Arc::new(subscribe),
        }
    }

    /// Starts a new, independent subscription.
    pub fn subscribe(&self) -> RequestStateStream<T, E> {
        let retry_rx = self.retry_tx.subscribe();
        RequestStateStream {
            states: (self.subscribe)(retry_rx),
        }
    }

    /// Pushes every state of a new subscription into `cell` until it completes.
    pub fn publish_to(&self, cell: &Mutable<RequestState<T, E>>) -> impl Future<Output = ()> + Send + 'static
    where
        T: Sync,
        E: Sync,
    {
        let cell = cell.clone();
        self.subscribe().for_each(move |state| {
            cell.set(state);
            future::ready(())
        })
    }

    /// Spawns [`publish_to`](Self::publish_to) onto the Tokio runtime.
    ///
    /// Publishing stops when the returned [`Binding`] is dropped or cancelled.
    /// Must be called within a Tokio runtime.
    pub fn bind(&self, cell: &Mutable<RequestState<T, E>>) -> Binding
    where
        T: Sync,
        E: Sync,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let publish = self.publish_to(cell);
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => trace!("binding cancelled"),
                _ = publish => trace!("binding completed"),
            }
        });
        Binding {
            guard: token.drop_guard(),
        }
    }
}

impl<T, E> RetryableStream<T, E> {
    /// Re-runs the operation in every active subscription.
    ///
    /// Retries that arrive before the previous one was picked up are conflated.
    /// A subscription waiting for its first upstream value ignores them.
    pub fn retry(&self) {
        request_retry(&self.retry_tx);
    }

    /// A retry control that does not keep the stream alive.
    pub fn retry_handle(&self) -> RetryHandle {
        RetryHandle {
            retry_tx: Arc::downgrade(&self.retry_tx),
        }
    }
}

fn request_retry(retry_tx: &watch::Sender<u64>) {
    retry_tx.send_modify(|requests| *requests = requests.wrapping_add(1));
}

fn single_unit<E>() -> stream::Iter<std::array::IntoIter<Result<(), E>, 1>> {
    stream::iter([Ok(())])
}

/// A weak retry control obtained from [`RetryableStream::retry_handle`].
#[derive(Debug, Clone)]
pub struct RetryHandle {
    retry_tx: Weak<watch::Sender<u64>>,
}

impl RetryHandle {
    /// Returns false if the stream has already been dropped.
    pub fn retry(&self) -> bool {
        match self.retry_tx.upgrade() {
            Some(retry_tx) => {
                request_retry(&retry_tx);
                true
            }
            None => false,
        }
    }
}

/// A running background publication started by [`RetryableStream::bind`].
#[must_use = "dropping a Binding stops it immediately"]
pub struct Binding {
    guard: DropGuard,
}

impl Binding {
    /// Stops publishing; the subscription and its pending work are dropped.
    pub fn cancel(self) {
        drop(self.guard);
    }

    /// Lets the publication run until its subscription completes.
    pub fn detach(self) {
        let _ = self.guard.disarm();
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").finish_non_exhaustive()
    }
}

/// The states of one subscription. Dropping it cancels all pending work.
#[must_use = "Streams do nothing unless polled"]
pub struct RequestStateStream<T, E = RequestError> {
    states: BoxStream<'static, RequestState<T, E>>,
}

impl<T, E> fmt::Debug for RequestStateStream<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestStateStream").finish_non_exhaustive()
    }
}

impl<T, E> Stream for RequestStateStream<T, E> {
    type Item = RequestState<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.states.poll_next_unpin(cx)
    }
}

/// Execution items delivered in a row before the upstream is checked again.
const UPSTREAM_POLL_BUDGET: u32 = 32;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Trigger {
    Start,
    Retry,
}

/// Per-subscription driver. Owns the upstream, the current generation's input,
/// the single in-flight execution and the conflating retry slot.
///
/// Retries are checked before every execution item. The upstream is polled
/// whenever the execution is pending and at least every `UPSTREAM_POLL_BUDGET`
/// items.
struct Subscription<U, T, E, O> {
    upstream: BoxStream<'static, Result<U, E>>,
    upstream_done: bool,
    retry_rx: watch::Receiver<u64>,
    retry_closed: bool,
    operation: Arc<O>,
    config: RequestStateConfig,
    generation: u64,
    input: Option<U>,
    execution: Option<BoxStream<'static, RequestState<T, E>>>,
    ready_streak: u32,
    finished: bool,
}

impl<U, T, E, O> Subscription<U, T, E, O>
where
    U: Clone + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    O: Operation<U, T, E>,
{
    fn new(
        upstream: BoxStream<'static, Result<U, E>>,
        retry_rx: watch::Receiver<u64>,
        operation: Arc<O>,
        config: RequestStateConfig,
    ) -> Self {
        debug!(?config, "subscription started");
        Subscription {
            upstream,
            upstream_done: false,
            retry_rx,
            retry_closed: false,
            operation,
            config,
            generation: 0,
            input: None,
            execution: None,
            ready_streak: 0,
            finished: false,
        }
    }

    fn into_stream(self) -> BoxStream<'static, RequestState<T, E>> {
        stream::unfold(self, Self::next_state).boxed()
    }

    async fn next_state(mut self) -> Option<(RequestState<T, E>, Self)> {
        loop {
            if self.finished {
                return None;
            }
            // A requested retry cancels the execution before any further item of it
            // is delivered, even when that item is already available.
            if self.retry_requested() {
                if let Some(state) = self.on_retry() {
                    return Some((state, self));
                }
                continue;
            }
            if self.ready_streak >= UPSTREAM_POLL_BUDGET {
                self.ready_streak = 0;
                if let Some(item) = self.poll_upstream_now() {
                    if let Some(state) = self.on_upstream(item) {
                        return Some((state, self));
                    }
                    continue;
                }
            }
            // An execution that is already complete settles before the next
            // upstream value replaces it.
            tokio::select! {
                biased;

                changed = self.retry_rx.changed(), if self.input.is_some() && !self.retry_closed => {
                    match changed {
                        Ok(()) => {
                            if let Some(state) = self.on_retry() {
                                return Some((state, self));
                            }
                        }
                        Err(_) => {
                            trace!(generation = self.generation, "retry control dropped");
                            self.retry_closed = true;
                        }
                    }
                }
                state = next_execution_state(&mut self.execution), if self.execution.is_some() => {
                    match state {
                        Some(state) => {
                            if state.is_failure() {
                                debug!(generation = self.generation, "operation failed");
                            }
                            self.ready_streak += 1;
                            return Some((state, self));
                        }
                        None => {
                            trace!(generation = self.generation, "execution settled");
                            self.execution = None;
                        }
                    }
                }
                item = self.upstream.next(), if !self.upstream_done => {
                    if let Some(state) = self.on_upstream(item) {
                        return Some((state, self));
                    }
                }
                else => {
                    debug!(generation = self.generation, "subscription completed");
                    self.finish();
                    return None;
                }
            }
        }
    }

    fn retry_requested(&self) -> bool {
        self.input.is_some() && !self.retry_closed && self.retry_rx.has_changed().unwrap_or(false)
    }

    fn poll_upstream_now(&mut self) -> Option<Option<Result<U, E>>> {
        if self.upstream_done {
            return None;
        }
        self.upstream.next().now_or_never()
    }

    fn on_upstream(&mut self, item: Option<Result<U, E>>) -> Option<RequestState<T, E>> {
        self.ready_streak = 0;
        match item {
            Some(Ok(input)) => self.begin_generation(input),
            Some(Err(error)) => {
                debug!(generation = self.generation, "upstream failed, ending subscription");
                self.finish();
                Some(RequestState::failure(error))
            }
            None => {
                trace!(generation = self.generation, "upstream completed");
                self.upstream_done = true;
                None
            }
        }
    }

    fn on_retry(&mut self) -> Option<RequestState<T, E>> {
        let _ = self.retry_rx.borrow_and_update();
        // An upstream value that is already waiting makes the retry stale.
        match self.poll_upstream_now() {
            Some(Some(item)) => return self.on_upstream(Some(item)),
            Some(None) => {
                self.on_upstream(None);
            }
            None => {}
        }
        self.trigger(Trigger::Retry)
    }

    fn begin_generation(&mut self, input: U) -> Option<RequestState<T, E>> {
        self.supersede();
        self.generation += 1;
        // Retries requested for an earlier generation do not carry over.
        let _ = self.retry_rx.borrow_and_update();
        self.input = Some(input);
        debug!(generation = self.generation, "generation started");
        if self.config.defer_until_retry {
            trace!(generation = self.generation, "waiting for retry");
            return None;
        }
        self.trigger(Trigger::Start)
    }

    fn trigger(&mut self, trigger: Trigger) -> Option<RequestState<T, E>> {
        let input = self.input.clone()?;
        self.supersede();
        debug!(generation = self.generation, ?trigger, "executing operation");
        self.execution = Some(self.operation.execute(input));
        let emit_loading = match trigger {
            Trigger::Start => self.config.emit_loading_on_start,
            Trigger::Retry => self.config.emit_loading_on_retry,
        };
        emit_loading.then_some(RequestState::Loading)
    }

    fn supersede(&mut self) {
        if self.execution.take().is_some() {
            trace!(generation = self.generation, "previous execution abandoned");
        }
    }

    fn finish(&mut self) {
        self.supersede();
        self.input = None;
        self.finished = true;
    }
}

async fn next_execution_state<T, E>(
    execution: &mut Option<BoxStream<'static, RequestState<T, E>>>,
) -> Option<RequestState<T, E>> {
    match execution {
        Some(states) => states.next().await,
        None => future::pending().await,
    }
}
