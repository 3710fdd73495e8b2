use crate::{RequestState, StopIfExt};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::future::Future;
use std::marker::PhantomData;

/// One run of the wrapped operation for an upstream value, expressed as the
/// states it produces after any `Loading`.
///
/// Dropping the returned stream abandons the run.
pub trait Operation<U, T, E>: Send + Sync + 'static {
    fn execute(&self, input: U) -> BoxStream<'static, RequestState<T, E>>;
}

/// An operation that resolves to a single value.
pub struct SingleOperation<F> {
    operation: F,
}

impl<F> SingleOperation<F> {
    pub fn new(operation: F) -> Self {
        SingleOperation { operation }
    }
}

impl<U, T, E, F, Fut> Operation<U, T, E> for SingleOperation<F>
where
    F: Fn(U) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    fn execute(&self, input: U) -> BoxStream<'static, RequestState<T, E>> {
        let computation = (self.operation)(input);
        stream::once(async move { RequestState::from(computation.await) }).boxed()
    }
}

/// An operation that resolves to a nested stream; every element becomes its own
/// `Success`, and the first error ends the run with a `Failure`.
pub struct FlatOperation<F, S> {
    operation: F,
    _stream: PhantomData<fn() -> S>,
}

impl<F, S> FlatOperation<F, S> {
    pub fn new(operation: F) -> Self {
        FlatOperation {
            operation,
            _stream: PhantomData,
        }
    }
}

impl<U, T, E, F, Fut, S> Operation<U, T, E> for FlatOperation<F, S>
where
    F: Fn(U) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S, E>> + Send + 'static,
    S: Stream<Item = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    fn execute(&self, input: U) -> BoxStream<'static, RequestState<T, E>> {
        let computation = (self.operation)(input);
        stream::once(computation)
            .flat_map(|opened| match opened {
                Ok(elements) => elements.map(RequestState::<T, E>::from).left_stream(),
                Err(error) => stream::once(async move { RequestState::<T, E>::failure(error) }).right_stream(),
            })
            .stop_if(RequestState::is_failure)
            .boxed()
    }
}
