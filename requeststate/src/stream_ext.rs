use crate::RequestState;
use futures_core::stream::Stream;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Extension trait that provides `stop_if` for every `Stream`.
pub trait StopIfExt: Stream {
    /// Creates a stream that stops producing items once the provided predicate returns true.
    ///
    /// The item that satisfied the predicate is still yielded; the stream ends right after it.
    ///
    /// ## Examples
    ///
    /// ```
    /// use futures::StreamExt;
    /// use requeststate::{RequestState, StopIfExt};
    ///
    /// async fn example() {
    ///     let states = futures::stream::iter(vec![
    ///         RequestState::<i32>::Loading,
    ///         RequestState::success(1),
    ///         RequestState::Loading,
    ///     ]);
    ///     let settled: Vec<_> = states.stop_if(|state| state.is_complete()).collect().await;
    ///     assert_eq!(settled.len(), 2);
    /// }
    /// ```
    fn stop_if<F>(self, test: F) -> StopIf<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
        Self: Sized,
    {
        StopIf {
            stream: self,
            stopped: false,
            test,
        }
    }
}
impl<T: ?Sized> StopIfExt for T where T: Stream {}

/// A stream that stops producing items once a predicate returns true.
///
/// Created by [`StopIfExt::stop_if`].
#[pin_project(project = StopIfProj)]
#[derive(Debug)]
#[must_use = "Streams do nothing unless polled"]
pub struct StopIf<A, B> {
    #[pin]
    stream: A,
    stopped: bool,
    test: B,
}

impl<A, B> Stream for StopIf<A, B>
where
    A: Stream,
    B: FnMut(&A::Item) -> bool,
{
    type Item = A::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let StopIfProj {
            stream,
            stopped,
            test,
        } = self.project();

        if *stopped {
            return Poll::Ready(None);
        }
        match stream.poll_next(cx) {
            Poll::Ready(Some(value)) => {
                if test(&value) {
                    *stopped = true;
                }
                Poll::Ready(Some(value))
            }
            Poll::Ready(None) => {
                *stopped = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Combinators over a stream of [`RequestState`]s.
///
/// Every adapter yields exactly one item per source item.
pub trait RequestStateStreamExt<T, E>: Stream<Item = RequestState<T, E>> {
    /// Maps successful values, passing every other state through.
    fn map_success<O, F>(self, transform: F) -> MapSuccess<Self, F>
    where
        F: FnMut(T) -> O,
        Self: Sized,
    {
        MapSuccess {
            stream: self,
            transform,
        }
    }

    /// Yields the successful value, or a clone of `default` for any other state.
    fn unwrap_or(self, default: T) -> UnwrapOr<Self, T>
    where
        T: Clone,
        Self: Sized,
    {
        UnwrapOr {
            stream: self,
            default,
        }
    }

    /// Yields `Some(value)` for successes and `None` for any other state.
    fn unwrap_or_none(self) -> UnwrapOrNone<Self>
    where
        Self: Sized,
    {
        UnwrapOrNone { stream: self }
    }
}
impl<S: ?Sized, T, E> RequestStateStreamExt<T, E> for S where S: Stream<Item = RequestState<T, E>> {}

#[pin_project(project = MapSuccessProj)]
#[derive(Debug)]
#[must_use = "Streams do nothing unless polled"]
pub struct MapSuccess<A, F> {
    #[pin]
    stream: A,
    transform: F,
}

impl<A, F, T, E, O> Stream for MapSuccess<A, F>
where
    A: Stream<Item = RequestState<T, E>>,
    F: FnMut(T) -> O,
{
    type Item = RequestState<O, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let MapSuccessProj { stream, transform } = self.project();
        stream
            .poll_next(cx)
            .map(|state| state.map(|state| state.map(|value| transform(value))))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stream.size_hint()
    }
}

#[pin_project(project = UnwrapOrProj)]
#[derive(Debug)]
#[must_use = "Streams do nothing unless polled"]
pub struct UnwrapOr<A, T> {
    #[pin]
    stream: A,
    default: T,
}

impl<A, T, E> Stream for UnwrapOr<A, T>
where
    A: Stream<Item = RequestState<T, E>>,
    T: Clone,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let UnwrapOrProj { stream, default } = self.project();
        stream
            .poll_next(cx)
            .map(|state| state.map(|state| state.unwrap_or(default.clone())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stream.size_hint()
    }
}

#[pin_project(project = UnwrapOrNoneProj)]
#[derive(Debug)]
#[must_use = "Streams do nothing unless polled"]
pub struct UnwrapOrNone<A> {
    #[pin]
    stream: A,
}

impl<A, T, E> Stream for UnwrapOrNone<A>
where
    A: Stream<Item = RequestState<T, E>>,
{
    type Item = Option<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let UnwrapOrNoneProj { stream } = self.project();
        stream
            .poll_next(cx)
            .map(|state| state.map(RequestState::unwrap_or_none))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stream.size_hint()
    }
}
