use crate::RequestState;
use futures_signals::signal::Signal;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Combinators over a `Signal` of [`RequestState`]s, typically obtained from
/// `Mutable::signal_cloned()`.
///
/// Each adapter produces one change per source change.
pub trait RequestStateSignalExt<T, E>: Signal<Item = RequestState<T, E>> {
    fn map_success<O, F>(self, transform: F) -> MapSuccessSignal<Self, F>
    where
        F: FnMut(T) -> O,
        Self: Sized,
    {
        MapSuccessSignal {
            signal: self,
            transform,
        }
    }

    fn unwrap_or(self, default: T) -> UnwrapOrSignal<Self, T>
    where
        T: Clone,
        Self: Sized,
    {
        UnwrapOrSignal {
            signal: self,
            default,
        }
    }

    fn unwrap_or_none(self) -> UnwrapOrNoneSignal<Self>
    where
        Self: Sized,
    {
        UnwrapOrNoneSignal { signal: self }
    }
}
impl<S: ?Sized, T, E> RequestStateSignalExt<T, E> for S where S: Signal<Item = RequestState<T, E>> {}

#[pin_project(project = MapSuccessSignalProj)]
#[derive(Debug)]
#[must_use = "Signals do nothing unless polled"]
pub struct MapSuccessSignal<A, F> {
    #[pin]
    signal: A,
    transform: F,
}

impl<A, F, T, E, O> Signal for MapSuccessSignal<A, F>
where
    A: Signal<Item = RequestState<T, E>>,
    F: FnMut(T) -> O,
{
    type Item = RequestState<O, E>;

    fn poll_change(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let MapSuccessSignalProj { signal, transform } = self.project();
        signal
            .poll_change(cx)
            .map(|state| state.map(|state| state.map(|value| transform(value))))
    }
}

#[pin_project(project = UnwrapOrSignalProj)]
#[derive(Debug)]
#[must_use = "Signals do nothing unless polled"]
pub struct UnwrapOrSignal<A, T> {
    #[pin]
    signal: A,
    default: T,
}

impl<A, T, E> Signal for UnwrapOrSignal<A, T>
where
    A: Signal<Item = RequestState<T, E>>,
    T: Clone,
{
    type Item = T;

    fn poll_change(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let UnwrapOrSignalProj { signal, default } = self.project();
        signal
            .poll_change(cx)
            .map(|state| state.map(|state| state.unwrap_or(default.clone())))
    }
}

#[pin_project(project = UnwrapOrNoneSignalProj)]
#[derive(Debug)]
#[must_use = "Signals do nothing unless polled"]
pub struct UnwrapOrNoneSignal<A> {
    #[pin]
    signal: A,
}

impl<A, T, E> Signal for UnwrapOrNoneSignal<A>
where
    A: Signal<Item = RequestState<T, E>>,
{
    type Item = Option<T>;

    fn poll_change(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let UnwrapOrNoneSignalProj { signal } = self.project();
        signal
            .poll_change(cx)
            .map(|state| state.map(RequestState::unwrap_or_none))
    }
}
