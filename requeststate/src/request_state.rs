use crate::RequestError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The lifecycle of a single asynchronous request.
///
/// A state is never mutated in place; every transition produces a new value.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RequestState<T, E = RequestError> {
    /// The request has not begun.
    NotStarted,
    /// The request is in flight.
    Loading,
    /// The request completed with a value.
    Success { value: T },
    /// The request failed.
    Failure { error: E },
}

impl<T, E> RequestState<T, E> {
    pub fn success(value: T) -> Self {
        RequestState::Success { value }
    }

    pub fn failure(error: E) -> Self {
        RequestState::Failure { error }
    }

    pub fn is_not_started(&self) -> bool {
        matches!(self, RequestState::NotStarted)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestState::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RequestState::Failure { .. })
    }

    /// Returns true once the request has settled, successfully or not.
    pub fn is_complete(&self) -> bool {
        matches!(self, RequestState::Success { .. } | RequestState::Failure { .. })
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, RequestState::NotStarted | RequestState::Loading)
    }

    pub fn value_ref(&self) -> Option<&T> {
        match self {
            RequestState::Success { value } => Some(value),
            _ => None,
        }
    }

    pub fn error_ref(&self) -> Option<&E> {
        match self {
            RequestState::Failure { error } => Some(error),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> RequestState<&T, &E> {
        match self {
            RequestState::NotStarted => RequestState::NotStarted,
            RequestState::Loading => RequestState::Loading,
            RequestState::Success { value } => RequestState::Success { value },
            RequestState::Failure { error } => RequestState::Failure { error },
        }
    }

    /// Maps a successful value and passes every other state through.
    ///
    /// `transform` runs at most once and only for `Success`. A panic inside it
    /// is not caught.
    pub fn map<O, F>(self, transform: F) -> RequestState<O, E>
    where
        F: FnOnce(T) -> O,
    {
        match self {
            RequestState::NotStarted => RequestState::NotStarted,
            RequestState::Loading => RequestState::Loading,
            RequestState::Success { value } => RequestState::Success {
                value: transform(value),
            },
            RequestState::Failure { error } => RequestState::Failure { error },
        }
    }

    pub fn map_err<O, F>(self, transform: F) -> RequestState<T, O>
    where
        F: FnOnce(E) -> O,
    {
        match self {
            RequestState::NotStarted => RequestState::NotStarted,
            RequestState::Loading => RequestState::Loading,
            RequestState::Success { value } => RequestState::Success { value },
            RequestState::Failure { error } => RequestState::Failure {
                error: transform(error),
            },
        }
    }

    /// Returns the successful value, or `default` for any other state.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            RequestState::Success { value } => value,
            _ => default,
        }
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.unwrap_or_none().unwrap_or_default()
    }

    /// Returns the successful value, or `None` for any other state.
    pub fn unwrap_or_none(self) -> Option<T> {
        match self {
            RequestState::Success { value } => Some(value),
            _ => None,
        }
    }

    pub fn value(self) -> Option<T> {
        self.unwrap_or_none()
    }

    /// Dispatches on the variant, handing each case to its own handler.
    pub fn fold<R>(
        self,
        not_started: impl FnOnce() -> R,
        loading: impl FnOnce() -> R,
        failure: impl FnOnce(E) -> R,
        success: impl FnOnce(T) -> R,
    ) -> R {
        match self {
            RequestState::NotStarted => not_started(),
            RequestState::Loading => loading(),
            RequestState::Success { value } => success(value),
            RequestState::Failure { error } => failure(error),
        }
    }
}

impl<T, E> Default for RequestState<T, E> {
    fn default() -> Self {
        RequestState::NotStarted
    }
}

impl<T, E> From<Result<T, E>> for RequestState<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => RequestState::Success { value },
            Err(error) => RequestState::Failure { error },
        }
    }
}
