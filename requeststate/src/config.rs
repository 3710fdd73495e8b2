#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Controls which triggers of a [`RetryableStream`](crate::RetryableStream) announce
/// themselves with [`RequestState::Loading`](crate::RequestState) and whether the
/// operation waits for an explicit retry before running.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct RequestStateConfig {
    /// Emit `Loading` when subscribing and on every upstream emission.
    pub emit_loading_on_start: bool,
    /// Emit `Loading` when `retry()` is called.
    pub emit_loading_on_retry: bool,
    /// Do not run the operation for a new upstream value until the first `retry()`.
    pub defer_until_retry: bool,
}

impl Default for RequestStateConfig {
    fn default() -> Self {
        RequestStateConfig {
            emit_loading_on_start: true,
            emit_loading_on_retry: true,
            defer_until_retry: false,
        }
    }
}

impl RequestStateConfig {
    /// Both loading flags set to `show_loading`; pass `false` for silent background loads.
    pub fn from_show_loading(show_loading: bool) -> Self {
        RequestStateConfig {
            emit_loading_on_start: show_loading,
            emit_loading_on_retry: show_loading,
            ..Default::default()
        }
    }

    pub fn with_loading_on_start(self, emit_loading_on_start: bool) -> Self {
        Self {
            emit_loading_on_start,
            ..self
        }
    }

    pub fn with_loading_on_retry(self, emit_loading_on_retry: bool) -> Self {
        Self {
            emit_loading_on_retry,
            ..self
        }
    }

    pub fn with_defer_until_retry(self, defer_until_retry: bool) -> Self {
        Self {
            defer_until_retry,
            ..self
        }
    }
}
