use crate::RequestState;
use std::fmt::Display;

/// Default presentation for the non-success states of a [`RequestState`].
///
/// A UI layer implements this once (a spinner, an error panel with a retry
/// button, ...) and only supplies the success view at each call site through
/// [`RequestState::render`].
pub trait StateRenderer<E> {
    type Output;

    /// Shown for both `NotStarted` and `Loading`.
    fn progress(&mut self) -> Self::Output;

    /// Shown for `Failure`; `retry` is wired to the stream that produced the state, if any.
    fn error(&mut self, error: E, retry: Option<&dyn Fn()>) -> Self::Output;
}

impl<T, E> RequestState<T, E> {
    /// Renders a success with `success` and hands every other state to `renderer`.
    pub fn render<R>(
        self,
        renderer: &mut R,
        retry: Option<&dyn Fn()>,
        success: impl FnOnce(T) -> R::Output,
    ) -> R::Output
    where
        R: StateRenderer<E>,
    {
        match self {
            RequestState::NotStarted | RequestState::Loading => renderer.progress(),
            RequestState::Failure { error } => renderer.error(error, retry),
            RequestState::Success { value } => success(value),
        }
    }
}

/// Renders states as single lines of text.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    progress: Option<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: impl Into<String>) -> Self {
        TextRenderer {
            progress: Some(progress.into()),
        }
    }
}

impl<E: Display> StateRenderer<E> for TextRenderer {
    type Output = String;

    fn progress(&mut self) -> String {
        self.progress.clone().unwrap_or_else(|| "Loading...".to_string())
    }

    fn error(&mut self, error: E, retry: Option<&dyn Fn()>) -> String {
        match retry {
            Some(_) => format!("Error: {error} (retry available)"),
            None => format!("Error: {error}"),
        }
    }
}
