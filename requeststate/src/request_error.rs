use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// The default failure payload carried by [`RequestState::Failure`](crate::RequestState).
///
/// Operations and upstream sources are free to use their own error type; this
/// one exists for callers that just need "something went wrong" plus, optionally,
/// the underlying error object.
#[derive(Error, Debug, Clone)]
pub enum RequestError {
    /// A plain description of what went wrong.
    #[error("{0}")]
    Message(String),

    /// Any other error, shared so that states stay cheap to clone.
    #[error(transparent)]
    Other(Arc<dyn StdError + Send + Sync + 'static>),
}

impl RequestError {
    pub fn message(message: impl Into<String>) -> Self {
        RequestError::Message(message.into())
    }

    pub fn other<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        RequestError::Other(Arc::new(error))
    }

    /// Returns true if this error only carries a message.
    pub fn is_message(&self) -> bool {
        matches!(self, RequestError::Message(_))
    }

    /// Returns true if this error wraps another error object.
    pub fn is_other(&self) -> bool {
        matches!(self, RequestError::Other(_))
    }
}

// Wrapped errors compare by identity, messages by content.
impl PartialEq for RequestError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RequestError::Message(a), RequestError::Message(b)) => a == b,
            (RequestError::Other(a), RequestError::Other(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for RequestError {
    fn from(message: &str) -> Self {
        RequestError::Message(message.to_string())
    }
}

impl From<String> for RequestError {
    fn from(message: String) -> Self {
        RequestError::Message(message)
    }
}
