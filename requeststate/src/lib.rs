mod cell;
mod config;
mod operation;
mod render;
mod request_error;
mod request_state;
mod retryable;
mod signal_ext;
mod stream_ext;

#[cfg(test)]
mod unit_tests;

pub use cell::*;
pub use config::*;
pub use operation::*;
pub use render::*;
pub use request_error::*;
pub use request_state::*;
pub use retryable::*;
pub use signal_ext::*;
pub use stream_ext::*;
