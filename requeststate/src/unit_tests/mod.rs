mod operation_test;
mod request_state_test;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TestError {
    #[error("connection failed")]
    Connection,
    #[error("not found: {0}")]
    NotFound(String),
}
