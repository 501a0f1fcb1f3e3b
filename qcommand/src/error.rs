use std::io;

use derive_more::Display;
use thiserror::Error;

/// The engine operation that was running when a [`EngineError`] occured.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
pub enum EngineOp {
    #[display("produce")]
    Produce,
    #[display("timeout")]
    Timeout,
    #[display("close")]
    Close,
}

/// An error reported by the QUIC engine while it encodes packets or
/// handles its timers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("QUIC engine error occured in {op}, reason: {reason}")]
pub struct EngineError {
    pub op: EngineOp,
    pub reason: String,
}

impl EngineError {
    pub fn new(op: EngineOp, reason: impl Into<String>) -> Self {
        Self {
            op,
            reason: reason.into(),
        }
    }
}

/// Failures that abandon a command.
///
/// Backpressure is never an error: a datagram channel that would block
/// reports `Ok(0)`, and the command stays pending.
#[derive(Debug, Error)]
pub enum Error {
    #[error("datagram channel failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Io(error) => error,
            error @ Error::Engine(_) => io::Error::other(error),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
