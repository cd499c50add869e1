//! Unified error type surfaced by the runtime API.
//!
//! Per-poll failures never reach this type; they are logged where they
//! happen. Only setup and shutdown failures bubble up to the caller.

use thiserror::Error;

pub use crate::channel::ChannelError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("agent worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}
