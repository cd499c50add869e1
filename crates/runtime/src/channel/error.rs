//! Error types raised by the exchange channel.

use std::io;
use std::path::PathBuf;

use game_core::{ActionDecodeError, CodecError, ValidationError};
use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Failures of a single publish or poll.
///
/// None of these are fatal: the caller logs them and keeps the value it
/// already holds.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to encode record: {0}")]
    Encode(String),
}

/// Coarse classification used for logging and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Open, read, write or rename failed.
    ChannelIo,
    /// Malformed or incomplete record.
    Codec,
    /// Well-formed record with out-of-domain values.
    Validation,
}

impl ChannelError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::ChannelIo,
            Self::Codec(_) | Self::Encode(_) => ErrorKind::Codec,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }
}

impl From<ActionDecodeError> for ChannelError {
    fn from(err: ActionDecodeError) -> Self {
        match err {
            ActionDecodeError::Codec(e) => Self::Codec(e),
            ActionDecodeError::Validation(e) => Self::Validation(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChannelError>;
