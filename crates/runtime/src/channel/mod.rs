//! File-backed single-slot exchange channel.
//!
//! Each direction is one file. The writer replaces it atomically; the reader
//! polls it at its own cadence and never clears it. Between polls the
//! consumer keeps using the last value it decoded.
//!
//! - [`ChannelWriter`] write-to-temporary then rename
//! - [`ChannelReader`] change detection, optional maximum age
//! - [`PollGate`] tick-count cadence for the host loop

mod error;
mod reader;
mod stats;
mod writer;

pub use error::{ChannelError, ErrorKind, Result};
pub use reader::{ChannelReader, PollGate, ReadOutcome};
pub use stats::{ChannelStats, should_log_failure};
pub use writer::ChannelWriter;
