//! Errors raised while assembling a snapshot from the host world.
//!
//! Codec and validation errors live next to the code that raises them
//! ([`crate::codec::CodecError`], [`crate::command::ValidationError`]). This
//! module holds the extraction side, plus a severity helper shared by callers
//! that decide whether to log loudly or quietly.

use thiserror::Error;

/// Failures of [`crate::SnapshotExtractor`].
///
/// Both variants mean "skip publishing this cycle"; neither is fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The host reported no primary player entity (menus, transitions).
    #[error("no primary actor present")]
    NoPrimaryActor,

    /// The host adapter panicked while being queried.
    #[error("host adapter failed during extraction: {0}")]
    HostFault(String),
}

impl ExtractionError {
    /// Returns true for conditions expected during normal play.
    ///
    /// A missing player happens on every menu screen and should not be
    /// logged as a warning.
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::NoPrimaryActor)
    }
}
