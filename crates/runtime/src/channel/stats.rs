//! Per-endpoint counters and log throttling.

use std::fmt;

use super::ErrorKind;

/// Number of consecutive failures always logged before throttling kicks in.
const LOUD_FAILURES: u64 = 3;
/// After the first few, every Nth consecutive failure is logged.
const FAILURE_LOG_EVERY: u64 = 100;

/// Success and failure counters of one reader or writer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelStats {
    pub successes: u64,
    pub total_errors: u64,
    pub consecutive_errors: u64,
    pub last_error: Option<ErrorKind>,
}

impl ChannelStats {
    pub fn record_success(&mut self) {
        self.successes += 1;
        self.consecutive_errors = 0;
    }

    /// Counts a failure and reports whether it deserves a log line.
    pub fn record_error(&mut self, kind: ErrorKind) -> bool {
        self.total_errors += 1;
        self.consecutive_errors += 1;
        self.last_error = Some(kind);
        should_log_failure(self.consecutive_errors)
    }
}

impl fmt::Display for ChannelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ok ({} errors)", self.successes, self.total_errors)
    }
}

/// First few failures of a streak, then one in every hundred.
pub fn should_log_failure(consecutive: u64) -> bool {
    consecutive <= LOUD_FAILURES || consecutive % FAILURE_LOG_EVERY == 0
}
