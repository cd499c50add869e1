//! Polling side of a channel.
//!
//! The reader never clears, truncates or deletes the slot. A record published
//! between two polls is therefore always seen by the next poll, and a
//! republished record with identical content still counts as new.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::{ChannelError, ChannelStats, Result};

/// Tick-count gate bounding how often the host loop touches the file.
///
/// The host tick rate is imposed from outside, so cadence is expressed in
/// ticks rather than sleeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollGate {
    every: u32,
    elapsed: u32,
}

impl PollGate {
    /// `every` of zero is treated as one.
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            elapsed: 0,
        }
    }

    pub fn every(&self) -> u32 {
        self.every
    }

    /// Advances one tick; true on the ticks that may perform I/O.
    pub fn tick(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.every {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }
}

/// Result of one poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A record published since the previous successful read.
    Updated(String),
    /// The slot has not been replaced since the previous read.
    Unchanged,
    /// Nothing has been published yet.
    Missing,
    /// The slot is older than the configured maximum age.
    Expired { age: Duration },
}

/// Identity of one published record.
///
/// Every publish renames a fresh file into place, so a change in any of
/// these means a new record even when the content is byte-identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
    #[cfg(unix)]
    inode: u64,
}

impl Fingerprint {
    fn of(meta: &Metadata) -> Self {
        Self {
            modified: meta.modified().ok(),
            len: meta.len(),
            #[cfg(unix)]
            inode: std::os::unix::fs::MetadataExt::ino(meta),
        }
    }
}

/// Reads the slot when, and only when, it has been replaced.
#[derive(Debug)]
pub struct ChannelReader {
    path: PathBuf,
    max_age: Option<Duration>,
    last_seen: Option<Fingerprint>,
    stats: ChannelStats,
}

impl ChannelReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_age: None,
            last_seen: None,
            stats: ChannelStats::default(),
        }
    }

    /// Ignore records whose modification time is older than `max_age`.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }

    /// Mutable access for consumers that count their own decode failures
    /// against this endpoint.
    pub fn stats_mut(&mut self) -> &mut ChannelStats {
        &mut self.stats
    }

    /// Reads the slot if it changed since the last successful read.
    ///
    /// A failed read leaves the change marker untouched so the next poll
    /// retries. Expired records are not marked as seen either: if the
    /// producer comes back with a fresh publish, it is picked up.
    pub fn poll(&mut self) -> Result<ReadOutcome> {
        let meta = match fs::metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ReadOutcome::Missing),
            Err(e) => return Err(self.fail(ChannelError::io(&self.path, e))),
        };

        let fingerprint = Fingerprint::of(&meta);
        if self.last_seen == Some(fingerprint) {
            return Ok(ReadOutcome::Unchanged);
        }

        if let (Some(max_age), Some(modified)) = (self.max_age, fingerprint.modified) {
            let age = SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO);
            if age > max_age {
                return Ok(ReadOutcome::Expired { age });
            }
        }

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            // Replaced between stat and open; the next poll sees the new one.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ReadOutcome::Missing),
            Err(e) => return Err(self.fail(ChannelError::io(&self.path, e))),
        };

        self.last_seen = Some(fingerprint);
        self.stats.record_success();
        tracing::trace!("Read {} bytes from {}", text.len(), self.path.display());

        Ok(ReadOutcome::Updated(text))
    }

    fn fail(&mut self, err: ChannelError) -> ChannelError {
        self.stats.record_error(err.kind());
        err
    }
}
