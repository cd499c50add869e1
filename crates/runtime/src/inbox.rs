//! Agent-side state inbox.
//!
//! Wraps the state channel reader with what the agent needs on top of raw
//! change detection: decoding, validation, frame ordering and caps. The last
//! accepted snapshot stays available however many polls fail after it.

use std::path::Path;
use std::time::{Duration, Instant};

use game_core::{EntityCaps, WorldSnapshot, decode_snapshot};

use crate::channel::{ChannelError, ChannelReader, ChannelStats, ReadOutcome, Result};

/// What one poll did to the inbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InboxUpdate {
    /// A newer snapshot replaced the held one.
    Accepted { frame: u64 },
    /// A record was read but is not newer than the held snapshot.
    Ignored { frame: u64 },
    Unchanged,
    /// The producer has not published yet.
    Missing,
    /// The record is older than the state timeout.
    Expired { age: Duration },
}

/// Counters for status lines and the final summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InboxStats {
    pub reads: ChannelStats,
    pub accepted: u64,
    pub ignored: u64,
    pub last_frame: Option<u64>,
}

impl InboxStats {
    pub fn has_state(&self) -> bool {
        self.last_frame.is_some()
    }
}

#[derive(Debug)]
pub struct StateInbox {
    reader: ChannelReader,
    caps: EntityCaps,
    latest: Option<WorldSnapshot>,
    received_at: Option<Instant>,
    accepted: u64,
    ignored: u64,
}

impl StateInbox {
    pub fn new(path: impl AsRef<Path>, state_timeout: Duration, caps: EntityCaps) -> Self {
        Self {
            reader: ChannelReader::new(path).with_max_age(state_timeout),
            caps,
            latest: None,
            received_at: None,
            accepted: 0,
            ignored: 0,
        }
    }

    pub fn path(&self) -> &Path {
        self.reader.path()
    }

    pub fn latest(&self) -> Option<&WorldSnapshot> {
        self.latest.as_ref()
    }

    /// Time since the last accepted snapshot.
    pub fn age(&self, now: Instant) -> Option<Duration> {
        self.received_at
            .map(|at| now.saturating_duration_since(at))
    }

    pub fn stats(&self) -> InboxStats {
        InboxStats {
            reads: *self.reader.stats(),
            accepted: self.accepted,
            ignored: self.ignored,
            last_frame: self.latest.as_ref().map(|s| s.frame),
        }
    }

    pub fn poll(&mut self) -> Result<InboxUpdate> {
        self.poll_at(Instant::now())
    }

    /// Reads the slot and accepts the record if it is newer.
    ///
    /// Decode and validation failures are counted against the read side and
    /// returned; the held snapshot is untouched.
    pub fn poll_at(&mut self, now: Instant) -> Result<InboxUpdate> {
        let text = match self.reader.poll()? {
            ReadOutcome::Updated(text) => text,
            ReadOutcome::Unchanged => return Ok(InboxUpdate::Unchanged),
            ReadOutcome::Missing => return Ok(InboxUpdate::Missing),
            ReadOutcome::Expired { age } => return Ok(InboxUpdate::Expired { age }),
        };

        let mut snapshot = match self.decode(&text) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return Ok(InboxUpdate::Unchanged),
            Err(err) => {
                self.reader.stats_mut().record_error(err.kind());
                return Err(err);
            }
        };

        let frame = snapshot.frame;
        if !self.is_newer(&snapshot) {
            self.ignored += 1;
            return Ok(InboxUpdate::Ignored { frame });
        }

        snapshot.truncate_to(&self.caps);
        self.latest = Some(snapshot);
        self.received_at = Some(now);
        self.accepted += 1;

        Ok(InboxUpdate::Accepted { frame })
    }

    fn decode(&self, text: &str) -> Result<Option<WorldSnapshot>> {
        let Some(snapshot) = decode_snapshot(text)? else {
            return Ok(None);
        };
        snapshot.validate().map_err(ChannelError::from)?;
        Ok(Some(snapshot))
    }

    /// A later frame, or a later host clock with a reset frame counter.
    fn is_newer(&self, candidate: &WorldSnapshot) -> bool {
        match &self.latest {
            None => true,
            Some(held) => candidate.frame > held.frame || candidate.timestamp > held.timestamp,
        }
    }
}
