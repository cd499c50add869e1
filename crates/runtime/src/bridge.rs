//! Host-side composition of extractor, channel and applicator.
//!
//! The host calls [`HostBridge::on_tick`] once per game tick and
//! [`HostBridge::query`] whenever it asks for button state. Tick work is
//! bounded: file I/O happens only on gated ticks, and each step runs inside
//! a fault boundary so neither an error nor a panic in the host adapter can
//! escape into the host's tick.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use game_core::{
    ActionApplicator, ActionCommand, ActorIndex, EncodeOptions, ExtractionError, HostWorld,
    InputResponse, LogicalButton, SnapshotExtractor, WorldSnapshot, decode_action, encode_with,
};

use crate::api::Result;
use crate::channel::{
    ChannelError, ChannelReader, ChannelWriter, PollGate, ReadOutcome, should_log_failure,
};
use crate::config::RuntimeConfig;

/// Counters over the bridge's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub ticks: u64,
    pub states_published: u64,
    /// Publishing ticks skipped because there was no player.
    pub no_player_skips: u64,
    pub extraction_faults: u64,
    pub commands_ingested: u64,
    pub commands_rejected: u64,
    /// Action polls that found only a record older than the max age.
    pub expired_actions: u64,
    /// Steps aborted by a panic outside extraction.
    pub step_panics: u64,
}

pub struct HostBridge {
    extractor: SnapshotExtractor,
    encode: EncodeOptions,
    state_writer: ChannelWriter,
    action_reader: ChannelReader,
    publish_gate: PollGate,
    poll_gate: PollGate,
    applicator: ActionApplicator,
    staleness_threshold: Duration,
    rejected_streak: u64,
    stats: BridgeStats,
}

impl HostBridge {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        config.validate()?;
        let channel = &config.channel;

        tracing::info!(
            "Host bridge: state -> {} every {} ticks, actions <- {} every {} ticks",
            channel.state_path.display(),
            channel.state_publish_every,
            channel.action_path.display(),
            channel.action_poll_every
        );

        Ok(Self {
            extractor: SnapshotExtractor::new(config.caps),
            encode: config.encode,
            state_writer: ChannelWriter::new(&channel.state_path),
            action_reader: ChannelReader::new(&channel.action_path)
                .with_max_age(channel.action_max_age),
            publish_gate: PollGate::new(channel.state_publish_every),
            poll_gate: PollGate::new(channel.action_poll_every),
            applicator: ActionApplicator::new(ActorIndex::PRIMARY),
            staleness_threshold: channel.staleness_threshold,
            rejected_streak: 0,
            stats: BridgeStats::default(),
        })
    }

    pub fn on_tick<W>(&mut self, world: &W)
    where
        W: HostWorld + ?Sized,
    {
        self.on_tick_at(world, Instant::now());
    }

    /// One host tick with an explicit clock reading.
    pub fn on_tick_at<W>(&mut self, world: &W, now: Instant)
    where
        W: HostWorld + ?Sized,
    {
        self.stats.ticks += 1;

        if self.publish_gate.tick() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.publish_state(world)));
            self.note_panic("state publish", outcome);
        }
        if self.poll_gate.tick() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.poll_action(now)));
            self.note_panic("action poll", outcome);
        }
    }

    /// Button state for the host's input callback.
    pub fn query(&self, actor: ActorIndex, button: LogicalButton) -> InputResponse {
        self.applicator.query(actor, button)
    }

    pub fn current_command(&self) -> ActionCommand {
        self.applicator.current()
    }

    pub fn command_age(&self) -> Option<Duration> {
        self.applicator.age(Instant::now())
    }

    /// True when no command arrived within the staleness threshold. The
    /// held command stays in effect either way.
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Instant::now())
    }

    pub fn is_stale_at(&self, now: Instant) -> bool {
        self.applicator.is_stale(now, self.staleness_threshold)
    }

    pub fn applicator(&self) -> &ActionApplicator {
        &self.applicator
    }

    pub fn stats(&self) -> &BridgeStats {
        &self.stats
    }

    fn publish_state<W>(&mut self, world: &W)
    where
        W: HostWorld + ?Sized,
    {
        let snapshot = match self.extract(world) {
            Ok(snapshot) => snapshot,
            Err(err) if err.is_expected() => {
                self.stats.no_player_skips += 1;
                tracing::trace!("Skipping state publish: {}", err);
                return;
            }
            Err(err) => {
                self.stats.extraction_faults += 1;
                if should_log_failure(self.stats.extraction_faults) {
                    tracing::warn!("Snapshot extraction failed: {}", err);
                }
                return;
            }
        };

        let text = encode_with(&snapshot.to_value(), self.encode);
        match self.state_writer.publish(&text) {
            Ok(()) => self.stats.states_published += 1,
            Err(err) => {
                if should_log_failure(self.state_writer.stats().consecutive_errors) {
                    tracing::warn!("State publish failed ({}): {}", err.kind(), err);
                }
            }
        }
    }

    /// Extraction with the host adapter behind its own panic boundary.
    fn extract<W>(&self, world: &W) -> std::result::Result<WorldSnapshot, ExtractionError>
    where
        W: HostWorld + ?Sized,
    {
        panic::catch_unwind(AssertUnwindSafe(|| self.extractor.extract(world)))
            .unwrap_or_else(|payload| Err(ExtractionError::HostFault(panic_message(&*payload))))
    }

    fn poll_action(&mut self, now: Instant) {
        let text = match self.action_reader.poll() {
            Ok(ReadOutcome::Updated(text)) => text,
            Ok(ReadOutcome::Expired { age }) => {
                self.stats.expired_actions += 1;
                if should_log_failure(self.stats.expired_actions) {
                    tracing::debug!("Ignoring action record {:.1}s old", age.as_secs_f32());
                }
                return;
            }
            Ok(_) => return,
            Err(err) => {
                if should_log_failure(self.action_reader.stats().consecutive_errors) {
                    tracing::warn!("Action poll failed: {}", err);
                }
                return;
            }
        };

        match decode_action(&text) {
            Ok(Some(command)) => {
                self.applicator.ingest(command, now);
                self.stats.commands_ingested += 1;
                self.rejected_streak = 0;
                tracing::trace!("Ingested {}", command);
            }
            Ok(None) => {}
            Err(err) => {
                let err = ChannelError::from(err);
                self.action_reader.stats_mut().record_error(err.kind());
                self.stats.commands_rejected += 1;
                self.rejected_streak += 1;
                if should_log_failure(self.rejected_streak) {
                    tracing::warn!(
                        "Rejected action record ({}): {}; keeping {}",
                        err.kind(),
                        err,
                        self.applicator.current()
                    );
                }
            }
        }
    }

    fn note_panic(&mut self, step: &str, outcome: std::thread::Result<()>) {
        if let Err(payload) = outcome {
            self.stats.step_panics += 1;
            tracing::error!("{} panicked: {}", step, panic_message(&*payload));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
