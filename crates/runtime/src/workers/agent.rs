//! Agent worker: the external decision loop.
//!
//! Polls the state channel at a fixed period, asks the provider for a
//! command, and publishes it on the action channel. The loop owns every
//! piece of state it threads through a cycle; nothing is shared with the
//! host except the two files.

use std::fmt;
use std::time::{Duration, Instant};

use game_core::ActionCommand;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::{DecisionProvider, Result, RuntimeError};
use crate::channel::{ChannelError, ChannelStats, ChannelWriter, should_log_failure};
use crate::config::RuntimeConfig;
use crate::inbox::{InboxStats, InboxUpdate, StateInbox};
use crate::providers;

/// Repeated idle conditions are logged once per this many polls.
const QUIET_LOG_EVERY: u64 = 100;

/// Totals reported when the worker stops.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentReport {
    pub cycles: u64,
    pub decisions: u64,
    pub inbox: InboxStats,
    pub writes: ChannelStats,
    /// Last decided command; the shutdown neutral does not count.
    pub last_command: Option<ActionCommand>,
    pub neutral_published: bool,
}

impl fmt::Display for AgentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cycles, {} decisions | states read {}, accepted {} | actions written {}",
            self.cycles, self.decisions, self.inbox.reads, self.inbox.accepted, self.writes
        )
    }
}

/// Owner side of a spawned worker.
pub struct AgentHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<AgentReport>,
}

impl AgentHandle {
    /// Signals the worker to stop and waits for its report.
    pub async fn shutdown(self) -> Result<AgentReport> {
        // The worker may already have exited; the join below still reports.
        let _ = self.shutdown.send(true);
        self.task.await.map_err(RuntimeError::WorkerJoin)
    }
}

pub struct AgentWorker {
    inbox: StateInbox,
    writer: ChannelWriter,
    provider: Box<dyn DecisionProvider>,
    shutdown: watch::Receiver<bool>,

    poll_interval: Duration,
    status_interval: Duration,
    verbose: bool,
    log_actions: bool,
    neutral_on_shutdown: bool,

    cycles: u64,
    decisions: u64,
    waiting_polls: u64,
    stale_polls: u64,
    last_command: Option<ActionCommand>,
    window_start: Instant,
    window_cycles: u64,
}

impl AgentWorker {
    pub fn new(
        config: &RuntimeConfig,
        provider: Box<dyn DecisionProvider>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let channel = &config.channel;
        Self {
            inbox: StateInbox::new(&channel.state_path, channel.state_timeout, config.caps),
            writer: ChannelWriter::new(&channel.action_path),
            provider,
            shutdown,
            poll_interval: channel.agent_poll_interval,
            status_interval: config.status_interval,
            verbose: config.verbose,
            log_actions: config.log_actions,
            neutral_on_shutdown: config.neutral_on_shutdown,
            cycles: 0,
            decisions: 0,
            waiting_polls: 0,
            stale_polls: 0,
            last_command: None,
            window_start: Instant::now(),
            window_cycles: 0,
        }
    }

    /// Spawns a worker with the provider selected by `config.mode`.
    pub fn spawn(config: &RuntimeConfig) -> Result<AgentHandle> {
        Self::spawn_with(config, providers::for_mode(config))
    }

    /// Spawns a worker around an explicit provider.
    pub fn spawn_with(
        config: &RuntimeConfig,
        provider: Box<dyn DecisionProvider>,
    ) -> Result<AgentHandle> {
        config.validate()?;
        let (shutdown, shutdown_rx) = watch::channel(false);
        let worker = Self::new(config, provider, shutdown_rx);
        let task = tokio::spawn(worker.run());
        Ok(AgentHandle { shutdown, task })
    }

    /// Main worker loop; returns when shutdown is signalled or the handle
    /// is dropped.
    pub async fn run(mut self) -> AgentReport {
        info!(
            "Agent started in {} mode: state <- {}, actions -> {}, every {:?}",
            self.provider.name(),
            self.inbox.path().display(),
            self.writer.path().display(),
            self.poll_interval
        );

        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.window_start = Instant::now();

        loop {
            tokio::select! {
                _ = ticker.tick() => self.cycle(Instant::now()),
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        self.finish()
    }

    /// One poll-decide-publish pass.
    fn cycle(&mut self, now: Instant) {
        self.cycles += 1;
        self.window_cycles += 1;

        match self.inbox.poll_at(now) {
            Ok(InboxUpdate::Accepted { frame }) => {
                self.stale_polls = 0;
                debug!("Accepted state frame {}", frame);
            }
            Ok(InboxUpdate::Expired { age }) => {
                if self.stale_polls % QUIET_LOG_EVERY == 0 {
                    debug!("State file is stale ({:.1}s old)", age.as_secs_f32());
                }
                self.stale_polls += 1;
            }
            Ok(_) => {}
            Err(err) => {
                if should_log_failure(self.inbox.stats().reads.consecutive_errors) {
                    warn!("State read failed ({}): {}", err.kind(), err);
                }
            }
        }

        let Some(snapshot) = self.inbox.latest() else {
            if self.waiting_polls % QUIET_LOG_EVERY == 0 {
                info!("Waiting for game state...");
            }
            self.waiting_polls += 1;
            self.maybe_log_status(now);
            return;
        };
        if self.waiting_polls > 0 {
            info!("Game state received after {} polls", self.waiting_polls);
            self.waiting_polls = 0;
        }

        let decision = self.provider.decide(Some(snapshot));
        match decision.skipped {
            None => {
                self.decisions += 1;
                self.publish(decision.command);
            }
            Some(reason) => debug!("No decision: {:?}", reason),
        }

        self.maybe_log_status(now);
    }

    fn publish(&mut self, command: ActionCommand) -> bool {
        let result = serde_json::to_string(&command)
            .map_err(|e| ChannelError::Encode(e.to_string()))
            .and_then(|text| self.writer.publish(&text));

        match result {
            Ok(()) => {
                self.last_command = Some(command);
                if self.log_actions {
                    info!("Action {}", command);
                }
                true
            }
            Err(err) => {
                if should_log_failure(self.writer.stats().consecutive_errors) {
                    warn!("Action publish failed ({}): {}", err.kind(), err);
                }
                false
            }
        }
    }

    fn maybe_log_status(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.status_interval {
            return;
        }

        let rate = self.window_cycles as f64 / elapsed.as_secs_f64();
        match self.inbox.latest() {
            Some(snapshot) => info!("{} | loop {:.1}/s", snapshot.summary(), rate),
            None => info!("No game state yet | loop {:.1}/s", rate),
        }
        if self.verbose {
            info!(
                "Read: {} | Write: {}",
                self.inbox.stats().reads,
                self.writer.stats()
            );
        }

        self.window_start = now;
        self.window_cycles = 0;
    }

    fn finish(mut self) -> AgentReport {
        info!("Agent stopping");
        let last_command = self.last_command;

        // A normal publish, not a clear: the host stops moving right away.
        let neutral_published = self.neutral_on_shutdown && self.publish(ActionCommand::NEUTRAL);

        let report = AgentReport {
            cycles: self.cycles,
            decisions: self.decisions,
            inbox: self.inbox.stats(),
            writes: *self.writer.stats(),
            last_command,
            neutral_published,
        };
        info!("Final stats: {}", report);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Decision, NoDecision};
    use crate::config::{AgentMode, ChannelConfig};
    use game_core::{Axis, WorldSnapshot, decode_action};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Always moves right.
    struct Rightward;

    impl DecisionProvider for Rightward {
        fn name(&self) -> &'static str {
            "rightward"
        }

        fn decide(&mut self, snapshot: Option<&WorldSnapshot>) -> Decision {
            match snapshot {
                Some(_) => Decision::new(
                    ActionCommand::NEUTRAL.with_movement((Axis::Positive, Axis::Neutral)),
                ),
                None => Decision::none(NoDecision::NoSnapshot),
            }
        }
    }

    fn config(dir: &Path) -> RuntimeConfig {
        RuntimeConfig {
            channel: ChannelConfig {
                agent_poll_interval: Duration::from_millis(5),
                ..ChannelConfig::in_dir(dir)
            },
            ..RuntimeConfig::default()
        }
    }

    fn state_record(frame: u64) -> String {
        format!(
            r#"{{"frame":{},"timestamp":{},"player":{{"x":10.0,"y":10.0}},"enemies":[],"projectiles":[],"pickups":[]}}"#,
            frame, frame
        )
    }

    async fn wait_for_action(path: &Path) -> ActionCommand {
        for _ in 0..200 {
            if let Ok(text) = fs::read_to_string(path) {
                if let Ok(Some(command)) = decode_action(&text) {
                    return command;
                }
            }
            time::sleep(Duration::from_millis(5)).await;
        }
        panic!("no action published at {}", path.display());
    }

    #[tokio::test]
    async fn publishes_decisions_and_neutral_on_shutdown() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        ChannelWriter::new(&config.channel.state_path)
            .publish(&state_record(1))
            .unwrap();

        let handle = AgentWorker::spawn_with(&config, Box::new(Rightward)).unwrap();
        let command = wait_for_action(&config.channel.action_path).await;
        assert_eq!(command.movement(), (Axis::Positive, Axis::Neutral));

        let report = handle.shutdown().await.unwrap();
        assert!(report.decisions >= 1);
        assert!(report.neutral_published);
        assert_eq!(report.inbox.last_frame, Some(1));
        // The report keeps the last decided command, not the shutdown one.
        assert_eq!(
            report.last_command.map(|c| c.movement()),
            Some((Axis::Positive, Axis::Neutral))
        );

        let text = fs::read_to_string(&config.channel.action_path).unwrap();
        assert_eq!(decode_action(&text).unwrap(), Some(ActionCommand::NEUTRAL));
    }

    #[tokio::test]
    async fn nothing_is_published_without_state() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.neutral_on_shutdown = false;

        let handle = AgentWorker::spawn_with(&config, Box::new(Rightward)).unwrap();
        time::sleep(Duration::from_millis(40)).await;
        let report = handle.shutdown().await.unwrap();

        assert!(report.cycles > 0);
        assert_eq!(report.decisions, 0);
        assert!(!config.channel.action_path.exists());
    }

    #[tokio::test]
    async fn mode_selects_the_provider() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.mode = AgentMode::Random;
        config.seed = Some(3);
        ChannelWriter::new(&config.channel.state_path)
            .publish(&state_record(5))
            .unwrap();

        let handle = AgentWorker::spawn(&config).unwrap();
        wait_for_action(&config.channel.action_path).await;
        let report = handle.shutdown().await.unwrap();
        assert!(report.writes.successes >= 2);
    }

    #[tokio::test]
    async fn invalid_config_is_refused() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.channel.agent_poll_interval = Duration::ZERO;
        assert!(matches!(
            AgentWorker::spawn(&config),
            Err(RuntimeError::InvalidConfig(_))
        ));
    }
}
