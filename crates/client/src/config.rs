//! Agent configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use game_core::EntityCaps;
use runtime::{AgentMode, ChannelConfig, RuntimeConfig};

/// Configuration required to run the agent binary.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub runtime: RuntimeConfig,
    /// Log session directory name; generated from the clock when unset.
    pub session_id: Option<String>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `LEARNER_DIR` - Directory holding both channel files (default: cwd)
    /// - `LEARNER_STATE_FILE` - State channel path, overrides `LEARNER_DIR`
    /// - `LEARNER_ACTION_FILE` - Action channel path, overrides `LEARNER_DIR`
    /// - `LEARNER_MODE` - `rules` or `random` (default: rules)
    /// - `LEARNER_SEED` - Seed for the random mode
    /// - `LEARNER_POLL_MS` - Agent loop period (default: 16)
    /// - `LEARNER_STATE_TIMEOUT_MS` - Ignore older state files (default: 5000)
    /// - `LEARNER_VERBOSE` - Debug logging (default: false)
    /// - `LEARNER_LOG_ACTIONS` - Log every published command (default: false)
    /// - `LEARNER_NEUTRAL_ON_SHUTDOWN` - Publish a zero command on exit (default: true)
    /// - `LEARNER_DODGE_DISTANCE`, `LEARNER_AVOID_DISTANCE`,
    ///   `LEARNER_ATTACK_RANGE`, `LEARNER_APPROACH_RANGE` - Engine thresholds
    /// - `LEARNER_MAX_ENEMIES`, `LEARNER_MAX_PROJECTILES`, `LEARNER_MAX_PICKUPS` - List caps
    /// - `LEARNER_SESSION_ID` - Log session name
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = Reader(lookup);
        let mut config = Self::default();
        let runtime = &mut config.runtime;

        // Channel files
        if let Some(dir) = read.raw("LEARNER_DIR") {
            runtime.channel = ChannelConfig::in_dir(dir);
        }
        if let Some(path) = read.raw("LEARNER_STATE_FILE") {
            runtime.channel.state_path = PathBuf::from(path);
        }
        if let Some(path) = read.raw("LEARNER_ACTION_FILE") {
            runtime.channel.action_path = PathBuf::from(path);
        }
        if let Some(ms) = read.parse::<u64>("LEARNER_POLL_MS") {
            runtime.channel.agent_poll_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read.parse::<u64>("LEARNER_STATE_TIMEOUT_MS") {
            runtime.channel.state_timeout = Duration::from_millis(ms);
        }

        // Provider
        if let Some(mode) = read.parse::<AgentMode>("LEARNER_MODE") {
            runtime.mode = mode;
        }
        runtime.seed = read.parse("LEARNER_SEED");

        // Toggles
        if let Some(verbose) = read.flag("LEARNER_VERBOSE") {
            runtime.verbose = verbose;
        }
        if let Some(log_actions) = read.flag("LEARNER_LOG_ACTIONS") {
            runtime.log_actions = log_actions;
        }
        if let Some(neutral) = read.flag("LEARNER_NEUTRAL_ON_SHUTDOWN") {
            runtime.neutral_on_shutdown = neutral;
        }

        // Engine thresholds
        let engine = &mut runtime.engine;
        for (key, slot) in [
            ("LEARNER_DODGE_DISTANCE", &mut engine.dodge_distance),
            ("LEARNER_AVOID_DISTANCE", &mut engine.avoid_distance),
            ("LEARNER_ATTACK_RANGE", &mut engine.attack_range),
            ("LEARNER_APPROACH_RANGE", &mut engine.approach_range),
        ] {
            if let Some(value) = read.parse::<f32>(key) {
                *slot = value;
            }
        }

        let defaults = EntityCaps::default();
        runtime.caps = EntityCaps::new(
            read.parse("LEARNER_MAX_ENEMIES").unwrap_or(defaults.enemies),
            read.parse("LEARNER_MAX_PROJECTILES")
                .unwrap_or(defaults.projectiles),
            read.parse("LEARNER_MAX_PICKUPS").unwrap_or(defaults.pickups),
        );

        config.session_id = read.raw("LEARNER_SESSION_ID");

        config
    }
}

struct Reader<F>(F);

impl<F> Reader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn raw(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn parse<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.raw(key)?.trim().parse().ok()
    }

    /// Accepts `true/false` and `1/0`; setting the variable without a value
    /// is not enough.
    fn flag(&self, key: &str) -> Option<bool> {
        match self.raw(key)?.trim() {
            "1" => Some(true),
            "0" => Some(false),
            other => other.to_ascii_lowercase().parse().ok(),
        }
    }
}
