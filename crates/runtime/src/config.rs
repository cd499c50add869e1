//! Runtime configuration.
//!
//! Plain values with defaults; the binary fills them from the environment.

use std::path::PathBuf;
use std::time::Duration;

use game_core::{EncodeOptions, EntityCaps};
use strum::{Display, EnumString};

use crate::api::{Result, RuntimeError};

/// Which decision provider the agent runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AgentMode {
    /// Uniformly random valid commands.
    Random,
    /// The tactical decision engine.
    #[default]
    Rules,
}

/// File locations and cadence of both channel directions.
#[derive(Clone, Debug)]
pub struct ChannelConfig {
    pub state_path: PathBuf,
    pub action_path: PathBuf,
    /// Host ticks between state publishes.
    pub state_publish_every: u32,
    /// Host ticks between action polls.
    pub action_poll_every: u32,
    /// Agent loop period.
    pub agent_poll_interval: Duration,
    /// State records older than this are ignored by the agent.
    pub state_timeout: Duration,
    /// Command age beyond which the host flags staleness.
    pub staleness_threshold: Duration,
    /// Action records older than this are never ingested by the host.
    pub action_max_age: Duration,
}

impl ChannelConfig {
    pub const DEFAULT_STATE_FILE: &'static str = "state.json";
    pub const DEFAULT_ACTION_FILE: &'static str = "action.json";

    /// Both files under one directory with default names.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            state_path: dir.join(Self::DEFAULT_STATE_FILE),
            action_path: dir.join(Self::DEFAULT_ACTION_FILE),
            ..Self::default()
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(Self::DEFAULT_STATE_FILE),
            action_path: PathBuf::from(Self::DEFAULT_ACTION_FILE),
            state_publish_every: 2,
            action_poll_every: 2,
            agent_poll_interval: Duration::from_millis(16),
            state_timeout: Duration::from_secs(5),
            staleness_threshold: Duration::from_secs(1),
            action_max_age: Duration::from_secs(5),
        }
    }
}

/// Thresholds of the tactical decision engine, in host distance units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Hostile projectiles within this distance are dodge candidates.
    pub dodge_distance: f32,
    /// Enemies within this distance push the player away.
    pub avoid_distance: f32,
    /// Enemies within this distance are shot at.
    pub attack_range: f32,
    /// Beyond attack range but within this distance, the player closes in.
    pub approach_range: f32,
    /// Projectiles further than this many frames from impact are ignored.
    pub max_time_to_impact: f32,
    /// Lead offset is `velocity * distance / lead_divisor`.
    pub lead_divisor: f32,
    /// Below this speed an enemy is treated as stationary.
    pub min_lead_speed: f32,
    /// Below this speed a projectile is not a threat.
    pub min_projectile_speed: f32,
    /// Directions at or below this magnitude discretize to zero.
    pub epsilon: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dodge_distance: 100.0,
            avoid_distance: 50.0,
            attack_range: 300.0,
            approach_range: 400.0,
            max_time_to_impact: 45.0,
            lead_divisor: 200.0,
            min_lead_speed: 0.1,
            min_projectile_speed: 0.1,
            epsilon: 1e-3,
        }
    }
}

/// Everything the host bridge and the agent worker need.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub channel: ChannelConfig,
    pub engine: EngineConfig,
    pub caps: EntityCaps,
    pub encode: EncodeOptions,
    pub mode: AgentMode,
    /// Seed for the random provider; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub verbose: bool,
    /// Log every published command at info level.
    pub log_actions: bool,
    /// Publish an all-zero command when the agent stops.
    pub neutral_on_shutdown: bool,
    /// Period of the agent's status line.
    pub status_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            channel: ChannelConfig::default(),
            engine: EngineConfig::default(),
            caps: EntityCaps::default(),
            encode: EncodeOptions::default(),
            mode: AgentMode::default(),
            seed: None,
            verbose: false,
            log_actions: false,
            neutral_on_shutdown: true,
            status_interval: Duration::from_secs(5),
        }
    }
}

impl RuntimeConfig {
    /// Rejects combinations the bridge or the worker cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| -> Result<()> { Err(RuntimeError::InvalidConfig(msg.to_string())) };

        if self.channel.state_path == self.channel.action_path {
            return invalid("state and action channels must use different files");
        }
        if self.channel.agent_poll_interval.is_zero() {
            return invalid("agent poll interval must be positive");
        }
        if self.channel.action_max_age.is_zero() {
            return invalid("action max age must be positive");
        }
        if self.status_interval.is_zero() {
            return invalid("status interval must be positive");
        }

        let e = &self.engine;
        let distances = [
            e.dodge_distance,
            e.avoid_distance,
            e.attack_range,
            e.approach_range,
            e.max_time_to_impact,
        ];
        if distances.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return invalid("engine distances must be finite and non-negative");
        }
        if !(e.lead_divisor.is_finite() && e.lead_divisor > 0.0) {
            return invalid("lead divisor must be positive");
        }
        if !(e.epsilon.is_finite() && e.epsilon >= 0.0) {
            return invalid("epsilon must be finite and non-negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!(AgentMode::from_str("rules").unwrap(), AgentMode::Rules);
        assert_eq!(AgentMode::from_str("RANDOM").unwrap(), AgentMode::Random);
        assert!(AgentMode::from_str("train").is_err());
        assert_eq!(AgentMode::Rules.to_string(), "rules");
    }

    #[test]
    fn channel_paths_share_a_directory() {
        let channel = ChannelConfig::in_dir("/tmp/learner");
        assert_eq!(channel.state_path, PathBuf::from("/tmp/learner/state.json"));
        assert_eq!(channel.action_path, PathBuf::from("/tmp/learner/action.json"));
        assert_eq!(channel.state_publish_every, 2);
    }

    #[test]
    fn defaults_validate() {
        assert!(RuntimeConfig::default().validate().is_ok());
    }

    #[test]
    fn shared_file_and_zero_interval_are_rejected() {
        let mut config = RuntimeConfig::default();
        config.channel.action_path = config.channel.state_path.clone();
        assert!(matches!(
            config.validate(),
            Err(RuntimeError::InvalidConfig(_))
        ));

        let mut config = RuntimeConfig::default();
        config.channel.agent_poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = RuntimeConfig::default();
        config.engine.lead_divisor = 0.0;
        assert!(config.validate().is_err());

        let mut config = RuntimeConfig::default();
        config.channel.action_max_age = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn engine_ranges_are_ordered() {
        let engine = EngineConfig::default();
        assert!(engine.avoid_distance < engine.dodge_distance);
        assert!(engine.dodge_distance < engine.attack_range);
        assert!(engine.attack_range < engine.approach_range);
    }
}
