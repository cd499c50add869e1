//! Runtime side of the state/action bridge.
//!
//! This crate owns everything that touches files or clocks. The host embeds
//! [`HostBridge`] and drives it from its tick; the external agent runs
//! [`AgentWorker`] as a tokio task. The two sides share nothing but the two
//! channel files.
//!
//! Modules are organized by responsibility:
//! - [`channel`] single-slot file channel with atomic publish
//! - [`bridge`] host-side tick composition with a fault boundary
//! - [`inbox`] agent-side state intake with frame ordering
//! - [`providers`] the tactical engine and the random provider
//! - [`api`] the provider seam and the crate error
//! - [`config`] runtime configuration and defaults
pub mod api;
pub mod bridge;
pub mod channel;
pub mod config;
pub mod inbox;
pub mod providers;

mod workers;

pub use api::{Decision, DecisionProvider, NoDecision, Result, RuntimeError, Tactic};
pub use bridge::{BridgeStats, HostBridge};
pub use channel::{
    ChannelError, ChannelReader, ChannelStats, ChannelWriter, ErrorKind, PollGate, ReadOutcome,
};
pub use config::{AgentMode, ChannelConfig, EngineConfig, RuntimeConfig};
pub use inbox::{InboxStats, InboxUpdate, StateInbox};
pub use providers::{RandomProvider, TacticalEngine};
pub use workers::{AgentHandle, AgentReport, AgentWorker};
