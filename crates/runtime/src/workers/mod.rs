//! Worker tasks that back the runtime.
//!
//! The agent worker runs the external decision loop. The host side has no
//! worker: the host drives [`crate::HostBridge`] from its own tick.

mod agent;

pub use agent::{AgentHandle, AgentReport, AgentWorker};
