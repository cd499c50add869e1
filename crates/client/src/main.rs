//! Learner agent binary.
//!
//! Composition root for the external side of the bridge: loads configuration
//! from `.env` and the environment, installs logging, then runs the agent
//! worker until Ctrl-C.
//!
//! ```bash
//! LEARNER_DIR=/tmp/learner LEARNER_MODE=rules cargo run -p learner-client
//! ```
mod config;
mod logging;

use anyhow::Result;
use runtime::AgentWorker;

use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    logging::setup_logging(config.session_id.as_deref(), config.runtime.verbose)?;

    tracing::info!(
        "Agent starting: mode={}, state={}, action={}",
        config.runtime.mode,
        config.runtime.channel.state_path.display(),
        config.runtime.channel.action_path.display()
    );

    let handle = AgentWorker::spawn(&config.runtime)?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");

    let report = handle.shutdown().await?;
    tracing::info!("Agent stopped: {}", report);
    if let Some(command) = report.last_command {
        tracing::info!("Last command: {}", command);
    }

    Ok(())
}
