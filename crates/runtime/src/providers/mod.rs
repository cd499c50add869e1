//! Decision provider implementations.

pub mod random;
pub mod tactical;

pub use random::RandomProvider;
pub use tactical::TacticalEngine;

use crate::api::DecisionProvider;
use crate::config::{AgentMode, RuntimeConfig};

/// Builds the provider selected by `config.mode`.
pub fn for_mode(config: &RuntimeConfig) -> Box<dyn DecisionProvider> {
    match config.mode {
        AgentMode::Rules => Box::new(TacticalEngine::new(config.engine)),
        AgentMode::Random => Box::new(match config.seed {
            Some(seed) => RandomProvider::seeded(seed),
            None => RandomProvider::from_entropy(),
        }),
    }
}
