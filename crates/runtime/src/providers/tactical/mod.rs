//! Rule-based tactical decision engine.
//!
//! Stateless per call: one snapshot in, one command out. Movement and aim
//! are decided independently.
//!
//! 1. **Movement**: a short-circuiting cascade over
//!    [`stages::MOVEMENT_CASCADE`] (dodge, avoid, approach). The first stage
//!    whose direction discretizes to a nonzero pair sets both movement axes;
//!    later stages are not consulted. If none engages, the player holds.
//! 2. **Aim**: the attack stage runs regardless of movement.
//!
//! Directions become tri-state axes through [`game_core::discretize`], the
//! same rule for every stage.

pub mod context;
pub mod stages;
pub mod threat;

use game_core::{ActionCommand, Axis, WorldSnapshot, discretize};

use crate::api::providers::checked;
use crate::api::{Decision, DecisionProvider, Tactic};
use crate::config::EngineConfig;

pub use context::TacticalContext;
pub use stages::MOVEMENT_CASCADE;
pub use threat::Threat;

const HOLD: (Axis, Axis) = (Axis::Neutral, Axis::Neutral);

/// The priority cascade behind [`crate::AgentMode::Rules`].
#[derive(Clone, Debug, Default)]
pub struct TacticalEngine {
    config: EngineConfig,
}

impl TacticalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decides for a snapshot already known to be valid.
    pub fn evaluate(&self, snapshot: &WorldSnapshot) -> Decision {
        let ctx = TacticalContext::new(snapshot, &self.config);
        let epsilon = self.config.epsilon;
        let mut decision = Decision::new(ActionCommand::NEUTRAL);

        for tactic in MOVEMENT_CASCADE {
            let Some(direction) = tactic.direction(&ctx) else {
                continue;
            };
            let movement = discretize(direction, epsilon);
            if movement == HOLD {
                continue;
            }
            decision.command = decision.command.with_movement(movement);
            decision.movement = Some(tactic);
            break;
        }

        if let Some(direction) = Tactic::Attack.direction(&ctx) {
            let aim = discretize(direction, epsilon);
            if aim != HOLD {
                decision.command = decision.command.with_aim(aim);
                decision.attacking = true;
            }
        }

        tracing::trace!(
            "Frame {}: {} (movement: {:?}, attacking: {})",
            snapshot.frame,
            decision.command,
            decision.movement,
            decision.attacking
        );

        decision
    }
}

impl DecisionProvider for TacticalEngine {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn decide(&mut self, snapshot: Option<&WorldSnapshot>) -> Decision {
        match checked(snapshot) {
            Ok(snapshot) => self.evaluate(snapshot),
            Err(reason) => Decision::none(reason),
        }
    }
}
