//! Random valid commands, for exercising the channel end to end.

use game_core::{ActionCommand, Axis, WorldSnapshot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::providers::checked;
use crate::api::{Decision, DecisionProvider};

/// Picks every axis uniformly from {-1, 0, 1}.
#[derive(Debug)]
pub struct RandomProvider {
    rng: StdRng,
}

impl RandomProvider {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn axis(&mut self) -> Axis {
        Axis::ALL[self.rng.gen_range(0..Axis::ALL.len())]
    }
}

impl DecisionProvider for RandomProvider {
    fn name(&self) -> &'static str {
        "random"
    }

    fn decide(&mut self, snapshot: Option<&WorldSnapshot>) -> Decision {
        if let Err(reason) = checked(snapshot) {
            return Decision::none(reason);
        }
        let command = ActionCommand::new(self.axis(), self.axis(), self.axis(), self.axis());
        Decision::new(command)
    }
}
