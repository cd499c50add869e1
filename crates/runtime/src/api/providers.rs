//! Abstraction for turning a snapshot into a command.
//!
//! The agent worker plugs in a [`DecisionProvider`] chosen by
//! [`crate::AgentMode`], so the loop is the same whether commands come from
//! the tactical engine, random play, or a test fixture.

use game_core::{ActionCommand, ValidationError, WorldSnapshot};
use strum::{Display, EnumIter, IntoStaticStr};

/// Stages of the tactical cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Tactic {
    Dodge,
    Avoid,
    Attack,
    Approach,
}

/// Why a provider produced no decision.
#[derive(Clone, Debug, PartialEq)]
pub enum NoDecision {
    /// No snapshot has been received yet.
    NoSnapshot,
    /// The snapshot failed validation.
    InvalidSnapshot(ValidationError),
}

/// One provider output: the command plus what produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub command: ActionCommand,
    /// The stage that set the movement axes, if any.
    pub movement: Option<Tactic>,
    /// True when the aim axes were set by the attack stage.
    pub attacking: bool,
    /// Set when the command is the all-zero fallback.
    pub skipped: Option<NoDecision>,
}

impl Decision {
    pub fn new(command: ActionCommand) -> Self {
        Self {
            command,
            movement: None,
            attacking: false,
            skipped: None,
        }
    }

    /// The all-zero command, flagged as no decision.
    pub fn none(reason: NoDecision) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::new(ActionCommand::NEUTRAL)
        }
    }

    pub fn is_decided(&self) -> bool {
        self.skipped.is_none()
    }
}

/// Trait for deciding one command per agent cycle.
///
/// Implementations must not panic on any snapshot content; an absent or
/// invalid snapshot yields [`Decision::none`].
pub trait DecisionProvider: Send {
    fn name(&self) -> &'static str;

    fn decide(&mut self, snapshot: Option<&WorldSnapshot>) -> Decision;
}

/// Resolves the snapshot every provider needs: present and valid.
pub(crate) fn checked(snapshot: Option<&WorldSnapshot>) -> Result<&WorldSnapshot, NoDecision> {
    let snapshot = snapshot.ok_or(NoDecision::NoSnapshot)?;
    snapshot.validate().map_err(NoDecision::InvalidSnapshot)?;
    Ok(snapshot)
}
