//! Public runtime API surface.
//!
//! The types consumers of the runtime crate interact with: the decision
//! provider seam and the crate-level error.

pub mod errors;
pub mod providers;

pub use errors::{Result, RuntimeError};
pub use providers::{Decision, DecisionProvider, NoDecision, Tactic};
