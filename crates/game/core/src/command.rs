//! The discrete movement/aim decision exchanged every cycle.
//!
//! An [`ActionCommand`] is four tri-state axes. The typed [`Axis`] makes an
//! out-of-set value unrepresentable once a command exists; the only place a
//! raw integer becomes a command is [`ActionCommand::from_components`], which
//! rejects the whole record if any one component is out of range.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::Vec2;

/// Well-formed input carrying out-of-domain values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} = {value} is outside {{-1, 0, 1}}")]
    AxisOutOfRange { field: &'static str, value: i64 },

    #[error("snapshot is structurally invalid: {0}")]
    InvalidSnapshot(&'static str),
}

/// One tri-state axis value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Axis {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Negative, Axis::Neutral, Axis::Positive];

    /// Signed integer form used on the wire.
    pub const fn as_i8(self) -> i8 {
        match self {
            Axis::Negative => -1,
            Axis::Neutral => 0,
            Axis::Positive => 1,
        }
    }

    /// Rounds one component of a unit vector to the nearest tri-state value.
    ///
    /// Components of magnitude 0.5 and above round away from zero, so a unit
    /// vector always yields at least one nonzero axis.
    pub fn from_unit_component(component: f32) -> Self {
        let rounded = component.round();
        if rounded >= 1.0 {
            Axis::Positive
        } else if rounded <= -1.0 {
            Axis::Negative
        } else {
            Axis::Neutral
        }
    }

    pub const fn is_neutral(self) -> bool {
        matches!(self, Axis::Neutral)
    }
}

impl TryFrom<i64> for Axis {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Axis::Negative),
            0 => Ok(Axis::Neutral),
            1 => Ok(Axis::Positive),
            other => Err(other),
        }
    }
}

impl From<Axis> for i64 {
    fn from(axis: Axis) -> Self {
        axis.as_i8() as i64
    }
}

/// Movement and aim decision for one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ActionCommand {
    pub move_x: Axis,
    pub move_y: Axis,
    pub shoot_x: Axis,
    pub shoot_y: Axis,
}

impl ActionCommand {
    /// Wire field names in record order.
    pub const FIELDS: [&'static str; 4] = ["move_x", "move_y", "shoot_x", "shoot_y"];

    /// The do-nothing command.
    pub const NEUTRAL: Self = Self {
        move_x: Axis::Neutral,
        move_y: Axis::Neutral,
        shoot_x: Axis::Neutral,
        shoot_y: Axis::Neutral,
    };

    pub const fn new(move_x: Axis, move_y: Axis, shoot_x: Axis, shoot_y: Axis) -> Self {
        Self {
            move_x,
            move_y,
            shoot_x,
            shoot_y,
        }
    }

    /// Builds a command from raw wire integers, in [`Self::FIELDS`] order.
    ///
    /// Rejects the record wholesale if any component is outside {-1, 0, 1}.
    pub fn from_components(raw: [i64; 4]) -> Result<Self, ValidationError> {
        let mut axes = [Axis::Neutral; 4];
        for (slot, (field, value)) in axes.iter_mut().zip(Self::FIELDS.into_iter().zip(raw)) {
            *slot = Axis::try_from(value)
                .map_err(|value| ValidationError::AxisOutOfRange { field, value })?;
        }
        Ok(Self::new(axes[0], axes[1], axes[2], axes[3]))
    }

    /// Same command with the movement axes replaced.
    #[must_use]
    pub const fn with_movement(mut self, (x, y): (Axis, Axis)) -> Self {
        self.move_x = x;
        self.move_y = y;
        self
    }

    /// Same command with the aim axes replaced.
    #[must_use]
    pub const fn with_aim(mut self, (x, y): (Axis, Axis)) -> Self {
        self.shoot_x = x;
        self.shoot_y = y;
        self
    }

    pub const fn movement(&self) -> (Axis, Axis) {
        (self.move_x, self.move_y)
    }

    pub const fn aim(&self) -> (Axis, Axis) {
        (self.shoot_x, self.shoot_y)
    }

    /// Raw components in [`Self::FIELDS`] order.
    pub const fn components(&self) -> [i8; 4] {
        [
            self.move_x.as_i8(),
            self.move_y.as_i8(),
            self.shoot_x.as_i8(),
            self.shoot_y.as_i8(),
        ]
    }

    pub const fn is_neutral(&self) -> bool {
        self.move_x.is_neutral()
            && self.move_y.is_neutral()
            && self.shoot_x.is_neutral()
            && self.shoot_y.is_neutral()
    }
}

/// Converts a continuous direction into a tri-state axis pair.
///
/// The vector is normalized, then each component is rounded independently:
/// when both round to nonzero the pair is diagonal. A vector whose magnitude
/// is at or below `epsilon` yields the neutral pair instead of amplifying
/// noise.
pub fn discretize(direction: Vec2, epsilon: f32) -> (Axis, Axis) {
    match direction.normalized_or_none(epsilon) {
        Some(unit) => (
            Axis::from_unit_component(unit.x),
            Axis::from_unit_component(unit.y),
        ),
        None => (Axis::Neutral, Axis::Neutral),
    }
}

impl fmt::Display for ActionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [mx, my, sx, sy] = self.components();
        write!(f, "M:[{},{}] S:[{},{}]", mx, my, sx, sy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_set_component_rejects_whole_record() {
        let err = ActionCommand::from_components([2, 0, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::AxisOutOfRange {
                field: "move_x",
                value: 2
            }
        );

        let err = ActionCommand::from_components([0, 0, 0, -7]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::AxisOutOfRange {
                field: "shoot_y",
                ..
            }
        ));
    }

    #[test]
    fn in_set_components_are_accepted() {
        let cmd = ActionCommand::from_components([1, -1, 0, 1]).unwrap();
        assert_eq!(cmd.movement(), (Axis::Positive, Axis::Negative));
        assert_eq!(cmd.aim(), (Axis::Neutral, Axis::Positive));
        assert_eq!(cmd.components(), [1, -1, 0, 1]);
    }

    #[test]
    fn display_is_compact() {
        let cmd = ActionCommand::from_components([1, 0, -1, 0]).unwrap();
        assert_eq!(cmd.to_string(), "M:[1,0] S:[-1,0]");
    }

    #[test]
    fn serde_uses_signed_integers() {
        let cmd = ActionCommand::from_components([-1, 0, 1, 0]).unwrap();
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"move_x":-1,"move_y":0,"shoot_x":1,"shoot_y":0}"#);

        let bad: Result<ActionCommand, _> =
            serde_json::from_str(r#"{"move_x":3,"move_y":0,"shoot_x":1,"shoot_y":0}"#);
        assert!(bad.is_err());
    }

    // Vector-to-tri-state conversion

    #[test]
    fn axis_aligned_vectors_fire_one_axis() {
        assert_eq!(
            discretize(Vec2::new(5.0, 0.0), 0.1),
            (Axis::Positive, Axis::Neutral)
        );
        assert_eq!(
            discretize(Vec2::new(0.0, -3.0), 0.1),
            (Axis::Neutral, Axis::Negative)
        );
    }

    #[test]
    fn exact_diagonal_fires_both_axes() {
        assert_eq!(
            discretize(Vec2::new(1.0, -1.0), 0.1),
            (Axis::Positive, Axis::Negative)
        );
        assert_eq!(
            discretize(Vec2::new(-0.7071, -0.7071), 0.1),
            (Axis::Negative, Axis::Negative)
        );
    }

    #[test]
    fn near_axis_vectors_snap_to_dominant_axis() {
        // ~14 degrees off the x axis: minor component 0.24 rounds to zero.
        assert_eq!(
            discretize(Vec2::new(4.0, 1.0), 0.1),
            (Axis::Positive, Axis::Neutral)
        );
        // ~37 degrees: minor component 0.6 rounds up, diagonal.
        assert_eq!(
            discretize(Vec2::new(4.0, 3.0), 0.1),
            (Axis::Positive, Axis::Positive)
        );
    }

    #[test]
    fn non_tiny_vectors_never_discretize_to_zero() {
        for step in 0..360 {
            let angle = (step as f32).to_radians();
            let (x, y) = discretize(Vec2::new(angle.cos(), angle.sin()), 0.1);
            assert!(
                !(x.is_neutral() && y.is_neutral()),
                "angle {} produced a neutral pair",
                step
            );
        }
    }

    #[test]
    fn tiny_vectors_discretize_to_zero() {
        assert_eq!(
            discretize(Vec2::new(0.05, 0.05), 0.1),
            (Axis::Neutral, Axis::Neutral)
        );
        assert_eq!(
            discretize(Vec2::ZERO, 0.1),
            (Axis::Neutral, Axis::Neutral)
        );
    }
}
