//! Action applicator: the decided command as per-tick button state.
//!
//! The host polls "is this button pressed" many times per tick, while a new
//! command arrives only when the action channel yields one. The applicator
//! holds the last successfully ingested command and answers every query from
//! it, idempotently, until the next ingestion replaces it.
//!
//! Screen coordinates grow downward: `move_y == -1` is "up".

use std::time::{Duration, Instant};

use strum::{Display, EnumIter};

use crate::command::{ActionCommand, Axis};

/// Host index of a controllable actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ActorIndex(pub u32);

impl ActorIndex {
    /// The designated primary actor, the only one the bridge drives.
    pub const PRIMARY: Self = Self(0);
}

/// Logical buttons the host may ask about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum LogicalButton {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    ShootLeft,
    ShootRight,
    ShootUp,
    ShootDown,
    // Never driven by the bridge; the host's default handling applies.
    Bomb,
    ActiveItem,
    Consumable,
    Drop,
    Pause,
    Map,
}

impl LogicalButton {
    /// The axis and the value on it that means "pressed", for the eight
    /// managed buttons.
    fn binding(self, command: &ActionCommand) -> Option<(Axis, Axis)> {
        use LogicalButton::*;
        let (axis, pressed_when) = match self {
            MoveLeft => (command.move_x, Axis::Negative),
            MoveRight => (command.move_x, Axis::Positive),
            MoveUp => (command.move_y, Axis::Negative),
            MoveDown => (command.move_y, Axis::Positive),
            ShootLeft => (command.shoot_x, Axis::Negative),
            ShootRight => (command.shoot_x, Axis::Positive),
            ShootUp => (command.shoot_y, Axis::Negative),
            ShootDown => (command.shoot_y, Axis::Positive),
            Bomb | ActiveItem | Consumable | Drop | Pause | Map => return None,
        };
        Some((axis, pressed_when))
    }

    /// True for the four movement and four aim buttons.
    pub fn is_managed(self) -> bool {
        self.binding(&ActionCommand::NEUTRAL).is_some()
    }
}

/// Answer to a button query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResponse {
    /// The bridge decides; `true` means pressed.
    Handled(bool),
    /// Let the host apply its default behavior.
    Unhandled,
}

/// Holds the last ingested command and its ingestion time.
#[derive(Clone, Debug)]
pub struct ActionApplicator {
    primary: ActorIndex,
    current: Option<ActionCommand>,
    ingested_at: Option<Instant>,
    ingest_count: u64,
}

impl Default for ActionApplicator {
    fn default() -> Self {
        Self::new(ActorIndex::PRIMARY)
    }
}

impl ActionApplicator {
    pub fn new(primary: ActorIndex) -> Self {
        Self {
            primary,
            current: None,
            ingested_at: None,
            ingest_count: 0,
        }
    }

    /// Replaces the held command and stamps the ingestion time.
    pub fn ingest(&mut self, command: ActionCommand, now: Instant) {
        self.current = Some(command);
        self.ingested_at = Some(now);
        self.ingest_count += 1;
    }

    /// The held command, or neutral if nothing has been ingested yet.
    pub fn current(&self) -> ActionCommand {
        self.current.unwrap_or(ActionCommand::NEUTRAL)
    }

    pub fn has_command(&self) -> bool {
        self.current.is_some()
    }

    pub fn ingest_count(&self) -> u64 {
        self.ingest_count
    }

    /// Answers a per-tick button query.
    ///
    /// Only the eight managed buttons of the primary actor are handled, and
    /// only once a command has been ingested; until then the host keeps
    /// normal control.
    pub fn query(&self, actor: ActorIndex, button: LogicalButton) -> InputResponse {
        if actor != self.primary {
            return InputResponse::Unhandled;
        }
        let Some(command) = self.current.as_ref() else {
            return InputResponse::Unhandled;
        };
        match button.binding(command) {
            Some((axis, pressed_when)) => InputResponse::Handled(axis == pressed_when),
            None => InputResponse::Unhandled,
        }
    }

    /// Time since the last successful ingestion; `None` if there was none.
    pub fn age(&self, now: Instant) -> Option<Duration> {
        self.ingested_at
            .map(|at| now.saturating_duration_since(at))
    }

    /// True when no command was ever ingested or the last one is older than
    /// `threshold`. Staleness is reported only; the held command stays.
    pub fn is_stale(&self, now: Instant, threshold: Duration) -> bool {
        self.age(now).is_none_or(|age| age > threshold)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn cmd(raw: [i64; 4]) -> ActionCommand {
        ActionCommand::from_components(raw).unwrap()
    }

    #[test]
    fn buttons_follow_axis_signs() {
        let mut applicator = ActionApplicator::default();
        applicator.ingest(cmd([1, -1, 0, 1]), Instant::now());

        let pressed: Vec<LogicalButton> = LogicalButton::iter()
            .filter(|b| {
                applicator.query(ActorIndex::PRIMARY, *b) == InputResponse::Handled(true)
            })
            .collect();
        assert_eq!(
            pressed,
            vec![
                LogicalButton::MoveRight,
                LogicalButton::MoveUp,
                LogicalButton::ShootDown
            ]
        );
        assert_eq!(
            applicator.query(ActorIndex::PRIMARY, LogicalButton::MoveLeft),
            InputResponse::Handled(false)
        );
    }

    #[test]
    fn other_actors_and_buttons_are_unhandled() {
        let mut applicator = ActionApplicator::default();
        applicator.ingest(cmd([1, 1, 1, 1]), Instant::now());

        assert_eq!(
            applicator.query(ActorIndex(1), LogicalButton::MoveRight),
            InputResponse::Unhandled
        );
        for button in [LogicalButton::Bomb, LogicalButton::Pause, LogicalButton::Map] {
            assert!(!button.is_managed());
            assert_eq!(
                applicator.query(ActorIndex::PRIMARY, button),
                InputResponse::Unhandled
            );
        }
        assert_eq!(LogicalButton::iter().filter(|b| b.is_managed()).count(), 8);
    }

    #[test]
    fn nothing_is_handled_before_first_command() {
        let applicator = ActionApplicator::default();
        assert_eq!(
            applicator.query(ActorIndex::PRIMARY, LogicalButton::MoveUp),
            InputResponse::Unhandled
        );
        assert_eq!(applicator.current(), ActionCommand::NEUTRAL);
        assert!(applicator.is_stale(Instant::now(), Duration::from_secs(1)));
    }

    #[test]
    fn queries_are_idempotent_between_ingestions() {
        let mut applicator = ActionApplicator::default();
        applicator.ingest(cmd([-1, 0, 0, 0]), Instant::now());
        for _ in 0..10 {
            assert_eq!(
                applicator.query(ActorIndex::PRIMARY, LogicalButton::MoveLeft),
                InputResponse::Handled(true)
            );
        }
        assert_eq!(applicator.ingest_count(), 1);
    }

    #[test]
    fn staleness_grows_without_touching_the_command() {
        let start = Instant::now();
        let mut applicator = ActionApplicator::default();
        let command = cmd([0, 1, -1, 0]);
        applicator.ingest(command, start);

        let threshold = Duration::from_secs(1);
        let later = start + Duration::from_millis(1500);
        assert!(!applicator.is_stale(start + Duration::from_millis(200), threshold));
        assert!(applicator.is_stale(later, threshold));
        assert!(applicator.age(later).unwrap() > threshold);
        assert_eq!(applicator.current(), command);
        assert_eq!(
            applicator.query(ActorIndex::PRIMARY, LogicalButton::MoveDown),
            InputResponse::Handled(true)
        );
    }

    #[test]
    fn button_names_are_snake_case() {
        assert_eq!(LogicalButton::ShootLeft.to_string(), "shoot_left");
    }
}
