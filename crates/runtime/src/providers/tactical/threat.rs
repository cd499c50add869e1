//! Dodge threat assessment.
//!
//! ```text
//! closing        = dot(unit(player - projectile), velocity)
//! time_to_impact = distance / closing              (frames)
//! alignment      = closing / speed                 (0, 1]
//! score          = alignment / max(time_to_impact, 1)
//! ```
//!
//! Projectiles that are not closing, or would need more than
//! `max_time_to_impact` frames to arrive, are not threats.

use game_core::{ProjectileState, Vec2};

use super::context::TacticalContext;
use crate::config::EngineConfig;

/// Minimum separation for a meaningful direction to the player.
const MIN_SEPARATION: f32 = 1.0;

/// A projectile judged dangerous, with the terms of its score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Threat {
    pub position: Vec2,
    pub velocity: Vec2,
    pub distance: f32,
    pub closing_speed: f32,
    pub time_to_impact: f32,
    pub alignment: f32,
    pub score: f32,
}

impl Threat {
    /// Scores one projectile; `None` when it is not a threat.
    pub fn assess(
        projectile: &ProjectileState,
        distance: f32,
        player: Vec2,
        config: &EngineConfig,
    ) -> Option<Self> {
        if !(MIN_SEPARATION..=config.dodge_distance).contains(&distance) {
            return None;
        }

        let velocity = projectile.velocity();
        let speed = velocity.length();
        if !speed.is_finite() || speed < config.min_projectile_speed {
            return None;
        }

        let position = projectile.position();
        let toward_player = (player - position) / distance;
        let closing_speed = toward_player.dot(velocity);
        if !(closing_speed > 0.0) {
            return None;
        }

        let time_to_impact = distance / closing_speed;
        if time_to_impact > config.max_time_to_impact {
            return None;
        }

        let alignment = (closing_speed / speed).min(1.0);
        let score = alignment / time_to_impact.max(1.0);

        Some(Self {
            position,
            velocity,
            distance,
            closing_speed,
            time_to_impact,
            alignment,
            score,
        })
    }

    /// Unit direction perpendicular to the projectile's path, on the side
    /// the player already is, so moving along it widens the miss distance.
    ///
    /// A projectile aimed dead center leaves both sides equal; the
    /// counter-clockwise perpendicular is taken.
    pub fn escape_direction(&self, player: Vec2) -> Vec2 {
        let perp = self.velocity.perp();
        let side = perp.dot(player - self.position);
        let away = if side < 0.0 { -perp } else { perp };
        away / away.length()
    }
}

/// Highest-scoring threat; the earliest in record order wins ties.
pub fn most_dangerous(ctx: &TacticalContext<'_>) -> Option<Threat> {
    ctx.hostile_projectiles()
        .filter_map(|(p, d)| Threat::assess(p, d, ctx.player, ctx.config))
        .fold(None, |best: Option<Threat>, t| match best {
            Some(b) if b.score >= t.score => Some(b),
            _ => Some(t),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile(x: f32, y: f32, vx: f32, vy: f32) -> ProjectileState {
        ProjectileState {
            x,
            y,
            vx,
            vy,
            is_hostile: true,
            ..ProjectileState::default()
        }
    }

    fn assess(p: &ProjectileState) -> Option<Threat> {
        let player = Vec2::ZERO;
        Threat::assess(p, player.distance(p.position()), player, &EngineConfig::default())
    }

    #[test]
    fn head_on_projectile_is_fully_aligned() {
        let threat = assess(&projectile(50.0, 0.0, -10.0, 0.0)).unwrap();
        assert_eq!(threat.closing_speed, 10.0);
        assert_eq!(threat.time_to_impact, 5.0);
        assert_eq!(threat.alignment, 1.0);
        assert!((threat.score - 0.2).abs() < 1e-6);
    }

    #[test]
    fn receding_slow_distant_and_far_future_are_ignored() {
        // Moving away.
        assert!(assess(&projectile(50.0, 0.0, 10.0, 0.0)).is_none());
        // Crossing without closing.
        assert!(assess(&projectile(50.0, 0.0, 0.0, 10.0)).is_none());
        // Nearly stationary.
        assert!(assess(&projectile(50.0, 0.0, -0.05, 0.0)).is_none());
        // Outside dodge distance.
        assert!(assess(&projectile(150.0, 0.0, -10.0, 0.0)).is_none());
        // Closing, but more than 45 frames out.
        assert!(assess(&projectile(90.0, 0.0, -1.0, 0.0)).is_none());
        // Non-finite velocity.
        assert!(assess(&projectile(50.0, 0.0, f32::NAN, 0.0)).is_none());
    }

    #[test]
    fn sooner_and_better_aligned_scores_higher() {
        let direct = assess(&projectile(50.0, 0.0, -10.0, 0.0)).unwrap();
        let glancing = assess(&projectile(50.0, 0.0, -10.0, 10.0)).unwrap();
        let later = assess(&projectile(90.0, 0.0, -10.0, 0.0)).unwrap();
        assert!(direct.score > glancing.score);
        assert!(direct.score > later.score);
    }

    #[test]
    fn escape_points_away_from_the_path() {
        // Passing just below the player (y grows downward), heading left.
        let threat = assess(&projectile(40.0, 5.0, -10.0, 0.0)).unwrap();
        let escape = threat.escape_direction(Vec2::ZERO);
        assert!(escape.y < 0.0);
        assert!((escape.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn dead_center_takes_the_ccw_side() {
        let threat = assess(&projectile(40.0, 0.0, -10.0, 0.0)).unwrap();
        // perp of (-10, 0) is (0, -10).
        assert_eq!(threat.escape_direction(Vec2::ZERO), Vec2::new(0.0, -1.0));
    }
}
