//! Direction rules of the four tactics.
//!
//! Each rule checks its own trigger and returns the continuous direction it
//! wants, or `None` when it does not engage. Discretization and the cascade
//! order live in the engine.

use game_core::Vec2;

use super::context::TacticalContext;
use super::threat;
use crate::api::Tactic;

/// Movement stages in priority order; the first that engages wins.
pub const MOVEMENT_CASCADE: [Tactic; 3] = [Tactic::Dodge, Tactic::Avoid, Tactic::Approach];

impl Tactic {
    pub fn direction(self, ctx: &TacticalContext<'_>) -> Option<Vec2> {
        match self {
            Tactic::Dodge => dodge(ctx),
            Tactic::Avoid => avoid(ctx),
            Tactic::Attack => attack(ctx),
            Tactic::Approach => approach(ctx),
        }
    }
}

/// Sidestep the most dangerous incoming projectile.
fn dodge(ctx: &TacticalContext<'_>) -> Option<Vec2> {
    threat::most_dangerous(ctx).map(|t| t.escape_direction(ctx.player))
}

/// Repulsion from every enemy inside the avoid radius, each weighted by
/// inverse distance so the closest dominates.
fn avoid(ctx: &TacticalContext<'_>) -> Option<Vec2> {
    let radius = ctx.config.avoid_distance;
    let mut push = Vec2::ZERO;
    let mut engaged = false;

    for (enemy, distance) in ctx.enemies() {
        if distance <= 0.0 || distance >= radius {
            continue;
        }
        let away = (ctx.player - enemy.position()) / distance;
        push += away / distance.max(1.0);
        engaged = true;
    }

    engaged.then_some(push)
}

/// Aim at the nearest enemy in range, led along its velocity.
fn attack(ctx: &TacticalContext<'_>) -> Option<Vec2> {
    let config = ctx.config;
    let (enemy, distance) = ctx
        .nearest_enemy()
        .filter(|(_, d)| *d <= config.attack_range)?;

    let mut aim = enemy.position() - ctx.player;
    let velocity = enemy.velocity();
    if velocity.is_finite() && velocity.length() > config.min_lead_speed {
        // Farther targets move more while the shot travels.
        aim += velocity * (distance / config.lead_divisor);
    }
    Some(aim)
}

/// Close in on the nearest enemy when it is beyond attack range but still
/// within the approach trigger.
fn approach(ctx: &TacticalContext<'_>) -> Option<Vec2> {
    let config = ctx.config;
    let (enemy, distance) = ctx.nearest_enemy()?;
    if distance <= config.attack_range || distance > config.approach_range {
        return None;
    }
    Some(enemy.position() - ctx.player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use game_core::{EnemyState, PlayerState, WorldSnapshot};

    fn snapshot(enemies: Vec<EnemyState>) -> WorldSnapshot {
        WorldSnapshot {
            frame: 1,
            timestamp: 1,
            player: PlayerState::default(),
            enemies,
            projectiles: Vec::new(),
            pickups: Vec::new(),
            room: Default::default(),
            game: Default::default(),
        }
    }

    fn enemy(x: f32, y: f32) -> EnemyState {
        EnemyState {
            x,
            y,
            ..EnemyState::default()
        }
    }

    #[test]
    fn closer_enemies_dominate_avoidance() {
        let snap = snapshot(vec![enemy(10.0, 0.0), enemy(0.0, 40.0)]);
        let config = EngineConfig::default();
        let ctx = TacticalContext::new(&snap, &config);

        let push = Tactic::Avoid.direction(&ctx).unwrap();
        assert!(push.x < 0.0);
        assert!(push.x.abs() > push.y.abs());
    }

    #[test]
    fn avoid_ignores_enemies_outside_radius() {
        let snap = snapshot(vec![enemy(60.0, 0.0)]);
        let config = EngineConfig::default();
        assert!(Tactic::Avoid.direction(&TacticalContext::new(&snap, &config)).is_none());
    }

    #[test]
    fn attack_leads_moving_targets() {
        let mut target = enemy(200.0, 0.0);
        target.vy = 10.0;
        let snap = snapshot(vec![target]);
        let config = EngineConfig::default();

        let aim = Tactic::Attack
            .direction(&TacticalContext::new(&snap, &config))
            .unwrap();
        // 10 * 200 / 200 ahead of the target.
        assert_eq!(aim, Vec2::new(200.0, 10.0));
    }

    #[test]
    fn attack_and_approach_split_at_attack_range() {
        let config = EngineConfig::default();

        let near = snapshot(vec![enemy(300.0, 0.0)]);
        let ctx = TacticalContext::new(&near, &config);
        assert!(Tactic::Attack.direction(&ctx).is_some());
        assert!(Tactic::Approach.direction(&ctx).is_none());

        let mid = snapshot(vec![enemy(0.0, -350.0)]);
        let ctx = TacticalContext::new(&mid, &config);
        assert!(Tactic::Attack.direction(&ctx).is_none());
        assert_eq!(
            Tactic::Approach.direction(&ctx),
            Some(Vec2::new(0.0, -350.0))
        );

        let far = snapshot(vec![enemy(500.0, 0.0)]);
        let ctx = TacticalContext::new(&far, &config);
        assert!(Tactic::Attack.direction(&ctx).is_none());
        assert!(Tactic::Approach.direction(&ctx).is_none());
    }

    #[test]
    fn nearest_is_by_geometry_not_record_order() {
        let snap = snapshot(vec![enemy(250.0, 0.0), enemy(-100.0, 0.0)]);
        let config = EngineConfig::default();
        let aim = Tactic::Attack
            .direction(&TacticalContext::new(&snap, &config))
            .unwrap();
        assert!(aim.x < 0.0);
    }
}
