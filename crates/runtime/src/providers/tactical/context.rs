//! Read-only view of one snapshot for the tactical stages.

use game_core::{EnemyState, ProjectileState, Vec2, WorldSnapshot};

use crate::config::EngineConfig;

/// Snapshot plus thresholds, with distances measured from the player.
///
/// Distances are recomputed from positions rather than trusted from the
/// record, so a producer with a different distance convention cannot skew
/// the thresholds.
pub struct TacticalContext<'a> {
    pub snapshot: &'a WorldSnapshot,
    pub config: &'a EngineConfig,
    pub player: Vec2,
}

impl<'a> TacticalContext<'a> {
    pub fn new(snapshot: &'a WorldSnapshot, config: &'a EngineConfig) -> Self {
        Self {
            snapshot,
            config,
            player: snapshot.player.position(),
        }
    }

    /// Enemies with a finite distance, in record order.
    pub fn enemies(&self) -> impl Iterator<Item = (&'a EnemyState, f32)> + '_ {
        self.snapshot
            .enemies
            .iter()
            .map(|e| (e, self.player.distance(e.position())))
            .filter(|(_, d)| d.is_finite())
    }

    /// Nearest enemy overall. Ties keep record order.
    pub fn nearest_enemy(&self) -> Option<(&'a EnemyState, f32)> {
        self.enemies()
            .fold(None, |best: Option<(&EnemyState, f32)>, (e, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((e, d)),
            })
    }

    /// Hostile projectiles with a finite distance, in record order.
    pub fn hostile_projectiles(&self) -> impl Iterator<Item = (&'a ProjectileState, f32)> + '_ {
        self.snapshot
            .projectiles
            .iter()
            .filter(|p| p.is_hostile)
            .map(|p| (p, self.player.distance(p.position())))
            .filter(|(_, d)| d.is_finite())
    }
}
