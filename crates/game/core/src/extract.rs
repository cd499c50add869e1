//! Snapshot assembly from the live host world.
//!
//! Every list is filtered, measured against the single tracked player, sorted
//! nearest-first and only then truncated to its cap, so the retained entries
//! are always the nearest ones and identical inputs give identical output.

use crate::config::EntityCaps;
use crate::error::ExtractionError;
use crate::host::{HostEntity, HostPlayer, HostWorld};
use crate::math::Vec2;
use crate::snapshot::{EnemyState, PickupState, PlayerState, ProjectileState, WorldSnapshot};

/// Builds [`WorldSnapshot`]s with fixed per-list caps.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapshotExtractor {
    caps: EntityCaps,
}

impl SnapshotExtractor {
    pub fn new(caps: EntityCaps) -> Self {
        Self { caps }
    }

    pub fn caps(&self) -> &EntityCaps {
        &self.caps
    }

    /// Assembles a snapshot, or reports that there is no player to describe.
    ///
    /// A missing player never yields a partial snapshot.
    pub fn extract<W>(&self, world: &W) -> Result<WorldSnapshot, ExtractionError>
    where
        W: HostWorld + ?Sized,
    {
        let host_player = world
            .primary_player()
            .ok_or(ExtractionError::NoPrimaryActor)?;
        let origin = host_player.position;
        let entities = world.entities();

        let enemies = nearest(
            entities.iter().filter(|e| e.is_targetable_enemy()),
            origin,
            self.caps.enemies,
            enemy_state,
        );
        let projectiles = nearest(
            entities.iter().filter(|e| e.is_projectile()),
            origin,
            self.caps.projectiles,
            projectile_state,
        );
        let pickups = nearest(
            entities.iter().filter(|e| e.is_pickup()),
            origin,
            self.caps.pickups,
            pickup_state,
        );

        Ok(WorldSnapshot {
            frame: world.frame(),
            timestamp: world.timestamp(),
            player: player_state(&host_player),
            enemies,
            projectiles,
            pickups,
            room: world.room(),
            game: world.game(),
        })
    }
}

/// Filter has already run; measure, sort nearest-first, then cap.
fn nearest<'a, I, T>(
    entities: I,
    origin: Vec2,
    cap: usize,
    convert: fn(&HostEntity, f32) -> T,
) -> Vec<T>
where
    I: Iterator<Item = &'a HostEntity>,
{
    let mut measured: Vec<(f32, &HostEntity)> = entities
        .map(|e| (origin.distance(e.position), e))
        .collect();
    // Stable and total: equidistant entities keep host order, NaN sorts last.
    measured.sort_by(|a, b| a.0.total_cmp(&b.0));
    measured.truncate(cap);
    measured
        .into_iter()
        .map(|(distance, e)| convert(e, distance))
        .collect()
}

fn player_state(p: &HostPlayer) -> PlayerState {
    PlayerState {
        x: p.position.x,
        y: p.position.y,
        vx: p.velocity.x,
        vy: p.velocity.y,
        hp: p.health.total(),
        max_hp: p.max_primary + p.health.secondary + p.health.special,
        bombs: p.bombs,
        keys: p.keys,
        coins: p.coins,
        charge: p.charge,
        has_flight: p.can_fly,
    }
}

fn enemy_state(e: &HostEntity, distance: f32) -> EnemyState {
    EnemyState {
        x: e.position.x,
        y: e.position.y,
        vx: e.velocity.x,
        vy: e.velocity.y,
        hp: e.hp,
        max_hp: e.max_hp,
        type_id: e.type_id,
        variant: e.variant,
        subtype: e.subtype,
        distance,
    }
}

fn projectile_state(e: &HostEntity, distance: f32) -> ProjectileState {
    ProjectileState {
        x: e.position.x,
        y: e.position.y,
        vx: e.velocity.x,
        vy: e.velocity.y,
        type_id: e.type_id,
        variant: e.variant,
        subtype: e.subtype,
        distance,
        is_hostile: e.is_hostile_projectile(),
    }
}

fn pickup_state(e: &HostEntity, distance: f32) -> PickupState {
    PickupState {
        x: e.position.x,
        y: e.position.y,
        type_id: e.type_id,
        variant: e.variant,
        subtype: e.subtype,
        distance,
    }
}
