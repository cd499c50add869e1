//! Read-only view of the live host game.
//!
//! The host embeds the bridge and implements [`HostWorld`] over its own
//! entity system. The extractor only reads through this trait, so the same
//! code serves the real host adapter and the in-memory fixtures used in
//! tests.

use bitflags::bitflags;

use crate::math::Vec2;
use crate::snapshot::{GameMeta, RoomInfo};

/// Broad classification of a live host entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Any non-player character; hostility is carried in [`EntityFlags`].
    Npc,
    Projectile,
    Pickup,
    /// Player tears, effects, familiars and everything else the bridge ignores.
    Other,
}

bitflags! {
    /// Host-reported status bits for an entity.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EntityFlags: u8 {
        /// Spawned and participating in the simulation.
        const ACTIVE = 1 << 0;
        /// Can take damage.
        const VULNERABLE = 1 << 1;
        /// Counts as an enemy of the player.
        const HOSTILE = 1 << 2;
    }
}

/// Who spawned an entity. Projectile hostility is derived from this.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Spawner {
    #[default]
    None,
    /// The primary player or something the player owns.
    Player,
    Other,
}

/// One live host entity as reported by the adapter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostEntity {
    pub kind: Option<EntityKind>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub type_id: u32,
    pub variant: u32,
    pub subtype: u32,
    pub hp: f32,
    pub max_hp: f32,
    pub flags: EntityFlags,
    pub spawner: Spawner,
}

impl HostEntity {
    pub fn new(kind: EntityKind, position: Vec2) -> Self {
        Self {
            kind: Some(kind),
            position,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: EntityFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_spawner(mut self, spawner: Spawner) -> Self {
        self.spawner = spawner;
        self
    }

    #[must_use]
    pub fn with_ids(mut self, type_id: u32, variant: u32, subtype: u32) -> Self {
        self.type_id = type_id;
        self.variant = variant;
        self.subtype = subtype;
        self
    }

    #[must_use]
    pub fn with_health(mut self, hp: f32, max_hp: f32) -> Self {
        self.hp = hp;
        self.max_hp = max_hp;
        self
    }

    /// An NPC the player is expected to fight: active, vulnerable, hostile.
    pub fn is_targetable_enemy(&self) -> bool {
        self.kind == Some(EntityKind::Npc)
            && self
                .flags
                .contains(EntityFlags::ACTIVE | EntityFlags::VULNERABLE | EntityFlags::HOSTILE)
    }

    pub fn is_projectile(&self) -> bool {
        self.kind == Some(EntityKind::Projectile)
    }

    pub fn is_pickup(&self) -> bool {
        self.kind == Some(EntityKind::Pickup)
    }

    /// A projectile is hostile unless the player spawned it.
    pub fn is_hostile_projectile(&self) -> bool {
        self.spawner != Spawner::Player
    }
}

/// Separate health pools the host tracks for the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HealthPools {
    /// Primary (refillable) hit points.
    pub primary: i32,
    /// Secondary pools layered on top (shields, temporary health).
    pub secondary: i32,
    /// A further pool with a special on-loss effect.
    pub special: i32,
}

impl HealthPools {
    /// All pools summed into the single scalar the snapshot carries.
    pub const fn total(&self) -> i32 {
        self.primary + self.secondary + self.special
    }
}

/// The primary player as reported by the adapter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostPlayer {
    pub position: Vec2,
    pub velocity: Vec2,
    pub health: HealthPools,
    /// Capacity of the primary pool.
    pub max_primary: i32,
    pub bombs: u32,
    pub keys: u32,
    pub coins: u32,
    pub charge: u32,
    pub can_fly: bool,
}

/// Host adapter consulted once per extraction.
pub trait HostWorld {
    /// Current frame counter.
    fn frame(&self) -> u64;

    /// Host clock, in host units.
    fn timestamp(&self) -> u64;

    /// The designated primary player, if one exists right now.
    fn primary_player(&self) -> Option<HostPlayer>;

    /// Every live entity in the current room.
    fn entities(&self) -> Vec<HostEntity>;

    fn room(&self) -> RoomInfo;

    fn game(&self) -> GameMeta;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_filter_requires_all_flags() {
        let all = EntityFlags::ACTIVE | EntityFlags::VULNERABLE | EntityFlags::HOSTILE;
        let enemy = HostEntity::new(EntityKind::Npc, Vec2::ZERO).with_flags(all);
        assert!(enemy.is_targetable_enemy());

        let invulnerable = enemy
            .clone()
            .with_flags(EntityFlags::ACTIVE | EntityFlags::HOSTILE);
        assert!(!invulnerable.is_targetable_enemy());

        let friendly = enemy
            .clone()
            .with_flags(EntityFlags::ACTIVE | EntityFlags::VULNERABLE);
        assert!(!friendly.is_targetable_enemy());

        let pickup = HostEntity::new(EntityKind::Pickup, Vec2::ZERO).with_flags(all);
        assert!(!pickup.is_targetable_enemy());
    }

    #[test]
    fn projectile_hostility_follows_spawner() {
        let shot = HostEntity::new(EntityKind::Projectile, Vec2::ZERO);
        assert!(shot.is_hostile_projectile());
        assert!(
            shot.clone()
                .with_spawner(Spawner::Other)
                .is_hostile_projectile()
        );
        assert!(!shot.with_spawner(Spawner::Player).is_hostile_projectile());
    }

    #[test]
    fn health_pools_sum() {
        let pools = HealthPools {
            primary: 4,
            secondary: 2,
            special: 1,
        };
        assert_eq!(pools.total(), 7);
    }
}
