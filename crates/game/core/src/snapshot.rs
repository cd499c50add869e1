//! The world snapshot exchanged from host to agent.
//!
//! A [`WorldSnapshot`] is produced once per publish, never mutated, and owned
//! by whichever side holds it: the host encodes its copy, the agent decodes
//! an independent one. Field names below are part of the wire contract; the
//! `type` fields are renamed because `type` is reserved in Rust.

use serde::Deserialize;

use crate::codec::{Table, Value, lenient_f32};
use crate::command::ValidationError;
use crate::config::EntityCaps;
use crate::math::Vec2;

/// Complete, capped, distance-sorted description of the world at one tick.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WorldSnapshot {
    pub frame: u64,
    /// Host clock units; only compared for ordering, never converted.
    pub timestamp: u64,
    pub player: PlayerState,
    #[serde(default)]
    pub enemies: Vec<EnemyState>,
    #[serde(default)]
    pub projectiles: Vec<ProjectileState>,
    #[serde(default)]
    pub pickups: Vec<PickupState>,
    #[serde(default)]
    pub room: RoomInfo,
    #[serde(default)]
    pub game: GameMeta,
}

/// The single tracked player.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PlayerState {
    #[serde(deserialize_with = "lenient_f32")]
    pub x: f32,
    #[serde(deserialize_with = "lenient_f32")]
    pub y: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub vx: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub vy: f32,
    /// Current hit points with every secondary pool summed in.
    #[serde(default)]
    pub hp: i32,
    #[serde(default)]
    pub max_hp: i32,
    #[serde(default)]
    pub bombs: u32,
    #[serde(default)]
    pub keys: u32,
    #[serde(default)]
    pub coins: u32,
    #[serde(default)]
    pub charge: u32,
    #[serde(default)]
    pub has_flight: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EnemyState {
    #[serde(deserialize_with = "lenient_f32")]
    pub x: f32,
    #[serde(deserialize_with = "lenient_f32")]
    pub y: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub vx: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub vy: f32,
    /// Raw host value; scales differ between enemy types.
    #[serde(default, deserialize_with = "lenient_f32")]
    pub hp: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub max_hp: f32,
    #[serde(rename = "type", default)]
    pub type_id: u32,
    #[serde(default)]
    pub variant: u32,
    #[serde(default)]
    pub subtype: u32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub distance: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProjectileState {
    #[serde(deserialize_with = "lenient_f32")]
    pub x: f32,
    #[serde(deserialize_with = "lenient_f32")]
    pub y: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub vx: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub vy: f32,
    #[serde(rename = "type", default)]
    pub type_id: u32,
    #[serde(default)]
    pub variant: u32,
    #[serde(default)]
    pub subtype: u32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub distance: f32,
    /// Derived from the spawner, not the projectile type.
    #[serde(default = "hostile_by_default")]
    pub is_hostile: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PickupState {
    #[serde(deserialize_with = "lenient_f32")]
    pub x: f32,
    #[serde(deserialize_with = "lenient_f32")]
    pub y: f32,
    #[serde(rename = "type", default)]
    pub type_id: u32,
    #[serde(default)]
    pub variant: u32,
    #[serde(default)]
    pub subtype: u32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub distance: f32,
}

/// Per-room descriptors, passed through unmodified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RoomInfo {
    #[serde(rename = "type", default)]
    pub type_id: i32,
    #[serde(default)]
    pub shape: i32,
    #[serde(default)]
    pub stage: i32,
    #[serde(default)]
    pub stage_type: i32,
    #[serde(default)]
    pub is_clear: bool,
    #[serde(default)]
    pub room_index: i32,
    #[serde(default)]
    pub grid_width: i32,
    #[serde(default)]
    pub grid_height: i32,
}

/// Per-run descriptors, passed through unmodified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GameMeta {
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub difficulty: i32,
    #[serde(default)]
    pub challenge: i32,
}

fn hostile_by_default() -> bool {
    true
}

impl Default for ProjectileState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            type_id: 0,
            variant: 0,
            subtype: 0,
            distance: 0.0,
            is_hostile: hostile_by_default(),
        }
    }
}

impl PlayerState {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.vx, self.vy)
    }
}

impl EnemyState {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.vx, self.vy)
    }
}

impl ProjectileState {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.vx, self.vy)
    }
}

impl PickupState {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl WorldSnapshot {
    /// Checks what the decision engine relies on: a finite player position.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.player.position().is_finite() {
            return Err(ValidationError::InvalidSnapshot(
                "player position is not finite",
            ));
        }
        Ok(())
    }

    /// Drops entries beyond the caps. Lists are already nearest-first.
    pub fn truncate_to(&mut self, caps: &EntityCaps) {
        self.enemies.truncate(caps.enemies);
        self.projectiles.truncate(caps.projectiles);
        self.pickups.truncate(caps.pickups);
    }

    /// One-line rendering for status logs.
    pub fn summary(&self) -> String {
        format!(
            "frame {} | HP {}/{} | enemies {} | projectiles {} | pickups {}",
            self.frame,
            self.player.hp,
            self.player.max_hp,
            self.enemies.len(),
            self.projectiles.len(),
            self.pickups.len()
        )
    }

    /// Converts into the codec value tree, using the wire field names.
    pub fn to_value(&self) -> Value {
        let p = &self.player;
        let player = Table::new()
            .field("x", p.x)
            .field("y", p.y)
            .field("vx", p.vx)
            .field("vy", p.vy)
            .field("hp", p.hp)
            .field("max_hp", p.max_hp)
            .field("bombs", p.bombs)
            .field("keys", p.keys)
            .field("coins", p.coins)
            .field("charge", p.charge)
            .field("has_flight", p.has_flight);

        let enemies = Table::sequence(self.enemies.iter().map(|e| {
            Table::new()
                .field("x", e.x)
                .field("y", e.y)
                .field("vx", e.vx)
                .field("vy", e.vy)
                .field("hp", e.hp)
                .field("max_hp", e.max_hp)
                .field("type", e.type_id)
                .field("variant", e.variant)
                .field("subtype", e.subtype)
                .field("distance", e.distance)
        }));

        let projectiles = Table::sequence(self.projectiles.iter().map(|pr| {
            Table::new()
                .field("x", pr.x)
                .field("y", pr.y)
                .field("vx", pr.vx)
                .field("vy", pr.vy)
                .field("type", pr.type_id)
                .field("variant", pr.variant)
                .field("subtype", pr.subtype)
                .field("distance", pr.distance)
                .field("is_hostile", pr.is_hostile)
        }));

        let pickups = Table::sequence(self.pickups.iter().map(|pk| {
            Table::new()
                .field("x", pk.x)
                .field("y", pk.y)
                .field("type", pk.type_id)
                .field("variant", pk.variant)
                .field("subtype", pk.subtype)
                .field("distance", pk.distance)
        }));

        let r = &self.room;
        let room = Table::new()
            .field("type", r.type_id)
            .field("shape", r.shape)
            .field("stage", r.stage)
            .field("stage_type", r.stage_type)
            .field("is_clear", r.is_clear)
            .field("room_index", r.room_index)
            .field("grid_width", r.grid_width)
            .field("grid_height", r.grid_height);

        let game = Table::new()
            .field("seed", self.game.seed)
            .field("difficulty", self.game.difficulty)
            .field("challenge", self.game.challenge);

        Value::Table(
            Table::new()
                .field("frame", self.frame)
                .field("timestamp", self.timestamp)
                .field("player", player)
                .field("enemies", enemies)
                .field("projectiles", projectiles)
                .field("pickups", pickups)
                .field("room", room)
                .field("game", game),
        )
    }
}
