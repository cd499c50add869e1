/// Per-list caps applied when a snapshot is assembled or ingested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EntityCaps {
    /// Maximum enemies kept, nearest first.
    pub enemies: usize,
    /// Maximum projectiles kept, nearest first.
    pub projectiles: usize,
    /// Maximum pickups kept, nearest first.
    pub pickups: usize,
}

impl EntityCaps {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_ENEMIES: usize = 20;
    pub const DEFAULT_MAX_PROJECTILES: usize = 30;
    pub const DEFAULT_MAX_PICKUPS: usize = 10;

    pub const fn new(enemies: usize, projectiles: usize, pickups: usize) -> Self {
        Self {
            enemies,
            projectiles,
            pickups,
        }
    }
}

impl Default for EntityCaps {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MAX_ENEMIES,
            Self::DEFAULT_MAX_PROJECTILES,
            Self::DEFAULT_MAX_PICKUPS,
        )
    }
}
