//! Game-side data model and pure logic for the state/action bridge.
//!
//! `game-core` defines what crosses the filesystem boundary between the host
//! game and the external decision process, and the pure functions on either
//! end of it. Nothing here performs I/O or reads a clock implicitly; the
//! `runtime` crate owns files, cadence and loops.
//!
//! Modules are organized by responsibility:
//! - [`snapshot`] the immutable world snapshot and its parts
//! - [`command`] the tri-state [`ActionCommand`] and its validation
//! - [`codec`] text encoding of snapshots and the action field matcher
//! - [`host`] the read-only host world adapter the extractor consumes
//! - [`extract`] capped, distance-sorted snapshot assembly
//! - [`input`] the action applicator answering per-tick button queries
//! - [`math`] small 2D vector helpers shared by extraction and decisions
pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod extract;
pub mod host;
pub mod input;
pub mod math;
pub mod snapshot;

pub use codec::{
    ActionDecodeError, CodecError, EncodeOptions, Value, decode_action, decode_action_fields,
    decode_snapshot, encode, encode_with,
};
pub use command::{ActionCommand, Axis, ValidationError, discretize};
pub use config::EntityCaps;
pub use error::ExtractionError;
pub use extract::SnapshotExtractor;
pub use host::{EntityFlags, EntityKind, HealthPools, HostEntity, HostPlayer, HostWorld, Spawner};
pub use input::{ActionApplicator, ActorIndex, InputResponse, LogicalButton};
pub use math::Vec2;
pub use snapshot::{
    EnemyState, GameMeta, PickupState, PlayerState, ProjectileState, RoomInfo, WorldSnapshot,
};
