//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod noise;
pub mod state;
pub mod tick;
pub mod wave;
pub mod world;

pub use collision::{Blocker, MoveResult, Rect, first_overlap, move_stepped, sweep};
pub use state::{
    Attack, Character, CharacterKind, Entity, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind,
    Projectile, ProjectileKind,
};
pub use tick::{Fire, FireMode, TickInput, tick};
pub use wave::{WavePhase, WaveScheduler, advance_waves, generate_wave};
pub use world::{Biome, WorldConfig, WorldMap};
