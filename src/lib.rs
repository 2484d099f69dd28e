//! Craft Me Up - a top-down Minecraft-themed survival shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, waves, world generation)
//! - `camera`: Player-following view with zoom, for hosts that draw the world
//! - `settings`: Game speed preference persisted as JSON

pub mod camera;
pub mod settings;
pub mod sim;

pub use camera::Camera;
pub use settings::{GameSpeed, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Simulation rate
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;

    /// Side of one obstacle tile
    pub const OBSTACLE_SIZE: u32 = 32;
    /// Side of a regular character (a bit smaller than a tile so it fits through gaps)
    pub const DEFAULT_CHARACTER_SIZE: u32 = OBSTACLE_SIZE - 8;

    /// Side of one world generation chunk
    pub const CHUNK_SIZE: u32 = 512;
    /// Tiles along one side of a chunk
    pub const TILES_PER_CHUNK: u32 = CHUNK_SIZE / OBSTACLE_SIZE;
    /// Default world side, in chunks
    pub const DEFAULT_WORLD_CHUNKS: u32 = 6;
    /// Number of Voronoi biome seeds scattered over the world
    pub const BIOME_SEED_COUNT: usize = 6;
    /// Placement attempts per chunk before giving up on its budget
    pub const PLACEMENT_ATTEMPTS_PER_CHUNK: u32 = 64;
    /// Half-extent of the obstacle-free square around the player start
    pub const SAFE_ZONE_HALF_EXTENT: f32 = 96.0;

    /// Delay before each wave starts (seconds at normal speed)
    pub const WAVE_COOLDOWN_SECS: f32 = 2.0;
    /// Delay between two enemies of the same wave (seconds at normal speed)
    pub const SPAWN_INTERVAL_SECS: f32 = 2.0;
    /// Minimum distance from the player's center to a spawned enemy's center
    pub const SPAWN_MIN_DISTANCE: f32 = 160.0;
    /// Maximum distance from the player's center to a spawned enemy's center
    pub const SPAWN_MAX_DISTANCE: f32 = 320.0;
    /// Candidate positions tried per spawn before retrying next tick
    pub const SPAWN_ATTEMPTS: u32 = 32;
    /// Minimum enemy budget of a wave
    pub const BASE_WAVE_BUDGET: u32 = 3;

    /// Player cooldown between two arrows (seconds at normal speed)
    pub const PLAYER_ARROW_COOLDOWN_SECS: f32 = 3.0;
    /// Player cooldown between two fireballs (seconds at normal speed)
    pub const PLAYER_FIREBALL_COOLDOWN_SECS: f32 = 9.0;
    /// Projectiles still flying after this long are discarded
    pub const PROJECTILE_TTL_SECS: f32 = 6.0;
}

/// Convert a duration at normal speed into whole ticks for the given speed multiplier.
///
/// Faster game speeds shorten every timer.
#[inline]
pub fn secs_to_ticks(secs: f32, speed_multiplier: f32) -> u32 {
    let scaled = secs / speed_multiplier.max(f32::EPSILON);
    (scaled * consts::TICKS_PER_SECOND as f32).ceil().max(0.0) as u32
}
