//! Chunked procedural world generation
//!
//! The world is a square of chunks. A handful of biome seeds are scattered
//! over it; every chunk takes the biome of the nearest seed, measured from
//! the chunk center displaced by value noise so borders wander instead of
//! forming straight Voronoi edges. Each chunk then gets a floor tile and is
//! filled with biome obstacles until its health budget runs out.

use glam::{UVec2, Vec2};
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::noise::value_noise;
use super::state::{Entity, GameState, ObstacleKind};
use crate::consts::*;

/// Biome types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    Plains,
    Forest,
    Desert,
    Mountains,
}

/// One weighted entry of a biome's obstacle palette
#[derive(Debug, Clone, Copy)]
pub struct Feature {
    pub kind: ObstacleKind,
    pub weight: u32,
    /// Side length, in tiles
    pub tiles: u32,
}

const fn feature(kind: ObstacleKind, weight: u32, tiles: u32) -> Feature {
    Feature { kind, weight, tiles }
}

const PLAINS_FEATURES: [Feature; 3] = [
    feature(ObstacleKind::Bush, 4, 1),
    feature(ObstacleKind::Dirt, 3, 1),
    feature(ObstacleKind::Wood, 1, 1),
];

const FOREST_FEATURES: [Feature; 3] = [
    feature(ObstacleKind::Wood, 5, 1),
    feature(ObstacleKind::Wood, 2, 2),
    feature(ObstacleKind::Bush, 3, 1),
];

const DESERT_FEATURES: [Feature; 3] = [
    feature(ObstacleKind::Bush, 2, 1),
    feature(ObstacleKind::Dirt, 2, 1),
    feature(ObstacleKind::CobbleStone, 1, 1),
];

const MOUNTAINS_FEATURES: [Feature; 4] = [
    feature(ObstacleKind::CobbleStone, 4, 1),
    feature(ObstacleKind::CobbleStone, 2, 2),
    feature(ObstacleKind::Dirt, 1, 1),
    feature(ObstacleKind::Spawner, 1, 1),
];

impl Biome {
    pub const ALL: [Biome; 4] = [Biome::Plains, Biome::Forest, Biome::Desert, Biome::Mountains];

    pub fn as_str(&self) -> &'static str {
        match self {
            Biome::Plains => "Plains",
            Biome::Forest => "Forest",
            Biome::Desert => "Desert",
            Biome::Mountains => "Mountains",
        }
    }

    /// Floor tile covering chunks of this biome
    pub fn floor(&self) -> ObstacleKind {
        match self {
            Biome::Plains | Biome::Forest => ObstacleKind::Grass,
            Biome::Desert => ObstacleKind::Sand,
            Biome::Mountains => ObstacleKind::Stone,
        }
    }

    /// Total obstacle cost placed per chunk
    pub fn health_budget(&self) -> u32 {
        match self {
            Biome::Plains => 60,
            Biome::Forest => 120,
            Biome::Desert => 40,
            Biome::Mountains => 200,
        }
    }

    pub fn features(&self) -> &'static [Feature] {
        match self {
            Biome::Plains => &PLAINS_FEATURES,
            Biome::Forest => &FOREST_FEATURES,
            Biome::Desert => &DESERT_FEATURES,
            Biome::Mountains => &MOUNTAINS_FEATURES,
        }
    }
}

/// Budget consumed by placing one obstacle tile of `kind`
pub fn placement_cost(kind: ObstacleKind) -> u32 {
    match kind.max_health() {
        Some(health) => health.max(1) as u32,
        // Decorations still take up room
        None => 3,
    }
}

/// World shape parameters
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    /// World side, in chunks
    pub chunks: u32,
    /// Number of biome seeds
    pub biome_seeds: usize,
    /// Noise frequency, in lattice cells per chunk
    pub noise_frequency: f32,
    /// Maximum displacement of a chunk's sample point, in chunks
    pub noise_amplitude: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunks: DEFAULT_WORLD_CHUNKS,
            biome_seeds: BIOME_SEED_COUNT,
            noise_frequency: 0.5,
            noise_amplitude: 0.75,
        }
    }
}

/// A Voronoi site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeSeed {
    pub pos: Vec2,
    pub biome: Biome,
}

/// Biome of every chunk, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct WorldMap {
    pub chunks: u32,
    pub seeds: Vec<BiomeSeed>,
    pub biomes: Vec<Biome>,
}

impl WorldMap {
    /// Scatter biome seeds and assign every chunk its biome
    pub fn generate(rng: &mut Pcg32, seed: u64, config: &WorldConfig) -> Self {
        let chunks = config.chunks.max(1);
        let side = (chunks * CHUNK_SIZE) as f32;

        let seeds: Vec<BiomeSeed> = (0..config.biome_seeds.max(1))
            .map(|_| {
                let pos = Vec2::new(rng.random_range(0.0..side), rng.random_range(0.0..side));
                let biome = Biome::ALL[rng.random_range(0..Biome::ALL.len())];
                BiomeSeed { pos, biome }
            })
            .collect();

        let mut biomes = Vec::with_capacity((chunks * chunks) as usize);
        for cy in 0..chunks {
            for cx in 0..chunks {
                let sample = sample_point(seed, cx, cy, config);
                biomes.push(nearest_biome(&seeds, sample));
            }
        }

        Self { chunks, seeds, biomes }
    }

    /// World side in units
    pub fn side(&self) -> f32 {
        (self.chunks * CHUNK_SIZE) as f32
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(Vec2::ZERO, self.side())
    }

    pub fn center(&self) -> Vec2 {
        Vec2::splat(self.side() / 2.0)
    }

    pub fn biome_at_chunk(&self, cx: u32, cy: u32) -> Option<Biome> {
        if cx >= self.chunks || cy >= self.chunks {
            return None;
        }
        self.biomes.get((cy * self.chunks + cx) as usize).copied()
    }

    /// Chunk coordinates containing a world point
    pub fn chunk_of(&self, pos: Vec2) -> Option<(u32, u32)> {
        if pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let cx = (pos.x / CHUNK_SIZE as f32) as u32;
        let cy = (pos.y / CHUNK_SIZE as f32) as u32;
        (cx < self.chunks && cy < self.chunks).then_some((cx, cy))
    }

    pub fn biome_at(&self, pos: Vec2) -> Option<Biome> {
        let (cx, cy) = self.chunk_of(pos)?;
        self.biome_at_chunk(cx, cy)
    }
}

/// Chunk center displaced by two decorrelated noise channels
fn sample_point(seed: u64, cx: u32, cy: u32, config: &WorldConfig) -> Vec2 {
    let chunk = CHUNK_SIZE as f32;
    let center = Vec2::new((cx as f32 + 0.5) * chunk, (cy as f32 + 0.5) * chunk);
    let p = Vec2::new(cx as f32, cy as f32) * config.noise_frequency;

    let nx = value_noise(seed, p);
    let ny = value_noise(seed ^ 0x5DEE_CE66_D1CE_B00C, p);
    let offset = (Vec2::new(nx, ny) - 0.5) * 2.0 * config.noise_amplitude * chunk;
    center + offset
}

fn nearest_biome(seeds: &[BiomeSeed], point: Vec2) -> Biome {
    seeds
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance_squared(point)
                .partial_cmp(&b.pos.distance_squared(point))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|s| s.biome)
        .unwrap_or(Biome::Plains)
}

/// Build the border, floors and obstacles of every chunk
pub fn populate(state: &mut GameState) {
    spawn_border(state);

    let safe_zone = Rect::centered(state.world.center(), Vec2::splat(SAFE_ZONE_HALF_EXTENT * 2.0));
    let chunks = state.world.chunks;
    for cy in 0..chunks {
        for cx in 0..chunks {
            populate_chunk(state, cx, cy, &safe_zone);
        }
    }
}

/// Four invincible bedrock slabs enclosing the world
fn spawn_border(state: &mut GameState) {
    let side = state.world.side() as u32;
    let t = OBSTACLE_SIZE;
    let edge = -(t as f32);

    let slabs = [
        (Vec2::new(edge, edge), UVec2::new(side + 2 * t, t)),
        (Vec2::new(edge, side as f32), UVec2::new(side + 2 * t, t)),
        (Vec2::new(edge, 0.0), UVec2::new(t, side)),
        (Vec2::new(side as f32, 0.0), UVec2::new(t, side)),
    ];
    for (pos, size) in slabs {
        state.spawn_obstacle(ObstacleKind::Bedrock, pos, size);
    }
}

fn populate_chunk(state: &mut GameState, cx: u32, cy: u32, safe_zone: &Rect) {
    let Some(biome) = state.world.biome_at_chunk(cx, cy) else {
        return;
    };
    let origin = Vec2::new((cx * CHUNK_SIZE) as f32, (cy * CHUNK_SIZE) as f32);
    state.spawn_obstacle(biome.floor(), origin, UVec2::splat(CHUNK_SIZE));

    let features = biome.features();
    let total_weight: u32 = features.iter().map(|f| f.weight).sum();
    let mut budget = biome.health_budget();
    let mut placed = 0u32;

    for _ in 0..PLACEMENT_ATTEMPTS_PER_CHUNK {
        if budget == 0 {
            break;
        }

        let feature = pick_feature(&mut state.rng, features, total_weight);
        let cost = placement_cost(feature.kind) * feature.tiles * feature.tiles;
        if cost > budget {
            continue;
        }

        let max_tile = TILES_PER_CHUNK - feature.tiles;
        let tx = state.rng.random_range(0..=max_tile);
        let ty = state.rng.random_range(0..=max_tile);
        let side = feature.tiles * OBSTACLE_SIZE;
        let pos = origin + Vec2::new((tx * OBSTACLE_SIZE) as f32, (ty * OBSTACLE_SIZE) as f32);
        let rect = Rect::square(pos, side as f32);

        if !placement_is_clear(state, &rect, safe_zone) {
            continue;
        }

        state.spawn_obstacle(feature.kind, pos, UVec2::splat(side));
        budget -= cost;
        placed += 1;
    }

    log::debug!(
        "Chunk ({}, {}) {}: {} obstacles, {} budget left",
        cx,
        cy,
        biome.as_str(),
        placed,
        budget
    );
}

fn pick_feature(rng: &mut Pcg32, features: &'static [Feature], total_weight: u32) -> Feature {
    let mut roll = rng.random_range(0..total_weight.max(1));
    for feature in features {
        if roll < feature.weight {
            return *feature;
        }
        roll -= feature.weight;
    }
    features[features.len() - 1]
}

/// A candidate is rejected if it touches the spawn area, another placed
/// block (floors excluded) or any character
fn placement_is_clear(state: &GameState, rect: &Rect, safe_zone: &Rect) -> bool {
    if rect.overlaps(safe_zone) {
        return false;
    }
    let hits_obstacle = state
        .obstacles
        .iter()
        .filter(|o| !o.kind.is_floor())
        .any(|o| rect.overlaps(&o.rect()));
    let hits_character = state.characters.iter().any(|c| rect.overlaps(&c.rect()));
    !hits_obstacle && !hits_character
}
