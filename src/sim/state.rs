//! Game state and core simulation types
//!
//! The three entity lists (characters, obstacles, projectiles) are owned by
//! [`GameState`]. Entities refer to each other by stable `u32` ID, never by
//! reference, so a despawned shooter or target simply stops resolving.

use glam::{UVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{Blocker, Rect};
use super::wave::WaveScheduler;
use super::world::{self, WorldConfig, WorldMap};
use crate::consts::*;
use crate::secs_to_ticks;
use crate::settings::GameSpeed;

/// Capability set shared by everything that lives in the world
pub trait Entity {
    /// Stable entity ID
    fn id(&self) -> u32;
    /// Top-left corner
    fn position(&self) -> Vec2;
    /// Width and height in world units
    fn size(&self) -> UVec2;
    /// Whether movers are stopped by this entity
    fn can_collide(&self) -> bool;

    fn rect(&self) -> Rect {
        Rect::new(self.position(), self.size().as_vec2())
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Simulation advancing
    Running,
    /// Simulation frozen, waiting for unpause
    Paused,
    /// Player died
    GameOver,
}

/// How a character hurts the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attack {
    /// Contact damage, also used to chew through obstacles in the way
    Melee { damage: i32, cooldown_secs: f32 },
    /// Fires a projectile at the player, trying to stay about `range` away
    Ranged {
        projectile: ProjectileKind,
        cooldown_secs: f32,
        range: f32,
    },
}

/// Character types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterKind {
    Player,
    Zombie,
    Skeleton,
    BabyZombie,
    Blaze,
    ZombiePigman,
    SpiderJockey,
    WitherSkeleton,
    Wither,
    Dragon,
}

impl CharacterKind {
    /// Enemies that can be rolled for a regular wave
    pub const REGULAR: [CharacterKind; 6] = [
        CharacterKind::Zombie,
        CharacterKind::Skeleton,
        CharacterKind::BabyZombie,
        CharacterKind::Blaze,
        CharacterKind::ZombiePigman,
        CharacterKind::SpiderJockey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterKind::Player => "Player",
            CharacterKind::Zombie => "Zombie",
            CharacterKind::Skeleton => "Skeleton",
            CharacterKind::BabyZombie => "Baby Zombie",
            CharacterKind::Blaze => "Blaze",
            CharacterKind::ZombiePigman => "Zombie Pigman",
            CharacterKind::SpiderJockey => "Spider Jockey",
            CharacterKind::WitherSkeleton => "Wither Skeleton",
            CharacterKind::Wither => "Wither",
            CharacterKind::Dragon => "Ender Dragon",
        }
    }

    /// Starting lives
    pub fn lives(&self) -> i32 {
        match self {
            CharacterKind::Player => 10,
            CharacterKind::Zombie => 10,
            CharacterKind::Skeleton => 5,
            CharacterKind::BabyZombie => 3,
            CharacterKind::Blaze => 10,
            CharacterKind::ZombiePigman => 20,
            CharacterKind::SpiderJockey => 8,
            CharacterKind::WitherSkeleton => 15,
            CharacterKind::Wither => 100,
            CharacterKind::Dragon => 250,
        }
    }

    /// Speed relative to the game speed (1.0 = player)
    pub fn base_speed(&self) -> f32 {
        match self {
            CharacterKind::Player => 1.0,
            CharacterKind::Zombie => 0.4,
            CharacterKind::Skeleton => 0.5,
            CharacterKind::BabyZombie => 1.5,
            CharacterKind::Blaze => 0.25,
            CharacterKind::ZombiePigman => 0.2,
            CharacterKind::SpiderJockey => 1.2,
            CharacterKind::WitherSkeleton => 0.5,
            CharacterKind::Wither => 0.3,
            CharacterKind::Dragon => 0.6,
        }
    }

    /// Score awarded on death, also the spawn cost within a wave budget
    pub fn strength(&self) -> u32 {
        match self {
            CharacterKind::Player => 0,
            CharacterKind::Zombie => 1,
            CharacterKind::Skeleton => 3,
            CharacterKind::BabyZombie => 4,
            CharacterKind::Blaze => 6,
            CharacterKind::ZombiePigman => 5,
            CharacterKind::SpiderJockey => 7,
            CharacterKind::WitherSkeleton => 8,
            CharacterKind::Wither => 25,
            CharacterKind::Dragon => 50,
        }
    }

    /// Size relative to [`DEFAULT_CHARACTER_SIZE`]
    pub fn size_multiplier(&self) -> f32 {
        match self {
            CharacterKind::BabyZombie => 0.75,
            CharacterKind::SpiderJockey | CharacterKind::WitherSkeleton => 1.25,
            CharacterKind::Wither => 2.0,
            CharacterKind::Dragon => 3.0,
            _ => 1.0,
        }
    }

    /// Side length for this kind
    pub fn side(&self) -> u32 {
        (DEFAULT_CHARACTER_SIZE as f32 * self.size_multiplier()) as u32
    }

    /// Automatic attack (the player attacks through input instead)
    pub fn attack(&self) -> Option<Attack> {
        let melee = |damage, cooldown_secs| Some(Attack::Melee { damage, cooldown_secs });
        let ranged = |projectile, cooldown_secs, range| {
            Some(Attack::Ranged {
                projectile,
                cooldown_secs,
                range,
            })
        };
        match self {
            CharacterKind::Player => None,
            CharacterKind::Zombie => melee(1, 5.0),
            CharacterKind::Skeleton => ranged(ProjectileKind::ArrowSmall, 5.0, 192.0),
            CharacterKind::BabyZombie => melee(1, 3.0),
            CharacterKind::Blaze => ranged(ProjectileKind::FireballSmall, 5.0, 256.0),
            CharacterKind::ZombiePigman => melee(2, 8.0),
            CharacterKind::SpiderJockey => ranged(ProjectileKind::ArrowJockey, 3.0, 160.0),
            CharacterKind::WitherSkeleton => melee(2, 4.0),
            CharacterKind::Wither => ranged(ProjectileKind::WitherSkull, 2.0, 288.0),
            CharacterKind::Dragon => ranged(ProjectileKind::DragonFireball, 3.0, 320.0),
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, CharacterKind::Wither | CharacterKind::Dragon)
    }
}

/// A player or enemy
#[derive(Debug, Clone)]
pub struct Character {
    pub id: u32,
    pub kind: CharacterKind,
    pub pos: Vec2,
    pub size: UVec2,
    pub lives: i32,
    pub base_speed: f32,
    /// Velocity requested for the current tick (units/sec)
    pub velocity: Vec2,
    /// Ticks until the main attack is ready (arrow for the player)
    pub primary_cooldown: u32,
    /// Ticks until the secondary attack is ready (player fireball)
    pub secondary_cooldown: u32,
}

impl Character {
    pub fn new(id: u32, kind: CharacterKind, pos: Vec2) -> Self {
        let side = kind.side();
        Self {
            id,
            kind,
            pos,
            size: UVec2::splat(side),
            lives: kind.lives(),
            base_speed: kind.base_speed(),
            velocity: Vec2::ZERO,
            primary_cooldown: 0,
            secondary_cooldown: 0,
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == CharacterKind::Player
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Count down attack cooldowns by one tick
    pub fn cool_down(&mut self) {
        self.primary_cooldown = self.primary_cooldown.saturating_sub(1);
        self.secondary_cooldown = self.secondary_cooldown.saturating_sub(1);
    }
}

impl Entity for Character {
    fn id(&self) -> u32 {
        self.id
    }
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> UVec2 {
        self.size
    }
    fn can_collide(&self) -> bool {
        self.is_alive()
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Dirt,
    Wood,
    CobbleStone,
    Spawner,
    /// World border
    Bedrock,
    /// Decoration, walked through
    Bush,
    /// Floor tiles, one per chunk
    Grass,
    Stone,
    Sand,
}

impl ObstacleKind {
    /// Starting health, `None` for invincible kinds
    pub fn max_health(&self) -> Option<i32> {
        match self {
            ObstacleKind::Dirt => Some(5),
            ObstacleKind::Wood => Some(10),
            ObstacleKind::CobbleStone => Some(25),
            ObstacleKind::Spawner => Some(50),
            _ => None,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.max_health().is_none()
    }

    pub fn can_collide(&self) -> bool {
        !matches!(
            self,
            ObstacleKind::Bush | ObstacleKind::Grass | ObstacleKind::Stone | ObstacleKind::Sand
        )
    }

    pub fn is_floor(&self) -> bool {
        matches!(self, ObstacleKind::Grass | ObstacleKind::Stone | ObstacleKind::Sand)
    }
}

/// A block in the world
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: UVec2,
    pub health: i32,
    pub invincible: bool,
    pub can_collide: bool,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, pos: Vec2, size: UVec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            health: kind.max_health().unwrap_or(i32::MAX),
            invincible: kind.is_invincible(),
            can_collide: kind.can_collide(),
        }
    }

    /// Apply damage (ignored by invincible obstacles)
    pub fn damage(&mut self, amount: i32) {
        if !self.invincible {
            self.health = self.health.saturating_sub(amount);
        }
    }

    pub fn is_destroyed(&self) -> bool {
        !self.invincible && self.health <= 0
    }
}

impl Entity for Obstacle {
    fn id(&self) -> u32 {
        self.id
    }
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> UVec2 {
        self.size
    }
    fn can_collide(&self) -> bool {
        self.can_collide
    }
}

/// Projectile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    ArrowSmall,
    ArrowBig,
    ArrowJockey,
    FireballSmall,
    FireballBig,
    WitherSkull,
    DragonFireball,
}

impl ProjectileKind {
    pub fn damage(&self) -> i32 {
        match self {
            ProjectileKind::ArrowSmall => 1,
            ProjectileKind::ArrowBig => 2,
            ProjectileKind::ArrowJockey => 2,
            ProjectileKind::FireballSmall => 2,
            ProjectileKind::FireballBig => 5,
            ProjectileKind::WitherSkull => 3,
            ProjectileKind::DragonFireball => 5,
        }
    }

    /// Speed relative to the game speed
    pub fn speed(&self) -> f32 {
        match self {
            ProjectileKind::ArrowSmall => 2.0,
            ProjectileKind::ArrowBig => 3.0,
            ProjectileKind::ArrowJockey => 1.8,
            ProjectileKind::FireballSmall => 0.75,
            ProjectileKind::FireballBig => 1.0,
            ProjectileKind::WitherSkull => 1.0,
            ProjectileKind::DragonFireball => 1.0,
        }
    }

    /// Divisor applied to the shooter's size
    pub fn size_divisor(&self) -> u32 {
        match self {
            ProjectileKind::ArrowJockey => 2,
            ProjectileKind::WitherSkull | ProjectileKind::DragonFireball => 4,
            _ => 1,
        }
    }

    /// Whether obstacles stop this projectile (dragon fire flies over them)
    pub fn hits_obstacles(&self) -> bool {
        *self != ProjectileKind::DragonFireball
    }
}

/// A projectile in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub pos: Vec2,
    pub size: UVec2,
    /// Units per second
    pub velocity: Vec2,
    pub damage: i32,
    /// ID of the shooter, never hit by its own projectile
    pub shot_by: u32,
    pub active: bool,
    /// Ticks left before the projectile fizzles out
    pub ttl_ticks: u32,
}

impl Projectile {
    /// Create a projectile centered on `shooter`, flying toward `target`
    pub fn aimed(
        id: u32,
        kind: ProjectileKind,
        shooter: &Character,
        target: Vec2,
        units_per_second: f32,
        ttl_ticks: u32,
    ) -> Self {
        let size = (shooter.size / kind.size_divisor()).max(UVec2::ONE);
        let rect = Rect::centered(shooter.center(), size.as_vec2());
        let dir = (target - rect.center()).normalize_or_zero();

        Self {
            id,
            kind,
            pos: rect.pos,
            size,
            velocity: dir * kind.speed() * units_per_second,
            damage: kind.damage(),
            shot_by: shooter.id,
            active: true,
            ttl_ticks,
        }
    }

    /// Heading in degrees, 0 pointing up, clockwise (screen coordinates)
    pub fn heading_degrees(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x).to_degrees() + 90.0
    }
}

impl Entity for Projectile {
    fn id(&self) -> u32 {
        self.id
    }
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> UVec2 {
        self.size
    }
    fn can_collide(&self) -> bool {
        self.active
    }
}

/// Gameplay events, drained by the host for sound/HUD/logging
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    WaveStarted { wave: u32, enemies: usize },
    EnemySpawned { id: u32, kind: CharacterKind },
    PlayerHit { damage: i32, lives_left: i32 },
    EnemyKilled { kind: CharacterKind, score: u32 },
    ObstacleDestroyed { kind: ObstacleKind },
    WaveCleared { wave: u32 },
    PlayerDied { wave: u32, score: u64 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG driving every random decision
    pub rng: Pcg32,
    /// Game speed setting
    pub speed: GameSpeed,
    /// Current wave (1-based)
    pub wave: u32,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Biome map and bounds
    pub world: WorldMap,
    pub characters: Vec<Character>,
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    /// Wave progression
    pub scheduler: WaveScheduler,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    player_id: u32,
    next_id: u32,
}

impl GameState {
    /// Create a new game with a generated world
    pub fn new(seed: u64, speed: GameSpeed) -> Self {
        Self::with_config(seed, speed, &WorldConfig::default())
    }

    /// Create a new game with a generated world of the given shape
    pub fn with_config(seed: u64, speed: GameSpeed, config: &WorldConfig) -> Self {
        let mut state = Self::bare(seed, speed, config);
        world::populate(&mut state);
        log::info!(
            "World generated: seed={}, {}x{} chunks, {} obstacles",
            seed,
            config.chunks,
            config.chunks,
            state.obstacles.len()
        );
        state
    }

    /// Create a game with a biome map and the player, but no obstacles
    pub fn bare(seed: u64, speed: GameSpeed, config: &WorldConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = WorldMap::generate(&mut rng, seed, config);
        let player_pos = world.center() - Vec2::splat(CharacterKind::Player.side() as f32 / 2.0);

        let mut state = Self {
            seed,
            rng,
            speed,
            wave: 1,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Running,
            world,
            characters: Vec::new(),
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            scheduler: WaveScheduler::new(secs_to_ticks(WAVE_COOLDOWN_SECS, speed.multiplier())),
            events: Vec::new(),
            player_id: 0,
            next_id: 1,
        };

        state.player_id = state.spawn_character(CharacterKind::Player, player_pos);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player_id(&self) -> u32 {
        self.player_id
    }

    /// The player, unless dead and removed
    pub fn player(&self) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == self.player_id)
    }

    pub fn player_mut(&mut self) -> Option<&mut Character> {
        let id = self.player_id;
        self.characters.iter_mut().find(|c| c.id == id)
    }

    pub fn character(&self, id: u32) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Number of living non-player characters
    pub fn enemy_count(&self) -> usize {
        self.characters.iter().filter(|c| !c.is_player()).count()
    }

    /// Add a character; enemies start with their attack on cooldown
    pub fn spawn_character(&mut self, kind: CharacterKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let mut character = Character::new(id, kind, pos);
        if let Some(attack) = kind.attack() {
            let cooldown = match attack {
                Attack::Melee { cooldown_secs, .. } | Attack::Ranged { cooldown_secs, .. } => cooldown_secs,
            };
            character.primary_cooldown = self.ticks_for(cooldown);
        }
        self.characters.push(character);
        id
    }

    /// Add an obstacle
    pub fn spawn_obstacle(&mut self, kind: ObstacleKind, pos: Vec2, size: UVec2) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle::new(id, kind, pos, size));
        id
    }

    /// Fire a projectile from `shooter_id` toward `target`
    pub fn spawn_projectile(&mut self, kind: ProjectileKind, shooter_id: u32, target: Vec2) -> Option<u32> {
        let units_per_second = self.units_per_second();
        let ttl = self.ticks_for(PROJECTILE_TTL_SECS);
        let id = self.next_id;
        let shooter = self.character(shooter_id)?;
        let projectile = Projectile::aimed(id, kind, shooter, target, units_per_second, ttl);
        self.next_id += 1;
        self.projectiles.push(projectile);
        Some(id)
    }

    /// Distance per second covered by a speed-1.0 mover
    pub fn units_per_second(&self) -> f32 {
        self.speed.units_per_second()
    }

    /// Duration at normal speed, in ticks at the current speed
    pub fn ticks_for(&self, secs: f32) -> u32 {
        secs_to_ticks(secs, self.speed.multiplier())
    }

    /// Collidable obstacles as movement blockers
    pub fn obstacle_blockers(&self) -> Vec<(Blocker, Rect)> {
        self.obstacles
            .iter()
            .filter(|o| o.can_collide())
            .map(|o| (Blocker::Obstacle(o.id), o.rect()))
            .collect()
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.characters.sort_by_key(|c| c.id);
        self.obstacles.sort_by_key(|o| o.id);
        self.projectiles.sort_by_key(|p| p.id);
    }
}
