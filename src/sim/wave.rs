//! Wave composition and the spawn scheduler
//!
//! The scheduler is a small state machine advanced once per tick:
//! cooldown, then enemies trickle in one by one around the player, then the
//! wave is fought until only the player is left standing.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::state::{CharacterKind, Entity, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Boss tiers: every `n`th wave adds bosses of the given kind
pub const BOSS_TIERS: [(u32, CharacterKind); 4] = [
    (5, CharacterKind::WitherSkeleton),
    (10, CharacterKind::Wither),
    (25, CharacterKind::Wither),
    (50, CharacterKind::Dragon),
];

/// Cap on bosses added by a single tier
pub const MAX_BOSSES_PER_TIER: u32 = 3;

/// How much each wave shifts the odds toward stronger enemies
const WAVE_WEIGHT_FACTOR: f32 = 0.05;

/// Unnormalized spawn weight of a regular enemy on a given wave.
///
/// Rarer (stronger) kinds start unlikely, and every wave adds the same
/// flat amount to each weight, flattening the distribution over time.
pub fn enemy_weight(kind: CharacterKind, wave: u32) -> f32 {
    let strength = kind.strength().max(1) as f32;
    let base_chance = 1.0 / strength;
    let wave_effect = 1.0 + wave as f32 * WAVE_WEIGHT_FACTOR * strength;
    base_chance * wave_effect
}

/// Probability of each regular kind on a given wave
pub fn spawn_probabilities(wave: u32) -> [(CharacterKind, f32); 6] {
    let weights = CharacterKind::REGULAR.map(|kind| enemy_weight(kind, wave));
    let total: f32 = weights.iter().sum();
    let mut out = CharacterKind::REGULAR.map(|kind| (kind, 0.0));
    for (slot, weight) in out.iter_mut().zip(weights) {
        slot.1 = weight / total;
    }
    out
}

/// Roll one regular enemy
pub fn choose_enemy(rng: &mut Pcg32, wave: u32) -> CharacterKind {
    let weights = CharacterKind::REGULAR.map(|kind| enemy_weight(kind, wave));
    let total: f32 = weights.iter().sum();
    let roll = rng.random::<f32>() * total;

    let mut cumulative = 0.0;
    for (kind, weight) in CharacterKind::REGULAR.iter().zip(weights) {
        cumulative += weight;
        if roll <= cumulative {
            return *kind;
        }
    }
    CharacterKind::REGULAR[CharacterKind::REGULAR.len() - 1]
}

/// Bosses joining a wave (every matching tier contributes)
pub fn boss_spawns(wave: u32) -> Vec<CharacterKind> {
    let mut bosses = Vec::new();
    if wave == 0 {
        return bosses;
    }
    for (every, kind) in BOSS_TIERS {
        if wave.is_multiple_of(every) {
            let count = (wave / every).clamp(1, MAX_BOSSES_PER_TIER);
            bosses.extend(std::iter::repeat_n(kind, count as usize));
        }
    }
    bosses
}

/// Enemy budget of a wave: a base plus a random share growing with the wave
pub fn wave_budget(rng: &mut Pcg32, wave: u32) -> u32 {
    let wave = wave.max(1);
    BASE_WAVE_BUDGET + rng.random_range(wave..wave * 3)
}

/// Roll the full roster of a wave, regular enemies first, bosses last
pub fn generate_wave(rng: &mut Pcg32, wave: u32) -> Vec<CharacterKind> {
    let mut budget = wave_budget(rng, wave) as i64;
    let mut roster = Vec::new();

    while budget > 0 {
        let kind = choose_enemy(rng, wave);
        roster.push(kind);
        budget -= kind.strength().max(1) as i64;
    }

    roster.extend(boss_spawns(wave));
    roster
}

/// Scheduler phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePhase {
    /// Waiting before the next wave
    Cooldown { ticks_left: u32 },
    /// Releasing queued enemies one at a time
    Spawning { ticks_until_next: u32 },
    /// All enemies out, waiting for the player to clear them
    Fighting,
}

/// Wave progression state
#[derive(Debug, Clone, PartialEq)]
pub struct WaveScheduler {
    pub phase: WavePhase,
    /// Enemies still to spawn this wave
    pub queue: VecDeque<CharacterKind>,
}

impl WaveScheduler {
    pub fn new(cooldown_ticks: u32) -> Self {
        Self {
            phase: WavePhase::Cooldown {
                ticks_left: cooldown_ticks,
            },
            queue: VecDeque::new(),
        }
    }
}

/// Advance the scheduler by one tick
pub fn advance_waves(state: &mut GameState) {
    if state.phase != GamePhase::Running || state.player().is_none() {
        return;
    }

    let phase = state.scheduler.phase;
    match phase {
        WavePhase::Cooldown { ticks_left } if ticks_left > 0 => {
            state.scheduler.phase = WavePhase::Cooldown {
                ticks_left: ticks_left - 1,
            };
        }
        WavePhase::Cooldown { .. } => {
            let roster = generate_wave(&mut state.rng, state.wave);
            log::info!("Wave {} starting with {} enemies", state.wave, roster.len());
            state.events.push(GameEvent::WaveStarted {
                wave: state.wave,
                enemies: roster.len(),
            });
            state.scheduler.queue = roster.into();
            state.scheduler.phase = WavePhase::Spawning { ticks_until_next: 0 };
        }
        WavePhase::Spawning { ticks_until_next } if ticks_until_next > 0 => {
            state.scheduler.phase = WavePhase::Spawning {
                ticks_until_next: ticks_until_next - 1,
            };
        }
        WavePhase::Spawning { .. } => {
            let Some(kind) = state.scheduler.queue.pop_front() else {
                state.scheduler.phase = WavePhase::Fighting;
                return;
            };

            match find_spawn_position(state, kind) {
                Some(pos) => {
                    let id = state.spawn_character(kind, pos);
                    log::debug!("Spawned {} (id {}) at {:?}", kind.as_str(), id, pos);
                    state.events.push(GameEvent::EnemySpawned { id, kind });
                    state.scheduler.phase = if state.scheduler.queue.is_empty() {
                        WavePhase::Fighting
                    } else {
                        WavePhase::Spawning {
                            ticks_until_next: state.ticks_for(SPAWN_INTERVAL_SECS),
                        }
                    };
                }
                None => {
                    // Crowded around the player, retry next tick
                    state.scheduler.queue.push_front(kind);
                }
            }
        }
        WavePhase::Fighting => {
            if state.enemy_count() == 0 {
                log::info!("Wave {} cleared (score {})", state.wave, state.score);
                state.events.push(GameEvent::WaveCleared { wave: state.wave });
                state.wave += 1;
                state.scheduler.phase = WavePhase::Cooldown {
                    ticks_left: state.ticks_for(WAVE_COOLDOWN_SECS),
                };
            }
        }
    }
}

/// Rejection-sample a free spot on a ring around the player
pub fn find_spawn_position(state: &mut GameState, kind: CharacterKind) -> Option<Vec2> {
    let player_center = state.player()?.center();
    let size = Vec2::splat(kind.side() as f32);
    let bounds = state.world.bounds();

    for _ in 0..SPAWN_ATTEMPTS {
        let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
        let distance = state.rng.random_range(SPAWN_MIN_DISTANCE..SPAWN_MAX_DISTANCE);
        let center = player_center + Vec2::new(angle.cos(), angle.sin()) * distance;
        let rect = Rect::centered(center, size);

        if spawn_is_clear(state, &rect, &bounds) {
            return Some(rect.pos);
        }
    }
    None
}

fn spawn_is_clear(state: &GameState, rect: &Rect, bounds: &Rect) -> bool {
    bounds.contains_rect(rect)
        && !state
            .obstacles
            .iter()
            .any(|o| o.can_collide() && o.rect().overlaps(rect))
        && !state.characters.iter().any(|c| c.rect().overlaps(rect))
}
