//! Fixed timestep simulation tick
//!
//! One call moves every character and projectile, resolves hits, removes the
//! dead and advances the wave scheduler. Hits are collected first and applied
//! once the movers are released, so each one lands exactly once.

use glam::Vec2;

use super::collision::{Blocker, first_overlap, move_stepped, sweep};
use super::state::{Attack, Entity, GameEvent, GamePhase, GameState, ProjectileKind};
use super::wave::advance_waves;
use crate::consts::*;
use crate::secs_to_ticks;

/// Ranged enemies back off when the player is closer than this share of their range
const RETREAT_RATIO: f32 = 0.6;
/// Ranged enemies only fire within this multiple of their preferred range
const FIRE_RANGE_FACTOR: f32 = 1.5;
/// Gap under which a melee enemy counts as touching its target
const CONTACT_MARGIN: f32 = 1.0;
/// Longest timestep a single tick will simulate (host stalls are dropped)
const MAX_TICK_DT: f32 = 0.25;

/// Player weapon slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireMode {
    /// Arrow (left click)
    Primary,
    /// Fireball (right click)
    Secondary,
}

impl FireMode {
    pub fn projectile(&self) -> ProjectileKind {
        match self {
            FireMode::Primary => ProjectileKind::ArrowBig,
            FireMode::Secondary => ProjectileKind::FireballBig,
        }
    }

    pub fn cooldown_secs(&self) -> f32 {
        match self {
            FireMode::Primary => PLAYER_ARROW_COOLDOWN_SECS,
            FireMode::Secondary => PLAYER_FIREBALL_COOLDOWN_SECS,
        }
    }
}

/// A shot request aimed at a world position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fire {
    pub mode: FireMode,
    pub target: Vec2,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement direction (length clamped to 1)
    pub movement: Vec2,
    /// Shot request
    pub fire: Option<Fire>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at tick {}", state.time_ticks);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                log::info!("Resumed at tick {}", state.time_ticks);
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Running {
        return;
    }

    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_TICK_DT) } else { 0.0 };
    state.time_ticks += 1;

    update_player(state, input, dt);
    update_enemies(state, dt);
    update_projectiles(state, dt);
    cleanup(state);
    advance_waves(state);
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let units = state.units_per_second();
    let blockers = state.obstacle_blockers();
    let Some(player) = state.player_mut() else {
        return;
    };

    player.cool_down();

    let dir = if input.movement.is_finite() {
        input.movement.clamp_length_max(1.0)
    } else {
        Vec2::ZERO
    };
    player.velocity = dir * player.base_speed * units;

    let mut rect = player.rect();
    move_stepped(&mut rect, player.velocity * dt, |r| first_overlap(r, &blockers));
    player.pos = rect.pos;

    if let Some(fire) = input.fire {
        try_fire(state, fire);
    }
}

/// Fire the player's weapon if its cooldown allows; returns the projectile ID
fn try_fire(state: &mut GameState, fire: Fire) -> Option<u32> {
    let cooldown = state.ticks_for(fire.mode.cooldown_secs());
    let player = state.player_mut()?;
    if !player.is_alive() {
        return None;
    }

    let slot = match fire.mode {
        FireMode::Primary => &mut player.primary_cooldown,
        FireMode::Secondary => &mut player.secondary_cooldown,
    };
    if *slot > 0 {
        return None;
    }
    *slot = cooldown;

    let shooter = player.id;
    state.spawn_projectile(fire.mode.projectile(), shooter, fire.target)
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let units = state.units_per_second();
    let multiplier = state.speed.multiplier();
    let obstacles = state.obstacle_blockers();
    let target = state.player().map(|p| (p.id, p.rect()));

    let mut hits: Vec<(Blocker, i32)> = Vec::new();
    let mut shots: Vec<(ProjectileKind, u32, Vec2)> = Vec::new();

    for enemy in state.characters.iter_mut() {
        if enemy.is_player() || !enemy.is_alive() {
            continue;
        }
        enemy.cool_down();

        let Some(attack) = enemy.kind.attack() else {
            continue;
        };
        let Some((target_id, target_rect)) = target else {
            enemy.velocity = Vec2::ZERO;
            continue;
        };

        let to_target = target_rect.center() - enemy.center();
        let distance = to_target.length();
        let toward = to_target.normalize_or_zero();
        let dir = match attack {
            Attack::Melee { .. } => toward,
            Attack::Ranged { range, .. } if distance > range => toward,
            Attack::Ranged { range, .. } if distance < range * RETREAT_RATIO => -toward,
            Attack::Ranged { .. } => Vec2::ZERO,
        };
        enemy.velocity = dir * enemy.base_speed * units;

        let mut rect = enemy.rect();
        let result = move_stepped(&mut rect, enemy.velocity * dt, |r| {
            if r.overlaps(&target_rect) {
                Some(Blocker::Character(target_id))
            } else {
                first_overlap(r, &obstacles)
            }
        });
        enemy.pos = rect.pos;

        if enemy.primary_cooldown > 0 {
            continue;
        }

        match attack {
            Attack::Melee { damage, cooldown_secs } => {
                let victim = if rect.expanded(CONTACT_MARGIN).overlaps(&target_rect) {
                    Some((Blocker::Character(target_id), damage))
                } else {
                    // Chew through the first breakable block in the way
                    [result.blocked_x, result.blocked_y]
                        .into_iter()
                        .flatten()
                        .find(|blocker| match blocker {
                            Blocker::Obstacle(id) => {
                                state.obstacles.iter().any(|o| o.id == *id && !o.invincible)
                            }
                            Blocker::Character(_) => false,
                        })
                        .map(|blocker| (blocker, 1))
                };
                if let Some(hit) = victim {
                    hits.push(hit);
                    enemy.primary_cooldown = secs_to_ticks(cooldown_secs, multiplier);
                }
            }
            Attack::Ranged {
                projectile,
                cooldown_secs,
                range,
            } => {
                if distance <= range * FIRE_RANGE_FACTOR {
                    shots.push((projectile, enemy.id, target_rect.center()));
                    enemy.primary_cooldown = secs_to_ticks(cooldown_secs, multiplier);
                }
            }
        }
    }

    for (blocker, amount) in hits {
        apply_damage(state, blocker, amount);
    }
    for (kind, shooter, aim) in shots {
        state.spawn_projectile(kind, shooter, aim);
    }
}

fn update_projectiles(state: &mut GameState, dt: f32) {
    let characters = &state.characters;
    let obstacles = &state.obstacles;
    let mut hits: Vec<(Blocker, i32)> = Vec::new();

    for projectile in state.projectiles.iter_mut() {
        if !projectile.active {
            continue;
        }
        if projectile.ttl_ticks == 0 {
            projectile.active = false;
            continue;
        }
        projectile.ttl_ticks -= 1;

        let shooter = projectile.shot_by;
        let hits_obstacles = projectile.kind.hits_obstacles();
        let mut rect = projectile.rect();
        let hit = sweep(&mut rect, projectile.velocity * dt, |r| {
            characters
                .iter()
                .find(|c| c.id != shooter && c.is_alive() && c.rect().overlaps(r))
                .map(|c| Blocker::Character(c.id))
                .or_else(|| {
                    if !hits_obstacles {
                        return None;
                    }
                    obstacles
                        .iter()
                        .find(|o| o.can_collide && o.rect().overlaps(r))
                        .map(|o| Blocker::Obstacle(o.id))
                })
        });
        projectile.pos = rect.pos;

        if let Some(blocker) = hit {
            projectile.active = false;
            hits.push((blocker, projectile.damage));
        }
    }

    for (blocker, amount) in hits {
        apply_damage(state, blocker, amount);
    }
}

fn apply_damage(state: &mut GameState, blocker: Blocker, amount: i32) {
    match blocker {
        Blocker::Character(id) => {
            let player_id = state.player_id();
            if let Some(character) = state.characters.iter_mut().find(|c| c.id == id) {
                character.lives -= amount;
                if character.id == player_id {
                    log::debug!("Player hit for {}, {} lives left", amount, character.lives);
                    state.events.push(GameEvent::PlayerHit {
                        damage: amount,
                        lives_left: character.lives,
                    });
                }
            }
        }
        Blocker::Obstacle(id) => {
            if let Some(obstacle) = state.obstacles.iter_mut().find(|o| o.id == id) {
                obstacle.damage(amount);
            }
        }
    }
}

/// Purge spent projectiles, broken obstacles and dead characters
fn cleanup(state: &mut GameState) {
    state.projectiles.retain(|p| p.active);

    let mut destroyed = Vec::new();
    state.obstacles.retain(|o| {
        if o.is_destroyed() {
            destroyed.push(o.kind);
            false
        } else {
            true
        }
    });
    for kind in destroyed {
        state.events.push(GameEvent::ObstacleDestroyed { kind });
    }

    let player_id = state.player_id();
    let mut killed = Vec::new();
    let mut player_died = false;
    state.characters.retain(|c| {
        if c.is_alive() {
            return true;
        }
        if c.id == player_id {
            player_died = true;
        } else {
            killed.push(c.kind);
        }
        false
    });

    for kind in killed {
        let score = kind.strength();
        state.score += score as u64;
        log::debug!("{} killed (+{})", kind.as_str(), score);
        state.events.push(GameEvent::EnemyKilled { kind, score });
    }

    if player_died {
        state.phase = GamePhase::GameOver;
        log::info!("Game over on wave {} with score {}", state.wave, state.score);
        state.events.push(GameEvent::PlayerDied {
            wave: state.wave,
            score: state.score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameSpeed;
    use crate::sim::state::{CharacterKind, ObstacleKind};
    use crate::sim::world::WorldConfig;
    use glam::UVec2;

    fn bare() -> GameState {
        GameState::bare(12345, GameSpeed::Normal, &WorldConfig::default())
    }

    fn player_center(state: &GameState) -> Vec2 {
        state.player().unwrap().center()
    }

    /// Spawn an enemy centered at `center`, attack ready or not
    fn enemy_at(state: &mut GameState, kind: CharacterKind, center: Vec2, ready: bool) -> u32 {
        let side = kind.side() as f32;
        let id = state.spawn_character(kind, center - Vec2::splat(side / 2.0));
        if ready {
            state.characters.iter_mut().find(|c| c.id == id).unwrap().primary_cooldown = 0;
        }
        id
    }

    fn run(state: &mut GameState, input: &TickInput, ticks: u32) {
        for _ in 0..ticks {
            tick(state, input, SIM_DT);
        }
    }

    #[test]
    fn test_tick_pause() {
        let mut state = bare();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.time_ticks, 0);

        // Paused ticks are no-ops
        run(&mut state, &TickInput::default(), 10);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_player_stops_at_wall() {
        let mut state = bare();
        let player = state.player().unwrap().rect();
        let wall_x = player.max().x + 50.0;
        state.spawn_obstacle(
            ObstacleKind::Bedrock,
            Vec2::new(wall_x, player.pos.y - 100.0),
            UVec2::new(32, 200),
        );

        let input = TickInput {
            movement: Vec2::X,
            ..Default::default()
        };
        run(&mut state, &input, 60);

        let max_x = state.player().unwrap().rect().max().x;
        assert!(max_x <= wall_x);
        assert!(wall_x - max_x < 1.0);
    }

    #[test]
    fn test_diagonal_movement_is_not_faster() {
        let mut state = bare();
        let start = player_center(&state);
        let input = TickInput {
            movement: Vec2::new(1.0, 1.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        let covered = player_center(&state).distance(start);
        let expected = GameSpeed::Normal.units_per_second() * SIM_DT;
        assert!((covered - expected).abs() < 1e-2);
    }

    #[test]
    fn test_game_speed_scales_movement() {
        let input = TickInput {
            movement: Vec2::Y,
            ..Default::default()
        };
        let mut normal = GameState::bare(1, GameSpeed::Normal, &WorldConfig::default());
        let mut fast = GameState::bare(1, GameSpeed::Fast, &WorldConfig::default());
        let start = player_center(&normal);
        run(&mut normal, &input, 10);
        run(&mut fast, &input, 10);

        let d_normal = player_center(&normal).distance(start);
        let d_fast = player_center(&fast).distance(start);
        assert!((d_fast / d_normal - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = bare();
        let target = player_center(&state) + Vec2::new(0.0, -300.0);
        let input = TickInput {
            fire: Some(Fire {
                mode: FireMode::Primary,
                target,
            }),
            ..Default::default()
        };

        run(&mut state, &input, 5);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].kind, ProjectileKind::ArrowBig);
        assert_eq!(state.projectiles[0].shot_by, state.player_id());

        // The fireball slot has its own cooldown
        let input = TickInput {
            fire: Some(Fire {
                mode: FireMode::Secondary,
                target,
            }),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_projectile_damages_exactly_once() {
        let mut state = bare();
        let zombie_center = player_center(&state) + Vec2::new(100.0, 0.0);
        let zombie = enemy_at(&mut state, CharacterKind::Zombie, zombie_center, false);

        let input = TickInput {
            fire: Some(Fire {
                mode: FireMode::Primary,
                target: zombie_center,
            }),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.projectiles.len(), 1);

        run(&mut state, &TickInput::default(), 20);
        assert_eq!(state.character(zombie).unwrap().lives, 10 - ProjectileKind::ArrowBig.damage());
        assert!(state.projectiles.is_empty());

        run(&mut state, &TickInput::default(), 20);
        assert_eq!(state.character(zombie).unwrap().lives, 10 - ProjectileKind::ArrowBig.damage());
        // Own arrow passed through the player harmlessly
        assert_eq!(state.player().unwrap().lives, 10);
    }

    #[test]
    fn test_melee_contact_damage_with_cooldown() {
        let mut state = bare();
        let player = state.player().unwrap().rect();
        // Same size as the player, flush against its right side
        let id = state.spawn_character(CharacterKind::Zombie, player.pos + Vec2::new(player.size.x, 0.0));
        state.characters.iter_mut().find(|c| c.id == id).unwrap().primary_cooldown = 0;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player().unwrap().lives, 9);
        assert!(state
            .drain_events()
            .contains(&GameEvent::PlayerHit { damage: 1, lives_left: 9 }));

        run(&mut state, &TickInput::default(), 30);
        assert_eq!(state.player().unwrap().lives, 9);
        // Never pushed into the player
        let zombie = state.character(id).unwrap().rect();
        assert!(!zombie.overlaps(&state.player().unwrap().rect()));
    }

    #[test]
    fn test_melee_enemy_chews_through_obstacle() {
        let mut state = bare();
        let center = player_center(&state);
        let dirt_pos = center + Vec2::new(-82.0, -16.0);
        let dirt = state.spawn_obstacle(ObstacleKind::Dirt, dirt_pos, UVec2::splat(32));
        // Zombie flush against the dirt's left face, level with the player
        let zombie_center = Vec2::new(dirt_pos.x - 12.0, center.y);
        enemy_at(&mut state, CharacterKind::Zombie, zombie_center, true);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.obstacle(dirt).unwrap().health, 4);
        assert_eq!(state.player().unwrap().lives, 10);
    }

    #[test]
    fn test_melee_enemy_ignores_bedrock() {
        let mut state = bare();
        let center = player_center(&state);
        let wall_pos = center + Vec2::new(-82.0, -16.0);
        let wall = state.spawn_obstacle(ObstacleKind::Bedrock, wall_pos, UVec2::splat(32));
        let zombie = enemy_at(&mut state, CharacterKind::Zombie, Vec2::new(wall_pos.x - 12.0, center.y), true);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.obstacle(wall).is_some());
        // Attack stays ready since nothing was hit
        assert_eq!(state.character(zombie).unwrap().primary_cooldown, 0);
    }

    #[test]
    fn test_melee_enemy_chews_obstacle_on_either_axis() {
        let mut state = bare();
        let center = player_center(&state);
        // Zombie up-left of the player: bedrock on its right, dirt below it
        let zombie_center = center + Vec2::new(-100.0, -100.0);
        state.spawn_obstacle(
            ObstacleKind::Bedrock,
            zombie_center + Vec2::new(12.0, -12.0),
            UVec2::splat(32),
        );
        let dirt = state.spawn_obstacle(ObstacleKind::Dirt, zombie_center + Vec2::new(-12.0, 12.0), UVec2::splat(32));
        enemy_at(&mut state, CharacterKind::Zombie, zombie_center, true);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.obstacle(dirt).unwrap().health, 4);
    }

    /// Fire the player's weapon at `target` and let the shot play out
    fn shoot_and_wait(state: &mut GameState, mode: FireMode, target: Vec2, ticks: u32) {
        let input = TickInput {
            fire: Some(Fire { mode, target }),
            ..Default::default()
        };
        tick(state, &input, SIM_DT);
        run(state, &TickInput::default(), ticks);
    }

    #[test]
    fn test_projectile_damages_obstacle() {
        let mut state = bare();
        let pos = player_center(&state) + Vec2::new(-16.0, -100.0);
        let wood = state.spawn_obstacle(ObstacleKind::Wood, pos, UVec2::splat(32));

        shoot_and_wait(&mut state, FireMode::Primary, pos + Vec2::splat(16.0), 30);

        assert_eq!(state.obstacle(wood).unwrap().health, 10 - ProjectileKind::ArrowBig.damage());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_destroys_obstacle() {
        let mut state = bare();
        let pos = player_center(&state) + Vec2::new(-16.0, -100.0);
        let dirt = state.spawn_obstacle(ObstacleKind::Dirt, pos, UVec2::splat(32));

        shoot_and_wait(&mut state, FireMode::Secondary, pos + Vec2::splat(16.0), 40);

        assert!(state.obstacle(dirt).is_none());
        assert!(state
            .drain_events()
            .contains(&GameEvent::ObstacleDestroyed { kind: ObstacleKind::Dirt }));
    }

    #[test]
    fn test_projectile_does_not_damage_bedrock() {
        let mut state = bare();
        let pos = player_center(&state) + Vec2::new(-16.0, -100.0);
        let wall = state.spawn_obstacle(ObstacleKind::Bedrock, pos, UVec2::splat(32));

        shoot_and_wait(&mut state, FireMode::Secondary, pos + Vec2::splat(16.0), 40);

        let wall = state.obstacle(wall).unwrap();
        assert_eq!(wall.health, i32::MAX);
        assert!(!wall.is_destroyed());
        // The shot was still stopped by the wall
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_dragon_fireball_ignores_obstacles() {
        let mut state = bare();
        let center = player_center(&state);
        // Dragon sitting inside its comfort band, a dirt block in the line of fire
        let dragon = enemy_at(&mut state, CharacterKind::Dragon, center + Vec2::new(0.0, 250.0), false);
        let dirt = state.spawn_obstacle(ObstacleKind::Dirt, center + Vec2::new(-16.0, 100.0), UVec2::splat(32));

        state.spawn_projectile(ProjectileKind::DragonFireball, dragon, center);
        run(&mut state, &TickInput::default(), 80);

        assert_eq!(state.obstacle(dirt).unwrap().health, 5);
        assert_eq!(state.player().unwrap().lives, 10 - ProjectileKind::DragonFireball.damage());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_wave_cleared_when_field_is_empty() {
        let mut state = bare();
        state.scheduler.phase = crate::sim::WavePhase::Fighting;

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.wave, 2);
        assert!(state.drain_events().contains(&GameEvent::WaveCleared { wave: 1 }));
    }

    #[test]
    fn test_huge_dt_is_clamped() {
        let mut state = bare();
        let start = player_center(&state);
        let input = TickInput {
            movement: Vec2::X,
            ..Default::default()
        };
        tick(&mut state, &input, 1.0e9);

        let covered = player_center(&state).distance(start);
        let expected = GameSpeed::Normal.units_per_second() * MAX_TICK_DT;
        assert!((covered - expected).abs() < 1e-2);

        tick(&mut state, &input, f32::NAN);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_ranged_enemy_keeps_distance_and_shoots() {
        let mut state = bare();
        let center = player_center(&state);

        let close = enemy_at(&mut state, CharacterKind::Skeleton, center + Vec2::new(0.0, 50.0), false);
        let shooter = enemy_at(&mut state, CharacterKind::Skeleton, center + Vec2::new(150.0, 0.0), true);

        tick(&mut state, &TickInput::default(), SIM_DT);

        let close_distance = state.character(close).unwrap().center().distance(center);
        assert!(close_distance > 50.0);

        assert_eq!(state.projectiles.len(), 1);
        let arrow = &state.projectiles[0];
        assert_eq!(arrow.shot_by, shooter);
        assert_eq!(arrow.kind, ProjectileKind::ArrowSmall);
        assert!(arrow.velocity.x < 0.0);

        // Standing in its comfort band, the shooter holds position
        let shooter_center = state.character(shooter).unwrap().center();
        assert!((shooter_center - (center + Vec2::new(150.0, 0.0))).length() < 1e-3);

        run(&mut state, &TickInput::default(), 40);
        assert_eq!(state.player().unwrap().lives, 9);
    }

    #[test]
    fn test_kill_awards_score() {
        let mut state = bare();
        let spot = player_center(&state) + Vec2::new(0.0, 250.0);
        let id = enemy_at(&mut state, CharacterKind::Blaze, spot, false);
        state.characters.iter_mut().find(|c| c.id == id).unwrap().lives = 0;

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.character(id).is_none());
        assert_eq!(state.score, 6);
        assert!(state.drain_events().contains(&GameEvent::EnemyKilled {
            kind: CharacterKind::Blaze,
            score: 6
        }));
    }

    #[test]
    fn test_player_death_ends_game() {
        let mut state = bare();
        state.player_mut().unwrap().lives = 0;

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.player().is_none());
        assert!(state
            .drain_events()
            .contains(&GameEvent::PlayerDied { wave: 1, score: 0 }));

        let ticks = state.time_ticks;
        run(&mut state, &TickInput::default(), 10);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_stray_projectile_expires() {
        let mut state = bare();
        let id = state.player_id();
        // Aimed at its own center: never moves, never hits
        let target = player_center(&state);
        state.spawn_projectile(ProjectileKind::ArrowBig, id, target);

        let ttl = state.ticks_for(PROJECTILE_TTL_SECS);
        run(&mut state, &TickInput::default(), ttl + 1);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let config = WorldConfig {
            chunks: 3,
            ..WorldConfig::default()
        };
        let mut state1 = GameState::with_config(99999, GameSpeed::Normal, &config);
        let mut state2 = GameState::with_config(99999, GameSpeed::Normal, &config);

        for i in 0..900u32 {
            let angle = i as f32 * 0.05;
            let input = TickInput {
                movement: Vec2::new(angle.cos(), angle.sin()),
                fire: (i % 7 == 0).then(|| Fire {
                    mode: FireMode::Primary,
                    target: Vec2::new(angle.sin(), angle.cos()) * 500.0 + Vec2::splat(768.0),
                }),
                pause: false,
            };
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.wave, state2.wave);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.characters.len(), state2.characters.len());
        for (a, b) in state1.characters.iter().zip(&state2.characters) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.pos, b.pos);
        }
        assert_eq!(state1.obstacles.len(), state2.obstacles.len());
    }
}
