//! Craft Me Up headless driver
//!
//! Generates a world and plays it with a simple autopilot for a fixed number
//! of ticks. Useful for soak-testing the simulation and for reproducing a run
//! from its seed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;

use craft_me_up::consts::*;
use craft_me_up::settings::DEFAULT_FILE;
use craft_me_up::sim::{
    Entity, Fire, FireMode, GameEvent, GamePhase, GameState, TickInput, WorldConfig, tick,
};
use craft_me_up::{Camera, GameSpeed, Settings};
use env_logger::Env;

/// Enemies closer than this make the autopilot back away
const FLEE_DISTANCE: f32 = 224.0;
/// Screen size assumed for the autopilot's field of view
const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);
/// Largest world accepted on the command line, in chunks per side
const MAX_CHUNKS: i64 = 64;

/// Top-down survival shooter, played headless by an autopilot
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of simulation ticks to run (60 per second at normal speed)
    #[arg(long, default_value_t = 3 * 60 * TICKS_PER_SECOND as u64)]
    ticks: u64,

    /// Settings file
    #[arg(long, default_value = DEFAULT_FILE)]
    settings: PathBuf,

    /// Game speed: slow, normal or fast (saved to the settings file)
    #[arg(long, value_parser = parse_speed)]
    game_speed: Option<GameSpeed>,

    /// World side, in chunks
    #[arg(long, default_value_t = DEFAULT_WORLD_CHUNKS, value_parser = clap::value_parser!(u32).range(1..=MAX_CHUNKS))]
    chunks: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_speed(s: &str) -> Result<GameSpeed, String> {
    GameSpeed::from_str(s).ok_or_else(|| format!("unknown game speed '{s}'"))
}

/// Game instance holding all state
struct Game {
    state: GameState,
    camera: Camera,
    last_phase: GamePhase,
}

impl Game {
    fn new(seed: u64, speed: GameSpeed, config: &WorldConfig) -> Self {
        let state = GameState::with_config(seed, speed, config);
        let center = state.player().map_or(state.world.center(), |p| p.center());
        Self {
            state,
            camera: Camera::new(center, VIEWPORT),
            last_phase: GamePhase::Running,
        }
    }

    /// Run one tick; returns false once the game is over
    fn step(&mut self) -> bool {
        let input = autopilot(&self.state, &self.camera);
        tick(&mut self.state, &input, SIM_DT);

        if let Some(player) = self.state.player() {
            self.camera.follow(player.center(), SIM_DT);
        }

        for event in self.state.drain_events() {
            match event {
                GameEvent::PlayerHit { damage, lives_left } => {
                    log::info!("Ouch! -{damage} ({lives_left} lives left)");
                }
                GameEvent::ObstacleDestroyed { kind } => {
                    log::debug!("{kind:?} destroyed");
                }
                _ => {}
            }
        }

        if self.state.phase != self.last_phase {
            log::debug!("Phase {:?} -> {:?}", self.last_phase, self.state.phase);
            self.last_phase = self.state.phase;
        }
        self.state.phase != GamePhase::GameOver
    }
}

/// Back away from the closest enemy and shoot at it when it is on screen
fn autopilot(state: &GameState, camera: &Camera) -> TickInput {
    let Some(player) = state.player() else {
        return TickInput::default();
    };
    let center = player.center();

    let closest = state
        .characters
        .iter()
        .filter(|c| !c.is_player() && c.is_alive())
        .min_by(|a, b| {
            let da = a.center().distance_squared(center);
            let db = b.center().distance_squared(center);
            da.total_cmp(&db)
        });
    let Some(enemy) = closest else {
        return TickInput::default();
    };

    let away = center - enemy.center();
    let movement = if away.length() < FLEE_DISTANCE {
        away.normalize_or_zero()
    } else {
        Vec2::ZERO
    };

    let fire = camera.is_visible(&enemy.rect()).then(|| {
        let mode = if player.secondary_cooldown == 0 {
            FireMode::Secondary
        } else {
            FireMode::Primary
        };
        Fire {
            mode,
            target: enemy.center(),
        }
    });

    TickInput {
        movement,
        fire,
        pause: false,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();

    let mut settings = Settings::load_or_default(&args.settings);
    if let Some(speed) = args.game_speed {
        if speed != settings.game_speed {
            settings.game_speed = speed;
            settings
                .save_to(&args.settings)
                .with_context(|| format!("saving settings to {}", args.settings.display()))?;
        }
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = WorldConfig {
        chunks: args.chunks,
        ..WorldConfig::default()
    };
    log::info!(
        "Craft Me Up starting: seed={}, speed={}, {} ticks",
        seed,
        settings.game_speed.as_str(),
        args.ticks
    );

    let mut game = Game::new(seed, settings.game_speed, &config);
    for _ in 0..args.ticks {
        if !game.step() {
            break;
        }
    }

    let state = &game.state;
    let lives = state.player().map_or(0, |p| p.lives.max(0));
    println!("seed:    {}", seed);
    println!("ticks:   {}", state.time_ticks);
    println!("wave:    {}", state.wave);
    println!("score:   {}", state.score);
    println!("lives:   {}", lives);
    println!("enemies: {}", state.enemy_count());
    if state.phase == GamePhase::GameOver {
        println!("GAME OVER");
    }
    Ok(())
}
