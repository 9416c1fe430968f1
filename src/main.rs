//! Charge Invaders headless runner
//!
//! Drives the simulation with a simple autopilot and reports how the run
//! went. Rendering and input polling live outside this crate.
//!
//! Usage: `charge-invaders [--seed N] [--max-ticks N] [--tuning FILE]`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use charge_invaders::sim::{GameEvent, GameState, TickInput, tick};
use charge_invaders::{Snapshot, Tuning};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "charge-invaders")]
#[command(about = "Run a headless Charge Invaders game under a simple autopilot")]
struct Cli {
    /// Run seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Stop after this many ticks (default: five minutes of play at 30 Hz)
    #[arg(long, default_value_t = 5 * 60 * 30)]
    max_ticks: u64,
    /// JSON balance overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let tuning = match &cli.tuning {
        Some(path) => load_tuning(path)?,
        None => Tuning::default(),
    };
    let mut state = GameState::with_tuning(cli.seed, tuning).context("invalid tuning")?;

    log::info!(
        "Charge Invaders (headless) seed {}, up to {} ticks",
        cli.seed,
        cli.max_ticks
    );

    let mut kills = 0u32;
    let mut specials = 0u32;
    for _ in 0..cli.max_ticks {
        let input = autopilot(&state);
        tick(&mut state, &input);
        for event in &state.events {
            match event {
                GameEvent::EnemyDestroyed { .. } => kills += 1,
                GameEvent::SpecialFired(_) => specials += 1,
                _ => {}
            }
        }
        if state.game_over {
            break;
        }
    }

    let snapshot = Snapshot::capture(&state);
    println!(
        "score {} | wave {} | lives {} | kills {} | specials {} | time {}{}",
        snapshot.hud.score,
        snapshot.hud.wave,
        snapshot.hud.lives,
        kills,
        specials,
        snapshot.play_time_label(),
        if snapshot.hud.game_over { " | GAME OVER" } else { "" }
    );
    if log::log_enabled!(log::Level::Debug) {
        let json = serde_json::to_string(&snapshot).context("failed to serialize snapshot")?;
        log::debug!("Final snapshot: {json}");
    }
    Ok(())
}

fn load_tuning(path: &Path) -> Result<Tuning> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed reading tuning file {}", path.display()))?;
    Tuning::from_json(&json).with_context(|| format!("invalid tuning file {}", path.display()))
}

/// Chase the lowest live enemy, fire constantly, and pulse the special
fn autopilot(state: &GameState) -> TickInput {
    let player_center = state.player.pos.x + 4.0;
    let target = state
        .formation
        .active()
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos.x + 4.0);

    let (move_left, move_right) = match target {
        Some(x) if x < player_center - 2.0 => (true, false),
        Some(x) if x > player_center + 2.0 => (false, true),
        _ => (false, false),
    };

    let special = &state.player.special;
    let charge_held = !(special.is_full() && special.cooldown_ticks == 0);

    TickInput {
        move_left,
        move_right,
        fire_held: true,
        charge_held,
        ..Default::default()
    }
}
