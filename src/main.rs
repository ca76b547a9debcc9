//! Quiver headless runner
//!
//! Plays a session on autopilot at a fixed timestep and prints the final
//! HUD as JSON.
//!
//! Usage: `quiver [TUNING_JSON] [SECONDS] [SEED]`

use std::process::ExitCode;

use quiver::Tuning;
use quiver::consts::*;
use quiver::sim::{GameState, TickInput, tick};

/// Frame delta fed to the runner, slightly off the sim step so the
/// accumulator gets exercised
const FRAME_DT: f32 = 1.0 / 57.0;

struct Args {
    tuning: Option<String>,
    seconds: f32,
    seed: u64,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let tuning = args.next().filter(|p| p != "-");
    let seconds = match args.next() {
        Some(s) => s.parse().map_err(|_| format!("bad duration `{s}`"))?,
        None => 60.0,
    };
    let seed = match args.next() {
        Some(s) => s.parse().map_err(|_| format!("bad seed `{s}`"))?,
        None => 12345,
    };
    Ok(Args {
        tuning,
        seconds,
        seed,
    })
}

fn load_tuning(path: Option<&str>) -> Result<Tuning, String> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    Tuning::from_json(&json).map_err(|e| format!("{path}: {e}"))
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let state = load_tuning(args.tuning.as_deref())
        .and_then(|tuning| GameState::with_tuning(args.seed, tuning).map_err(|e| e.to_string()));
    let mut state = match state {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to start session: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Quiver (headless) running {:.0}s with seed {}",
        args.seconds,
        args.seed
    );

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut accumulator = 0.0;
    let mut clock = 0.0;
    while clock < args.seconds && !state.game_over() {
        clock += FRAME_DT;
        accumulator += FRAME_DT;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    match serde_json::to_string_pretty(&state.hud()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to encode HUD: {e}");
            ExitCode::FAILURE
        }
    }
}
