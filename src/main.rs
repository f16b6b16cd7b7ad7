//! Gapbox headless runner
//!
//! Usage: `gapbox [settings.json] [seconds]`
//!
//! A settings file that is missing or fails validation is reported and
//! replaced by the defaults.
//!
//! Drives the fixed-timestep loop without a window and logs population
//! statistics once per simulated second. Set `RUST_LOG=debug` to see
//! individual escapes and spawns.

use anyhow::{Context, Result};

use gapbox::Settings;
use gapbox::consts::{MAX_SUBSTEPS, SIM_DT};
use gapbox::sim::{SimState, tick};

const DEFAULT_SECONDS: f32 = 30.0;
/// Pretend frame time for the headless loop (60 Hz display)
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Gapbox (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(&path),
        None => Settings::default(),
    };
    let seconds = match args.next() {
        Some(s) => s
            .parse::<f32>()
            .with_context(|| format!("invalid duration {s:?}"))?,
        None => DEFAULT_SECONDS,
    };

    let mut state = SimState::new(settings);
    let ticks_per_second = (1.0 / SIM_DT).round() as u64;
    let mut accumulator = 0.0;
    let mut escaped_total = 0usize;
    let mut spawned_total = 0usize;

    let frames = (seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        accumulator += FRAME_DT;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let report = tick(&mut state, SIM_DT);
            escaped_total += report.lifecycle.culled;
            spawned_total += report.lifecycle.spawned;
            accumulator -= SIM_DT;
            substeps += 1;

            if state.time_ticks % ticks_per_second == 0 {
                log::info!(
                    "t={:>4}s balls={:>3} pending={:>3} escaped={:>4} spawned={:>4} rotation={:.2}",
                    state.time_ticks / ticks_per_second,
                    state.ball_count(),
                    state.pending_spawns(),
                    escaped_total,
                    spawned_total,
                    state.boundary().rotation()
                );
            }
        }
    }

    log::info!(
        "Finished after {} ticks: {} balls, {} escaped, {} spawned",
        state.time_ticks,
        state.ball_count(),
        escaped_total,
        spawned_total
    );
    Ok(())
}
