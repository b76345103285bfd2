//! Powder Run headless demo
//!
//! Drives the simulation core with a scripted rider for a minute of game
//! time and logs HUD updates through a console host. Useful for eyeballing
//! balance changes without a renderer attached.

use powder_run::consts::REF_FPS;
use powder_run::sim::{self, GamePhase, Host, TickInput, WorldState};

/// Host that routes every callback to the logger
#[derive(Default)]
struct ConsoleHost {
    frames: u32,
}

impl Host for ConsoleHost {
    fn update_ui(&mut self, state: &WorldState) {
        self.frames += 1;
        if self.frames % 120 == 0 {
            log::info!(
                "hud: {:>6.0} m  hp {:>3.0}  lives {}  speed {:.2}",
                state.score,
                state.stats.hp,
                state.stats.lives,
                state.speed
            );
        }
    }

    fn trigger_notification(&mut self, text: &str, color: Option<&str>) {
        log::info!("note: {text} ({})", color.unwrap_or("#f1c40f"));
    }

    fn trigger_dynamite_flash(&mut self) {
        log::debug!("dynamite flash");
    }

    fn shake_camera(&mut self) {
        log::debug!("camera shake");
    }

    fn game_over(&mut self, state: &WorldState) {
        log::info!("game over at {:.0} m", state.score);
    }
}

/// Scripted input: mostly tucked downhill, with steering pulses and the
/// occasional charged jump.
fn scripted_input(frame: u32) -> TickInput {
    let second = frame / REF_FPS as u32;
    let mut input = TickInput {
        up: true,
        ..Default::default()
    };
    match second % 8 {
        2 => input.left = true,
        5 => input.right = true,
        7 => {
            if frame % 60 == 0 {
                input.jump = true;
                input.jump_charge = 0.7;
            }
        }
        _ => {}
    }
    input
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    log::info!("Powder Run demo, seed {seed}");

    let mut state = WorldState::new(seed);
    let mut host = ConsoleHost::default();
    sim::reset(&mut state, true, &mut host);
    state.phase = GamePhase::Playing;

    let dt = 1.0 / REF_FPS;
    for frame in 0..(60 * REF_FPS as u32) {
        let input = scripted_input(frame);
        sim::tick(dt, &input, &mut state, &mut host);
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "run finished: {:.0} m, hp {:.0}, lives {}",
        state.score,
        state.stats.hp,
        state.stats.lives
    );
}
