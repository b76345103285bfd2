//! Presentation-layer seam
//!
//! The simulation talks to its host (HUD, DOM, scene) only through this
//! trait; it is injected at the tick entry points and never looked up
//! dynamically. All calls are synchronous fire-and-forget: no return value
//! is consumed by the core.

use super::state::WorldState;

/// Callbacks the core invokes on the presentation layer.
///
/// Damage application is not part of this trait: it is the orchestrator's
/// own [`apply_damage`](super::tick::apply_damage) entry point, called
/// directly by the physics and obstacle passes.
pub trait Host {
    /// Refresh the HUD from the current state. Must not mutate state.
    fn update_ui(&mut self, state: &WorldState);
    /// Show a transient message. `color` is a CSS-style hex string; `None`
    /// means the host's default accent.
    fn trigger_notification(&mut self, text: &str, color: Option<&str>);
    /// Screen pulse cue for the dynamite countdown/boom
    fn trigger_dynamite_flash(&mut self);
    /// Impact cue. The core sets and decays the shake intensity itself;
    /// this only informs the host.
    fn shake_camera(&mut self);
    /// The run has ended; game-state is already `GameOver` when this fires.
    fn game_over(&mut self, state: &WorldState);
}

/// Host that ignores every callback
#[derive(Debug, Default)]
pub struct NullHost;

impl Host for NullHost {
    fn update_ui(&mut self, _state: &WorldState) {}
    fn trigger_notification(&mut self, _text: &str, _color: Option<&str>) {}
    fn trigger_dynamite_flash(&mut self) {}
    fn shake_camera(&mut self) {}
    fn game_over(&mut self, _state: &WorldState) {}
}

/// Test double that records every callback
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub notifications: Vec<(String, Option<String>)>,
    pub ui_updates: usize,
    pub flashes: usize,
    pub shakes: usize,
    pub game_overs: usize,
}

#[cfg(test)]
impl RecordingHost {
    pub fn notified(&self, text: &str) -> usize {
        self.notifications.iter().filter(|(t, _)| t == text).count()
    }
}

#[cfg(test)]
impl Host for RecordingHost {
    fn update_ui(&mut self, _state: &WorldState) {
        self.ui_updates += 1;
    }

    fn trigger_notification(&mut self, text: &str, color: Option<&str>) {
        self.notifications
            .push((text.to_string(), color.map(str::to_string)));
    }

    fn trigger_dynamite_flash(&mut self) {
        self.flashes += 1;
    }

    fn shake_camera(&mut self) {
        self.shakes += 1;
    }

    fn game_over(&mut self, _state: &WorldState) {
        self.game_overs += 1;
    }
}
