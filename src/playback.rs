//! Playback state for sweep-by-sweep viewing.
//!
//! Controls play/pause, single stepping, and speed for watching a pattern form.

use bevy::prelude::*;

/// Slowest and fastest playback rates, in sweeps per second.
pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 240.0;

/// Playback state for the viewer.
#[derive(Resource, Debug)]
pub struct PlaybackState {
    /// Whether the simulation is auto-advancing.
    pub playing: bool,
    /// Speed in sweeps per second.
    pub speed: f32,
    /// Time accumulator for sub-frame stepping.
    pub accumulator: f32,
    /// Single sweeps requested while paused.
    pub pending_steps: usize,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            playing: false,
            speed: 10.0,
            accumulator: 0.0,
            pending_steps: 0,
        }
    }
}

impl PlaybackState {
    pub fn new(speed: f32) -> Self {
        Self {
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
            ..Default::default()
        }
    }

    /// Toggle between playing and paused.
    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Queue one sweep. Ignored while playing.
    pub fn request_step(&mut self) {
        if !self.playing {
            self.pending_steps += 1;
        }
    }

    /// Back to paused with nothing queued. Speed is kept.
    pub fn reset(&mut self) {
        self.playing = false;
        self.accumulator = 0.0;
        self.pending_steps = 0;
    }

    /// Set the speed (clamped to `MIN_SPEED..=MAX_SPEED`).
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn faster(&mut self) {
        self.set_speed(self.speed * 2.0);
    }

    pub fn slower(&mut self) {
        self.set_speed(self.speed * 0.5);
    }

    /// Number of sweeps to run this frame, given the frame time in seconds.
    pub fn take_due_sweeps(&mut self, delta_secs: f32) -> usize {
        let mut due = std::mem::take(&mut self.pending_steps);
        if self.playing {
            self.accumulator += delta_secs * self.speed;
            let whole = self.accumulator.floor();
            self.accumulator -= whole;
            due += whole as usize;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let state = PlaybackState::default();
        assert!(!state.playing);
        assert_eq!(state.speed, 10.0);
        assert_eq!(state.pending_steps, 0);
    }

    #[test]
    fn test_toggle_play() {
        let mut state = PlaybackState::default();
        state.toggle_play();
        assert!(state.playing);
        state.toggle_play();
        assert!(!state.playing);
    }

    #[test]
    fn test_speed_clamped() {
        let mut state = PlaybackState::new(1000.0);
        assert_eq!(state.speed, MAX_SPEED);
        state.set_speed(0.0);
        assert_eq!(state.speed, MIN_SPEED);
        state.set_speed(4.0);
        state.faster();
        assert_eq!(state.speed, 8.0);
        state.slower();
        state.slower();
        assert_eq!(state.speed, 2.0);
    }

    #[test]
    fn test_paused_runs_only_requested_steps() {
        let mut state = PlaybackState::default();
        assert_eq!(state.take_due_sweeps(1.0), 0);
        state.request_step();
        state.request_step();
        assert_eq!(state.take_due_sweeps(1.0), 2);
        assert_eq!(state.take_due_sweeps(1.0), 0);
    }

    #[test]
    fn test_playing_accumulates_fractional_time() {
        let mut state = PlaybackState::new(4.0);
        state.playing = true;
        // 0.1 s at 4 sweeps/s = 0.4 sweeps per frame
        assert_eq!(state.take_due_sweeps(0.1), 0);
        assert_eq!(state.take_due_sweeps(0.1), 0);
        assert_eq!(state.take_due_sweeps(0.125), 1);
        assert_eq!(state.take_due_sweeps(1.0), 4);
    }

    #[test]
    fn test_step_request_ignored_while_playing() {
        let mut state = PlaybackState::default();
        state.playing = true;
        state.request_step();
        assert_eq!(state.pending_steps, 0);
    }

    #[test]
    fn test_reset_keeps_speed() {
        let mut state = PlaybackState::new(32.0);
        state.playing = true;
        state.accumulator = 0.7;
        state.reset();
        assert!(!state.playing);
        assert_eq!(state.accumulator, 0.0);
        assert_eq!(state.speed, 32.0);
    }
}
