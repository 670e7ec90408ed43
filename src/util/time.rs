//! Time utilities for the fixed-step frame loop

use std::time::{Duration, Instant};

/// Tick rate configuration
pub const SIMULATION_TPS: u32 = 120; // 120 ticks per second
pub const RENDER_FPS: u32 = 60;
/// Longest frame delta fed to the accumulator, so a stall never causes a catch-up burst
pub const MAX_FRAME_DT: Duration = Duration::from_millis(33);

/// Calculate delta time for physics (in seconds)
pub fn tick_delta(tick_hz: u32) -> f32 {
    1.0 / tick_hz as f32
}

/// Accumulates wall-clock frame time and hands out whole simulation steps
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_frame_dt: f32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(tick_hz: u32, max_frame_dt: Duration) -> Self {
        Self {
            step: tick_delta(tick_hz),
            max_frame_dt: max_frame_dt.as_secs_f32(),
            accumulator: 0.0,
        }
    }

    /// Simulation dt for each step
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed one frame's elapsed time; returns how many steps to simulate.
    /// The remainder carries over to the next frame.
    pub fn advance(&mut self, frame_dt: Duration) -> u32 {
        self.accumulator += frame_dt.as_secs_f32().min(self.max_frame_dt);

        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }
}

/// Measures time between frames
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since the last lap, restarting the timer
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start);
        self.start = now;
        elapsed
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
