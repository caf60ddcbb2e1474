//! Host loop helper that turns frame timestamps into engine steps.
//!
//! The runner never reads a clock: the caller passes the frame time in milliseconds to
//! [`Runner::tick`], which picks a delta and a correction factor and steps the engine.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::{self, Result};
use crate::physics::Engine;

/// Configuration for a [`Runner`].
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Target frame rate. Default: 60.
    pub fps: f64,
    /// Always step by `1000 / fps` instead of the measured frame time. Default: false.
    pub is_fixed: bool,
    /// Number of recent frame times the variable delta is chosen from. Default: 60.
    pub delta_sample_size: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            is_fixed: false,
            delta_sample_size: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Runner {
    config: RunnerConfig,
    /// Set to false to stop stepping the engine; ticks still track time.
    pub enabled: bool,
    fps: f64,
    delta: f64,
    delta_min: f64,
    delta_max: f64,
    correction: f64,
    delta_history: VecDeque<f64>,
    time_prev: Option<f64>,
    time_scale_prev: f64,
    counter_timestamp: f64,
    frame_counter: u32,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Result<Self> {
        let fps = error::positive("fps", config.fps)?;
        let delta_sample_size = config.delta_sample_size.max(1);
        Ok(Self {
            config: RunnerConfig {
                fps,
                delta_sample_size,
                ..config
            },
            enabled: true,
            fps,
            delta: 1000.0 / fps,
            delta_min: 1000.0 / fps,
            delta_max: 1000.0 / (fps * 0.5),
            correction: 1.0,
            delta_history: VecDeque::with_capacity(delta_sample_size),
            time_prev: None,
            time_scale_prev: 1.0,
            counter_timestamp: 0.0,
            frame_counter: 0,
        })
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Frame rate measured over the last whole second of ticks.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Delta used by the last tick, in milliseconds.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Correction used by the last tick.
    pub fn correction(&self) -> f64 {
        self.correction
    }

    /// Advance `engine` for a frame that started at `time` milliseconds.
    ///
    /// In variable mode the delta is the smallest recent frame time, clamped to
    /// `[1000 / fps, 2000 / fps]`, so a single slow frame does not destabilise the step.
    pub fn tick(&mut self, engine: &mut Engine, time: f64) {
        let time_scale = engine.timing.time_scale;

        let (delta, mut correction) = if self.config.is_fixed {
            (self.delta, 1.0)
        } else {
            let sample = self.time_prev.map_or(self.delta, |prev| time - prev);
            self.time_prev = Some(time);

            if self.delta_history.len() == self.config.delta_sample_size {
                self.delta_history.pop_front();
            }
            self.delta_history.push_back(sample);

            let delta = self
                .delta_history
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min)
                .clamp(self.delta_min, self.delta_max);
            let correction = delta / self.delta;
            self.delta = delta;
            (delta, correction)
        };

        if self.time_scale_prev != 0.0 {
            correction *= time_scale / self.time_scale_prev;
        }
        if time_scale == 0.0 {
            correction = 0.0;
        }
        self.time_scale_prev = time_scale;
        self.correction = correction;

        self.frame_counter += 1;
        let elapsed = time - self.counter_timestamp;
        if elapsed >= 1000.0 {
            self.fps = f64::from(self.frame_counter) / (elapsed / 1000.0);
            self.counter_timestamp = time;
            self.frame_counter = 0;
            debug!(fps = self.fps, delta, "runner frame rate");
        }

        if self.enabled {
            engine.update(delta, correction);
        }
    }
}
