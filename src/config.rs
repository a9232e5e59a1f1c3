//! Runtime configuration: tuning constants plus host settings.
//!
//! Defaults come from `constants.rs`. An optional `~/.robot-runner/config.json`
//! may override any subset of fields; missing fields keep their defaults.

use crate::constants::*;
use crate::utils::persistence::load_json_or_default;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Physics, difficulty and scoring constants for one session.
///
/// Fixed for the lifetime of a session. Gravity and jump force never scale
/// with difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f64,
    pub jump_force: f64,
    pub base_speed: f64,
    pub speed_per_point: f64,
    pub max_speed: f64,
    pub start_spawn: i32,
    pub min_spawn: i32,
    pub spawn_reduction_per_point: f64,
    pub score_interval_ticks: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            base_speed: BASE_SPEED,
            speed_per_point: SPEED_PER_POINT,
            max_speed: MAX_SPEED,
            start_spawn: START_SPAWN,
            min_spawn: MIN_SPAWN,
            spawn_reduction_per_point: SPAWN_REDUCTION_PER_POINT,
            score_interval_ticks: SCORE_INTERVAL_TICKS,
        }
    }
}

impl Tuning {
    /// Clamp values that would make derived quantities meaningless.
    ///
    /// Invalid fields fall back to their defaults (or get pulled into a
    /// consistent order) rather than being rejected.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            self.gravity = defaults.gravity;
        }
        if !(self.jump_force.is_finite() && self.jump_force < 0.0) {
            self.jump_force = defaults.jump_force;
        }
        if !(self.base_speed.is_finite() && self.base_speed > 0.0) {
            self.base_speed = defaults.base_speed;
        }
        if !(self.speed_per_point.is_finite() && self.speed_per_point >= 0.0) {
            self.speed_per_point = defaults.speed_per_point;
        }
        if !self.max_speed.is_finite() || self.max_speed < self.base_speed {
            self.max_speed = self.base_speed.max(defaults.max_speed);
        }
        if !(self.spawn_reduction_per_point.is_finite() && self.spawn_reduction_per_point >= 0.0)
        {
            self.spawn_reduction_per_point = defaults.spawn_reduction_per_point;
        }
        self.min_spawn = self.min_spawn.max(1);
        self.start_spawn = self.start_spawn.max(self.min_spawn);
        if self.score_interval_ticks == 0 {
            self.score_interval_ticks = defaults.score_interval_ticks;
        }
        self
    }
}

/// Host configuration for the terminal binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Directory holding the sprite sheets and obstacle image.
    pub asset_dir: PathBuf,
    /// Milliseconds between frames.
    pub frame_ms: u64,
    /// RNG seed for reproducible obstacle sequences (None = random).
    pub seed: Option<u64>,
    pub tuning: Tuning,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            frame_ms: FRAME_INTERVAL_MS,
            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl RunnerConfig {
    /// Load ~/.robot-runner/config.json, or defaults if absent or unreadable.
    pub fn load() -> Self {
        load_json_or_default::<Self>(CONFIG_FILE_NAME).sanitized()
    }

    pub fn sanitized(mut self) -> Self {
        self.tuning = self.tuning.sanitized();
        self.frame_ms = self.frame_ms.clamp(1, 1000);
        self
    }
}
