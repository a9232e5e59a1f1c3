//! Difficulty as a pure function of the current score.
//!
//! Nothing here remembers previous scores: a fresh session at score 0 is
//! exactly as easy as the very first one.

use crate::config::Tuning;
use crate::constants::MIN_SPEED_FACTOR;

/// Scroll speed for `score`, capped at `max_speed`.
pub fn scroll_speed(tuning: &Tuning, score: u32) -> f64 {
    let speed = tuning.base_speed + score as f64 * tuning.speed_per_point;
    speed.clamp(tuning.base_speed, tuning.max_speed.max(tuning.base_speed))
}

/// Ticks between spawns for `score`, never below `min_spawn`.
pub fn target_spawn_delay(tuning: &Tuning, score: u32) -> i32 {
    let reduction = (score as f64 * tuning.spawn_reduction_per_point).floor();
    let delay = (tuning.start_spawn as f64 - reduction).max(tuning.min_spawn as f64);
    delay.min(tuning.start_spawn.max(tuning.min_spawn) as f64) as i32
}

/// Multiplier in `[0.6, 1.0]` that shortens spawn gaps as speed rises.
pub fn speed_factor(tuning: &Tuning, speed: f64) -> f64 {
    let range = tuning.max_speed - tuning.base_speed;
    if range <= 0.0 || !speed.is_finite() {
        return 1.0;
    }
    (1.0 - (speed - tuning.base_speed) / range).clamp(MIN_SPEED_FACTOR, 1.0)
}

/// Countdown to use right after a spawn.
pub fn next_spawn_timer(tuning: &Tuning, score: u32, speed: f64) -> i32 {
    let base = target_spawn_delay(tuning, score) as f64;
    let scaled = (base * speed_factor(tuning, speed)).round() as i32;
    scaled.max(tuning.min_spawn)
}
