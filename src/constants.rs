//! Fixed game constants for Robot Runner.
//!
//! All positions are in logical surface units (480×220), independent of the
//! size of whatever the scene is finally drawn on.

// Frame timing
pub const FRAME_INTERVAL_MS: u64 = 16; // ~60 FPS

// Drawing surface
pub const VIEWPORT_WIDTH: f64 = 480.0;
pub const VIEWPORT_HEIGHT: f64 = 220.0;

/// Top edge of the ground strip. The player's feet rest here.
pub const GROUND_LINE: f64 = 190.0;
pub const GROUND_THICKNESS: f64 = 6.0;

// Player hitbox (same as the sprite box)
pub const PLAYER_X: f64 = 40.0;
pub const PLAYER_WIDTH: f64 = 64.0;
pub const PLAYER_HEIGHT: f64 = 64.0;

// Physics
pub const GRAVITY: f64 = 0.8;
pub const JUMP_FORCE: f64 = -16.0;
/// Slack on the ground test so float drift never delays a landing by a tick.
pub const GROUND_EPSILON: f64 = 1e-6;

// Difficulty
pub const BASE_SPEED: f64 = 5.0;
pub const SPEED_PER_POINT: f64 = 0.35;
pub const MAX_SPEED: f64 = 18.0;
pub const START_SPAWN: i32 = 90;
pub const MIN_SPAWN: i32 = 28;
pub const SPAWN_REDUCTION_PER_POINT: f64 = 1.0;
/// Lower bound of the speed factor applied to the next spawn countdown.
pub const MIN_SPEED_FACTOR: f64 = 0.6;

// Spawning
pub const SPAWN_MARGIN: f64 = 10.0;
/// Cumulative roll thresholds: small below 0.70, tall below 0.95, else flying.
pub const SMALL_OBSTACLE_CHANCE: f64 = 0.70;
pub const TALL_OBSTACLE_CHANCE: f64 = 0.25;
pub const FLYING_OBSTACLE_Y: f64 = 110.0;

// Scoring
pub const SCORE_INTERVAL_TICKS: u64 = 90;

// Sprite sheets
pub const RUN_FRAMES: u32 = 11;
pub const JUMP_FRAMES: u32 = 24;
pub const IDLE_FRAMES: u32 = 21;
pub const DIED_FRAMES: u32 = 11;
/// Ticks each sprite frame stays on screen.
pub const SPRITE_ANIM_SPEED: u32 = 6;

// Config / log location
pub const DATA_DIR_NAME: &str = ".robot-runner";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = "runner.log";
pub const DEFAULT_ASSET_DIR: &str = "assets/games";
