//! Robot Runner: an endless-runner arcade game.
//!
//! `types` holds the data model, `difficulty` the score-driven tuning
//! curves, `logic` the per-tick phases, `animation` and `render` the
//! drawing side, and `driver` the loop that ties them together.

pub mod animation;
pub mod difficulty;
pub mod driver;
pub mod logic;
pub mod render;
pub mod types;

pub use driver::{EndReason, GameHost, RecordingHost, RunnerDriver};
pub use logic::{process_input, step_session, InputOutcome, RunnerInput, TickOutcome};
pub use render::{render_session, DrawCall, RecordingSurface, Rgb, Surface};
pub use types::{Hitbox, Obstacle, ObstacleKind, Player, PlayerState, Session};
