pub mod game_common;
pub mod runner_scene;

pub use runner_scene::{canvas_for, render_runner_scene, CellCanvas};
