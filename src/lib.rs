//! Robot Runner - a side-scrolling endless runner.
//!
//! The game core (`runner`) is independent of the terminal: it ticks a
//! `Session`, draws through the `Surface` trait and reports the end of a
//! run through `GameHost`. The `ui` module and the binary supply the
//! terminal versions of those seams.

pub mod assets;
pub mod cli;
pub mod config;
pub mod constants;
pub mod input;
pub mod runner;
pub mod ui;
pub mod utils;

pub use assets::{AssetError, AssetKind, AssetStore};
pub use config::{RunnerConfig, Tuning};
pub use runner::{EndReason, GameHost, RunnerDriver, Session};
