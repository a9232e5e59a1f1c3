//! Command-line arguments for the `robot-runner` binary.

use crate::config::RunnerConfig;
use std::path::PathBuf;

pub const USAGE: &str = "\
Robot Runner - a terminal endless runner

Usage: robot-runner [options]

Options:
  --assets DIR  Directory with robot_*.png and obstacle.png
  --seed N      Seed the obstacle generator
  --version     Show version information
  --help        Show this help message";

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(Overrides),
    Help,
    Version,
}

/// Values given on the command line that win over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub asset_dir: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut RunnerConfig) {
        if let Some(dir) = &self.asset_dir {
            config.asset_dir = dir.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

/// Parse arguments, excluding the program name.
pub fn parse_args<I, S>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut overrides = Overrides::default();
    let mut args = args.into_iter().map(Into::into);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-v" => return Ok(Command::Version),
            "--assets" => {
                let dir = args.next().ok_or("--assets needs a directory")?;
                overrides.asset_dir = Some(PathBuf::from(dir));
            }
            "--seed" => {
                let value = args.next().ok_or("--seed needs a number")?;
                let seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid seed: {}", value))?;
                overrides.seed = Some(seed);
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(Command::Play(overrides))
}
