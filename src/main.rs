use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use env_logger::{Env, Target};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use robot_runner::cli::{parse_args, Command, USAGE};
use robot_runner::constants::LOG_FILE_NAME;
use robot_runner::input::map_key;
use robot_runner::ui::{canvas_for, render_runner_scene};
use robot_runner::utils::persistence::data_path;
use robot_runner::utils::version_line;
use robot_runner::{AssetStore, GameHost, RunnerConfig, RunnerDriver};
use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Host for the terminal binary: remembers how the run ended.
#[derive(Debug, Default)]
struct TerminalHost {
    closed: bool,
    final_score: Option<u32>,
}

impl GameHost for TerminalHost {
    fn on_close(&mut self) {
        self.closed = true;
    }

    fn on_game_over(&mut self, score: u32) {
        self.final_score = Some(score);
    }
}

fn main() -> io::Result<()> {
    let overrides = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Play(overrides)) => overrides,
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Ok(Command::Version) => {
            println!("{}", version_line());
            return Ok(());
        }
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'robot-runner --help' for usage.");
            std::process::exit(1);
        }
    };

    init_logging();

    let mut config = RunnerConfig::load();
    overrides.apply(&mut config);
    log::info!(
        "Starting with assets from {} ({} ms frames)",
        config.asset_dir.display(),
        config.frame_ms
    );

    let assets = AssetStore::load_from_dir(&config.asset_dir);
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut driver = RunnerDriver::new(config.tuning, assets, rng, TerminalHost::default());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut driver, Duration::from_millis(config.frame_ms));

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    let host = driver.into_host();
    if let Some(score) = host.final_score {
        println!("Game Over — Exited Robot Runner. Score: {}", score);
    } else if host.closed {
        log::info!("Exited without finishing a run");
    }
    Ok(())
}

/// Route `RUST_LOG`-filtered logs to ~/.robot-runner/runner.log. The screen
/// is in raw mode, so nothing may go to stderr.
fn init_logging() {
    let Ok(path) = data_path(LOG_FILE_NAME) else {
        return;
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Pipe(Box::new(file)))
        .try_init();
}

fn run(
    terminal: &mut Term,
    driver: &mut RunnerDriver<TerminalHost, StdRng>,
    frame_interval: Duration,
) -> io::Result<()> {
    while driver.is_running() {
        let frame_start = Instant::now();

        let mut canvas = canvas_for(terminal.size()?);
        driver.frame(&mut canvas);
        let view = &*driver;
        terminal.draw(|f| {
            let area = f.size();
            render_runner_scene(f, area, &canvas, view);
        })?;

        // Collect input until the next frame is due
        let deadline = frame_start + frame_interval;
        while driver.is_running() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            if event::poll(deadline - now)? {
                if let Event::Key(key) = event::read()? {
                    if let Some(input) = map_key(key) {
                        driver.press(input);
                    }
                }
            }
        }
    }

    if driver.host().final_score.is_some() {
        wait_for_dismiss(terminal, driver)?;
    }
    Ok(())
}

/// Keep the game-over screen up until a key is pressed.
fn wait_for_dismiss(
    terminal: &mut Term,
    driver: &RunnerDriver<TerminalHost, StdRng>,
) -> io::Result<()> {
    // Drop jump presses still queued from the moment of the crash
    while event::poll(Duration::ZERO)? {
        event::read()?;
    }
    loop {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(()),
            Event::Resize(..) => {
                let mut canvas = canvas_for(terminal.size()?);
                driver.render(&mut canvas);
                terminal.draw(|f| {
                    let area = f.size();
                    render_runner_scene(f, area, &canvas, driver);
                })?;
            }
            _ => {}
        }
    }
}
