//! The per-frame loop driver.
//!
//! `RunnerDriver` owns the session and everything that mutates it. The host
//! calls `press` for key input and `frame` once per animation frame. When
//! the run ends (quit or collision) the driver stops ticking for good and
//! tells the host exactly once.

use super::animation::Animator;
use super::logic::{process_input, step_session, InputOutcome, RunnerInput, TickOutcome};
use super::render::{render_session, Surface};
use super::types::Session;
use crate::assets::AssetStore;
use crate::config::Tuning;
use rand::Rng;

/// Callbacks into whatever embeds the game.
pub trait GameHost {
    /// The player quit. No score is reported.
    fn on_close(&mut self);

    /// The player crashed. Called once with the score at the moment of impact.
    fn on_game_over(&mut self, score: u32);
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Quit,
    Collision { score: u32 },
}

pub struct RunnerDriver<H: GameHost, R: Rng> {
    session: Session,
    animator: Animator,
    assets: AssetStore,
    rng: R,
    host: H,
    ended: Option<EndReason>,
}

impl<H: GameHost, R: Rng> RunnerDriver<H, R> {
    pub fn new(tuning: Tuning, assets: AssetStore, rng: R, host: H) -> Self {
        log::info!("Robot Runner session started");
        Self {
            session: Session::new(tuning),
            animator: Animator::new(),
            assets,
            rng,
            host,
            ended: None,
        }
    }

    /// Feed one key press. Ignored once the run has ended.
    pub fn press(&mut self, input: RunnerInput) {
        if self.ended.is_some() {
            return;
        }
        if process_input(&mut self.session, input) == InputOutcome::QuitRequested {
            self.shutdown(EndReason::Quit);
        }
    }

    /// Run one tick and draw it. Returns false (and does nothing) after the run ended.
    pub fn frame(&mut self, surface: &mut dyn Surface) -> bool {
        if self.ended.is_some() {
            return false;
        }

        let outcome = step_session(&mut self.session, &mut self.rng);
        self.animator.advance(self.session.player.state);
        self.render(surface);

        if let TickOutcome::Collided { score, .. } = outcome {
            self.shutdown(EndReason::Collision { score });
        }
        true
    }

    /// Draw the current state without advancing it.
    pub fn render(&self, surface: &mut dyn Surface) {
        let snapshot = self.assets.snapshot();
        render_session(&self.session, &self.animator, &snapshot, surface);
    }

    /// Single exit path for quit and game over.
    fn shutdown(&mut self, reason: EndReason) {
        if self.ended.is_some() {
            return;
        }
        self.session.running = false;
        self.session.jump_requested = false;
        self.ended = Some(reason);

        match reason {
            EndReason::Quit => {
                log::info!("Player quit at score {}", self.session.score);
                self.host.on_close();
            }
            EndReason::Collision { score } => {
                log::info!(
                    "Game over after {} ticks, score {}",
                    self.session.tick_count,
                    score
                );
                self.host.on_game_over(score);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.ended.is_none()
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.ended
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Direct access for hosts that need to set up a scenario.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}

/// Host that records callbacks instead of acting on them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingHost {
    pub closed: u32,
    pub game_overs: Vec<u32>,
}

impl GameHost for RecordingHost {
    fn on_close(&mut self) {
        self.closed += 1;
    }

    fn on_game_over(&mut self, score: u32) {
        self.game_overs.push(score);
    }
}
