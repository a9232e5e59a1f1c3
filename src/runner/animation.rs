//! Sprite animation timing.
//!
//! Each player state owns a frame cycle of `frames × SPRITE_ANIM_SPEED`
//! ticks. Changing state starts a fresh cycle from frame 0.

use super::types::PlayerState;
use crate::assets::AssetKind;
use crate::constants::SPRITE_ANIM_SPEED;

/// Sprite sheet used for a player state.
pub fn sheet_for(state: PlayerState) -> AssetKind {
    match state {
        PlayerState::Idle => AssetKind::Idle,
        PlayerState::Run => AssetKind::Run,
        PlayerState::Jump => AssetKind::Jump,
        PlayerState::Died => AssetKind::Died,
    }
}

/// Ticks in one full cycle of `state`'s animation.
pub fn cycle_length(state: PlayerState) -> u32 {
    sheet_for(state).frame_count() * SPRITE_ANIM_SPEED
}

/// The death animation plays once and holds its last frame.
pub fn loops(state: PlayerState) -> bool {
    state != PlayerState::Died
}

/// Per-state frame counter for the player sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animator {
    state: PlayerState,
    counter: u32,
}

impl Animator {
    pub fn new() -> Self {
        Self {
            state: PlayerState::Idle,
            counter: 0,
        }
    }

    /// Advance one tick while the player is in `state`.
    pub fn advance(&mut self, state: PlayerState) {
        if state != self.state {
            self.state = state;
            self.counter = 0;
            return;
        }

        let cycle = cycle_length(state);
        if loops(state) {
            self.counter = (self.counter + 1) % cycle;
        } else {
            self.counter = (self.counter + 1).min(cycle - 1);
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Ticks spent in the current cycle.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Sprite-sheet frame to draw.
    pub fn frame_index(&self) -> u32 {
        self.counter / SPRITE_ANIM_SPEED
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}
