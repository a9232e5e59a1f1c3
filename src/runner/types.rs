//! Robot Runner data structures.
//!
//! An endless runner: the robot stays at a fixed column while obstacles
//! scroll in from the right. Jump over them; touching one ends the run.

use crate::config::Tuning;
use crate::constants::*;

/// Axis-aligned box in logical surface units. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Hitbox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict overlap: boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Player animation / behaviour state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    /// Resting pose before the first tick.
    Idle,
    Run,
    Jump,
    /// Terminal. Nothing moves the player once entered.
    Died,
}

/// The robot.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Vertical velocity (negative = upward).
    pub dy: f64,
    pub grounded: bool,
    pub state: PlayerState,
}

impl Player {
    /// A grounded, idle player standing on the ground line.
    pub fn new() -> Self {
        Self {
            x: PLAYER_X,
            y: GROUND_LINE - PLAYER_HEIGHT,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            dy: 0.0,
            grounded: true,
            state: PlayerState::Idle,
        }
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, self.width, self.height)
    }

    /// `y` of the player's top edge when standing on the ground.
    pub fn ground_y(&self) -> f64 {
        GROUND_LINE - self.height
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Kinds of obstacle. Geometry is fixed per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Small,
    Tall,
    Flying,
}

impl ObstacleKind {
    /// Width and height (obstacles are square).
    pub fn size(self) -> f64 {
        match self {
            Self::Small => 26.0,
            Self::Tall => 42.0,
            Self::Flying => 18.0,
        }
    }

    /// Top edge: ground-aligned, except flying obstacles which hover.
    pub fn y(self) -> f64 {
        match self {
            Self::Flying => FLYING_OBSTACLE_Y,
            _ => GROUND_LINE - self.size(),
        }
    }

    pub fn is_flying(self) -> bool {
        matches!(self, Self::Flying)
    }

    /// Pick a kind from a uniform roll in `[0, 1)`: 70% small, 25% tall, 5% flying.
    pub fn from_roll(roll: f64) -> Self {
        if roll < SMALL_OBSTACLE_CHANCE {
            Self::Small
        } else if roll < SMALL_OBSTACLE_CHANCE + TALL_OBSTACLE_CHANCE {
            Self::Tall
        } else {
            Self::Flying
        }
    }
}

/// A single obstacle scrolling toward the player.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Creation sequence number, unique within a session.
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Obstacle of `kind` with its left edge at `x`.
    pub fn new(id: u64, kind: ObstacleKind, x: f64) -> Self {
        Self {
            id,
            x,
            y: kind.y(),
            width: kind.size(),
            height: kind.size(),
            kind,
        }
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, self.width, self.height)
    }

    /// True once the right edge has passed the left boundary.
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }
}

/// Everything that changes during one run. Owned by the loop driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub tuning: Tuning,
    pub player: Player,
    /// Active obstacles, oldest first.
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Derived from `score`.
    pub scroll_speed: f64,
    /// Derived from `score`.
    pub spawn_delay: i32,
    /// Ticks until the next spawn; spawns at <= 0.
    pub spawn_timer: i32,
    /// Ticks elapsed while running.
    pub tick_count: u64,
    pub running: bool,
    /// Jump intent recorded by input, consumed by the next physics phase.
    pub jump_requested: bool,
    pub next_obstacle_id: u64,
}

impl Session {
    pub fn new(tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            player: Player::new(),
            obstacles: Vec::new(),
            score: 0,
            scroll_speed: tuning.base_speed,
            spawn_delay: tuning.start_spawn,
            // First obstacle spawns on the first tick
            spawn_timer: 0,
            tick_count: 0,
            running: true,
            jump_requested: false,
            next_obstacle_id: 0,
            tuning,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}
