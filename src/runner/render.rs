//! Scene drawing for Robot Runner.
//!
//! `render_session` turns the session into draw calls against a `Surface`.
//! Surfaces work in logical units (480×220) and sample sprites with
//! nearest-neighbour so the pixel art stays crisp. A missing sheet is
//! replaced by a placeholder box with the same hitbox.

use super::animation::{sheet_for, Animator};
use super::types::{Hitbox, Session};
use crate::assets::{AssetKind, AssetSnapshot, FrameRect, SpriteSheet};
use crate::constants::{GROUND_LINE, GROUND_THICKNESS, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BACKGROUND: Rgb = Rgb(0x07, 0x10, 0x18);
pub const GROUND: Rgb = Rgb(0x2b, 0x2b, 0x2b);
pub const PLACEHOLDER_PLAYER: Rgb = Rgb(0x00, 0xff, 0xff);
pub const PLACEHOLDER_EYES: Rgb = Rgb(0x00, 0x00, 0x00);
pub const PLACEHOLDER_OBSTACLE: Rgb = Rgb(0xff, 0x55, 0x55);
pub const SCORE_TEXT: Rgb = Rgb(0x99, 0xff, 0x99);

/// Where the score overlay is anchored.
pub const SCORE_POSITION: (f64, f64) = (12.0, 22.0);

/// A 2D drawing target in logical units.
pub trait Surface {
    fn fill_rect(&mut self, rect: Hitbox, color: Rgb);

    /// Draw frame `src` of `sheet` scaled into `dest`. Transparent pixels are skipped.
    fn draw_sprite(&mut self, sheet: &SpriteSheet, src: FrameRect, dest: Hitbox);

    fn draw_text(&mut self, x: f64, y: f64, text: &str, color: Rgb);
}

/// Source pixel for destination offset `(dx, dy)` inside a `dest_w × dest_h` box.
///
/// Nearest-neighbour: no blending between source pixels.
pub fn sample_nearest(src: FrameRect, dest_w: f64, dest_h: f64, dx: f64, dy: f64) -> (u32, u32) {
    if dest_w <= 0.0 || dest_h <= 0.0 || src.width == 0 || src.height == 0 {
        return (src.x, src.y);
    }
    let u = ((dx / dest_w) * src.width as f64).floor().max(0.0) as u32;
    let v = ((dy / dest_h) * src.height as f64).floor().max(0.0) as u32;
    (
        src.x + u.min(src.width - 1),
        src.y + v.min(src.height - 1),
    )
}

/// Draw one full frame of the scene.
///
/// Sheets come from a single `AssetSnapshot` so the frame never mixes
/// before/after states of a load that completes mid-draw.
pub fn render_session(
    session: &Session,
    animator: &Animator,
    assets: &AssetSnapshot,
    surface: &mut dyn Surface,
) {
    surface.fill_rect(
        Hitbox::new(0.0, 0.0, VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
        BACKGROUND,
    );
    surface.fill_rect(
        Hitbox::new(0.0, GROUND_LINE, VIEWPORT_WIDTH, GROUND_THICKNESS),
        GROUND,
    );

    draw_player(session, animator, assets, surface);

    for obstacle in &session.obstacles {
        let dest = obstacle.hitbox();
        match assets.sheet(AssetKind::Obstacle) {
            Some(sheet) => surface.draw_sprite(sheet, sheet.frame_rect(0), dest),
            None => surface.fill_rect(dest, PLACEHOLDER_OBSTACLE),
        }
    }

    let (x, y) = SCORE_POSITION;
    surface.draw_text(x, y, &format!("Score: {}", session.score), SCORE_TEXT);
}

fn draw_player(
    session: &Session,
    animator: &Animator,
    assets: &AssetSnapshot,
    surface: &mut dyn Surface,
) {
    let player = &session.player;
    let dest = player.hitbox();

    match assets.sheet(sheet_for(player.state)) {
        Some(sheet) => {
            // The animator may lag a state change by one tick; use frame 0 then.
            let frame = if animator.state() == player.state {
                animator.frame_index()
            } else {
                0
            };
            surface.draw_sprite(sheet, sheet.frame_rect(frame), dest);
        }
        None => {
            surface.fill_rect(dest, PLACEHOLDER_PLAYER);
            surface.fill_rect(
                Hitbox::new(player.x + 12.0, player.y + 16.0, 10.0, 10.0),
                PLACEHOLDER_EYES,
            );
            surface.fill_rect(
                Hitbox::new(player.x + 36.0, player.y + 16.0, 10.0, 10.0),
                PLACEHOLDER_EYES,
            );
        }
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Fill { rect: Hitbox, color: Rgb },
    Sprite { src: FrameRect, dest: Hitbox },
    Text { x: f64, y: f64, text: String, color: Rgb },
}

/// Surface that only records what was asked of it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn fills_with(&self, color: Rgb) -> Vec<Hitbox> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Fill { rect, color: c } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn sprites(&self) -> Vec<(FrameRect, Hitbox)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Sprite { src, dest } => Some((*src, *dest)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Hitbox, color: Rgb) {
        self.calls.push(DrawCall::Fill { rect, color });
    }

    fn draw_sprite(&mut self, _sheet: &SpriteSheet, src: FrameRect, dest: Hitbox) {
        self.calls.push(DrawCall::Sprite { src, dest });
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, color: Rgb) {
        self.calls.push(DrawCall::Text {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }
}
