//! Robot Runner terminal rendering.
//!
//! The game draws into a `CellCanvas`: a pixel buffer sized to the play
//! field where every terminal cell holds two vertically stacked pixels,
//! shown as `▀` with the top pixel as foreground and the bottom pixel as
//! background. Rows are then stamped as Paragraph widgets the same way
//! the other cell-buffer scenes do it.

use super::game_common::{
    compute_game_layout, create_game_layout, render_game_over_overlay, render_info_panel_frame,
    render_status_bar, GameLayout,
};
use crate::assets::{AssetKind, AssetState, FrameRect, SpriteSheet};
use crate::constants::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::runner::render::sample_nearest;
use crate::runner::{EndReason, GameHost, Hitbox, Rgb, RunnerDriver, Surface};
use rand::Rng;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const TITLE: &str = " Robot Runner ";
const BORDER_COLOR: Color = Color::Cyan;
const CONTENT_MIN_HEIGHT: u16 = 8;
const INFO_PANEL_WIDTH: u16 = 22;

const HALF_BLOCK: char = '▀';
/// Sprite pixels with less alpha than this are not drawn.
const ALPHA_CUTOFF: u8 = 128;
/// Logical height of score text above its baseline.
const TEXT_HEIGHT: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Label {
    col: u16,
    row: u16,
    text: String,
    color: Rgb,
}

/// Half-block pixel surface for the terminal.
#[derive(Debug, Clone)]
pub struct CellCanvas {
    cols: u16,
    rows: u16,
    pixels: Vec<Rgb>,
    labels: Vec<Label>,
}

impl CellCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            pixels: vec![Rgb(0, 0, 0); cols as usize * rows as usize * 2],
            labels: Vec::new(),
        }
    }

    /// Largest canvas inside `max_cols × max_rows` cells that keeps the
    /// viewport's aspect ratio.
    pub fn fit(max_cols: u16, max_rows: u16) -> Self {
        let cols_for_rows = (max_rows as f64 * 2.0 * VIEWPORT_WIDTH / VIEWPORT_HEIGHT).floor() as u16;
        if cols_for_rows <= max_cols {
            Self::new(cols_for_rows, max_rows)
        } else {
            let rows = (max_cols as f64 * VIEWPORT_HEIGHT / VIEWPORT_WIDTH / 2.0).round() as u16;
            Self::new(max_cols, rows.min(max_rows))
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn pixel_width(&self) -> usize {
        self.cols as usize
    }

    fn pixel_height(&self) -> usize {
        self.rows as usize * 2
    }

    fn scale_x(&self) -> f64 {
        self.pixel_width() as f64 / VIEWPORT_WIDTH
    }

    fn scale_y(&self) -> f64 {
        self.pixel_height() as f64 / VIEWPORT_HEIGHT
    }

    /// Colour at pixel `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.pixel_width() || y >= self.pixel_height() {
            return None;
        }
        Some(self.pixels[y * self.pixel_width() + x])
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        let w = self.pixel_width();
        self.pixels[y * w + x] = color;
    }

    /// Map a logical pixel `(x, y)` to the canvas pixel that covers it.
    pub fn to_canvas(&self, x: f64, y: f64) -> (usize, usize) {
        (
            (x * self.scale_x()).floor().max(0.0) as usize,
            (y * self.scale_y()).floor().max(0.0) as usize,
        )
    }

    /// Render rows, pixels first then text labels on top.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        let width = self.cols as usize;
        let mut lines = Vec::with_capacity(self.rows as usize);

        for row in 0..self.rows as usize {
            let mut cells: Vec<Cell> = (0..width)
                .map(|col| Cell {
                    ch: HALF_BLOCK,
                    fg: to_color(self.pixels[row * 2 * width + col]),
                    bg: to_color(self.pixels[(row * 2 + 1) * width + col]),
                })
                .collect();

            for label in self.labels.iter().filter(|l| l.row as usize == row) {
                for (i, ch) in label.text.chars().enumerate() {
                    let col = label.col as usize + i;
                    if col >= width {
                        break;
                    }
                    let bg = to_color(self.pixels[row * 2 * width + col]);
                    cells[col] = Cell {
                        ch,
                        fg: to_color(label.color),
                        bg,
                    };
                }
            }

            lines.push(merge_cells(&cells));
        }
        lines
    }
}

/// Pixel range covered by a logical span. Non-empty spans cover at least one pixel.
fn pixel_span(start: f64, len: f64, scale: f64, limit: usize) -> std::ops::Range<usize> {
    let a = (start * scale).round();
    let mut b = ((start + len) * scale).round();
    if len > 0.0 && b <= a {
        b = a + 1.0;
    }
    let clamp = |v: f64| v.max(0.0).min(limit as f64) as usize;
    clamp(a)..clamp(b)
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Merge runs of equally styled cells into spans.
fn merge_cells(cells: &[Cell]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current_fg = Color::Reset;
    let mut current_bg = Color::Reset;
    let mut current_text = String::new();

    for &cell in cells {
        if (cell.fg != current_fg || cell.bg != current_bg) && !current_text.is_empty() {
            spans.push(Span::styled(
                std::mem::take(&mut current_text),
                Style::default().fg(current_fg).bg(current_bg),
            ));
        }
        current_fg = cell.fg;
        current_bg = cell.bg;
        current_text.push(cell.ch);
    }
    if !current_text.is_empty() {
        spans.push(Span::styled(
            current_text,
            Style::default().fg(current_fg).bg(current_bg),
        ));
    }
    Line::from(spans)
}

impl Surface for CellCanvas {
    fn fill_rect(&mut self, rect: Hitbox, color: Rgb) {
        let xs = pixel_span(rect.x, rect.width, self.scale_x(), self.pixel_width());
        let ys = pixel_span(rect.y, rect.height, self.scale_y(), self.pixel_height());
        for y in ys {
            for x in xs.clone() {
                self.set_pixel(x, y, color);
            }
        }
    }

    fn draw_sprite(&mut self, sheet: &SpriteSheet, src: FrameRect, dest: Hitbox) {
        let (sx, sy) = (self.scale_x(), self.scale_y());
        let xs = pixel_span(dest.x, dest.width, sx, self.pixel_width());
        let ys = pixel_span(dest.y, dest.height, sy, self.pixel_height());

        for y in ys {
            let dy = (y as f64 + 0.5) / sy - dest.y;
            for x in xs.clone() {
                let dx = (x as f64 + 0.5) / sx - dest.x;
                let (u, v) = sample_nearest(src, dest.width, dest.height, dx, dy);
                let [r, g, b, a] = sheet.pixel(u, v);
                if a >= ALPHA_CUTOFF {
                    self.set_pixel(x, y, Rgb(r, g, b));
                }
            }
        }
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, color: Rgb) {
        let col = (x * self.scale_x()).round().max(0.0) as u16;
        let row = ((y - TEXT_HEIGHT) * self.scale_y() / 2.0).floor().max(0.0) as u16;
        if col >= self.cols || row >= self.rows {
            return;
        }
        self.labels.retain(|l| l.row != row || l.col != col);
        self.labels.push(Label {
            col,
            row,
            text: text.to_string(),
            color,
        });
    }
}

/// Layout of the game screen inside `area`.
pub fn scene_layout(area: Rect) -> GameLayout {
    compute_game_layout(area, CONTENT_MIN_HEIGHT, INFO_PANEL_WIDTH)
}

/// A blank canvas sized for the play field of a terminal of size `area`.
pub fn canvas_for(area: Rect) -> CellCanvas {
    let content = scene_layout(area).content;
    CellCanvas::fit(content.width, content.height)
}

/// Render the whole screen: play field, status bar, info panel and, after a
/// crash, the game-over box.
pub fn render_runner_scene<H: GameHost, R: Rng>(
    frame: &mut Frame,
    area: Rect,
    canvas: &CellCanvas,
    driver: &RunnerDriver<H, R>,
) {
    let layout = create_game_layout(
        frame,
        area,
        TITLE,
        BORDER_COLOR,
        CONTENT_MIN_HEIGHT,
        INFO_PANEL_WIDTH,
    );

    render_play_field(frame, layout.content, canvas);
    render_status_bar_content(frame, layout.status_bar, driver.end_reason());
    render_info_panel(frame, layout.info_panel, driver);

    if let Some(EndReason::Collision { score }) = driver.end_reason() {
        render_game_over_overlay(
            frame,
            layout.content,
            Color::LightRed,
            ":: ROBOT DOWN ::",
            &format!("Final score: {}", score),
        );
    }
}

/// Stamp the canvas rows centered in `area`.
fn render_play_field(frame: &mut Frame, area: Rect, canvas: &CellCanvas) {
    let width = canvas.cols().min(area.width);
    let height = canvas.rows().min(area.height);
    let x_offset = area.x + (area.width - width) / 2;
    let y_offset = area.y + (area.height - height) / 2;

    for (row_idx, line) in canvas.to_lines().into_iter().enumerate().take(height as usize) {
        let row_area = Rect::new(x_offset, y_offset + row_idx as u16, width, 1);
        frame.render_widget(Paragraph::new(line), row_area);
    }
}

fn render_status_bar_content(frame: &mut Frame, area: Rect, ended: Option<EndReason>) {
    match ended {
        Some(EndReason::Collision { .. }) => render_status_bar(
            frame,
            area,
            "Crashed!",
            Color::LightRed,
            &[("[Any key]", "Exit")],
        ),
        _ => render_status_bar(
            frame,
            area,
            "Run!",
            Color::Cyan,
            &[("[Space/Up]", "Jump"), ("[Esc]", "Quit")],
        ),
    }
}

fn render_info_panel<H: GameHost, R: Rng>(frame: &mut Frame, area: Rect, driver: &RunnerDriver<H, R>) {
    let inner = render_info_panel_frame(frame, area);
    let session = driver.session();

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::DarkGray));

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            label("Score: "),
            Span::styled(
                session.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            label("Speed: "),
            Span::styled(
                format!("{:.2}", session.scroll_speed),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            label("Spawn gap: "),
            Span::styled(
                format!("{}", session.spawn_delay),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            label("Obstacles: "),
            Span::styled(
                session.obstacles.len().to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Sprites:",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    for kind in AssetKind::ALL {
        let (mark, color) = match driver.assets().state(kind) {
            AssetState::Pending => ("...", Color::Yellow),
            AssetState::Loaded => ("ok", Color::Green),
            AssetState::Failed => ("missing", Color::LightRed),
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<9}", kind.name()), Style::default().fg(Color::DarkGray)),
            Span::styled(mark, Style::default().fg(color)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
