//! Sprite sheet loading.
//!
//! Every asset is decoded on its own background thread and written exactly
//! once into a slot. The game loop never waits on a slot: it takes an
//! `AssetSnapshot` at the start of each render and draws placeholders for
//! anything not loaded yet. A failed slot stays failed for the session.

use crate::constants::{DIED_FRAMES, IDLE_FRAMES, JUMP_FRAMES, RUN_FRAMES};
use image::RgbaImage;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::thread;

/// The fixed set of image resources the game uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Idle,
    Run,
    Jump,
    Died,
    Obstacle,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::Idle,
        AssetKind::Run,
        AssetKind::Jump,
        AssetKind::Died,
        AssetKind::Obstacle,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Idle => "robot_idle.png",
            Self::Run => "robot_run.png",
            Self::Jump => "robot_jump.png",
            Self::Died => "robot_died.png",
            Self::Obstacle => "obstacle.png",
        }
    }

    /// Number of frames in the horizontal strip.
    pub fn frame_count(self) -> u32 {
        match self {
            Self::Idle => IDLE_FRAMES,
            Self::Run => RUN_FRAMES,
            Self::Jump => JUMP_FRAMES,
            Self::Died => DIED_FRAMES,
            Self::Obstacle => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Run => "Run",
            Self::Jump => "Jump",
            Self::Died => "Died",
            Self::Obstacle => "Obstacle",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Why an asset could not be used.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    /// The file does not exist.
    Missing(PathBuf),

    /// The file exists but could not be read or decoded.
    Decode { path: PathBuf, message: String },

    /// The image is too narrow to hold its frame strip.
    InvalidStrip { width: u32, height: u32, frames: u32 },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssetError::Missing(path) => write!(f, "Asset not found: {}", path.display()),
            AssetError::Decode { path, message } => {
                write!(f, "Could not decode {}: {}", path.display(), message)
            }
            AssetError::InvalidStrip {
                width,
                height,
                frames,
            } => write!(
                f,
                "Image {}x{} cannot hold {} frames side by side",
                width, height, frames
            ),
        }
    }
}

impl std::error::Error for AssetError {}

/// Source rectangle of one frame inside a sheet, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A decoded horizontal strip of equal-sized frames.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pixels: RgbaImage,
    frames: u32,
    frame_width: u32,
    frame_height: u32,
}

impl SpriteSheet {
    /// Split `pixels` into `frames` equal columns.
    pub fn from_image(pixels: RgbaImage, frames: u32) -> Result<Self, AssetError> {
        let (width, height) = pixels.dimensions();
        let frames = frames.max(1);
        if width < frames || height == 0 {
            return Err(AssetError::InvalidStrip {
                width,
                height,
                frames,
            });
        }
        Ok(Self {
            frame_width: width / frames,
            frame_height: height,
            pixels,
            frames,
        })
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    /// Source rectangle of frame `index`, wrapping past the last frame.
    pub fn frame_rect(&self, index: u32) -> FrameRect {
        let index = index % self.frames;
        FrameRect {
            x: index * self.frame_width,
            y: 0,
            width: self.frame_width,
            height: self.frame_height,
        }
    }

    /// RGBA at image coordinates, transparent when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x < self.pixels.width() && y < self.pixels.height() {
            self.pixels.get_pixel(x, y).0
        } else {
            [0, 0, 0, 0]
        }
    }
}

/// Decode one sheet from disk.
pub fn load_sheet(path: &Path, frames: u32) -> Result<SpriteSheet, AssetError> {
    if !path.exists() {
        return Err(AssetError::Missing(path.to_path_buf()));
    }
    let image = image::open(path).map_err(|e| AssetError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    SpriteSheet::from_image(image.to_rgba8(), frames)
}

type Slot = Arc<OnceLock<Result<Arc<SpriteSheet>, AssetError>>>;

/// Observable state of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetState {
    Pending,
    Loaded,
    Failed,
}

/// The session's asset slots, one per `AssetKind`.
///
/// Cloning shares the slots; loader threads hold clones and write into them.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    slots: [Slot; 5],
}

impl AssetStore {
    /// A store with every slot still pending.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Start loading every asset from `dir` in the background.
    pub fn load_from_dir(dir: &Path) -> Self {
        let store = Self::pending();
        for kind in AssetKind::ALL {
            let slot = Arc::clone(&store.slots[kind.index()]);
            let path = dir.join(kind.file_name());
            let spawned = thread::Builder::new()
                .name(format!("asset-{}", kind.name().to_lowercase()))
                .spawn(move || {
                    let result = load_sheet(&path, kind.frame_count());
                    match &result {
                        Ok(sheet) => log::info!(
                            "Loaded {} sheet ({} frames of {}x{})",
                            kind.name(),
                            sheet.frames(),
                            sheet.frame_width(),
                            sheet.frame_height()
                        ),
                        Err(e) => log::warn!("{} asset unavailable: {}", kind.name(), e),
                    }
                    let _ = slot.set(result.map(Arc::new));
                });
            if let Err(e) = spawned {
                log::warn!("Could not start loader for {}: {}", kind.name(), e);
                store.fail(kind, dir.join(kind.file_name()));
            }
        }
        store
    }

    /// A store where every asset has already failed (placeholder rendering only).
    pub fn all_failed() -> Self {
        let store = Self::pending();
        for kind in AssetKind::ALL {
            store.fail(kind, PathBuf::from(kind.file_name()));
        }
        store
    }

    /// A store holding the given sheets; every other slot is failed.
    pub fn from_sheets(sheets: impl IntoIterator<Item = (AssetKind, SpriteSheet)>) -> Self {
        let store = Self::pending();
        for (kind, sheet) in sheets {
            let _ = store.slots[kind.index()].set(Ok(Arc::new(sheet)));
        }
        for kind in AssetKind::ALL {
            store.fail(kind, PathBuf::from(kind.file_name()));
        }
        store
    }

    /// Mark a slot failed. No effect if it was already written.
    fn fail(&self, kind: AssetKind, path: PathBuf) {
        let _ = self.slots[kind.index()].set(Err(AssetError::Missing(path)));
    }

    pub fn state(&self, kind: AssetKind) -> AssetState {
        match self.slots[kind.index()].get() {
            None => AssetState::Pending,
            Some(Ok(_)) => AssetState::Loaded,
            Some(Err(_)) => AssetState::Failed,
        }
    }

    pub fn error(&self, kind: AssetKind) -> Option<&AssetError> {
        self.slots[kind.index()].get()?.as_ref().err()
    }

    /// True once no slot is pending.
    pub fn is_settled(&self) -> bool {
        AssetKind::ALL
            .iter()
            .all(|&kind| self.state(kind) != AssetState::Pending)
    }

    /// Freeze which sheets are ready, for one render pass.
    pub fn snapshot(&self) -> AssetSnapshot {
        let mut sheets: [Option<Arc<SpriteSheet>>; 5] = Default::default();
        for kind in AssetKind::ALL {
            if let Some(Ok(sheet)) = self.slots[kind.index()].get() {
                sheets[kind.index()] = Some(Arc::clone(sheet));
            }
        }
        AssetSnapshot { sheets }
    }
}

/// Read-only view of the loaded sheets at one instant.
#[derive(Debug, Clone, Default)]
pub struct AssetSnapshot {
    sheets: [Option<Arc<SpriteSheet>>; 5],
}

impl AssetSnapshot {
    pub fn sheet(&self, kind: AssetKind) -> Option<&SpriteSheet> {
        self.sheets[kind.index()].as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::time::{Duration, Instant};

    fn strip(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]))
    }

    fn wait_settled(store: &AssetStore) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !store.is_settled() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_frame_counts_match_sheets() {
        assert_eq!(AssetKind::Run.frame_count(), 11);
        assert_eq!(AssetKind::Jump.frame_count(), 24);
        assert_eq!(AssetKind::Idle.frame_count(), 21);
        assert_eq!(AssetKind::Died.frame_count(), 11);
        assert_eq!(AssetKind::Obstacle.frame_count(), 1);
    }

    #[test]
    fn test_sheet_splits_into_equal_frames() {
        let sheet = SpriteSheet::from_image(strip(44, 8), 11).unwrap();
        assert_eq!(sheet.frame_width(), 4);
        assert_eq!(sheet.frame_height(), 8);
        assert_eq!(
            sheet.frame_rect(3),
            FrameRect {
                x: 12,
                y: 0,
                width: 4,
                height: 8
            }
        );
        // Wraps past the last frame
        assert_eq!(sheet.frame_rect(11), sheet.frame_rect(0));
    }

    #[test]
    fn test_sheet_too_narrow_is_invalid() {
        let err = SpriteSheet::from_image(strip(5, 4), 11).unwrap_err();
        assert!(matches!(err, AssetError::InvalidStrip { frames: 11, .. }));
    }

    #[test]
    fn test_pixel_out_of_bounds_is_transparent() {
        let sheet = SpriteSheet::from_image(strip(2, 2), 1).unwrap();
        assert_eq!(sheet.pixel(0, 0), [10, 20, 30, 255]);
        assert_eq!(sheet.pixel(5, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_all_failed_store() {
        let store = AssetStore::all_failed();
        assert!(store.is_settled());
        for kind in AssetKind::ALL {
            assert_eq!(store.state(kind), AssetState::Failed);
            assert!(store.snapshot().sheet(kind).is_none());
        }
    }

    #[test]
    fn test_from_sheets_fails_the_rest() {
        let sheet = SpriteSheet::from_image(strip(4, 4), 1).unwrap();
        let store = AssetStore::from_sheets([(AssetKind::Obstacle, sheet)]);
        assert_eq!(store.state(AssetKind::Obstacle), AssetState::Loaded);
        assert_eq!(store.state(AssetKind::Run), AssetState::Failed);
        assert!(store.snapshot().sheet(AssetKind::Obstacle).is_some());
    }

    #[test]
    fn test_pending_store_snapshot_is_empty() {
        let store = AssetStore::pending();
        assert!(!store.is_settled());
        assert_eq!(store.state(AssetKind::Idle), AssetState::Pending);
        assert!(store.snapshot().sheet(AssetKind::Idle).is_none());
    }

    #[test]
    fn test_missing_directory_fails_every_slot() {
        let dir = std::env::temp_dir().join("robot-runner-no-such-dir-9f3a");
        let store = AssetStore::load_from_dir(&dir);
        wait_settled(&store);
        for kind in AssetKind::ALL {
            assert_eq!(store.state(kind), AssetState::Failed);
            assert!(matches!(store.error(kind), Some(AssetError::Missing(_))));
        }
    }

    #[test]
    fn test_background_load_reads_png() {
        let dir = std::env::temp_dir().join(format!("robot-runner-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        strip(22, 2)
            .save(dir.join(AssetKind::Run.file_name()))
            .unwrap();
        std::fs::write(dir.join(AssetKind::Jump.file_name()), b"not a png").unwrap();

        let store = AssetStore::load_from_dir(&dir);
        wait_settled(&store);

        assert_eq!(store.state(AssetKind::Run), AssetState::Loaded);
        let snapshot = store.snapshot();
        let run = snapshot.sheet(AssetKind::Run).unwrap();
        assert_eq!(run.frame_width(), 2);
        assert!(matches!(
            store.error(AssetKind::Jump),
            Some(AssetError::Decode { .. })
        ));
        assert_eq!(store.state(AssetKind::Idle), AssetState::Failed);

        std::fs::remove_dir_all(&dir).ok();
    }
}
