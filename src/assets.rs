//! Asset queue filled during `preload` and the cache it produces.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::info;

use crate::error::AssetError;
use crate::tilemap::TiledMap;

// ── FrameGrid ────────────────────────────────────────────────────────────────

/// Row-major grid of equally sized frames cut from the top-left of a texture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameGrid {
    pub texture_w: u32,
    pub texture_h: u32,
    pub frame_w: u32,
    pub frame_h: u32,
    pub cols: u32,
    pub rows: u32,
}

impl FrameGrid {
    /// Grid for a spritesheet. Returns `None` if not even one frame fits.
    pub fn new(texture_w: u32, texture_h: u32, frame_w: u32, frame_h: u32) -> Option<Self> {
        if frame_w == 0 || frame_h == 0 {
            return None;
        }
        let cols = texture_w / frame_w;
        let rows = texture_h / frame_h;
        if cols == 0 || rows == 0 {
            return None;
        }
        Some(Self { texture_w, texture_h, frame_w, frame_h, cols, rows })
    }

    /// A plain image: one frame covering the whole texture.
    pub fn single(texture_w: u32, texture_h: u32) -> Self {
        Self {
            texture_w,
            texture_h,
            frame_w: texture_w,
            frame_h: texture_h,
            cols: 1,
            rows: 1,
        }
    }

    pub fn frame_count(&self) -> u32 {
        self.cols * self.rows
    }

    /// Pixel origin of `frame` inside the texture.
    pub fn frame_origin(&self, frame: u32) -> Option<(u32, u32)> {
        if frame >= self.frame_count() {
            return None;
        }
        Some(((frame % self.cols) * self.frame_w, (frame / self.cols) * self.frame_h))
    }

    /// Returns `(uv_min, uv_max)` for a frame index (row-major order).
    pub fn uv_for_frame(&self, frame: u32) -> Option<([f32; 2], [f32; 2])> {
        let (x, y) = self.frame_origin(frame)?;
        let tw = self.texture_w as f32;
        let th = self.texture_h as f32;
        Some((
            [x as f32 / tw, y as f32 / th],
            [(x + self.frame_w) as f32 / tw, (y + self.frame_h) as f32 / th],
        ))
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
enum Request {
    Image { key: String, path: PathBuf },
    Spritesheet { key: String, path: PathBuf, frame_w: u32, frame_h: u32 },
    TiledJson { key: String, path: PathBuf },
}

/// Queue of assets to load before the scene is created.
#[derive(Default, Debug)]
pub struct Loader {
    queue: Vec<Request>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a single-frame image.
    pub fn image(&mut self, key: &str, path: impl Into<PathBuf>) {
        self.queue.push(Request::Image { key: key.into(), path: path.into() });
    }

    /// Queue an image cut into `frame_w × frame_h` frames.
    pub fn spritesheet(&mut self, key: &str, path: impl Into<PathBuf>, frame_w: u32, frame_h: u32) {
        self.queue.push(Request::Spritesheet { key: key.into(), path: path.into(), frame_w, frame_h });
    }

    /// Queue a map exported from Tiled as JSON.
    pub fn tilemap_tiled_json(&mut self, key: &str, path: impl Into<PathBuf>) {
        self.queue.push(Request::TiledJson { key: key.into(), path: path.into() });
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Load every queued asset, resolving paths against `root`.
    /// Stops at the first failure.
    pub fn load_all(self, root: &Path) -> Result<AssetCache, AssetError> {
        let mut cache = AssetCache::default();
        for request in self.queue {
            match request {
                Request::Image { key, path } => {
                    let image = read_image(&root.join(&path))?;
                    let grid = FrameGrid::single(image.width(), image.height());
                    info!(key = %key, path = %path.display(), "image loaded");
                    cache.textures.insert(key, TextureSource { image, grid });
                }
                Request::Spritesheet { key, path, frame_w, frame_h } => {
                    let image = read_image(&root.join(&path))?;
                    let (width, height) = image.dimensions();
                    let grid = FrameGrid::new(width, height, frame_w, frame_h).ok_or_else(|| {
                        AssetError::EmptySheet { key: key.clone(), width, height, frame_w, frame_h }
                    })?;
                    info!(key = %key, path = %path.display(), frames = grid.frame_count(), "spritesheet loaded");
                    cache.textures.insert(key, TextureSource { image, grid });
                }
                Request::TiledJson { key, path } => {
                    let full = root.join(&path);
                    let text = fs::read_to_string(&full)
                        .map_err(|source| AssetError::Io { path: full.clone(), source })?;
                    let map = TiledMap::from_json(&text)
                        .map_err(|source| AssetError::Tilemap { path: full.clone(), source })?;
                    info!(key = %key, path = %path.display(), width = map.width, height = map.height, "tilemap loaded");
                    cache.tilemaps.insert(key, map);
                }
            }
        }
        Ok(cache)
    }
}

fn read_image(path: &Path) -> Result<RgbaImage, AssetError> {
    let bytes = fs::read(path).map_err(|source| AssetError::Io { path: path.to_path_buf(), source })?;
    let image = image::load_from_memory(&bytes)
        .map_err(|source| AssetError::Image { path: path.to_path_buf(), source })?;
    Ok(image.to_rgba8())
}

// ── AssetCache ───────────────────────────────────────────────────────────────

/// Decoded pixels plus the frame layout they were loaded with.
#[derive(Clone, Debug)]
pub struct TextureSource {
    pub image: RgbaImage,
    pub grid: FrameGrid,
}

#[derive(Default, Debug)]
pub struct AssetCache {
    pub textures: HashMap<String, TextureSource>,
    pub tilemaps: HashMap<String, TiledMap>,
}

impl AssetCache {
    pub fn texture(&self, key: &str) -> Result<&TextureSource, AssetError> {
        self.textures.get(key).ok_or_else(|| AssetError::MissingKey(key.to_string()))
    }

    pub fn tilemap(&self, key: &str) -> Result<&TiledMap, AssetError> {
        self.tilemaps.get(key).ok_or_else(|| AssetError::MissingKey(key.to_string()))
    }

    pub fn frame_count(&self, key: &str) -> Result<u32, AssetError> {
        Ok(self.texture(key)?.grid.frame_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characters_sheet_has_twelve_columns() {
        let grid = FrameGrid::new(192, 64, 16, 16).unwrap();
        assert_eq!(grid.cols, 12);
        assert_eq!(grid.rows, 4);
        assert_eq!(grid.frame_count(), 48);
        assert_eq!(grid.frame_origin(13), Some((16, 16)));
        assert_eq!(grid.frame_origin(48), None);
    }

    #[test]
    fn partial_frames_are_dropped() {
        // 40px wide with 16px frames → 2 whole columns.
        let grid = FrameGrid::new(40, 16, 16, 16).unwrap();
        assert_eq!(grid.cols, 2);
    }

    #[test]
    fn sheet_smaller_than_frame_is_rejected() {
        assert!(FrameGrid::new(8, 8, 16, 16).is_none());
        assert!(FrameGrid::new(16, 16, 0, 16).is_none());
    }

    #[test]
    fn uv_of_last_frame_reaches_edge() {
        let grid = FrameGrid::new(48, 16, 16, 16).unwrap();
        let (min, max) = grid.uv_for_frame(2).unwrap();
        assert!((min[0] - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(max, [1.0, 1.0]);
    }

    #[test]
    fn missing_file_reports_path() {
        let mut loader = Loader::new();
        loader.image("tiles", "does/not/exist.png");
        let err = loader.load_all(Path::new("/nonexistent-root")).unwrap_err();
        match err {
            AssetError::Io { path, .. } => assert!(path.ends_with("does/not/exist.png")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
