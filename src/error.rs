use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or interpreting game assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to parse tilemap '{path}': {source}")]
    Tilemap {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no asset loaded under key '{0}'")]
    MissingKey(String),

    #[error("texture '{key}' ({width}x{height}) cannot hold a single {frame_w}x{frame_h} frame")]
    EmptySheet {
        key: String,
        width: u32,
        height: u32,
        frame_w: u32,
        frame_h: u32,
    },

    #[error("animation '{0}' has no frames")]
    EmptyAnimation(String),

    #[error("frame {frame} is out of range for texture '{texture}' ({frame_count} frames)")]
    FrameOutOfRange {
        texture: String,
        frame: u32,
        frame_count: u32,
    },

    #[error("tileset '{0}' is not part of this tilemap")]
    MissingTileset(String),

    #[error("layer '{0}' is not part of this tilemap")]
    MissingLayer(String),

    #[error("layer '{0}' is not a tile layer")]
    NotTileLayer(String),

    #[error("unsupported tilemap feature: {0}")]
    Unsupported(String),
}

/// Failures while bringing up the GPU.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
}

/// Failures while reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level error returned from [`crate::engine::EngineBuilder::run`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}
