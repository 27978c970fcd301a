pub mod anims;
pub mod assets;
pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod graphics;
pub mod input;
pub mod logging;
pub mod needs;
pub mod physics;
pub mod player;
pub mod renderer;
pub mod sprite;
pub mod tilemap;
pub mod ui;
