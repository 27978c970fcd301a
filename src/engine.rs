use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use image::RgbaImage;
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

pub use crate::graphics::Color;

use crate::anims::{AnimationConfig, AnimationManager};
use crate::assets::{AssetCache, Loader};
use crate::camera::Camera;
use crate::config::GameConfig;
use crate::error::{AssetError, EngineError};
use crate::graphics::{Graphics, Shape};
use crate::input::InputState;
use crate::physics::{ArcadeWorld, Body, LayerId};
use crate::renderer::Renderer;
use crate::renderer::batch::{BatchBuilder, DrawBatch, Space};
use crate::renderer::text::Font;
use crate::renderer::texture::TextureId;
use crate::sprite::{SpriteId, SpriteList};
use crate::tilemap::{StaticLayer, Tilemap};
use crate::ui::Hud;

/// Longest wall-clock gap the fixed-step loop will catch up on.
const MAX_FRAME_SECS: f32 = 0.25;

// ── Game trait ──────────────────────────────────────────────────────────────

/// A scene driven by the engine: assets first, then one `create`, then
/// `update` at the fixed rate.
pub trait Game {
    fn preload(&mut self, load: &mut Loader);
    fn create(&mut self, engine: &mut Engine) -> Result<(), AssetError>;
    fn update(&mut self, engine: &mut Engine);
    /// Called once per drawn frame, after all updates for that frame.
    fn render(&mut self, _engine: &mut Engine) {}
}

// ── Engine ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphicsId(usize);

/// Everything a scene touches. Holds no GPU state, so scenes can be driven
/// headless.
pub struct Engine {
    pub camera: Camera,
    pub input: InputState,
    pub assets: AssetCache,
    pub anims: AnimationManager,
    pub sprites: SpriteList,
    pub physics: ArcadeWorld,
    pub hud: Hud,
    /// Seconds per fixed update.
    pub dt: f32,
    /// Number of fixed updates run so far.
    pub tick: u64,
    time_ms: f64,
    viewport: Vec2,
    layers: Vec<StaticLayer>,
    graphics: Vec<Graphics>,
    follow: Option<SpriteId>,
    textures: HashMap<String, TextureId>,
    font: Font,
    font_texture: Option<TextureId>,
    debug_enabled: bool,
    quit_requested: bool,
}

impl Engine {
    pub fn new(width: u32, height: u32, gravity: Vec2, assets: AssetCache) -> Self {
        Self {
            camera: Camera::new(width as f32, height as f32),
            input: InputState::new(),
            assets,
            anims: AnimationManager::new(),
            sprites: SpriteList::new(),
            physics: ArcadeWorld::new(gravity),
            hud: Hud::new(),
            dt: 0.0,
            tick: 0,
            time_ms: 0.0,
            viewport: Vec2::new(width as f32, height as f32),
            layers: Vec::new(),
            graphics: Vec::new(),
            follow: None,
            textures: HashMap::new(),
            font: Font::builtin(),
            font_texture: None,
            debug_enabled: false,
            quit_requested: false,
        }
    }

    /// Engine time in milliseconds, advanced by each fixed update.
    pub fn now_ms(&self) -> f64 {
        self.time_ms
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
    }

    pub fn quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Whether `--debug` was given on the command line.
    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    pub fn set_debug_enabled(&mut self, enabled: bool) {
        self.debug_enabled = enabled;
    }

    // ── GPU bindings ────────────────────────────────────────────────────────

    pub fn register_texture(&mut self, key: &str, id: TextureId) {
        self.textures.insert(key.to_string(), id);
    }

    pub fn font_atlas(&self) -> &RgbaImage {
        &self.font.atlas
    }

    pub fn set_font_texture(&mut self, id: TextureId) {
        self.font_texture = Some(id);
    }

    // ── Scene building ──────────────────────────────────────────────────────

    pub fn frame_count(&self, texture: &str) -> Result<u32, AssetError> {
        self.assets.frame_count(texture)
    }

    /// A fresh tilemap from the Tiled JSON loaded under `key`.
    pub fn make_tilemap(&self, key: &str) -> Result<Tilemap, AssetError> {
        Tilemap::new(self.assets.tilemap(key)?.clone())
    }

    pub fn add_layer(&mut self, layer: StaticLayer) -> LayerId {
        self.layers.push(layer);
        LayerId(self.layers.len() - 1)
    }

    pub fn layer(&self, id: LayerId) -> Option<&StaticLayer> {
        self.layers.get(id.0)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut StaticLayer> {
        self.layers.get_mut(id.0)
    }

    /// Plain sprite centred on `position`.
    pub fn add_sprite(&mut self, position: Vec2, texture: &str, frame: u32) -> SpriteId {
        self.sprites.add(position, texture, frame)
    }

    /// Sprite with a physics body the size of one frame of `texture`.
    pub fn add_physics_sprite(&mut self, position: Vec2, texture: &str, frame: u32) -> Result<SpriteId, AssetError> {
        let grid = self.assets.texture(texture)?.grid;
        let id = self.sprites.add(position, texture, frame);
        if let Some(sprite) = self.sprites.get_mut(id) {
            sprite.body = Some(Body::new(Vec2::new(grid.frame_w as f32, grid.frame_h as f32)));
        }
        Ok(id)
    }

    /// Register a global animation, resolving frames against its texture.
    pub fn create_anim(&mut self, config: AnimationConfig) -> Result<(), AssetError> {
        let frame_count = self.frame_count(&config.texture)?;
        self.anims.create(config, frame_count)?;
        Ok(())
    }

    /// Play animation `key` on a sprite. Returns `false` if either is missing.
    pub fn play(&mut self, id: SpriteId, key: &str, ignore_if_playing: bool) -> bool {
        let (Some(anim), Some(sprite)) = (self.anims.get(key), self.sprites.get_mut(id)) else {
            debug!(anim = key, "play skipped: unknown sprite or animation");
            return false;
        };
        if let Some(frame) = sprite.anims.play(anim, ignore_if_playing) {
            if sprite.texture != anim.texture {
                sprite.texture = anim.texture.clone();
            }
            sprite.frame = frame;
        }
        true
    }

    pub fn stop_anim(&mut self, id: SpriteId) {
        if let Some(sprite) = self.sprites.get_mut(id) {
            sprite.anims.stop();
        }
    }

    /// New world-space graphics object on top of the existing ones.
    pub fn add_graphics(&mut self) -> GraphicsId {
        self.graphics.push(Graphics::new());
        GraphicsId(self.graphics.len() - 1)
    }

    pub fn graphics_mut(&mut self, id: GraphicsId) -> Option<&mut Graphics> {
        self.graphics.get_mut(id.0)
    }

    /// Render the collision debug view of `layer` into graphics `target`.
    pub fn render_layer_debug(&mut self, layer: LayerId, target: GraphicsId, style: &crate::tilemap::DebugStyle) {
        if let (Some(layer), Some(graphics)) = (self.layers.get(layer.0), self.graphics.get_mut(target.0)) {
            layer.render_debug(graphics, style);
            info!(layer = %layer.name, shapes = graphics.shapes().len(), "layer debug rendered");
        }
    }

    /// Keep the camera on `sprite`, clamped to the first layer's bounds.
    pub fn camera_follow(&mut self, sprite: SpriteId) {
        if let Some(layer) = self.layers.first() {
            self.camera.set_bounds(layer.bounds());
        }
        self.follow = Some(sprite);
        self.update_camera();
    }

    fn update_camera(&mut self) {
        if let Some(target) = self.follow.and_then(|id| self.sprites.get(id)) {
            let position = target.position;
            self.camera.follow(position, self.viewport);
        }
    }

    // ── Frame stepping ──────────────────────────────────────────────────────

    /// Start a fixed update of `dt` seconds.
    pub fn begin_step(&mut self, dt: f32) {
        self.dt = dt;
        self.tick += 1;
        self.time_ms += dt as f64 * 1000.0;
    }

    /// Physics, animations, sprite lifetimes and the camera, in that order.
    pub fn step_world(&mut self, dt: f32) {
        self.physics.step(dt, &mut self.sprites, &self.layers);

        for sprite in self.sprites.iter_mut() {
            if let Some(frame) = sprite.anims.tick(dt, &self.anims) {
                sprite.frame = frame;
            }
        }

        let expired = self.sprites.expire(dt);
        if expired > 0 {
            debug!(count = expired, "sprites expired");
        }

        self.update_camera();
    }

    // ── Drawing ─────────────────────────────────────────────────────────────

    /// Turn the current scene into draw batches: tile layers, then sprites
    /// and graphics by depth, then the physics debug overlay, then the HUD.
    pub fn build_batches(&mut self) -> Vec<DrawBatch> {
        let mut batch = BatchBuilder::new();
        let view = self.camera.world_view(self.viewport);

        for layer in self.layers.iter().filter(|l| l.visible) {
            let Some((&texture, source)) = self
                .textures
                .get(&layer.tileset.texture)
                .zip(self.assets.textures.get(&layer.tileset.texture))
            else {
                continue;
            };
            let tex_size = Vec2::new(source.grid.texture_w as f32, source.grid.texture_h as f32);
            let tile_size = Vec2::new(layer.tile_width, layer.tile_height);
            let tint = Color::WHITE.with_alpha(layer.alpha);
            for (tx, ty, tile) in layer.tiles() {
                let rect = layer.tile_rect(tx as i32, ty as i32);
                if !rect.overlaps(&view) {
                    continue;
                }
                let Some((ox, oy)) = layer.tileset.tile_origin(tile.local_id) else {
                    continue;
                };
                let uv_min = Vec2::new(ox as f32, oy as f32) / tex_size;
                let uv_max = uv_min + tile_size / tex_size;
                batch.quad(texture, Space::World, rect.min, rect.size(), uv_min.to_array(), uv_max.to_array(), tint);
            }
        }

        enum Drawable {
            Sprite(usize),
            Graphics(usize),
        }
        let mut drawables: Vec<(f32, Drawable)> = self
            .sprites
            .iter()
            .enumerate()
            .filter(|(_, s)| s.visible)
            .map(|(i, s)| (s.depth, Drawable::Sprite(i)))
            .chain(
                self.graphics
                    .iter()
                    .enumerate()
                    .filter(|(_, g)| g.visible)
                    .map(|(i, g)| (g.depth, Drawable::Graphics(i))),
            )
            .collect();
        drawables.sort_by(|a, b| a.0.total_cmp(&b.0));

        let sprites: Vec<_> = self.sprites.iter().collect();
        for (_, drawable) in &drawables {
            match *drawable {
                Drawable::Sprite(i) => {
                    let sprite = sprites[i];
                    let (Some(&texture), Ok(source)) =
                        (self.textures.get(&sprite.texture), self.assets.texture(&sprite.texture))
                    else {
                        continue;
                    };
                    let Some((uv_min, uv_max)) = source.grid.uv_for_frame(sprite.frame) else {
                        continue;
                    };
                    let size = Vec2::new(source.grid.frame_w as f32, source.grid.frame_h as f32) * sprite.scale;
                    let min = sprite.position - size * 0.5;
                    batch.quad(texture, Space::World, min, size, uv_min, uv_max, Color::WHITE.with_alpha(sprite.alpha));
                }
                Drawable::Graphics(i) => draw_graphics(&self.graphics[i], &mut batch),
            }
        }

        if let Some(debug) = self.physics.debug_graphic() {
            draw_graphics(debug, &mut batch);
        }

        if let Some(font_texture) = self.font_texture {
            self.hud.draw(&self.font, font_texture, &mut batch);
        }

        batch.finish()
    }
}

fn draw_graphics(graphics: &Graphics, batch: &mut BatchBuilder) {
    let alpha = graphics.alpha;
    for shape in graphics.shapes() {
        match *shape {
            Shape::FillRect { min, size, color } => {
                batch.fill_rect(Space::World, min, size, color.with_alpha(alpha));
            }
            Shape::StrokeRect { min, size, thickness, color } => {
                batch.stroke_rect(Space::World, min, size, thickness, color.with_alpha(alpha));
            }
            Shape::Line { from, to, thickness, color } => {
                batch.line(Space::World, from, to, thickness, color.with_alpha(alpha));
            }
        }
    }
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    target_ups: u32,
    gravity: Vec2,
    asset_root: PathBuf,
    debug_enabled: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            title: "Survive and Poop".into(),
            width: 800,
            height: 600,
            target_ups: 60,
            gravity: Vec2::ZERO,
            asset_root: PathBuf::from("."),
            debug_enabled: false,
        }
    }
}

impl EngineBuilder {
    /// Builder seeded from the window, physics and asset sections of `config`.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::default()
            .with_title(&config.window.title)
            .with_size(config.window.width, config.window.height)
            .with_ups(config.window.target_ups)
            .with_gravity(Vec2::from_array(config.physics.gravity))
            .with_asset_root(&config.assets.root)
            .with_debug(config.physics.debug)
    }

    pub fn with_title(mut self, title: &str) -> Self { self.title = title.into(); self }
    pub fn with_size(mut self, width: u32, height: u32) -> Self { self.width = width; self.height = height; self }
    pub fn with_ups(mut self, ups: u32) -> Self { self.target_ups = ups.max(1); self }
    pub fn with_gravity(mut self, gravity: Vec2) -> Self { self.gravity = gravity; self }
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self { self.asset_root = root.into(); self }

    /// Start with the physics debug overlay on.
    pub fn with_debug(mut self, enabled: bool) -> Self { self.debug_enabled = enabled; self }

    pub fn run(self, game: impl Game + 'static) -> Result<(), EngineError> {
        let event_loop = EventLoop::new()?;
        let fixed_dt = 1.0 / self.target_ups as f32;
        let mut app = App {
            config: self,
            game: Box::new(game),
            running: None,
            error: None,
            last_instant: None,
            accumulator: 0.0,
            fixed_dt,
        };
        event_loop.run_app(&mut app)?;
        match app.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct Running {
    renderer: Renderer,
    engine: Engine,
}

struct App {
    config: EngineBuilder,
    game: Box<dyn Game>,
    running: Option<Running>,
    /// First fatal error; returned from `EngineBuilder::run`.
    error: Option<EngineError>,
    last_instant: Option<Instant>,
    accumulator: f32,
    fixed_dt: f32,
}

impl App {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running, EngineError> {
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(&self.config.title)
                    .with_inner_size(winit::dpi::PhysicalSize::new(self.config.width, self.config.height))
                    .with_resizable(false),
            )?,
        );
        let mut renderer = pollster::block_on(Renderer::new(window))?;

        let mut loader = Loader::new();
        self.game.preload(&mut loader);
        info!(queued = loader.len(), root = %self.config.asset_root.display(), "loading assets");
        let assets = loader.load_all(&self.config.asset_root)?;

        let (width, height) = renderer.size();
        let mut engine = Engine::new(width, height, self.config.gravity, assets);
        engine.set_debug_enabled(self.config.debug_enabled);

        let uploads: Vec<(String, TextureId)> = engine
            .assets
            .textures
            .iter()
            .map(|(key, source)| (key.clone(), renderer.upload_texture(key, &source.image)))
            .collect();
        for (key, id) in uploads {
            engine.register_texture(&key, id);
        }
        let font_texture = renderer.upload_texture("font", engine.font_atlas());
        engine.set_font_texture(font_texture);

        self.game.create(&mut engine)?;
        if self.config.debug_enabled {
            engine.physics.create_debug_graphic();
        }
        info!(sprites = engine.sprites.len(), "scene created");

        Ok(Running { renderer, engine })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        error!(error = %err, "fatal engine error");
        self.error.get_or_insert(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = self.running.as_ref() {
            running.renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(Running { renderer, engine }) = self.running.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => {
                info!("window closed");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                renderer.resize(size);
                let (width, height) = renderer.size();
                engine.set_viewport(width, height);
            }

            WindowEvent::Focused(false) => engine.input.release_all(),

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32().min(MAX_FRAME_SECS),
                    None => self.fixed_dt,
                };
                self.last_instant = Some(now);
                self.accumulator += elapsed;

                while self.accumulator >= self.fixed_dt {
                    engine.begin_step(self.fixed_dt);
                    self.game.update(engine);
                    engine.step_world(self.fixed_dt);
                    // Edge-triggered state is consumed by the first update that sees it.
                    engine.input.clear_frame_state();
                    if engine.is_quit_requested() {
                        event_loop.exit();
                        return;
                    }
                    self.accumulator -= self.fixed_dt;
                }

                self.game.render(engine);
                let batches = engine.build_batches();

                let (width, height) = renderer.size();
                renderer.update_camera(&engine.camera.build_view_proj(width as f32, height as f32));

                match renderer.render(&batches) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        warn!("surface lost, reconfiguring");
                        renderer.reconfigure();
                    }
                    Err(e) => warn!(error = %e, "frame skipped"),
                }
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    let now = engine.now_ms();
                    engine.input.press(code, now);
                }
                ElementState::Released => engine.input.release(code),
            },

            _ => {}
        }
    }
}
