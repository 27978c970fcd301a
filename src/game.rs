//! The one scene: walk the map, poop, and watch the needs fill up.

use glam::Vec2;
use tracing::info;

use crate::anims::{AnimationConfig, Frames, Repeat, generate_frame_numbers};
use crate::assets::Loader;
use crate::config::GameplaySettings;
use crate::engine::{Color, Engine, Game};
use crate::error::AssetError;
use crate::input::KeyCode;
use crate::needs::Needs;
use crate::physics::LayerId;
use crate::player::{AnimationChoice, Facing, choose_animation, movement_velocity};
use crate::sprite::SpriteId;
use crate::tilemap::DebugStyle;
use crate::ui::{RectId, Rectangle, TextLabel};

pub const TILES: &str = "tiles";
pub const MAP: &str = "map";
pub const CHARACTERS: &str = "characters";
pub const POOP: &str = "poop";
pub const STINK: &str = "stink";

const TILESET_NAME: &str = "world-tiles";
const GROUND_LAYER: &str = "Ground";
const OBJECTS_LAYER: &str = "GroundObjects";
const SPAWN: Vec2 = Vec2::new(100.0, 100.0);
const PLAYER_IDLE_FRAME: u32 = 1;
const POOP_SCALE: f32 = 0.5;
const ANIM_FPS: f32 = 10.0;

const URGENCY_COLOR: Color = Color::hex(0x8B4513);
const HUNGER_COLOR: Color = Color::hex(0xFF0000);

/// Handles created in `create` and used every update.
struct Handles {
    player: SpriteId,
    objects: LayerId,
    urgency_bar: RectId,
    hunger_bar: RectId,
}

pub struct SurviveScene {
    settings: GameplaySettings,
    needs: Needs,
    handles: Option<Handles>,
    debug_shown: bool,
    poops_dropped: u32,
}

impl SurviveScene {
    pub fn new(settings: GameplaySettings) -> Self {
        let needs = Needs::new(settings.fecal_urgency_per_frame, settings.hunger_per_frame);
        Self { settings, needs, handles: None, debug_shown: false, poops_dropped: 0 }
    }

    pub fn needs(&self) -> &Needs {
        &self.needs
    }

    pub fn player(&self) -> Option<SpriteId> {
        self.handles.as_ref().map(|h| h.player)
    }

    pub fn poops_dropped(&self) -> u32 {
        self.poops_dropped
    }

    pub fn debug_shown(&self) -> bool {
        self.debug_shown
    }

    /// Physics debug graphic plus collision view of the objects layer.
    /// Only the first call has an effect.
    fn show_debug(&mut self, engine: &mut Engine, objects: LayerId) {
        if self.debug_shown {
            return;
        }
        self.debug_shown = true;
        engine.physics.create_debug_graphic();
        let graphics = engine.add_graphics();
        if let Some(g) = engine.graphics_mut(graphics) {
            g.set_alpha(0.75).set_depth(20.0);
        }
        engine.render_layer_debug(objects, graphics, &DebugStyle::default());
    }

    fn drop_poop(&mut self, engine: &mut Engine, player: SpriteId) {
        let Some(position) = engine.sprites.get(player).map(|s| s.position) else {
            return;
        };
        let poop = engine.add_sprite(position, POOP, 0);
        if let Some(sprite) = engine.sprites.get_mut(poop) {
            sprite.set_scale(POOP_SCALE);
            if self.settings.poop_lifetime_secs > 0.0 {
                sprite.set_lifetime(self.settings.poop_lifetime_secs);
            }
        }
        engine.play(poop, STINK, false);
        engine.sprites.bring_to_top(player);
        self.poops_dropped += 1;
        info!(x = position.x, y = position.y, total = self.poops_dropped, "poop dropped");
    }
}

impl Game for SurviveScene {
    fn preload(&mut self, load: &mut Loader) {
        load.image(TILES, "assets/tilesets/basictiles.png");
        load.tilemap_tiled_json(MAP, "assets/tilemaps/world.json");
        load.spritesheet(CHARACTERS, "assets/tilesets/characters.png", 16, 16);
        load.spritesheet(POOP, "assets/tilesets/poop.png", 16, 16);
    }

    fn create(&mut self, engine: &mut Engine) -> Result<(), AssetError> {
        let mut map = engine.make_tilemap(MAP)?;
        let tileset = map.add_tileset_image(TILESET_NAME, TILES)?;
        let ground = map.create_static_layer(GROUND_LAYER, &tileset, 0.0, 0.0)?;
        let mut objects = map.create_static_layer(OBJECTS_LAYER, &tileset, 0.0, 0.0)?;
        objects.set_collision_by_property("collides", true);
        engine.add_layer(ground);
        let objects = engine.add_layer(objects);

        let player = engine.add_physics_sprite(SPAWN, CHARACTERS, PLAYER_IDLE_FRAME)?;
        engine.physics.add_collider(player, objects);

        for facing in Facing::ALL {
            let (start, end) = facing.walk_frames();
            engine.create_anim(AnimationConfig {
                key: facing.walk_key().into(),
                texture: CHARACTERS.into(),
                frames: Frames::List(generate_frame_numbers(start, end)),
                frame_rate: ANIM_FPS,
                repeat: Repeat::Forever,
            })?;
        }
        engine.create_anim(AnimationConfig {
            key: STINK.into(),
            texture: POOP.into(),
            frames: Frames::All,
            frame_rate: ANIM_FPS,
            repeat: Repeat::Forever,
        })?;

        if self.settings.camera_follow {
            engine.camera_follow(player);
        }

        // Fecal urgency meter.
        engine.hud.add_rectangle(Rectangle::new(3.0, 3.0, 150.0, 20.0).with_stroke(1.0, Color::WHITE));
        let urgency_bar = engine.hud.add_rectangle(Rectangle::new(4.0, 4.0, 148.0, 18.0).with_fill(URGENCY_COLOR));
        engine.hud.add_text(TextLabel::new(5.0, 3.0, "Fecal urgency"));

        // Hunger meter.
        engine.hud.add_rectangle(Rectangle::new(3.0, 27.0, 150.0, 20.0).with_stroke(1.0, Color::WHITE));
        let hunger_bar = engine.hud.add_rectangle(Rectangle::new(4.0, 28.0, 148.0, 18.0).with_fill(HUNGER_COLOR));
        engine.hud.add_text(TextLabel::new(5.0, 27.0, "Hunger"));

        self.handles = Some(Handles { player, objects, urgency_bar, hunger_bar });
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine) {
        let Some(&Handles { player, objects, urgency_bar, hunger_bar }) = self.handles.as_ref() else {
            return;
        };

        if engine.input.is_key_pressed(KeyCode::KeyD) {
            self.show_debug(engine, objects);
        }

        let keys = engine.input.cursors();
        let speed = self.settings.walk_speed;
        let axis = self.settings.axis_velocity;

        let prev_velocity = match engine.sprites.get_mut(player).and_then(|s| s.body.as_mut()) {
            Some(body) => {
                let prev = body.velocity;
                let v = movement_velocity(&keys, axis, speed);
                body.set_velocity(v.x, v.y);
                prev
            }
            None => return,
        };

        match choose_animation(&keys, prev_velocity) {
            AnimationChoice::Walk(facing) => {
                engine.play(player, facing.walk_key(), true);
            }
            AnimationChoice::Idle(facing) => {
                engine.stop_anim(player);
                if let (Some(facing), Some(sprite)) = (facing, engine.sprites.get_mut(player)) {
                    sprite.set_frame(facing.idle_frame());
                }
            }
        }

        let now = engine.now_ms();
        if engine.input.check_down(KeyCode::Space, now, self.settings.poop_cooldown_ms) {
            self.drop_poop(engine, player);
        }

        self.needs.tick();
        let urgency = self.needs.fecal_urgency.fraction();
        let hunger = self.needs.hunger.fraction();
        if let Some(bar) = engine.hud.rect_mut(urgency_bar) {
            bar.set_scale_x(urgency);
        }
        if let Some(bar) = engine.hud.rect_mut(hunger_bar) {
            bar.set_scale_x(hunger);
        }
    }
}
