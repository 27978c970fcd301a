use glam::Vec2;
use proptest::prelude::*;
use survive_and_poop::physics::{Aabb, ArcadeWorld, Body, LayerId, SolidTiles, move_with_collision};
use survive_and_poop::sprite::SpriteList;
use survive_and_poop::tilemap::{StaticLayer, TiledMap, Tilemap};

const DT: f32 = 1.0 / 60.0;

// ── helpers ───────────────────────────────────────────────────────────────────

/// 10×10 room of 16 px tiles: walls on every edge plus a pillar at (5, 5).
fn room() -> StaticLayer {
    let mut data = Vec::new();
    for y in 0..10 {
        for x in 0..10 {
            let wall = x == 0 || y == 0 || x == 9 || y == 9 || (x == 5 && y == 5);
            data.push(if wall { "2" } else { "1" });
        }
    }
    let json = format!(
        r#"{{
            "width": 10, "height": 10, "tilewidth": 16, "tileheight": 16,
            "layers": [{{ "name": "Walls", "type": "tilelayer", "data": [{}] }}],
            "tilesets": [{{
                "firstgid": 1, "name": "t", "tilewidth": 16, "tileheight": 16,
                "columns": 2, "tilecount": 2,
                "tiles": [{{ "id": 1, "properties": [{{ "name": "collides", "type": "bool", "value": true }}] }}]
            }}]
        }}"#,
        data.join(",")
    );
    let mut map = Tilemap::new(TiledMap::from_json(&json).unwrap()).unwrap();
    let tileset = map.add_tileset_image("t", "tiles").unwrap();
    let mut layer = map.create_static_layer("Walls", &tileset, 0.0, 0.0).unwrap();
    layer.set_collision_by_property("collides", true);
    layer
}

/// Deepest penetration of `aabb` into any solid of `layer`.
fn penetration(layer: &StaticLayer, aabb: &Aabb) -> f32 {
    layer
        .solids_in(aabb)
        .iter()
        .map(|s| {
            let w = aabb.max.x.min(s.max.x) - aabb.min.x.max(s.min.x);
            let h = aabb.max.y.min(s.max.y) - aabb.min.y.max(s.min.y);
            w.min(h)
        })
        .fold(0.0, f32::max)
}

// ── move_with_collision ──────────────────────────────────────────────────────

#[test]
fn walking_into_a_wall_stops_flush() {
    let layer = room();
    let mut body = Body::new(Vec2::splat(16.0));
    body.set_velocity(-175.0, 0.0);
    let mut pos = Vec2::new(40.0, 40.0);
    for _ in 0..60 {
        pos = move_with_collision(&mut body, pos, DT, &[&layer]);
        body.set_velocity(-175.0, 0.0);
    }
    // Left wall ends at x = 16; the body is 16 wide.
    assert!((pos.x - 24.0).abs() < 1e-3, "x = {}", pos.x);
    assert_eq!(pos.y, 40.0);
    assert!(body.blocked.left);
}

#[test]
fn diagonal_slides_along_wall() {
    let layer = room();
    let mut body = Body::new(Vec2::splat(16.0));
    body.set_velocity(100.0, -100.0);
    let mut pos = Vec2::new(40.0, 40.0);
    let mut hit_top = false;
    for _ in 0..30 {
        pos = move_with_collision(&mut body, pos, DT, &[&layer]);
        hit_top |= body.blocked.up;
    }
    assert!(hit_top);
    assert!((pos.y - 24.0).abs() < 1e-3, "y = {}", pos.y);
    assert!((pos.x - 90.0).abs() < 1e-2, "x = {}", pos.x);
    assert_eq!(body.velocity.y, 0.0);
    assert_eq!(body.velocity.x, 100.0);
}

#[test]
fn fast_bodies_do_not_tunnel() {
    let layer = room();
    let mut body = Body::new(Vec2::splat(16.0));
    // 60 px in one step, more than a tile.
    body.set_velocity(3600.0, 0.0);
    let pos = move_with_collision(&mut body, Vec2::new(48.0, 88.0), DT, &[&layer]);
    // Pillar at x 80..96 on row 5 (y 80..96).
    assert!((pos.x - 72.0).abs() < 1e-3, "x = {}", pos.x);
    assert!(body.blocked.right);
}

proptest! {
    #[test]
    fn body_never_sinks_into_walls(
        vx in -600.0f32..600.0,
        vy in -600.0f32..600.0,
        steps in 1usize..240,
    ) {
        let layer = room();
        let mut body = Body::new(Vec2::splat(16.0));
        let mut pos = Vec2::new(40.0, 40.0);
        for _ in 0..steps {
            body.set_velocity(vx, vy);
            pos = move_with_collision(&mut body, pos, DT, &[&layer]);
            prop_assert!(penetration(&layer, &body.bounds(pos)) < 1e-2);
        }
    }
}

// ── ArcadeWorld ──────────────────────────────────────────────────────────────

#[test]
fn world_only_collides_registered_pairs() {
    let layers = vec![room()];
    let mut sprites = SpriteList::new();
    let ghost = sprites.add(Vec2::new(40.0, 40.0), "characters", 1);
    let player = sprites.add(Vec2::new(40.0, 40.0), "characters", 1);
    for id in [ghost, player] {
        let sprite = sprites.get_mut(id).unwrap();
        let mut body = Body::new(Vec2::splat(16.0));
        body.set_velocity(-600.0, 0.0);
        sprite.body = Some(body);
    }

    let mut world = ArcadeWorld::new(Vec2::ZERO);
    world.add_collider(player, LayerId(0));
    world.add_collider(player, LayerId(0));
    world.step(0.1, &mut sprites, &layers);

    assert!((sprites.get(player).unwrap().position.x - 24.0).abs() < 1e-3);
    assert!((sprites.get(ghost).unwrap().position.x + 20.0).abs() < 1e-3);
}

#[test]
fn gravity_accelerates_bodies() {
    let mut sprites = SpriteList::new();
    let id = sprites.add(Vec2::ZERO, "characters", 1);
    sprites.get_mut(id).unwrap().body = Some(Body::new(Vec2::splat(16.0)));
    let mut world = ArcadeWorld::new(Vec2::new(0.0, 100.0));
    world.step(0.5, &mut sprites, &[]);
    let sprite = sprites.get(id).unwrap();
    assert_eq!(sprite.body.as_ref().unwrap().velocity, Vec2::new(0.0, 50.0));
    assert!((sprite.position.y - 25.0).abs() < 1e-4);
}

#[test]
fn debug_graphic_outlines_every_body() {
    let mut sprites = SpriteList::new();
    for x in [10.0, 50.0] {
        let id = sprites.add(Vec2::new(x, 10.0), "characters", 1);
        sprites.get_mut(id).unwrap().body = Some(Body::new(Vec2::splat(16.0)));
    }
    sprites.add(Vec2::ZERO, "poop", 0);

    let mut world = ArcadeWorld::new(Vec2::ZERO);
    assert!(world.debug_graphic().is_none());
    world.create_debug_graphic();
    world.create_debug_graphic();
    world.step(DT, &mut sprites, &[]);
    world.step(DT, &mut sprites, &[]);

    // One outline and one velocity line per body, redrawn each step.
    assert_eq!(world.debug_graphic().unwrap().shapes().len(), 4);
}
