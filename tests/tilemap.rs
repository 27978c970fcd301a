use glam::Vec2;
use survive_and_poop::graphics::{Color, Graphics, Shape};
use survive_and_poop::physics::Aabb;
use survive_and_poop::tilemap::{DebugStyle, Faces, StaticLayer, TiledMap, Tilemap};

// ── helpers ───────────────────────────────────────────────────────────────────

/// 4×3 map of 16 px tiles. Tile 2 (gid 3) collides.
///
/// ```text
/// Ground:        GroundObjects:
/// 1 1 1 1        0 3 3 0
/// 1 1 1 1        0 0 3 0
/// 1 1 1 1        0 0 0 9
/// ```
/// gid 9 belongs to no tileset; the last object carries the H-flip bit.
fn sample_json() -> String {
    let flipped = 0x8000_0003u32;
    format!(
        r#"{{
            "width": 4, "height": 3, "tilewidth": 16, "tileheight": 16,
            "orientation": "orthogonal",
            "layers": [
                {{ "name": "Ground", "type": "tilelayer", "width": 4, "height": 3,
                   "data": [1,1,1,1, 1,1,1,1, 1,1,1,1] }},
                {{ "name": "GroundObjects", "type": "tilelayer", "width": 4, "height": 3,
                   "data": [0,3,3,0, 0,0,{flipped},0, 0,0,0,9] }},
                {{ "name": "Spawns", "type": "objectgroup" }}
            ],
            "tilesets": [{{
                "firstgid": 1, "name": "world-tiles", "image": "basictiles.png",
                "tilewidth": 16, "tileheight": 16, "columns": 4, "tilecount": 8,
                "tiles": [
                    {{ "id": 2, "properties": [{{ "name": "collides", "type": "bool", "value": true }}] }},
                    {{ "id": 0, "properties": [{{ "name": "collides", "type": "bool", "value": false }}] }}
                ]
            }}]
        }}"#
    )
}

fn map() -> Tilemap {
    Tilemap::new(TiledMap::from_json(&sample_json()).unwrap()).unwrap()
}

fn objects() -> StaticLayer {
    let mut map = map();
    let tileset = map.add_tileset_image("world-tiles", "tiles").unwrap();
    let mut layer = map.create_static_layer("GroundObjects", &tileset, 0.0, 0.0).unwrap();
    layer.set_collision_by_property("collides", true);
    layer
}

// ── parsing ──────────────────────────────────────────────────────────────────

#[test]
fn parses_map_dimensions() {
    let map = map();
    assert_eq!((map.width(), map.height()), (4, 3));
    assert_eq!(map.pixel_size(), Vec2::new(64.0, 48.0));
}

#[test]
fn non_orthogonal_maps_are_rejected() {
    let json = sample_json().replace("\"orthogonal\"", "\"isometric\"");
    assert!(Tilemap::new(TiledMap::from_json(&json).unwrap()).is_err());
}

#[test]
fn legacy_tileproperties_are_read() {
    let json = r#"{
        "width": 2, "height": 1, "tilewidth": 16, "tileheight": 16,
        "layers": [{ "name": "Ground", "type": "tilelayer", "data": [1, 2] }],
        "tilesets": [{
            "firstgid": 1, "name": "world-tiles", "tilewidth": 16, "tileheight": 16,
            "columns": 2, "tilecount": 2,
            "tileproperties": { "1": { "collides": true } }
        }]
    }"#;
    let mut map = Tilemap::new(TiledMap::from_json(json).unwrap()).unwrap();
    let tileset = map.add_tileset_image("world-tiles", "tiles").unwrap();
    let mut layer = map.create_static_layer("Ground", &tileset, 0.0, 0.0).unwrap();
    assert_eq!(layer.set_collision_by_property("collides", true), 1);
    assert!(!layer.is_colliding(0, 0));
    assert!(layer.is_colliding(1, 0));
}

// ── layer errors ─────────────────────────────────────────────────────────────

#[test]
fn missing_tileset_and_layer_are_errors() {
    let mut map = map();
    assert!(map.add_tileset_image("nope", "tiles").is_err());
    let tileset = map.add_tileset_image("world-tiles", "tiles").unwrap();
    assert!(map.create_static_layer("Nope", &tileset, 0.0, 0.0).is_err());
    assert!(map.create_static_layer("Spawns", &tileset, 0.0, 0.0).is_err());
}

#[test]
fn encoded_layers_are_unsupported() {
    let json = sample_json().replace(
        r#""data": [1,1,1,1, 1,1,1,1, 1,1,1,1] }"#,
        r#""data": "AQAAAA==", "encoding": "base64" }"#,
    );
    let mut map = Tilemap::new(TiledMap::from_json(&json).unwrap()).unwrap();
    let tileset = map.add_tileset_image("world-tiles", "tiles").unwrap();
    assert!(map.create_static_layer("Ground", &tileset, 0.0, 0.0).is_err());
}

// ── tiles and collision ─────────────────────────────────────────────────────

#[test]
fn flip_bits_and_foreign_gids() {
    let layer = objects();
    let flipped = layer.tile_at(2, 1).unwrap();
    assert_eq!(flipped.gid, 3);
    assert_eq!(flipped.local_id, 2);
    assert!(layer.tile_at(3, 2).is_none(), "gid 9 is outside the tileset");
    assert!(layer.tile_at(0, 0).is_none());
    assert!(layer.tile_at(-1, 0).is_none());
    assert!(layer.tile_at(4, 0).is_none());
}

#[test]
fn collision_by_property_marks_matching_tiles() {
    let mut map = map();
    let tileset = map.add_tileset_image("world-tiles", "tiles").unwrap();
    let mut layer = map.create_static_layer("GroundObjects", &tileset, 0.0, 0.0).unwrap();
    assert!(!layer.is_colliding(1, 0));
    assert_eq!(layer.set_collision_by_property("collides", true), 3);
    assert!(layer.is_colliding(1, 0));
    assert!(layer.is_colliding(2, 0));
    assert!(layer.is_colliding(2, 1));

    let mut ground = map.create_static_layer("Ground", &tileset, 0.0, 0.0).unwrap();
    assert_eq!(ground.set_collision_by_property("collides", true), 0);
}

#[test]
fn faces_skip_shared_edges() {
    let layer = objects();
    assert_eq!(layer.faces(1, 0), Faces { top: true, bottom: true, left: true, right: false });
    assert_eq!(layer.faces(2, 0), Faces { top: true, bottom: false, left: false, right: true });
    assert_eq!(layer.faces(2, 1), Faces { top: false, bottom: true, left: true, right: true });
    assert_eq!(layer.faces(0, 0), Faces::default());
}

#[test]
fn colliding_tiles_in_area() {
    let layer = objects();
    let area = Aabb::from_min_size(Vec2::new(20.0, 4.0), Vec2::new(20.0, 20.0));
    let hits = layer.colliding_tiles_in(&area);
    assert_eq!(hits.len(), 3);

    // Touching an edge is not an overlap.
    let touching = Aabb::from_min_size(Vec2::new(0.0, 0.0), Vec2::new(16.0, 16.0));
    assert!(layer.colliding_tiles_in(&touching).is_empty());
}

#[test]
fn layer_origin_offsets_tiles() {
    let mut map = map();
    let tileset = map.add_tileset_image("world-tiles", "tiles").unwrap();
    let layer = map.create_static_layer("Ground", &tileset, 32.0, 8.0).unwrap();
    assert_eq!(layer.tile_rect(0, 0).min, Vec2::new(32.0, 8.0));
    assert_eq!(layer.bounds().max, Vec2::new(96.0, 56.0));
}

// ── debug rendering ─────────────────────────────────────────────────────────

#[test]
fn render_debug_fills_colliding_tiles_and_draws_faces() {
    let layer = objects();
    let style = DebugStyle::default();
    let mut g = Graphics::new();
    layer.render_debug(&mut g, &style);

    let fills = g.shapes().iter().filter(|s| matches!(s, Shape::FillRect { .. })).count();
    let lines = g.shapes().iter().filter(|s| matches!(s, Shape::Line { .. })).count();
    assert_eq!(fills, 3);
    // Exposed faces: 3 on (1,0), 2 on (2,0), 3 on (2,1).
    assert_eq!(lines, 8);
}

#[test]
fn render_debug_with_tile_color_fills_every_tile() {
    let layer = objects();
    let style = DebugStyle { tile_color: Some(Color::WHITE), face_color: None, ..DebugStyle::default() };
    let mut g = Graphics::new();
    layer.render_debug(&mut g, &style);
    assert_eq!(g.shapes().len(), 3);
    assert!(g.shapes().iter().all(|s| matches!(s, Shape::FillRect { .. })));
}
