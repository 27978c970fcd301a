// Generates placeholder art and the world map under `assets/` so the game
// runs from a fresh checkout. Existing files are never overwritten; drop real
// art in place and it wins.

use image::{Rgba, RgbaImage};
use serde_json::json;
use std::path::Path;

const TILE: u32 = 16;
const MAP_W: u32 = 60;
const MAP_H: u32 = 45;

// Tileset order; gid = index + 1.
const GRASS: u32 = 0;
const PATH: u32 = 1;
const WATER: u32 = 2;
const TREE: u32 = 3;
const ROCK: u32 = 4;
const FLOWERS: u32 = 5;
const WALL: u32 = 6;
const BUSH: u32 = 7;
const COLLIDES: [bool; 8] = [false, false, true, true, true, false, true, false];

fn fill(img: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32, color: [u8; 4]) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, Rgba(color));
        }
    }
}

fn disc(img: &mut RgbaImage, cx: i32, cy: i32, r: i32, color: [u8; 4]) {
    for y in (cy - r)..=(cy + r) {
        for x in (cx - r)..=(cx + r) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r * r && x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                img.put_pixel(x as u32, y as u32, Rgba(color));
            }
        }
    }
}

fn draw_tileset() -> RgbaImage {
    let mut img = RgbaImage::new(TILE * 8, TILE);
    let grass = [0x4C, 0x9A, 0x2A, 0xFF];
    for i in 0..8 {
        fill(&mut img, i * TILE, 0, TILE, TILE, grass);
    }
    let ox = |id: u32| (id * TILE) as i32;

    fill(&mut img, PATH * TILE, 0, TILE, TILE, [0xC2, 0xA4, 0x6B, 0xFF]);

    fill(&mut img, WATER * TILE, 0, TILE, TILE, [0x2B, 0x5F, 0xC9, 0xFF]);
    fill(&mut img, WATER * TILE + 3, 5, 5, 1, [0x8F, 0xB8, 0xF2, 0xFF]);
    fill(&mut img, WATER * TILE + 8, 11, 5, 1, [0x8F, 0xB8, 0xF2, 0xFF]);

    fill(&mut img, TREE * TILE + 7, 10, 2, 6, [0x6B, 0x42, 0x1E, 0xFF]);
    disc(&mut img, ox(TREE) + 8, 7, 6, [0x1F, 0x5E, 0x1A, 0xFF]);

    disc(&mut img, ox(ROCK) + 8, 9, 6, [0x80, 0x80, 0x80, 0xFF]);
    disc(&mut img, ox(ROCK) + 6, 7, 2, [0xB0, 0xB0, 0xB0, 0xFF]);

    for (x, y, c) in [(3, 4, [0xFF, 0xE0, 0x40, 0xFF]), (10, 6, [0xF0, 0x50, 0x90, 0xFF]), (6, 11, [0xFF, 0xFF, 0xFF, 0xFF])] {
        disc(&mut img, ox(FLOWERS) + x, y, 1, c);
    }

    for y in 0..TILE {
        for x in 0..TILE {
            let row = y / 4;
            let shift = if row % 2 == 0 { 0 } else { 4 };
            let mortar = y % 4 == 0 || (x + shift) % 8 == 0;
            let c = if mortar { [0x4A, 0x48, 0x45, 0xFF] } else { [0x82, 0x74, 0x66, 0xFF] };
            img.put_pixel(WALL * TILE + x, y, Rgba(c));
        }
    }

    disc(&mut img, ox(BUSH) + 5, 10, 4, [0x2E, 0x7D, 0x32, 0xFF]);
    disc(&mut img, ox(BUSH) + 11, 10, 4, [0x2E, 0x7D, 0x32, 0xFF]);
    img
}

/// 12 x 4 frames of 16 px. Rows are front, left, right, back; each row
/// holds three walk frames followed by unused cells.
fn draw_characters() -> RgbaImage {
    let mut img = RgbaImage::new(TILE * 12, TILE * 4);
    let skin = [0xF1, 0xC2, 0x7D, 0xFF];
    let shirt = [0x35, 0x6A, 0xB8, 0xFF];
    let legs = [0x3B, 0x2F, 0x2F, 0xFF];
    let eye = [0x10, 0x10, 0x10, 0xFF];

    for row in 0..4 {
        for frame in 0..3 {
            let (x0, y0) = (frame * TILE, row * TILE);
            disc(&mut img, (x0 + 8) as i32, (y0 + 4) as i32, 3, skin);
            fill(&mut img, x0 + 4, y0 + 7, 8, 5, shirt);
            // Frame 1 is the stance; 0 and 2 swing the legs.
            let (left, right) = match frame {
                0 => (1, 0),
                2 => (0, 1),
                _ => (0, 0),
            };
            fill(&mut img, x0 + 5, y0 + 12, 2, 4 - left, legs);
            fill(&mut img, x0 + 9, y0 + 12, 2, 4 - right, legs);
            match row {
                0 => {
                    img.put_pixel(x0 + 7, y0 + 4, Rgba(eye));
                    img.put_pixel(x0 + 9, y0 + 4, Rgba(eye));
                }
                1 => img.put_pixel(x0 + 6, y0 + 4, Rgba(eye)),
                2 => img.put_pixel(x0 + 10, y0 + 4, Rgba(eye)),
                _ => {}
            }
        }
    }
    img
}

/// Three frames of a steaming pile.
fn draw_poop() -> RgbaImage {
    let mut img = RgbaImage::new(TILE * 3, TILE);
    let brown = [0x8B, 0x45, 0x13, 0xFF];
    let dark = [0x5C, 0x2E, 0x0C, 0xFF];
    let stink = [0x9C, 0xCC, 0x65, 0xC0];
    for frame in 0..3 {
        let x0 = (frame * TILE) as i32;
        disc(&mut img, x0 + 8, 13, 5, brown);
        disc(&mut img, x0 + 8, 10, 3, brown);
        disc(&mut img, x0 + 8, 8, 2, dark);
        for i in 0..3 {
            let x = x0 + 4 + i * 4;
            let y = 5 - ((frame as i32 + i) % 3);
            if y >= 0 {
                img.put_pixel(x as u32, y as u32, Rgba(stink));
            }
        }
    }
    img
}

/// Small xorshift so the scatter is the same on every build.
struct Scatter(u32);

impl Scatter {
    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

fn build_layers() -> (Vec<u32>, Vec<u32>) {
    let idx = |x: u32, y: u32| (y * MAP_W + x) as usize;
    let gid = |id: u32| id + 1;
    let mut ground = vec![gid(GRASS); (MAP_W * MAP_H) as usize];
    let mut objects = vec![0u32; (MAP_W * MAP_H) as usize];

    for x in 0..MAP_W {
        ground[idx(x, 6)] = gid(PATH);
    }
    for y in 0..MAP_H {
        ground[idx(30, y)] = gid(PATH);
    }

    for x in 0..MAP_W {
        objects[idx(x, 0)] = gid(WALL);
        objects[idx(x, MAP_H - 1)] = gid(WALL);
    }
    for y in 0..MAP_H {
        objects[idx(0, y)] = gid(WALL);
        objects[idx(MAP_W - 1, y)] = gid(WALL);
    }

    for y in 20..28 {
        for x in 40..50 {
            objects[idx(x, y)] = gid(WATER);
        }
    }

    let mut rng = Scatter(0x5EED_1234);
    for y in 1..MAP_H - 1 {
        for x in 1..MAP_W - 1 {
            // Spawn area, roads and the pond stay clear.
            let near_spawn = (2..=11).contains(&x) && (2..=11).contains(&y);
            if near_spawn || y == 6 || x == 30 || objects[idx(x, y)] != 0 {
                continue;
            }
            objects[idx(x, y)] = match rng.next() % 100 {
                0..=4 => gid(TREE),
                5..=6 => gid(ROCK),
                7..=9 => gid(FLOWERS),
                10..=11 => gid(BUSH),
                _ => 0,
            };
        }
    }
    (ground, objects)
}

fn world_json() -> serde_json::Value {
    let (ground, objects) = build_layers();
    let tiles: Vec<_> = COLLIDES
        .iter()
        .enumerate()
        .map(|(id, &collides)| {
            json!({
                "id": id,
                "properties": [{ "name": "collides", "type": "bool", "value": collides }],
            })
        })
        .collect();
    let layer = |id: u32, name: &str, data: Vec<u32>| {
        json!({
            "id": id, "name": name, "type": "tilelayer",
            "width": MAP_W, "height": MAP_H, "x": 0, "y": 0,
            "opacity": 1, "visible": true, "data": data,
        })
    };
    json!({
        "type": "map",
        "orientation": "orthogonal",
        "renderorder": "right-down",
        "width": MAP_W,
        "height": MAP_H,
        "tilewidth": TILE,
        "tileheight": TILE,
        "infinite": false,
        "layers": [layer(1, "Ground", ground), layer(2, "GroundObjects", objects)],
        "tilesets": [{
            "firstgid": 1,
            "name": "world-tiles",
            "image": "../tilesets/basictiles.png",
            "imagewidth": TILE * 8,
            "imageheight": TILE,
            "tilewidth": TILE,
            "tileheight": TILE,
            "columns": 8,
            "tilecount": 8,
            "margin": 0,
            "spacing": 0,
            "tiles": tiles,
        }],
    })
}

fn save_if_missing(path: &Path, img: RgbaImage) {
    if !path.exists() {
        img.save(path).unwrap_or_else(|e| eprintln!("build: could not save {}: {e}", path.display()));
    }
}

fn main() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    let tilesets = root.join("tilesets");
    let tilemaps = root.join("tilemaps");
    std::fs::create_dir_all(&tilesets).expect("build: failed to create assets/tilesets/");
    std::fs::create_dir_all(&tilemaps).expect("build: failed to create assets/tilemaps/");

    save_if_missing(&tilesets.join("basictiles.png"), draw_tileset());
    save_if_missing(&tilesets.join("characters.png"), draw_characters());
    save_if_missing(&tilesets.join("poop.png"), draw_poop());

    let map_path = tilemaps.join("world.json");
    if !map_path.exists() {
        let text = serde_json::to_string_pretty(&world_json()).expect("build: map serializes");
        std::fs::write(&map_path, text)
            .unwrap_or_else(|e| eprintln!("build: could not save {}: {e}", map_path.display()));
    }

    println!("cargo:rerun-if-changed=build.rs");
}
