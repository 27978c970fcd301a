//! Tiled JSON maps and the static tile layers built from them.
//!
//! Only orthogonal maps with CSV tile data and embedded tilesets are read.
//! Tile properties are accepted in both the current `tiles[].properties`
//! array form and the legacy `tileproperties` object form.

use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::AssetError;
use crate::graphics::{Color, Graphics};
use crate::physics::Aabb;

/// Bits Tiled uses for horizontal, vertical and diagonal flips.
pub const GID_FLAGS: u32 = 0xE000_0000;

/// Global tile id with its flip flags removed.
pub fn strip_gid_flags(raw: u32) -> u32 {
    raw & !GID_FLAGS
}

// ── Tiled JSON ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TiledMap {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    #[serde(default = "default_orientation")]
    pub orientation: String,
    #[serde(default)]
    pub layers: Vec<TiledLayer>,
    #[serde(default)]
    pub tilesets: Vec<TiledTileset>,
}

fn default_orientation() -> String {
    "orthogonal".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledLayer {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub data: Option<LayerData>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default = "one")]
    pub opacity: f32,
    #[serde(default = "yes")]
    pub visible: bool,
}

fn one() -> f32 {
    1.0
}

fn yes() -> bool {
    true
}

/// Tile layer payload: a CSV array, or an encoded string we do not decode.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LayerData {
    Csv(Vec<u32>),
    Encoded(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledTileset {
    #[serde(rename = "firstgid")]
    pub first_gid: u32,
    #[serde(default)]
    pub name: String,
    /// Set for external tilesets, which are not supported.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(default, rename = "tileheight")]
    pub tile_height: u32,
    #[serde(default)]
    pub columns: u32,
    #[serde(default, rename = "tilecount")]
    pub tile_count: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub spacing: u32,
    #[serde(default)]
    pub tiles: Vec<TiledTile>,
    #[serde(default, rename = "tileproperties")]
    pub legacy_properties: HashMap<String, HashMap<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledTile {
    pub id: u32,
    #[serde(default)]
    pub properties: Vec<TiledProperty>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledProperty {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub value: Value,
}

impl TiledMap {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn layer(&self, name: &str) -> Option<&TiledLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Map size in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new((self.width * self.tile_width) as f32, (self.height * self.tile_height) as f32)
    }
}

// ── Tileset ────────────────────────────────────────────────────────────────

/// A map tileset bound to a loaded texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    pub name: String,
    pub texture: String,
    pub first_gid: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub columns: u32,
    pub tile_count: u32,
    pub margin: u32,
    pub spacing: u32,
    /// Properties per local tile id.
    pub properties: HashMap<u32, HashMap<String, Value>>,
}

impl Tileset {
    fn from_tiled(ts: &TiledTileset, texture: &str) -> Self {
        let mut properties: HashMap<u32, HashMap<String, Value>> = HashMap::new();
        for (id, props) in &ts.legacy_properties {
            if let Ok(id) = id.parse::<u32>() {
                properties.entry(id).or_default().extend(props.clone());
            }
        }
        for tile in &ts.tiles {
            let entry = properties.entry(tile.id).or_default();
            for prop in &tile.properties {
                entry.insert(prop.name.clone(), prop.value.clone());
            }
        }
        Self {
            name: ts.name.clone(),
            texture: texture.to_string(),
            first_gid: ts.first_gid,
            tile_width: ts.tile_width,
            tile_height: ts.tile_height,
            columns: ts.columns,
            tile_count: ts.tile_count,
            margin: ts.margin,
            spacing: ts.spacing,
            properties,
        }
    }

    pub fn contains_gid(&self, gid: u32) -> bool {
        gid >= self.first_gid && gid < self.first_gid + self.tile_count
    }

    /// Pixel origin of a local tile id inside the tileset image.
    pub fn tile_origin(&self, local_id: u32) -> Option<(u32, u32)> {
        if local_id >= self.tile_count || self.columns == 0 {
            return None;
        }
        let col = local_id % self.columns;
        let row = local_id / self.columns;
        Some((
            self.margin + col * (self.tile_width + self.spacing),
            self.margin + row * (self.tile_height + self.spacing),
        ))
    }

    pub fn property(&self, local_id: u32, name: &str) -> Option<&Value> {
        self.properties.get(&local_id).and_then(|p| p.get(name))
    }
}

// ── Tilemap ────────────────────────────────────────────────────────────────

/// A parsed map plus the tilesets bound to textures so far.
#[derive(Debug, Clone)]
pub struct Tilemap {
    pub data: TiledMap,
    tilesets: Vec<Tileset>,
}

impl Tilemap {
    pub fn new(data: TiledMap) -> Result<Self, AssetError> {
        if data.orientation != "orthogonal" {
            return Err(AssetError::Unsupported(format!("{} orientation", data.orientation)));
        }
        Ok(Self { data, tilesets: Vec::new() })
    }

    pub fn width(&self) -> u32 {
        self.data.width
    }

    pub fn height(&self) -> u32 {
        self.data.height
    }

    pub fn pixel_size(&self) -> Vec2 {
        self.data.pixel_size()
    }

    /// Bind the map tileset named `tileset_name` to the texture loaded under
    /// `texture_key`.
    pub fn add_tileset_image(&mut self, tileset_name: &str, texture_key: &str) -> Result<Tileset, AssetError> {
        let raw = self
            .data
            .tilesets
            .iter()
            .find(|t| t.name == tileset_name)
            .ok_or_else(|| AssetError::MissingTileset(tileset_name.to_string()))?;
        if let Some(source) = &raw.source {
            return Err(AssetError::Unsupported(format!("external tileset '{source}'")));
        }
        let tileset = Tileset::from_tiled(raw, texture_key);
        debug!(tileset = tileset_name, texture = texture_key, tiles = tileset.tile_count, "tileset bound");
        self.tilesets.retain(|t| t.name != tileset_name);
        self.tilesets.push(tileset.clone());
        Ok(tileset)
    }

    /// Build a non-editable layer from the map layer `layer_name`, placed with
    /// its top-left corner at `(x, y)`. Cells whose gid belongs to another
    /// tileset are left empty.
    pub fn create_static_layer(&self, layer_name: &str, tileset: &Tileset, x: f32, y: f32) -> Result<StaticLayer, AssetError> {
        let layer = self
            .data
            .layer(layer_name)
            .ok_or_else(|| AssetError::MissingLayer(layer_name.to_string()))?;
        if layer.kind != "tilelayer" {
            return Err(AssetError::NotTileLayer(layer_name.to_string()));
        }
        let raw = match (&layer.data, layer.encoding.as_deref()) {
            (Some(LayerData::Csv(raw)), None | Some("csv")) => raw,
            (_, Some(encoding)) => {
                return Err(AssetError::Unsupported(format!("layer '{layer_name}' uses {encoding} encoding")));
            }
            (Some(LayerData::Encoded(_)), None) | (None, None) => {
                return Err(AssetError::Unsupported(format!("layer '{layer_name}' has no CSV data")));
            }
        };

        let width = if layer.width > 0 { layer.width } else { self.data.width };
        let height = if layer.height > 0 { layer.height } else { self.data.height };
        let cells = (width * height) as usize;

        let mut foreign = 0usize;
        let tiles: Vec<Option<Tile>> = (0..cells)
            .map(|i| {
                let gid = strip_gid_flags(raw.get(i).copied().unwrap_or(0));
                if gid == 0 {
                    return None;
                }
                if !tileset.contains_gid(gid) {
                    foreign += 1;
                    return None;
                }
                Some(Tile { gid, local_id: gid - tileset.first_gid, collides: false })
            })
            .collect();
        if foreign > 0 {
            warn!(layer = layer_name, tileset = %tileset.name, count = foreign, "tiles from other tilesets skipped");
        }
        if raw.len() != cells {
            warn!(layer = layer_name, expected = cells, found = raw.len(), "layer data length mismatch");
        }

        info!(layer = layer_name, width, height, "static layer created");
        Ok(StaticLayer {
            name: layer_name.to_string(),
            origin: Vec2::new(x, y),
            width,
            height,
            tile_width: self.data.tile_width as f32,
            tile_height: self.data.tile_height as f32,
            tileset: tileset.clone(),
            tiles,
            alpha: layer.opacity,
            visible: layer.visible,
            depth: 0.0,
        })
    }
}

// ── StaticLayer ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub gid: u32,
    pub local_id: u32,
    pub collides: bool,
}

/// Colours used by [`StaticLayer::render_debug`]. `None` skips that element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugStyle {
    pub tile_color: Option<Color>,
    pub colliding_tile_color: Option<Color>,
    pub face_color: Option<Color>,
}

impl Default for DebugStyle {
    fn default() -> Self {
        Self {
            tile_color: None,
            colliding_tile_color: Some(Color::rgba8(243, 134, 48, 255)),
            face_color: Some(Color::rgba8(40, 39, 37, 255)),
        }
    }
}

/// Sides of a colliding tile not shared with another colliding tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faces {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone)]
pub struct StaticLayer {
    pub name: String,
    pub origin: Vec2,
    pub width: u32,
    pub height: u32,
    pub tile_width: f32,
    pub tile_height: f32,
    pub tileset: Tileset,
    tiles: Vec<Option<Tile>>,
    pub alpha: f32,
    pub visible: bool,
    pub depth: f32,
}

impl StaticLayer {
    pub fn tile_at(&self, tx: i32, ty: i32) -> Option<&Tile> {
        if tx < 0 || ty < 0 || tx >= self.width as i32 || ty >= self.height as i32 {
            return None;
        }
        self.tiles[(ty as u32 * self.width + tx as u32) as usize].as_ref()
    }

    /// Every occupied cell as `(tx, ty, tile)`, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32, &Tile)> {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .filter_map(move |(i, t)| t.as_ref().map(|t| (i as u32 % width, i as u32 / width, t)))
    }

    pub fn is_colliding(&self, tx: i32, ty: i32) -> bool {
        self.tile_at(tx, ty).is_some_and(|t| t.collides)
    }

    /// World rectangle covered by cell `(tx, ty)`.
    pub fn tile_rect(&self, tx: i32, ty: i32) -> Aabb {
        let size = Vec2::new(self.tile_width, self.tile_height);
        Aabb::from_min_size(self.origin + Vec2::new(tx as f32, ty as f32) * size, size)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_min_size(
            self.origin,
            Vec2::new(self.width as f32 * self.tile_width, self.height as f32 * self.tile_height),
        )
    }

    /// Mark every tile whose tileset property `name` equals `value` as
    /// colliding. Returns how many cells were marked.
    pub fn set_collision_by_property(&mut self, name: &str, value: impl Into<Value>) -> usize {
        let value = value.into();
        let tileset = &self.tileset;
        let mut marked = 0;
        for tile in self.tiles.iter_mut().flatten() {
            if tileset.property(tile.local_id, name) == Some(&value) {
                tile.collides = true;
                marked += 1;
            }
        }
        info!(layer = %self.name, property = name, tiles = marked, "collision set by property");
        marked
    }

    /// Rectangles of colliding tiles that overlap `area`.
    pub fn colliding_tiles_in(&self, area: &Aabb) -> Vec<Aabb> {
        let local_min = area.min - self.origin;
        let local_max = area.max - self.origin;
        let x0 = (local_min.x / self.tile_width).floor() as i32;
        let y0 = (local_min.y / self.tile_height).floor() as i32;
        let x1 = (local_max.x / self.tile_width).ceil() as i32;
        let y1 = (local_max.y / self.tile_height).ceil() as i32;

        let mut hits = Vec::new();
        for ty in y0.max(0)..y1.min(self.height as i32) {
            for tx in x0.max(0)..x1.min(self.width as i32) {
                if self.is_colliding(tx, ty) {
                    let rect = self.tile_rect(tx, ty);
                    if rect.overlaps(area) {
                        hits.push(rect);
                    }
                }
            }
        }
        hits
    }

    /// Interesting faces of the tile at `(tx, ty)`; empty for non-colliding
    /// cells.
    pub fn faces(&self, tx: i32, ty: i32) -> Faces {
        if !self.is_colliding(tx, ty) {
            return Faces::default();
        }
        Faces {
            top: !self.is_colliding(tx, ty - 1),
            bottom: !self.is_colliding(tx, ty + 1),
            left: !self.is_colliding(tx - 1, ty),
            right: !self.is_colliding(tx + 1, ty),
        }
    }

    /// Paint tiles, colliding tiles and their faces into `graphics`.
    pub fn render_debug(&self, graphics: &mut Graphics, style: &DebugStyle) {
        for (tx, ty, tile) in self.tiles() {
            let (tx, ty) = (tx as i32, ty as i32);
            let rect = self.tile_rect(tx, ty);
            let fill = if tile.collides { style.colliding_tile_color } else { style.tile_color };
            if let Some(color) = fill {
                graphics.fill_rect(rect.min, rect.size(), color);
            }

            let Some(face_color) = style.face_color else {
                continue;
            };
            let faces = self.faces(tx, ty);
            let (min, max) = (rect.min, rect.max);
            if faces.top {
                graphics.line(min, Vec2::new(max.x, min.y), 1.0, face_color);
            }
            if faces.bottom {
                graphics.line(Vec2::new(min.x, max.y), max, 1.0, face_color);
            }
            if faces.left {
                graphics.line(min, Vec2::new(min.x, max.y), 1.0, face_color);
            }
            if faces.right {
                graphics.line(Vec2::new(max.x, min.y), max, 1.0, face_color);
            }
        }
    }
}
