use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Tile edge length in pixels unless the level says otherwise.
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// Tile kinds that participate in collision resolution by default.
const DEFAULT_SOLID_KINDS: [&str; 2] = ["grass", "stone"];

// ── Level descriptor ─────────────────────────────────────────────────────────

/// One grid-aligned tile record. `pos` is in grid cells, not pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: String,
    pub variant: u8,
    pub pos: [i32; 2],
}

/// A tile placed off the grid; `pos` is an absolute pixel position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OffgridTile {
    pub kind: String,
    pub variant: u8,
    pub pos: [f32; 2],
}

/// The already-structured level record the external loader hands the kernel.
/// Parsing level files is the loader's job; this type only fixes the shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    #[serde(default)]
    pub tiles: Vec<Tile>,
    #[serde(default)]
    pub offgrid: Vec<OffgridTile>,
}

fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for LevelData {
    fn default() -> Self {
        Self { tile_size: DEFAULT_TILE_SIZE, tiles: Vec::new(), offgrid: Vec::new() }
    }
}

/// A tile pulled out of the map by [`TileMap::extract`], with its position
/// already converted to pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedTile {
    pub kind: String,
    pub variant: u8,
    pub pos: Vec2,
}

// ── TileMap ──────────────────────────────────────────────────────────────────

/// Sparse tile grid keyed by `(i32, i32)` grid coordinates, plus a flat list
/// of off-grid decorations.
#[derive(Debug)]
pub struct TileMap {
    tile_size: u32,
    grid: HashMap<(i32, i32), Tile>,
    offgrid: Vec<OffgridTile>,
    solid: HashSet<String>,
}

impl TileMap {
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size,
            grid: HashMap::new(),
            offgrid: Vec::new(),
            solid: DEFAULT_SOLID_KINDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_level(level: &LevelData) -> Self {
        let mut map = Self::new(level.tile_size);
        for tile in &level.tiles {
            map.insert(tile.clone());
        }
        for tile in &level.offgrid {
            map.insert_offgrid(tile.clone());
        }
        map
    }

    /// Replace the set of tile kinds treated as solid.
    pub fn set_solid_kinds<I, S>(&mut self, kinds: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.solid = kinds.into_iter().map(Into::into).collect();
    }

    pub fn insert(&mut self, tile: Tile) {
        self.grid.insert((tile.pos[0], tile.pos[1]), tile);
    }

    pub fn insert_offgrid(&mut self, tile: OffgridTile) {
        self.offgrid.push(tile);
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn tile_at(&self, cell: (i32, i32)) -> Option<&Tile> {
        self.grid.get(&cell)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.grid.values()
    }

    pub fn offgrid_tiles(&self) -> impl Iterator<Item = &OffgridTile> {
        self.offgrid.iter()
    }

    fn cell_of(&self, point: Vec2) -> (i32, i32) {
        let ts = self.tile_size as f32;
        ((point.x / ts).floor() as i32, (point.y / ts).floor() as i32)
    }

    fn cell_rect(&self, cell: (i32, i32)) -> Rect {
        let ts = self.tile_size as f32;
        Rect::new(cell.0 as f32 * ts, cell.1 as f32 * ts, ts, ts)
    }

    /// True iff the tile under `point` exists and its kind is solid.
    pub fn solid_at(&self, point: Vec2) -> bool {
        self.grid
            .get(&self.cell_of(point))
            .is_some_and(|t| self.solid.contains(&t.kind))
    }

    /// Broad-phase collision query: world rectangles of every solid tile in
    /// the 3×3 ring of cells around the cells overlapped by the footprint at
    /// `pos` with `size`. Candidates are returned whether or not they
    /// precisely overlap the footprint; the resolver does the narrow test.
    ///
    /// This bound is only correct while nothing moves more than one tile per
    /// frame on either axis, which the resolver's velocity clamps uphold.
    pub fn solid_rects_near(&self, pos: Vec2, size: Vec2) -> Vec<Rect> {
        let (min_x, min_y) = self.cell_of(pos);
        let (max_x, max_y) = self.cell_of(pos + size);
        let mut rects = Vec::new();
        for cy in (min_y - 1)..=(max_y + 1) {
            for cx in (min_x - 1)..=(max_x + 1) {
                if let Some(tile) = self.grid.get(&(cx, cy)) {
                    if self.solid.contains(&tile.kind) {
                        rects.push(self.cell_rect((cx, cy)));
                    }
                }
            }
        }
        rects
    }

    /// Pull every tile whose `(kind, variant)` matches one of `matches` out
    /// of the map (or copy it without removal when `keep` is set). Returned
    /// positions are in pixels for grid and off-grid tiles alike. Grid tiles
    /// come out in row-major order so seeding from them is deterministic.
    pub fn extract(&mut self, matches: &[(&str, u8)], keep: bool) -> Vec<ExtractedTile> {
        let is_match =
            |kind: &str, variant: u8| matches.iter().any(|(k, v)| *k == kind && *v == variant);

        let mut out = Vec::new();
        for tile in &self.offgrid {
            if is_match(&tile.kind, tile.variant) {
                out.push(ExtractedTile {
                    kind: tile.kind.clone(),
                    variant: tile.variant,
                    pos: Vec2::from(tile.pos),
                });
            }
        }
        if !keep {
            self.offgrid.retain(|t| !is_match(&t.kind, t.variant));
        }

        let ts = self.tile_size as f32;
        let mut cells: Vec<(i32, i32)> = self
            .grid
            .iter()
            .filter(|(_, t)| is_match(&t.kind, t.variant))
            .map(|(cell, _)| *cell)
            .collect();
        cells.sort_by_key(|&(x, y)| (y, x));
        for cell in cells {
            let tile = if keep {
                self.grid[&cell].clone()
            } else {
                self.grid.remove(&cell).expect("cell collected above")
            };
            out.push(ExtractedTile {
                kind: tile.kind,
                variant: tile.variant,
                pos: Vec2::new(cell.0 as f32 * ts, cell.1 as f32 * ts),
            });
        }
        out
    }
}
