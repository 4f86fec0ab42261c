//! Endless ground made of recycled tiles
//!
//! A fixed pool of tiles covers the viewport plus a buffer on each side.
//! As the camera scrolls, tiles that fall off one edge are moved to the other
//! edge and given a new random look. Nothing is allocated after `build`.
//!
//! Tiles sit on integer slots of a grid anchored at the build position, so
//! spacing stays exact however far the camera travels. A jump larger than
//! the pool re-lays every tile at the new window in one pass.
//!
//! Each tile has two vertical positions: where it is drawn (`visual_y`) and
//! where its collision box sits (`collision_y`). They are set independently
//! and recycling re-pins the collision box to `collision_y`, so changing how
//! a tile is displayed never moves what the player stands on.

use std::collections::VecDeque;

use rand::Rng;

use crate::error::ConfigError;

/// Upper bound on the tile pool
pub const MAX_TERRAIN_TILES: u64 = 4096;

/// Build parameters for the ground
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainConfig {
    pub texture_key: String,
    /// Source frame size of one tile (pixels)
    pub tile_width: f32,
    pub tile_height: f32,
    /// Collision line (top of the tile collision boxes)
    pub ground_y: f32,
    /// Drawn position relative to the collision line
    pub ground_y_offset: f32,
    /// Column variants per sheet row
    pub columns: u32,
    pub row_index: u32,
    pub depth: i32,
    pub width_scale: f32,
    pub height_scale: f32,
    /// Horizontal overlap between neighbours, hides seams
    pub tile_overlap: f32,
    pub viewport_width: f32,
    /// Extra tiles kept beyond each viewport edge
    pub buffer_tiles: u32,
    /// Left edge of the viewport at build time
    pub start_x: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            texture_key: String::new(),
            tile_width: 128.0,
            tile_height: 128.0,
            ground_y: 0.0,
            ground_y_offset: 0.0,
            columns: 1,
            row_index: 0,
            depth: 2,
            width_scale: 1.0,
            height_scale: 1.0,
            tile_overlap: 1.0,
            viewport_width: crate::consts::VIEWPORT_WIDTH,
            buffer_tiles: 2,
            start_x: 0.0,
        }
    }
}

/// Derived tile layout, fixed for one build
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainGeometry {
    pub display_width: f32,
    pub display_height: f32,
    /// Distance between neighbouring tile origins
    pub step_x: f32,
    pub tile_count: usize,
    pub collision_y: f32,
    pub visual_y: f32,
    pub frame_start: u32,
}

impl TerrainConfig {
    /// Validate and derive the layout
    pub fn geometry(&self) -> Result<TerrainGeometry, ConfigError> {
        if !(self.tile_width > 0.0 && self.tile_height > 0.0) {
            return Err(ConfigError::TileSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }
        for (name, value) in [("width_scale", self.width_scale), ("height_scale", self.height_scale)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Scale { name, value });
            }
        }
        if self.columns == 0 {
            return Err(ConfigError::NoColumns);
        }
        if !(self.viewport_width > 0.0 && self.viewport_width.is_finite()) {
            return Err(ConfigError::Tuning {
                name: "viewport_width",
                reason: format!("must be positive, got {}", self.viewport_width),
            });
        }
        if !self.start_x.is_finite() {
            return Err(ConfigError::Tuning {
                name: "start_x",
                reason: format!("must be finite, got {}", self.start_x),
            });
        }

        let display_width = (self.tile_width * self.width_scale).round().max(1.0);
        let display_height = (self.tile_height * self.height_scale).round().max(1.0);
        let overlap = self.tile_overlap.max(0.0);
        let step_x = (display_width - overlap).round().max(1.0);

        let visible = (f64::from(self.viewport_width) / f64::from(step_x)).ceil();
        let tile_count = (visible <= MAX_TERRAIN_TILES as f64)
            .then_some(visible as u64)
            .and_then(|visible| u64::from(self.buffer_tiles).checked_mul(2)?.checked_add(visible))
            .filter(|&count| count <= MAX_TERRAIN_TILES)
            .ok_or_else(|| ConfigError::Tuning {
                name: "terrain.buffer_tiles",
                reason: format!(
                    "{} buffer tiles over a {}px viewport needs more than {MAX_TERRAIN_TILES} tiles",
                    self.buffer_tiles, self.viewport_width
                ),
            })? as usize;
        let collision_y = self.ground_y.round();

        Ok(TerrainGeometry {
            display_width,
            display_height,
            step_x,
            tile_count,
            collision_y,
            visual_y: (collision_y + self.ground_y_offset).round(),
            frame_start: self.row_index * self.columns,
        })
    }
}

/// Axis-aligned collision box of a tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBody {
    /// World x of the left edge
    pub x: f64,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TileBody {
    pub fn right(&self) -> f64 {
        self.x + f64::from(self.width)
    }
}

/// One ground segment (top-left origin)
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Grid slot; `x` is derived from it
    pub slot: i64,
    pub x: f64,
    pub visual_y: f32,
    pub collision_y: f32,
    pub column: u32,
    pub frame_index: u32,
    pub display_width: f32,
    pub display_height: f32,
    pub depth: i32,
    body: TileBody,
}

impl Tile {
    pub fn body(&self) -> &TileBody {
        &self.body
    }

    pub fn right(&self) -> f64 {
        self.x + f64::from(self.display_width)
    }

    /// Sync the collision box to the tile's x and collision line
    fn refresh_body(&mut self) {
        self.body = TileBody {
            x: self.x,
            y: self.collision_y,
            width: self.display_width,
            height: self.display_height,
        };
    }
}

/// Owns the ground tile pool and keeps it under the camera
#[derive(Debug, Clone, Default)]
pub struct TerrainTileRecycler {
    tiles: VecDeque<Tile>,
    config: Option<TerrainConfig>,
    geometry: Option<TerrainGeometry>,
    /// World x of slot 0
    origin_x: f64,
    recycled: u64,
}

impl TerrainTileRecycler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any previous tiles and lay out a fresh pool
    pub fn build(&mut self, config: TerrainConfig, rng: &mut impl Rng) -> Result<(), ConfigError> {
        let geometry = config.geometry()?;
        self.clear();
        self.origin_x = config.start_x.round();

        let first_slot = -i64::from(config.buffer_tiles);
        self.tiles.reserve(geometry.tile_count);
        for slot in (first_slot..).take(geometry.tile_count) {
            let mut tile = Tile {
                slot,
                x: 0.0,
                visual_y: geometry.visual_y,
                collision_y: geometry.collision_y,
                column: 0,
                frame_index: geometry.frame_start,
                display_width: geometry.display_width,
                display_height: geometry.display_height,
                depth: config.depth,
                body: TileBody {
                    x: 0.0,
                    y: 0.0,
                    width: 0.0,
                    height: 0.0,
                },
            };
            Self::place(&mut tile, slot, self.origin_x, &config, &geometry, rng);
            self.tiles.push_back(tile);
        }

        log::info!(
            "Terrain built: {} tiles of {}x{} (step {}), collision y {}, visual y {}",
            geometry.tile_count,
            geometry.display_width,
            geometry.display_height,
            geometry.step_x,
            geometry.collision_y,
            geometry.visual_y
        );
        self.config = Some(config);
        self.geometry = Some(geometry);
        Ok(())
    }

    /// Recycle tiles so the window around `scroll_x` stays covered
    ///
    /// Moves at most one pool's worth of tiles per call.
    pub fn update(&mut self, scroll_x: f64, rng: &mut impl Rng) {
        let (Some(config), Some(geometry)) = (self.config.as_ref(), self.geometry.as_ref()) else {
            return;
        };
        let (Some(front), Some(back)) = (self.tiles.front(), self.tiles.back()) else {
            return;
        };
        if !scroll_x.is_finite() {
            return;
        }

        let step = f64::from(geometry.step_x);
        let buffer = step * f64::from(config.buffer_tiles);
        let view_left = scroll_x - buffer;
        let view_right = scroll_x + f64::from(config.viewport_width) + buffer;

        // Whole pool outside the window: re-lay it from the first slot
        // whose right edge reaches the window
        if back.right() < view_left || front.x > view_right {
            let reach = (view_left - f64::from(geometry.display_width) - self.origin_x) / step;
            let first_slot = reach.ceil() as i64;
            log::trace!("Terrain re-laid at slot {first_slot}");
            for (slot, tile) in (first_slot..).zip(self.tiles.iter_mut()) {
                Self::place(tile, slot, self.origin_x, config, geometry, rng);
            }
            self.recycled += self.tiles.len() as u64;
            return;
        }

        // Left edge fell behind: move it past the right end
        for _ in 0..self.tiles.len() {
            if !self.tiles.front().is_some_and(|t| t.right() < view_left) {
                break;
            }
            let Some(next_slot) = self.tiles.back().map(|t| t.slot + 1) else {
                break;
            };
            let Some(mut tile) = self.tiles.pop_front() else {
                break;
            };
            Self::place(&mut tile, next_slot, self.origin_x, config, geometry, rng);
            self.tiles.push_back(tile);
            self.recycled += 1;
        }

        // Right edge ran ahead: move it before the left end
        for _ in 0..self.tiles.len() {
            if !self.tiles.back().is_some_and(|t| t.x > view_right) {
                break;
            }
            let Some(prev_slot) = self.tiles.front().map(|t| t.slot - 1) else {
                break;
            };
            let Some(mut tile) = self.tiles.pop_back() else {
                break;
            };
            Self::place(&mut tile, prev_slot, self.origin_x, config, geometry, rng);
            self.tiles.push_front(tile);
            self.recycled += 1;
        }
    }

    /// Put a tile on `slot` with a fresh random column; display and
    /// collision are re-pinned separately
    fn place(
        tile: &mut Tile,
        slot: i64,
        origin_x: f64,
        config: &TerrainConfig,
        geometry: &TerrainGeometry,
        rng: &mut impl Rng,
    ) {
        let column = rng.random_range(0..config.columns);
        tile.slot = slot;
        tile.x = origin_x + slot as f64 * f64::from(geometry.step_x);
        tile.column = column;
        tile.frame_index = geometry.frame_start + column;
        tile.display_width = geometry.display_width;
        tile.display_height = geometry.display_height;
        tile.depth = config.depth;
        tile.visual_y = geometry.visual_y;
        tile.collision_y = geometry.collision_y;
        tile.refresh_body();
    }

    /// Live tiles ordered left to right
    pub fn tiles(&self) -> &VecDeque<Tile> {
        &self.tiles
    }

    pub fn geometry(&self) -> Option<&TerrainGeometry> {
        self.geometry.as_ref()
    }

    pub fn config(&self) -> Option<&TerrainConfig> {
        self.config.as_ref()
    }

    /// Total recycle operations since the last build
    pub fn recycled(&self) -> u64 {
        self.recycled
    }

    /// Destroy every tile
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.config = None;
        self.geometry = None;
        self.origin_x = 0.0;
        self.recycled = 0;
    }
}
