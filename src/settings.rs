//! Scene tuning and preferences
//!
//! Loaded from a JSON file on native builds; every field has a default so a
//! partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::error::{ConfigError, SettingsError};
use crate::variant::VariantKey;

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

/// Physics substrate tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self { gravity: 1400.0 }
    }
}

/// Character movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// Horizontal speed (pixels/s)
    pub move_speed: f32,
    /// Upward speed on jump (pixels/s)
    pub jump_velocity: f32,
    /// Upward speed on the second, mid-air jump
    pub double_jump_velocity: f32,
    pub double_jump_enabled: bool,
    /// Duration of the double-jump spin
    pub spin_duration_ms: f32,
    /// Run-sheet frame held while airborne
    pub jump_frame_index: u32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            move_speed: 260.0,
            jump_velocity: 520.0,
            double_jump_velocity: 520.0,
            double_jump_enabled: true,
            spin_duration_ms: 520.0,
            jump_frame_index: 2,
        }
    }
}

/// Where things sit relative to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Ground collision line as a fraction of viewport height
    pub ground_y_factor: f32,
    /// Visual offset of the ground tiles from their collision line
    pub ground_y_offset: f32,
    /// Character height as a fraction of the base height
    pub character_scale_factor: f32,
    /// Base height is `min(max, viewport height × ratio)`
    pub character_max_base_height: f32,
    pub character_height_ratio: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            ground_y_factor: 0.25,
            ground_y_offset: -30.0,
            character_scale_factor: 0.33,
            character_max_base_height: 360.0,
            character_height_ratio: 0.45,
        }
    }
}

impl LayoutSettings {
    /// On-screen character height for a viewport height
    pub fn character_target_height(&self, viewport_height: f32) -> f32 {
        let base = self
            .character_max_base_height
            .min(viewport_height * self.character_height_ratio);
        base * self.character_scale_factor
    }
}

/// Ground tile sheet and recycler tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Source frame size of one tile
    pub tile_width: f32,
    pub tile_height: f32,
    /// Column variants per sheet row
    pub columns: u32,
    pub row_index: u32,
    pub width_scale: f32,
    pub height_scale: f32,
    pub tile_overlap: f32,
    pub buffer_tiles: u32,
    pub depth: i32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            tile_width: crate::assets::TILE_FRAME_CONFIG.frame_width as f32,
            tile_height: crate::assets::TILE_FRAME_CONFIG.frame_height as f32,
            columns: 3,
            row_index: 0,
            width_scale: 0.5,
            height_scale: 0.6,
            tile_overlap: 1.0,
            buffer_tiles: 3,
            depth: 2,
        }
    }
}

/// Largest buffer accepted on each side of the viewport
pub const MAX_BUFFER_TILES: u32 = 64;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Variant preselected when none is given
    pub variant: VariantKey,
    /// RNG seed for a run
    pub seed: u64,
    pub viewport: ViewportSettings,
    pub physics: PhysicsSettings,
    pub movement: MovementSettings,
    pub layout: LayoutSettings,
    pub terrain: TerrainSettings,
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Tuning {
            name,
            reason: format!("must be positive, got {value}"),
        })
    }
}

impl Settings {
    /// Check every tunable is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ViewportSettings { width, height } = self.viewport;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::Viewport { width, height });
        }
        positive("physics.gravity", self.physics.gravity)?;
        positive("movement.move_speed", self.movement.move_speed)?;
        positive("movement.jump_velocity", self.movement.jump_velocity)?;
        positive("movement.double_jump_velocity", self.movement.double_jump_velocity)?;
        positive("movement.spin_duration_ms", self.movement.spin_duration_ms)?;
        positive("layout.character_scale_factor", self.layout.character_scale_factor)?;
        positive("layout.character_max_base_height", self.layout.character_max_base_height)?;
        positive("layout.character_height_ratio", self.layout.character_height_ratio)?;
        if !(0.0..=1.0).contains(&self.layout.ground_y_factor) {
            return Err(ConfigError::Tuning {
                name: "layout.ground_y_factor",
                reason: format!("must be within [0, 1], got {}", self.layout.ground_y_factor),
            });
        }
        if self.terrain.columns == 0 {
            return Err(ConfigError::NoColumns);
        }
        if self.terrain.buffer_tiles > MAX_BUFFER_TILES {
            return Err(ConfigError::Tuning {
                name: "terrain.buffer_tiles",
                reason: format!(
                    "at most {MAX_BUFFER_TILES} allowed, got {}",
                    self.terrain.buffer_tiles
                ),
            });
        }
        if !(self.terrain.tile_width > 0.0 && self.terrain.tile_height > 0.0) {
            return Err(ConfigError::TileSize {
                width: self.terrain.tile_width,
                height: self.terrain.tile_height,
            });
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {e}");
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
