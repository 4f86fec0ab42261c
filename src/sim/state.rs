//! Scene state
//!
//! Everything one running scene owns: the character and its body, the
//! ground, the background layers, the camera and the seeded RNG that every
//! random choice draws from.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::anim::AnimationRegistry;
use super::body::Body;
use super::character::{Character, CharacterConfig};
use super::parallax::{ParallaxLayerConfig, ParallaxLayerSet};
use super::terrain::{TerrainConfig, TerrainTileRecycler};
use crate::consts::{CAMERA_LERP_X, CAMERA_LERP_Y, CAMERA_OFFSET_Y_FACTOR};
use crate::error::ConfigError;
use crate::settings::Settings;
use crate::variant::{SessionContext, VariantDescriptor};

/// Character sprite depth (drawn over the ground)
pub const CHARACTER_DEPTH: i32 = 3;
/// Body width relative to the character's idle height
pub const BODY_WIDTH_RATIO: f32 = 0.5;

/// Camera following the character
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Top-left corner of the view in world space
    pub scroll: Vec2,
    pub width: f32,
    pub height: f32,
    pub lerp: Vec2,
    /// Point followed sits this far below the view centre
    pub follow_offset: Vec2,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll: Vec2::ZERO,
            width,
            height,
            lerp: Vec2::new(CAMERA_LERP_X, CAMERA_LERP_Y),
            follow_offset: Vec2::new(0.0, height * CAMERA_OFFSET_Y_FACTOR),
        }
    }

    fn follow_target(&self, target: Vec2) -> Vec2 {
        target - self.follow_offset - Vec2::new(self.width, self.height) * 0.5
    }

    /// Close part of the gap to `target`, rounded to whole pixels
    pub fn follow(&mut self, target: Vec2) {
        let goal = self.follow_target(target);
        self.scroll += (goal - self.scroll) * self.lerp;
        self.scroll = self.scroll.round();
    }

    /// Jump straight to `target`
    pub fn snap_to(&mut self, target: Vec2) {
        self.scroll = self.follow_target(target).round();
    }
}

/// Complete scene state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub variant: VariantDescriptor,
    pub settings: Settings,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub registry: AnimationRegistry,
    pub character: Character,
    pub body: Body,
    pub terrain: TerrainTileRecycler,
    pub parallax: ParallaxLayerSet,
    pub camera: Camera,
    /// Collision line the body stands on
    pub ground_y: f32,
    /// Second jump used during the current airtime
    pub has_double_jumped: bool,
    pub was_on_ground: bool,
    /// Last non-zero horizontal input (1 right, -1 left)
    pub last_move_direction: f32,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Build the scene for the session's variant
    pub fn new(session: &SessionContext, settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let variant = session.variant();
        variant.validate()?;

        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let (width, height) = (settings.viewport.width, settings.viewport.height);
        let ground_y = (height * settings.layout.ground_y_factor).round();
        let target_height = settings.layout.character_target_height(height);
        let spawn = Vec2::new((width * 0.5).round(), ground_y);

        let mut registry = AnimationRegistry::new();
        let character = Character::new(
            &mut registry,
            CharacterConfig {
                pos: spawn,
                character_id: variant.character.id.to_string(),
                idle_sheet: variant.character.idle_sheet.to_string(),
                run_sheet: variant.character.run_sheet.to_string(),
                target_height,
                depth: CHARACTER_DEPTH,
                spin_duration_ms: settings.movement.spin_duration_ms,
            },
        )?;
        let body = Body::new(spawn, target_height * BODY_WIDTH_RATIO, target_height);

        let mut camera = Camera::new(width, height);
        camera.snap_to(spawn);

        let mut terrain = TerrainTileRecycler::new();
        let scroll_x = f64::from(camera.scroll.x);
        terrain.build(terrain_config(settings, ground_y, width, scroll_x), &mut rng)?;
        terrain.update(scroll_x, &mut rng);

        let parallax = parallax_for(&variant, width, height)?;

        log::info!(
            "Scene ready: variant {} ({}), seed {}, viewport {}x{}",
            variant.key.as_str(),
            variant.character.id,
            settings.seed,
            width,
            height
        );

        Ok(Self {
            seed: settings.seed,
            variant,
            settings: settings.clone(),
            time_ticks: 0,
            registry,
            character,
            body,
            terrain,
            parallax,
            camera,
            ground_y,
            has_double_jumped: false,
            was_on_ground: false,
            last_move_direction: 1.0,
            rng,
        })
    }

    /// Adapt to a new viewport without disturbing locomotion
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::Viewport { width, height });
        }
        self.settings.viewport.width = width;
        self.settings.viewport.height = height;

        let target_height = self.settings.layout.character_target_height(height);
        self.character.set_target_height(target_height);
        self.body.half_width = target_height * BODY_WIDTH_RATIO * 0.5;
        self.body.height = target_height;

        self.camera.width = width;
        self.camera.height = height;
        self.camera.follow_offset.y = height * CAMERA_OFFSET_Y_FACTOR;

        let scroll_x = f64::from(self.camera.scroll.x);
        let config = terrain_config(&self.settings, self.ground_y, width, scroll_x);
        self.terrain.build(config, &mut self.rng)?;
        self.terrain.update(scroll_x, &mut self.rng);
        self.parallax = parallax_for(&self.variant, width, height)?;
        self.parallax.update(self.camera.scroll.x, 0.0);
        log::info!("Resized to {width}x{height}");
        Ok(())
    }
}

fn terrain_config(settings: &Settings, ground_y: f32, viewport_width: f32, start_x: f64) -> TerrainConfig {
    let terrain = &settings.terrain;
    TerrainConfig {
        texture_key: crate::assets::keys::JUNGLE_TILES.to_string(),
        tile_width: terrain.tile_width,
        tile_height: terrain.tile_height,
        ground_y,
        ground_y_offset: settings.layout.ground_y_offset,
        columns: terrain.columns,
        row_index: terrain.row_index,
        depth: terrain.depth,
        width_scale: terrain.width_scale,
        height_scale: terrain.height_scale,
        tile_overlap: terrain.tile_overlap,
        viewport_width,
        buffer_tiles: terrain.buffer_tiles,
        start_x,
    }
}

fn parallax_for(variant: &VariantDescriptor, width: f32, height: f32) -> Result<ParallaxLayerSet, ConfigError> {
    let layers: Vec<ParallaxLayerConfig> = variant
        .environment
        .background_layers
        .iter()
        .enumerate()
        .map(|(depth, layer)| ParallaxLayerConfig {
            depth: depth as i32,
            ..ParallaxLayerConfig::from(layer)
        })
        .collect();
    ParallaxLayerSet::new(width, height, &layers)
}
