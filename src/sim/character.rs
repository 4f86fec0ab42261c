//! Player character: locomotion state machine and presentation
//!
//! The character is drawn at an anchor point (bottom-centre of its feet)
//! that the physics body owns. Everything here only changes how it looks:
//! which sheet and frame, scale, mirroring, spin angle and pivot. Moving the
//! pivot for a spin shifts the drawn sprite, never the anchor.

use glam::Vec2;
use rand::Rng;

use super::anim::AnimationRegistry;
use super::idle::{IdleScheduler, ensure_idle_animations, ensure_run_animation, run_key};
use super::sprite::{ORIGIN_BOTTOM, ORIGIN_CENTER, Sprite};
use super::tween::{Ease, Tween};
use crate::consts::{IDLE_FRAME_SIZE, RUN_SCALE_BOOST};
use crate::error::ConfigError;

/// One full turn, in degrees
pub const SPIN_DEGREES: f32 = 360.0;
/// Default spin duration
pub const DOUBLE_JUMP_SPIN_DURATION_MS: f32 = 520.0;

/// Locomotion states. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locomotion {
    Idle,
    Running,
    /// Holding a fixed jump frame
    Airborne,
}

/// Rotation pivot of the sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pivot {
    /// Feet on the anchor
    Bottom,
    /// Vertical centre; the sprite is drawn `shift` pixels above the anchor
    Center { shift: f32 },
}

impl Pivot {
    pub fn shift(&self) -> f32 {
        match self {
            Pivot::Bottom => 0.0,
            Pivot::Center { shift } => *shift,
        }
    }
}

/// Construction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterConfig {
    /// Anchor (bottom-centre) position
    pub pos: Vec2,
    pub character_id: String,
    pub idle_sheet: String,
    pub run_sheet: String,
    /// On-screen height when idle
    pub target_height: f32,
    pub depth: i32,
    pub spin_duration_ms: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    character_id: String,
    idle_sheet: String,
    run_sheet: String,
    sprite: Sprite,
    anchor: Vec2,
    locomotion: Locomotion,
    base_scale: f32,
    run_scale: f32,
    pivot: Pivot,
    spin_duration_ms: f32,
    idle: IdleScheduler,
    pending_spin_tween: Option<Tween>,
}

impl Character {
    /// Register the character's animations, place it and start idling
    pub fn new(registry: &mut AnimationRegistry, config: CharacterConfig) -> Result<Self, ConfigError> {
        if !(config.target_height > 0.0 && config.target_height.is_finite()) {
            return Err(ConfigError::TargetHeight(config.target_height));
        }

        ensure_idle_animations(registry, &config.character_id, &config.idle_sheet);
        ensure_run_animation(registry, &config.character_id, &config.run_sheet);

        let mut sprite = Sprite::new(config.pos, config.idle_sheet.as_str(), Vec2::splat(IDLE_FRAME_SIZE));
        sprite.origin = ORIGIN_BOTTOM;
        sprite.depth = config.depth;

        let mut character = Self {
            character_id: config.character_id,
            idle_sheet: config.idle_sheet,
            run_sheet: config.run_sheet,
            sprite,
            anchor: config.pos,
            locomotion: Locomotion::Idle,
            base_scale: 1.0,
            run_scale: 1.0,
            pivot: Pivot::Bottom,
            spin_duration_ms: config.spin_duration_ms,
            idle: IdleScheduler::new(),
            pending_spin_tween: None,
        };
        character.set_target_height(config.target_height);
        character.idle.start(&mut character.sprite, &character.idle_sheet);
        Ok(character)
    }

    pub fn id(&self) -> &str {
        &self.character_id
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn locomotion(&self) -> Locomotion {
        self.locomotion
    }

    pub fn is_running(&self) -> bool {
        self.locomotion == Locomotion::Running
    }

    pub fn is_jumping(&self) -> bool {
        self.locomotion == Locomotion::Airborne
    }

    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    pub fn run_scale(&self) -> f32 {
        self.run_scale
    }

    pub fn pivot(&self) -> Pivot {
        self.pivot
    }

    pub fn idle(&self) -> &IdleScheduler {
        &self.idle
    }

    pub fn is_spinning(&self) -> bool {
        self.pending_spin_tween.is_some()
    }

    pub fn is_alive(&self) -> bool {
        self.sprite.is_active()
    }

    /// Tear down: cancel timers and tweens, later calls no-op
    pub fn destroy(&mut self) {
        self.idle.stop();
        self.pending_spin_tween = None;
        self.sprite.destroy();
    }

    fn scale_for_state(&self) -> f32 {
        match self.locomotion {
            Locomotion::Idle => self.base_scale,
            Locomotion::Running | Locomotion::Airborne => self.run_scale,
        }
    }

    /// Size the character so its idle frame is `height` pixels tall
    pub fn set_target_height(&mut self, height: f32) {
        if !(height > 0.0 && height.is_finite()) {
            log::warn!("Ignoring target height {height}");
            return;
        }
        self.base_scale = height / IDLE_FRAME_SIZE;
        self.run_scale = self.base_scale * (1.0 + RUN_SCALE_BOOST);
        self.sprite.scale = self.scale_for_state();
    }

    /// Mirror for negative directions
    pub fn set_facing(&mut self, direction: f32) {
        if !self.is_alive() {
            return;
        }
        self.sprite.flip_x = direction < 0.0;
    }

    /// Enter `Running`: loop the run animation at run scale
    pub fn start_running(&mut self, registry: &AnimationRegistry) {
        if !self.is_alive() || self.locomotion == Locomotion::Running {
            return;
        }
        log::debug!("{}: {:?} -> Running", self.character_id, self.locomotion);
        self.locomotion = Locomotion::Running;
        self.sprite.scale = self.run_scale;
        self.idle.stop();
        self.sprite.stop_animation();
        self.sprite.set_texture(&self.run_sheet, 0);
        self.sprite.play(registry, &run_key(&self.character_id), true);
    }

    /// Return to `Idle` from running or a landing, restarting the idle loop
    pub fn stop_running(&mut self) {
        if !self.is_alive() || self.locomotion == Locomotion::Idle {
            return;
        }
        log::debug!("{}: {:?} -> Idle", self.character_id, self.locomotion);
        self.locomotion = Locomotion::Idle;
        self.sprite.scale = self.base_scale;
        self.idle.start(&mut self.sprite, &self.idle_sheet);
    }

    /// Enter `Airborne`: pin a static run-sheet frame
    ///
    /// Repeating the call while already holding `frame` is a no-op so a
    /// per-tick caller does not restart anything.
    pub fn show_jump_frame(&mut self, frame: u32) {
        if !self.is_alive() {
            return;
        }
        if self.locomotion == Locomotion::Airborne
            && self.sprite.texture() == self.run_sheet
            && self.sprite.frame() == frame
            && !self.sprite.is_animating()
        {
            return;
        }
        if self.locomotion != Locomotion::Airborne {
            log::debug!("{}: {:?} -> Airborne", self.character_id, self.locomotion);
        }
        self.locomotion = Locomotion::Airborne;
        self.idle.stop();
        self.sprite.stop_animation();
        self.sprite.set_texture(&self.run_sheet, frame);
        self.sprite.scale = self.run_scale;
    }

    /// Start a full turn about the sprite's centre; negative directions spin
    /// counter-clockwise. Replaces any spin in progress.
    pub fn start_spin(&mut self, direction: f32) {
        if !self.is_alive() {
            return;
        }
        self.set_spin_pivot();
        let spin = if direction >= 0.0 { SPIN_DEGREES } else { -SPIN_DEGREES };
        let from = self.sprite.angle;
        self.pending_spin_tween = Some(Tween::new(from, from + spin, self.spin_duration_ms, Ease::CubicOut));
    }

    /// Stop any spin, restore the bottom pivot and upright angle
    pub fn end_spin(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.pending_spin_tween = None;
        self.reset_spin_pivot();
        self.sprite.angle = 0.0;
    }

    fn set_spin_pivot(&mut self) {
        if let Pivot::Center { .. } = self.pivot {
            return;
        }
        let shift = self.sprite.display_height() * 0.5;
        self.pivot = Pivot::Center { shift };
        self.sprite.origin = ORIGIN_CENTER;
        self.sprite.pos.y = self.anchor.y - shift;
    }

    fn reset_spin_pivot(&mut self) {
        let Pivot::Center { shift } = self.pivot else {
            return;
        };
        log::trace!("{}: pivot restored (shift {shift})", self.character_id);
        self.pivot = Pivot::Bottom;
        self.sprite.origin = ORIGIN_BOTTOM;
        self.sprite.pos.y = self.anchor.y;
    }

    /// Move the anchor; the sprite follows with the current pivot shift
    pub fn place_at(&mut self, anchor: Vec2) {
        if !self.is_alive() {
            return;
        }
        self.anchor = anchor;
        self.sprite.pos = Vec2::new(anchor.x, anchor.y - self.pivot.shift());
    }

    /// Advance animation, idle loop and spin by `dt_ms`
    pub fn tick(&mut self, registry: &AnimationRegistry, rng: &mut impl Rng, dt_ms: f32) {
        if !self.is_alive() {
            return;
        }
        let event = self.sprite.tick_animation(dt_ms);
        self.idle.tick(
            &mut self.sprite,
            registry,
            &self.character_id,
            event.as_ref(),
            rng,
            dt_ms,
        );

        if let Some(tween) = self.pending_spin_tween.as_mut() {
            self.sprite.angle = tween.advance(dt_ms);
            if tween.is_finished() {
                self.pending_spin_tween = None;
            }
        }
    }
}
