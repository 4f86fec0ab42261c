//! Display state of an animated sprite
//!
//! Only what the simulation decides is kept here: which texture and frame
//! to show, where, at what scale, mirrored or rotated. Drawing is left to
//! whatever consumes the state.

use glam::Vec2;

use super::anim::{AnimationEvent, AnimationPlayer, AnimationRegistry};

/// Bottom-centre anchoring (feet on the ground)
pub const ORIGIN_BOTTOM: Vec2 = Vec2::new(0.5, 1.0);
/// Centre anchoring (rotation about the middle)
pub const ORIGIN_CENTER: Vec2 = Vec2::new(0.5, 0.5);

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Position of the origin point in world space
    pub pos: Vec2,
    /// Normalized anchor inside the frame
    pub origin: Vec2,
    pub scale: f32,
    pub flip_x: bool,
    /// Rotation in degrees, clockwise positive
    pub angle: f32,
    pub depth: i32,
    texture: String,
    frame: u32,
    frame_size: Vec2,
    active: bool,
    anims: AnimationPlayer,
}

impl Sprite {
    pub fn new(pos: Vec2, texture: impl Into<String>, frame_size: Vec2) -> Self {
        Self {
            pos,
            origin: ORIGIN_BOTTOM,
            scale: 1.0,
            flip_x: false,
            angle: 0.0,
            depth: 0,
            texture: texture.into(),
            frame: 0,
            frame_size,
            active: true,
            anims: AnimationPlayer::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark the sprite dead; later calls against it no-op
    pub fn destroy(&mut self) {
        self.active = false;
        self.anims.stop();
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn set_texture(&mut self, texture: &str, frame: u32) {
        if self.texture != texture {
            self.texture = texture.to_string();
        }
        self.frame = frame;
    }

    pub fn set_frame(&mut self, frame: u32) {
        self.frame = frame;
    }

    pub fn display_width(&self) -> f32 {
        self.frame_size.x * self.scale
    }

    pub fn display_height(&self) -> f32 {
        self.frame_size.y * self.scale
    }

    /// Play a registered animation. With `ignore_if_playing`, replaying the
    /// animation already running is a no-op.
    pub fn play(&mut self, registry: &AnimationRegistry, key: &str, ignore_if_playing: bool) {
        if !self.active {
            return;
        }
        if ignore_if_playing && self.anims.is_playing() && self.anims.current_key() == Some(key) {
            return;
        }
        let Some(def) = registry.get(key) else {
            log::warn!("Missing animation: {key}");
            return;
        };
        self.anims.play(def);
        self.texture.clone_from(&def.texture);
        if let Some(frame) = self.anims.frame() {
            self.frame = frame;
        }
    }

    pub fn stop_animation(&mut self) {
        self.anims.stop();
    }

    pub fn is_animating(&self) -> bool {
        self.anims.is_playing()
    }

    pub fn current_animation(&self) -> Option<&str> {
        self.anims.current_key()
    }

    /// Advance the running animation and show its current frame
    pub fn tick_animation(&mut self, dt_ms: f32) -> Option<AnimationEvent> {
        if !self.active || !self.anims.is_playing() {
            return None;
        }
        let event = self.anims.tick(dt_ms);
        if let Some(frame) = self.anims.frame() {
            self.frame = frame;
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::anim::{AnimationDef, Repeat};

    fn registry() -> AnimationRegistry {
        let mut registry = AnimationRegistry::new();
        registry.insert(AnimationDef::range("run", "run-sheet", 0, 7, 10.0, Repeat::Loop));
        registry
    }

    #[test]
    fn test_play_switches_texture() {
        let registry = registry();
        let mut sprite = Sprite::new(Vec2::ZERO, "idle-sheet", Vec2::splat(256.0));
        sprite.set_frame(3);
        sprite.play(&registry, "run", true);
        assert_eq!(sprite.texture(), "run-sheet");
        assert_eq!(sprite.frame(), 0);
        assert!(sprite.is_animating());

        sprite.tick_animation(250.0);
        assert_eq!(sprite.frame(), 2);
        // Replaying with ignore_if_playing keeps the cursor
        sprite.play(&registry, "run", true);
        assert_eq!(sprite.frame(), 2);
    }

    #[test]
    fn test_missing_animation_is_ignored() {
        let registry = registry();
        let mut sprite = Sprite::new(Vec2::ZERO, "idle-sheet", Vec2::splat(256.0));
        sprite.play(&registry, "nope", false);
        assert_eq!(sprite.texture(), "idle-sheet");
        assert!(!sprite.is_animating());
    }

    #[test]
    fn test_destroyed_sprite_no_ops() {
        let registry = registry();
        let mut sprite = Sprite::new(Vec2::ZERO, "idle-sheet", Vec2::splat(256.0));
        sprite.destroy();
        sprite.play(&registry, "run", false);
        assert!(!sprite.is_animating());
        assert_eq!(sprite.tick_animation(1000.0), None);
    }

    #[test]
    fn test_display_size_follows_scale() {
        let mut sprite = Sprite::new(Vec2::ZERO, "sheet", Vec2::splat(256.0));
        sprite.scale = 0.5;
        assert_eq!(sprite.display_height(), 128.0);
        assert_eq!(sprite.display_width(), 128.0);
    }
}
