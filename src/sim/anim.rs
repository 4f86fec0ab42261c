//! Sprite-sheet animations
//!
//! Definitions are registered once per scene in an [`AnimationRegistry`]
//! keyed by string; sprites play them through an [`AnimationPlayer`].

use std::collections::HashMap;

/// What happens after the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Play once, hold the last frame and report completion
    Once,
    /// Wrap around forever
    Loop,
}

/// A frame sequence on one texture
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDef {
    pub key: String,
    pub texture: String,
    pub frames: Vec<u32>,
    pub frame_rate: f32,
    pub repeat: Repeat,
}

impl AnimationDef {
    /// Consecutive frames `start..=end` of a sheet
    pub fn range(
        key: impl Into<String>,
        texture: impl Into<String>,
        start: u32,
        end: u32,
        frame_rate: f32,
        repeat: Repeat,
    ) -> Self {
        Self {
            key: key.into(),
            texture: texture.into(),
            frames: (start..=end).collect(),
            frame_rate,
            repeat,
        }
    }

    pub fn frame_duration_ms(&self) -> f32 {
        1000.0 / self.frame_rate
    }
}

/// Scene-wide animation table
#[derive(Debug, Clone, Default)]
pub struct AnimationRegistry {
    animations: HashMap<String, AnimationDef>,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.animations.contains_key(key)
    }

    /// Register a definition. Returns false (and keeps the existing one) if
    /// the key is taken.
    pub fn insert(&mut self, def: AnimationDef) -> bool {
        if self.exists(&def.key) {
            return false;
        }
        self.animations.insert(def.key.clone(), def);
        true
    }

    pub fn get(&self, key: &str) -> Option<&AnimationDef> {
        self.animations.get(key)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

/// Events raised while advancing an animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationEvent {
    /// A `Repeat::Once` animation showed its last frame for a full frame time
    Complete { key: String },
}

/// Playback cursor for one sprite
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationPlayer {
    current: Option<AnimationDef>,
    cursor: usize,
    accumulator_ms: f32,
    playing: bool,
}

impl AnimationPlayer {
    /// Start `def` from its first frame
    pub fn play(&mut self, def: &AnimationDef) {
        self.current = Some(def.clone());
        self.cursor = 0;
        self.accumulator_ms = 0.0;
        self.playing = !def.frames.is_empty();
    }

    /// Halt on the current frame
    pub fn stop(&mut self) {
        self.playing = false;
        self.accumulator_ms = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current.as_ref().map(|d| d.key.as_str())
    }

    /// Frame currently shown, if an animation has been played
    pub fn frame(&self) -> Option<u32> {
        self.current
            .as_ref()
            .and_then(|d| d.frames.get(self.cursor).copied())
    }

    /// Advance playback by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) -> Option<AnimationEvent> {
        if !self.playing {
            return None;
        }
        let def = self.current.as_ref()?;
        let frame_ms = def.frame_duration_ms();
        self.accumulator_ms += dt_ms;
        while self.accumulator_ms >= frame_ms {
            self.accumulator_ms -= frame_ms;
            if self.cursor + 1 < def.frames.len() {
                self.cursor += 1;
            } else {
                match def.repeat {
                    Repeat::Loop => self.cursor = 0,
                    Repeat::Once => {
                        self.playing = false;
                        self.accumulator_ms = 0.0;
                        return Some(AnimationEvent::Complete {
                            key: def.key.clone(),
                        });
                    }
                }
            }
        }
        None
    }
}
