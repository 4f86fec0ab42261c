//! Parallax background layers
//!
//! Each layer is a repeating texture fixed to the screen whose texture
//! offset follows the camera at a fraction of its speed.

use crate::error::ConfigError;
use crate::variant::BackgroundLayer;

/// Construction parameters for one layer
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayerConfig {
    pub key: String,
    /// Fraction of camera scroll applied to the texture (< 1 for far layers)
    pub speed: f32,
    pub alpha: f32,
    pub depth: i32,
    /// Defaults to the viewport height
    pub height: Option<f32>,
    /// Defaults to 0
    pub y: Option<f32>,
    /// Fraction of vertical offset applied to the layer's position
    pub vertical_factor: f32,
}

impl ParallaxLayerConfig {
    pub fn new(key: impl Into<String>, speed: f32) -> Self {
        Self {
            key: key.into(),
            speed,
            alpha: 1.0,
            depth: 0,
            height: None,
            y: None,
            vertical_factor: 0.0,
        }
    }
}

impl From<&BackgroundLayer> for ParallaxLayerConfig {
    fn from(layer: &BackgroundLayer) -> Self {
        Self::new(layer.key, layer.speed)
    }
}

/// A layer's current placement
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayer {
    pub key: String,
    pub speed: f32,
    pub alpha: f32,
    pub depth: i32,
    pub width: f32,
    pub height: f32,
    pub base_y: f32,
    pub vertical_factor: f32,
    /// Horizontal texture offset
    pub tile_position_x: f32,
    /// Current screen y
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParallaxLayerSet {
    layers: Vec<ParallaxLayer>,
}

impl ParallaxLayerSet {
    pub fn new(width: f32, height: f32, layers: &[ParallaxLayerConfig]) -> Result<Self, ConfigError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::Viewport { width, height });
        }
        let layers = layers
            .iter()
            .map(|layer| {
                let base_y = layer.y.unwrap_or(0.0);
                ParallaxLayer {
                    key: layer.key.clone(),
                    speed: layer.speed,
                    alpha: layer.alpha,
                    depth: layer.depth,
                    width,
                    height: layer.height.unwrap_or(height),
                    base_y,
                    vertical_factor: layer.vertical_factor,
                    tile_position_x: 0.0,
                    y: base_y,
                }
            })
            .collect();
        Ok(Self { layers })
    }

    /// Place every layer for the camera position
    pub fn update(&mut self, scroll_x: f32, offset_y: f32) {
        for layer in &mut self.layers {
            layer.tile_position_x = scroll_x * layer.speed;
            if layer.vertical_factor != 0.0 {
                layer.y = layer.base_y + offset_y * layer.vertical_factor;
            }
        }
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> ParallaxLayerSet {
        let far = ParallaxLayerConfig::new("bg-mountains", 0.2);
        let near = ParallaxLayerConfig {
            vertical_factor: 0.5,
            y: Some(100.0),
            height: Some(400.0),
            ..ParallaxLayerConfig::new("bg-clouds", 0.4)
        };
        ParallaxLayerSet::new(1024.0, 768.0, &[far, near]).unwrap()
    }

    #[test]
    fn test_offsets_scale_with_speed() {
        let mut set = set();
        set.update(1000.0, 0.0);
        let offsets: Vec<f32> = set.layers().iter().map(|l| l.tile_position_x).collect();
        assert_eq!(offsets, vec![200.0, 400.0]);
        assert_eq!(set.layers()[0].height, 768.0);
        assert_eq!(set.layers()[1].height, 400.0);
    }

    #[test]
    fn test_vertical_factor_only_moves_declaring_layers() {
        let mut set = set();
        set.update(0.0, 40.0);
        assert_eq!(set.layers()[0].y, 0.0);
        assert_eq!(set.layers()[1].y, 120.0);
        // Same input, same output
        let snapshot = set.clone();
        set.update(0.0, 40.0);
        assert_eq!(set, snapshot);
    }

    #[test]
    fn test_rejects_empty_viewport() {
        assert!(ParallaxLayerSet::new(0.0, 768.0, &[]).is_err());
    }
}
