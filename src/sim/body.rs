//! Minimal arcade body for the player
//!
//! Stands in for the physics substrate: gravity, velocity integration and
//! landing on tile collision boxes. Position is the bottom-centre of the
//! body, the same point the character sprite is anchored to.

use glam::Vec2;

use super::terrain::TileBody;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Bottom-centre position
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_width: f32,
    pub height: f32,
    /// Resting on a collision box after the last step
    pub on_ground: bool,
}

impl Body {
    pub fn new(pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            half_width: width * 0.5,
            height,
            on_ground: false,
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.half_width
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.half_width
    }

    /// Integrate one step and resolve landing against `boxes`
    pub fn step<'a>(&mut self, gravity: f32, dt: f32, boxes: impl IntoIterator<Item = &'a TileBody>) {
        let prev_bottom = self.pos.y;
        self.vel.y += gravity * dt;
        self.pos += self.vel * dt;
        self.on_ground = false;

        if self.vel.y < 0.0 {
            return;
        }

        // Highest box top crossed this step under the body
        let (left, right) = (f64::from(self.left()), f64::from(self.right()));
        let landing = boxes
            .into_iter()
            .filter(|b| b.x <= right && b.right() >= left)
            .map(|b| b.y)
            .filter(|&top| prev_bottom <= top && self.pos.y >= top)
            .fold(None, |acc: Option<f32>, top| Some(acc.map_or(top, |a| a.min(top))));

        if let Some(top) = landing {
            self.pos.y = top;
            self.vel.y = 0.0;
            self.on_ground = true;
        }
    }
}
