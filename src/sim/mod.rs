//! Deterministic simulation module
//!
//! All scene logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (tiles left to right)
//! - No rendering or platform dependencies

pub mod anim;
pub mod body;
pub mod character;
pub mod idle;
pub mod parallax;
pub mod sprite;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod timer;
pub mod tween;

pub use anim::{AnimationDef, AnimationEvent, AnimationPlayer, AnimationRegistry, Repeat};
pub use body::Body;
pub use character::{Character, CharacterConfig, Locomotion, Pivot};
pub use idle::{IdlePhase, IdleScheduler};
pub use parallax::{ParallaxLayer, ParallaxLayerConfig, ParallaxLayerSet};
pub use sprite::Sprite;
pub use state::{Camera, GameState};
pub use terrain::{TerrainConfig, TerrainGeometry, TerrainTileRecycler, Tile, TileBody};
pub use tick::{TickInput, tick};
pub use timer::DelayedCall;
pub use tween::{Ease, Tween};
