//! Scroll Runner - a side-scrolling platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain recycling, locomotion, idle loop, parallax)
//! - `variant`: Character/theme variants and the session context that selects one
//! - `assets`: Asset key and path tables
//! - `settings`: Data-driven scene tuning
//! - `error`: Construction-time validation errors

pub mod assets;
pub mod error;
pub mod settings;
pub mod sim;
pub mod variant;

pub use error::{ConfigError, SettingsError};
pub use settings::Settings;
pub use variant::{SessionContext, VariantDescriptor, VariantKey};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Character sprite sheets use square frames of this size (pixels)
    pub const IDLE_FRAME_SIZE: f32 = 256.0;
    /// Running and jumping poses are drawn this much larger than idle
    pub const RUN_SCALE_BOOST: f32 = 0.2;

    /// Default viewport
    pub const VIEWPORT_WIDTH: f32 = 1024.0;
    pub const VIEWPORT_HEIGHT: f32 = 768.0;

    /// Camera follow smoothing (fraction of the gap closed per tick)
    pub const CAMERA_LERP_X: f32 = 0.2;
    pub const CAMERA_LERP_Y: f32 = 1.0;
    /// Camera looks this fraction of the viewport height above the character
    pub const CAMERA_OFFSET_Y_FACTOR: f32 = 0.35;
}

/// Milliseconds in a simulation step of `dt` seconds
#[inline]
pub fn secs_to_ms(dt: f32) -> f32 {
    dt * 1000.0
}
