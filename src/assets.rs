//! Asset key and path tables
//!
//! Keys are what the simulation refers to (texture identities, animation
//! sheets); paths are only consumed by whatever loads the images.

use serde::Serialize;

const ROOT_ASSET_PATH: &str = "assets";

/// Texture keys
pub mod keys {
    pub const BG_CLOUDS: &str = "bg-clouds";
    pub const BG_MOUNTAINS: &str = "bg-mountains";

    pub const MONKEY_IDLE: &str = "monkey-idle";
    pub const MONKEY_RUN: &str = "monkey-run";
    pub const MONKEY_PIXEL: &str = "monkey-pixel";
    pub const LINX_IDLE: &str = "linx-idle";
    pub const LINX_RUN: &str = "linx-run";
    pub const LINX_PIXEL: &str = "linx-pixel";

    pub const JUNGLE_TILES: &str = "jungle-tiles";

    pub const LOGO: &str = "logo-aldebaran";
}

/// Frame slicing for a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameConfig {
    pub frame_width: u32,
    pub frame_height: u32,
}

/// Character sheets are sliced into square 256px frames
pub const CHARACTER_FRAME_CONFIG: FrameConfig = FrameConfig {
    frame_width: 256,
    frame_height: 256,
};

/// Terrain tile sheet frame size
pub const TILE_FRAME_CONFIG: FrameConfig = FrameConfig {
    frame_width: 128,
    frame_height: 128,
};

/// A single image asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageAsset {
    pub key: &'static str,
    pub path: String,
}

/// A sprite sheet asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteSheetAsset {
    pub key: &'static str,
    pub path: String,
    pub frame_config: FrameConfig,
}

/// Relative path of an image under the asset root
pub fn image_path(file: &str) -> String {
    format!("{ROOT_ASSET_PATH}/img/{file}")
}

/// File name for each known key
pub fn file_for(key: &str) -> Option<&'static str> {
    let file = match key {
        keys::BG_CLOUDS => "bg_clouds.png",
        keys::BG_MOUNTAINS => "bg_mountains.png",
        keys::MONKEY_IDLE => "monkey_idle.png",
        keys::MONKEY_RUN => "monkey_running.png",
        keys::MONKEY_PIXEL => "monkey_pixelart.png",
        keys::LINX_IDLE => "linx_idle.png",
        keys::LINX_RUN => "linx_running.png",
        keys::LINX_PIXEL => "linx_pixelart.png",
        keys::JUNGLE_TILES => "jungla_tiles.png",
        keys::LOGO => return Some("logo-aldebaran.png"),
        _ => return None,
    };
    Some(file)
}

/// Full path for a known key (the logo lives at the asset root)
pub fn path_for(key: &str) -> Option<String> {
    let file = file_for(key)?;
    if key == keys::LOGO {
        Some(format!("{ROOT_ASSET_PATH}/{file}"))
    } else {
        Some(image_path(file))
    }
}

/// Image asset for a known key
pub fn image(key: &'static str) -> Option<ImageAsset> {
    path_for(key).map(|path| ImageAsset { key, path })
}

/// Sprite sheet asset for a known key
pub fn sprite_sheet(key: &'static str, frame_config: FrameConfig) -> Option<SpriteSheetAsset> {
    path_for(key).map(|path| SpriteSheetAsset {
        key,
        path,
        frame_config,
    })
}

/// Images the menu needs before anything else
pub fn menu_images() -> Vec<ImageAsset> {
    [
        keys::BG_CLOUDS,
        keys::BG_MOUNTAINS,
        keys::LOGO,
        keys::MONKEY_PIXEL,
        keys::LINX_PIXEL,
    ]
    .into_iter()
    .filter_map(image)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolve() {
        assert_eq!(path_for(keys::LINX_RUN).as_deref(), Some("assets/img/linx_running.png"));
        assert_eq!(path_for(keys::LOGO).as_deref(), Some("assets/logo-aldebaran.png"));
        assert_eq!(path_for("missing"), None);
    }

    #[test]
    fn test_menu_images_complete() {
        let images = menu_images();
        assert_eq!(images.len(), 5);
        assert!(images.iter().any(|a| a.key == keys::BG_MOUNTAINS));
    }
}
