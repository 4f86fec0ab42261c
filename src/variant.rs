//! Character/theme variants and the session context
//!
//! A variant picks the playable character, its sprite sheets and the
//! background theme. The selected variant lives in a [`SessionContext`]
//! that is handed to the scene, not in process-wide state.

use serde::{Deserialize, Serialize};

use crate::assets::{self, keys, ImageAsset, SpriteSheetAsset, CHARACTER_FRAME_CONFIG};
use crate::error::ConfigError;

/// Selectable variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VariantKey {
    #[default]
    Grade1,
    Grade4,
}

impl VariantKey {
    pub const ALL: [VariantKey; 2] = [VariantKey::Grade1, VariantKey::Grade4];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKey::Grade1 => "grade1",
            VariantKey::Grade4 => "grade4",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "grade1" | "1" => Some(VariantKey::Grade1),
            "grade4" | "4" => Some(VariantKey::Grade4),
            _ => None,
        }
    }
}

/// Playable character identity and sheets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub idle_sheet: &'static str,
    pub run_sheet: &'static str,
    pub pixel_art: &'static str,
}

/// Enemy or collectible shown for the variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Labelled {
    pub id: &'static str,
    pub label: &'static str,
}

/// One parallax background layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundLayer {
    pub key: &'static str,
    pub speed: f32,
}

/// Scene theme
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Environment {
    pub theme: &'static str,
    pub home: &'static str,
    pub background_layers: Vec<BackgroundLayer>,
}

/// Immutable description of a variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantDescriptor {
    pub key: VariantKey,
    pub label: &'static str,
    pub grade_label: &'static str,
    pub character: CharacterDescriptor,
    pub enemy: Labelled,
    pub item: Labelled,
    pub environment: Environment,
}

/// Assets a variant needs loaded before its scene starts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantAssetBundle {
    pub images: Vec<ImageAsset>,
    pub sprite_sheets: Vec<SpriteSheetAsset>,
}

fn default_layers() -> Vec<BackgroundLayer> {
    vec![
        BackgroundLayer {
            key: keys::BG_MOUNTAINS,
            speed: 0.2,
        },
        BackgroundLayer {
            key: keys::BG_CLOUDS,
            speed: 0.4,
        },
    ]
}

/// Look up the descriptor for a variant
pub fn variant(key: VariantKey) -> VariantDescriptor {
    match key {
        VariantKey::Grade1 => VariantDescriptor {
            key,
            label: "1º de primaria",
            grade_label: "1º de primaria",
            character: CharacterDescriptor {
                id: "linx",
                label: "Linx",
                idle_sheet: keys::LINX_IDLE,
                run_sheet: keys::LINX_RUN,
                pixel_art: keys::LINX_PIXEL,
            },
            enemy: Labelled {
                id: "snake",
                label: "Serpiente",
            },
            item: Labelled {
                id: "diamond",
                label: "Diamante",
            },
            environment: Environment {
                theme: "mountain",
                home: "cave",
                background_layers: default_layers(),
            },
        },
        VariantKey::Grade4 => VariantDescriptor {
            key,
            label: "4º de primaria",
            grade_label: "4º de primaria",
            character: CharacterDescriptor {
                id: "monkey",
                label: "Monkey",
                idle_sheet: keys::MONKEY_IDLE,
                run_sheet: keys::MONKEY_RUN,
                pixel_art: keys::MONKEY_PIXEL,
            },
            enemy: Labelled {
                id: "tiger",
                label: "Tigre",
            },
            item: Labelled {
                id: "banana",
                label: "Platano",
            },
            environment: Environment {
                theme: "jungle",
                home: "hut",
                background_layers: default_layers(),
            },
        },
    }
}

impl VariantDescriptor {
    /// Check the descriptor can drive a scene
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.background_layers.is_empty() {
            return Err(ConfigError::NoBackgroundLayers(self.key.as_str()));
        }
        Ok(())
    }

    /// Terrain tiles plus this variant's character art
    pub fn asset_bundle(&self) -> VariantAssetBundle {
        let images = [keys::JUNGLE_TILES, self.character.pixel_art]
            .into_iter()
            .filter_map(assets::image)
            .collect();
        let sprite_sheets = [self.character.idle_sheet, self.character.run_sheet]
            .into_iter()
            .filter_map(|key| assets::sprite_sheet(key, CHARACTER_FRAME_CONFIG))
            .collect();
        VariantAssetBundle {
            images,
            sprite_sheets,
        }
    }
}

/// The variant chosen for this session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionContext {
    variant_key: VariantKey,
}

impl SessionContext {
    pub fn new(variant_key: VariantKey) -> Self {
        Self { variant_key }
    }

    pub fn variant_key(&self) -> VariantKey {
        self.variant_key
    }

    pub fn variant(&self) -> VariantDescriptor {
        variant(self.variant_key)
    }

    /// Select a variant. Returns true if the selection changed.
    pub fn set_variant(&mut self, key: VariantKey) -> bool {
        if key == self.variant_key {
            return false;
        }
        log::info!("Variant changed: {} -> {}", self.variant_key.as_str(), key.as_str());
        self.variant_key = key;
        true
    }
}
