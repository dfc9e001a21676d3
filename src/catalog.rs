//! Frozen level data: animation sets, tile placements, start positions.
//!
//! Parsed once before the first frame and never mutated afterwards; animation
//! sets are shared between sprites through `Arc`.

use std::sync::Arc;

use log::debug;
use serde::Deserialize;

use crate::animation::AnimationSet;
use crate::error::GameError;
use crate::math::{Rect, Vector2};

const EMBEDDED_CATALOG: &str = include_str!("../assets/catalog.json");

#[derive(Debug, Clone, Deserialize)]
pub struct RunnerData {
    pub animation: Arc<AnimationSet>,
    pub start_take: String,
    pub start_position: Vector2,
    pub layer_depth: f32,
    #[serde(default)]
    pub collision_inflate: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnemyData {
    pub animation: Arc<AnimationSet>,
    pub take: String,
    pub start_position: Vector2,
    pub patrol_min_x: f32,
    pub patrol_max_x: f32,
    pub speed: f32,
    pub layer_depth: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickupData {
    pub id: String,
    pub take: String,
    pub translation: Vector2,
    pub value: u32,
    pub radius: f32,
}

/// One archetype tile cloned at every translation.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformData {
    pub id: String,
    pub sprite_sheet: Arc<str>,
    pub source: Rect,
    pub scale: Vector2,
    pub origin: Vector2,
    pub alpha: f32,
    pub layer_depth: f32,
    pub translations: Vec<Vector2>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundData {
    pub id: String,
    pub sprite_sheet: Arc<str>,
    pub source: Rect,
    pub translation: Vector2,
    pub scale: Vector2,
    pub origin: Vector2,
    /// Defaults to the screen size.
    #[serde(default)]
    pub dimensions: Option<Vector2>,
    pub alpha: f32,
    pub layer_depth: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub runner: RunnerData,
    pub enemy: EnemyData,
    pub collectibles: Arc<AnimationSet>,
    pub pickups: Vec<PickupData>,
    pub pickup_layer_depth: f32,
    pub platform: PlatformData,
    pub backgrounds: Vec<BackgroundData>,
}

impl Catalog {
    /// The catalog shipped with the game.
    pub fn embedded() -> Result<Self, GameError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        debug!(
            "Catalog loaded: {} platform tiles, {} pickups, {} backgrounds",
            catalog.platform.translations.len(),
            catalog.pickups.len(),
            catalog.backgrounds.len()
        );
        Ok(catalog)
    }

    /// Every take is well formed and every referenced take exists.
    pub fn validate(&self) -> Result<(), GameError> {
        self.runner.animation.validate()?;
        self.enemy.animation.validate()?;
        self.collectibles.validate()?;

        self.runner.animation.take(&self.runner.start_take)?;
        self.enemy.animation.take(&self.enemy.take)?;
        for pickup in &self.pickups {
            self.collectibles.take(&pickup.take)?;
        }

        if self.platform.translations.is_empty() {
            return Err(GameError::InvalidCatalog(
                "platform has no placements".to_string(),
            ));
        }
        Ok(())
    }

    /// Sum of every pickup's value.
    pub fn total_pickup_value(&self) -> u32 {
        self.pickups.iter().map(|pickup| pickup.value).sum()
    }
}
