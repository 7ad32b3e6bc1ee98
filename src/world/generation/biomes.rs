//! Biome classification
//!
//! Maps normalized noise height onto the five ordered biome labels.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::world::TileType;

/// Ascending height thresholds. A height belongs to the first bucket whose
/// threshold it is strictly below; anything at or above `rock_level` is highland.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeThresholds {
    pub water_level: f32,
    pub sand_level: f32,
    pub grass_level: f32,
    pub rock_level: f32,
}

impl Default for BiomeThresholds {
    fn default() -> Self {
        Self {
            water_level: 0.3,
            sand_level: 0.4,
            grass_level: 0.7,
            rock_level: 0.85,
        }
    }
}

/// Map a raw noise value in `[-1, 1]` to a height in `[0, 1]`
#[inline]
pub fn normalize_height(noise: f32) -> f32 {
    (noise + 1.0) * 0.5
}

impl BiomeThresholds {
    pub fn validate(&self) -> Result<(), GenerationError> {
        let levels = [self.water_level, self.sand_level, self.grass_level, self.rock_level];
        if levels.iter().any(|l| !l.is_finite()) || levels.windows(2).any(|w| w[0] >= w[1]) {
            return Err(GenerationError::InvalidConfig(format!(
                "biome thresholds must be strictly ascending, got {:?}",
                levels
            )));
        }
        Ok(())
    }

    /// Classify a normalized height
    pub fn classify(&self, height: f32) -> TileType {
        if height < self.water_level {
            TileType::Water
        } else if height < self.sand_level {
            TileType::Sand
        } else if height < self.grass_level {
            TileType::Grass
        } else if height < self.rock_level {
            TileType::Rock
        } else {
            TileType::Highland
        }
    }

    /// Classify a raw noise value
    pub fn classify_noise(&self, noise: f32) -> TileType {
        self.classify(normalize_height(noise))
    }
}

/// Per-cell biome labels for a noise field
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeMap {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<TileType>,
}

impl BiomeMap {
    pub fn get(&self, x: i32, y: i32) -> Option<TileType> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some(self.tiles[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Cell count per biome, in [`TileType::BIOMES`] order
    pub fn histogram(&self) -> [usize; 5] {
        let mut counts = [0; 5];
        for tile in &self.tiles {
            if let Some(i) = TileType::BIOMES.iter().position(|b| b == tile) {
                counts[i] += 1;
            }
        }
        counts
    }
}
