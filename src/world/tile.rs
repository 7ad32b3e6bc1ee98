//! Tile definitions
//!
//! The closed set of labels a generator can write into a grid.

use serde::{Deserialize, Serialize};

/// Types of tiles written by the generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    // Biome terrain, ordered by ascending height
    Water,
    Sand,
    Grass,
    Rock,
    Highland,

    // Dungeon layout
    Room,
    Corridor,
}

impl TileType {
    /// Biome labels in ascending height order
    pub const BIOMES: [TileType; 5] = [
        TileType::Water,
        TileType::Sand,
        TileType::Grass,
        TileType::Rock,
        TileType::Highland,
    ];

    pub fn is_walkable(&self) -> bool {
        matches!(
            self,
            TileType::Sand | TileType::Grass | TileType::Room | TileType::Corridor
        )
    }

    /// Is this one of the noise-classified biome labels?
    pub fn is_biome(&self) -> bool {
        !matches!(self, TileType::Room | TileType::Corridor)
    }

    pub fn glyph(&self) -> char {
        match self {
            TileType::Water => '~',
            TileType::Sand => ':',
            TileType::Grass => '"',
            TileType::Rock => '^',
            TileType::Highland => 'A',
            TileType::Room => '.',
            TileType::Corridor => '#',
        }
    }

    pub fn fg_color(&self) -> (u8, u8, u8) {
        match self {
            TileType::Water => (40, 90, 200),
            TileType::Sand => (220, 200, 130),
            TileType::Grass => (70, 160, 60),
            TileType::Rock => (120, 110, 100),
            TileType::Highland => (235, 235, 240),
            TileType::Room => (180, 170, 150),
            TileType::Corridor => (110, 100, 90),
        }
    }
}
