//! Generation config
//!
//! A preset bundles the target grid, the strategy with its settings and
//! the seed for the strategy's random source.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::world::generation::{
    AutomataSettings, GenerationMethod, GeneratorBuilder, NoiseSettings, ProceduralGenerator,
    SeededRandom,
};
use crate::world::TileGrid;

/// Dimensions of the grid a preset generates into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub width: i32,
    pub length: i32,
    pub cell_size: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            width: 64,
            length: 48,
            cell_size: 1.0,
        }
    }
}

/// One complete generation run: grid, strategy and seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seed for the random source of the BSP and automata strategies.
    /// The noise strategy carries its own seed in its settings.
    pub seed: u64,
    pub grid: GridSettings,
    pub method: GenerationMethod,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            grid: GridSettings::default(),
            method: GenerationMethod::default(),
        }
    }
}

impl GenerationConfig {
    pub fn new_grid(&self) -> TileGrid {
        TileGrid::new(self.grid.width, self.grid.length, self.grid.cell_size)
    }

    /// Build the configured strategy, seeded from `self.seed`
    pub fn build_generator(&self) -> Result<Box<dyn ProceduralGenerator + Send>, GenerationError> {
        let mut builder = GeneratorBuilder::new(self.method.clone());
        if self.method.needs_random() {
            builder = builder.with_random(SeededRandom::new(self.seed));
        }
        builder.build()
    }
}

/// The shipped presets, keyed by file stem
pub fn default_presets() -> Vec<(&'static str, GenerationConfig)> {
    vec![
        ("rooms", GenerationConfig::default()),
        (
            "caves",
            GenerationConfig {
                grid: GridSettings {
                    width: 64,
                    length: 64,
                    cell_size: 1.0,
                },
                method: GenerationMethod::CellularAutomata(AutomataSettings::default()),
                ..Default::default()
            },
        ),
        (
            "islands",
            GenerationConfig {
                grid: GridSettings {
                    width: 128,
                    length: 128,
                    cell_size: 1.0,
                },
                method: GenerationMethod::Noise(NoiseSettings::default()),
                ..Default::default()
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::CancelToken;

    #[test]
    fn test_default_preset_is_bsp() {
        let config = GenerationConfig::default();
        assert!(matches!(config.method, GenerationMethod::Bsp(_)));
        let grid = config.new_grid();
        assert_eq!((grid.width, grid.length), (64, 48));
    }

    #[test]
    fn test_presets_build_and_run() {
        for (name, config) in default_presets() {
            let mut grid = config.new_grid();
            let mut generator = config.build_generator().unwrap();
            generator.generate(&mut grid, &CancelToken::new()).unwrap();
            assert!(grid.cells.iter().any(|c| c.tile.is_some()), "preset {} wrote nothing", name);
        }
    }

    #[test]
    fn test_same_seed_same_grid() {
        let config = GenerationConfig::default();
        let run = || {
            let mut grid = config.new_grid();
            config.build_generator().unwrap().generate(&mut grid, &CancelToken::new()).unwrap();
            grid.to_ascii()
        };
        assert_eq!(run(), run());
    }
}
