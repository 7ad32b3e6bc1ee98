//! Procedural map generation
//!
//! Interchangeable strategies behind one entry point. Each writes tile
//! labels into a [`GridSink`] and nothing else.

pub mod random;
pub mod cancel;
pub mod partition;
pub mod rooms;
pub mod caves;
pub mod biomes;
pub mod noise;
pub mod heightmap;

pub use biomes::{BiomeMap, BiomeThresholds};
pub use cancel::CancelToken;
pub use caves::{AutomataSettings, CellularAutomata};
pub use noise::{NoiseField, NoiseFieldGenerator, NoiseParams, NoiseSettings};
pub use heightmap::HeightMesh;
pub use partition::{PartitionNode, Rect, MIN_PARTITION_SIZE};
pub use random::{RandomSource, SeededRandom};
pub use rooms::{BspRoomPlacement, BspSettings, ConnectionStrategy};

use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::world::{GridSink, TileType};

/// A generation algorithm a host can run against a grid
pub trait ProceduralGenerator {
    /// Human-readable strategy name, for logs
    fn name(&self) -> &'static str;

    /// Run to completion, writing into `grid`.
    ///
    /// Returns [`GenerationError::Cancelled`] if `cancel` fires first;
    /// whatever was already written stays written.
    fn generate(&mut self, grid: &mut dyn GridSink, cancel: &CancelToken) -> Result<(), GenerationError>;
}

/// Strategy selector with its settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenerationMethod {
    Bsp(BspSettings),
    CellularAutomata(AutomataSettings),
    Noise(NoiseSettings),
}

impl Default for GenerationMethod {
    fn default() -> Self {
        GenerationMethod::Bsp(BspSettings::default())
    }
}

impl GenerationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            GenerationMethod::Bsp(_) => "BSP room placement",
            GenerationMethod::CellularAutomata(_) => "cellular automata",
            GenerationMethod::Noise(_) => "noise field",
        }
    }

    /// Does this strategy draw from a random source?
    pub fn needs_random(&self) -> bool {
        !matches!(self, GenerationMethod::Noise(_))
    }
}

/// Validates settings and wires a strategy to its random source
pub struct GeneratorBuilder {
    method: GenerationMethod,
    rng: Option<Box<dyn RandomSource + Send>>,
}

impl GeneratorBuilder {
    pub fn new(method: GenerationMethod) -> Self {
        Self { method, rng: None }
    }

    pub fn with_random(self, rng: impl RandomSource + Send + 'static) -> Self {
        self.with_boxed_random(Box::new(rng))
    }

    pub fn with_boxed_random(mut self, rng: Box<dyn RandomSource + Send>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build(self) -> Result<Box<dyn ProceduralGenerator + Send>, GenerationError> {
        let name = self.method.name();
        match self.method {
            GenerationMethod::Bsp(settings) => {
                settings.validate()?;
                let rng = self.rng.ok_or(GenerationError::MissingRandomSource { method: name })?;
                Ok(Box::new(BspRoomPlacement::new(settings, rng)))
            }
            GenerationMethod::CellularAutomata(settings) => {
                settings.validate()?;
                let rng = self.rng.ok_or(GenerationError::MissingRandomSource { method: name })?;
                Ok(Box::new(CellularAutomata::new(settings, rng)))
            }
            GenerationMethod::Noise(settings) => {
                settings.validate()?;
                Ok(Box::new(NoiseFieldGenerator::new(settings)))
            }
        }
    }
}

/// Overwrite the tile at a coordinate, skipping coordinates the grid doesn't have
pub(crate) fn place_tile_at(grid: &mut dyn GridSink, x: i32, y: i32, tile: TileType) -> bool {
    match grid.cell_at(x, y) {
        Some(cell) => {
            grid.place_tile(cell, tile, true);
            true
        }
        None => {
            trace!("Skipping {:?} at out-of-range ({}, {})", tile, x, y);
            false
        }
    }
}

/// Lay the ground template on every cell of the grid
pub(crate) fn build_ground(grid: &mut dyn GridSink, template: &str, cancel: &CancelToken) -> Result<(), GenerationError> {
    for x in 0..grid.width() {
        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }
        for y in 0..grid.length() {
            let Some(cell) = grid.cell_at(x, y) else {
                warn!("Unable to get cell at ({}, {})", x, y);
                continue;
            };
            grid.place_object(cell, template, false);
        }
    }
    Ok(())
}

/// Grid that fires a cancel token after a set number of tile writes
#[cfg(test)]
pub(crate) struct CancellingGrid {
    pub inner: crate::world::TileGrid,
    token: CancelToken,
    writes_left: usize,
}

#[cfg(test)]
impl CancellingGrid {
    pub fn new(inner: crate::world::TileGrid, token: CancelToken, writes: usize) -> Self {
        Self {
            inner,
            token,
            writes_left: writes,
        }
    }
}

#[cfg(test)]
impl GridSink for CancellingGrid {
    fn width(&self) -> i32 {
        self.inner.width()
    }

    fn length(&self) -> i32 {
        self.inner.length()
    }

    fn cell_size(&self) -> f32 {
        self.inner.cell_size()
    }

    fn cell_at(&self, x: i32, y: i32) -> Option<crate::world::Position> {
        self.inner.cell_at(x, y)
    }

    fn place_tile(&mut self, cell: crate::world::Position, tile: TileType, overwrite: bool) {
        self.inner.place_tile(cell, tile, overwrite);
        self.writes_left = self.writes_left.saturating_sub(1);
        if self.writes_left == 0 {
            self.token.cancel();
        }
    }

    fn place_object(&mut self, cell: crate::world::Position, template: &str, stack: bool) {
        self.inner.place_object(cell, template, stack);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TileGrid;

    #[test]
    fn test_builder_requires_random_source() {
        let result = GeneratorBuilder::new(GenerationMethod::Bsp(BspSettings::default())).build();
        assert!(matches!(result, Err(GenerationError::MissingRandomSource { .. })));

        let result = GeneratorBuilder::new(GenerationMethod::CellularAutomata(AutomataSettings::default())).build();
        assert!(matches!(result, Err(GenerationError::MissingRandomSource { .. })));
    }

    #[test]
    fn test_noise_needs_no_random_source() {
        let generator = GeneratorBuilder::new(GenerationMethod::Noise(NoiseSettings::default()))
            .build()
            .unwrap();
        assert_eq!(generator.name(), "noise field");
    }

    #[test]
    fn test_builder_rejects_invalid_settings() {
        let settings = NoiseSettings {
            chunk_size: 0,
            ..Default::default()
        };
        let result = GeneratorBuilder::new(GenerationMethod::Noise(settings)).build();
        assert!(matches!(result, Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn test_strategies_are_interchangeable() {
        let methods = [
            GenerationMethod::Bsp(BspSettings::default()),
            GenerationMethod::CellularAutomata(AutomataSettings {
                width: 32,
                height: 32,
                ..Default::default()
            }),
            GenerationMethod::Noise(NoiseSettings {
                width: 32,
                height: 32,
                chunk_size: 8,
                ..Default::default()
            }),
        ];
        for method in methods {
            let mut grid = TileGrid::new(32, 32, 1.0);
            let mut generator = GeneratorBuilder::new(method)
                .with_random(SeededRandom::new(99))
                .build()
                .unwrap();
            generator.generate(&mut grid, &CancelToken::new()).unwrap();
            assert!(grid.cells.iter().any(|c| c.tile.is_some()), "{} wrote nothing", generator.name());
        }
    }

    #[test]
    fn test_out_of_range_tile_skipped() {
        let mut grid = TileGrid::new(2, 2, 1.0);
        assert!(place_tile_at(&mut grid, 1, 1, TileType::Room));
        assert!(!place_tile_at(&mut grid, 2, 0, TileType::Room));
        assert_eq!(grid.count(TileType::Room), 1);
    }
}
