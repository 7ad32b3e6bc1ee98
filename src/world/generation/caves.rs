//! Cave generator using cellular automata
//!
//! Seeds a land/water grid from a density, then smooths it with a
//! neighbor-majority rule for a fixed number of steps.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::cancel::CancelToken;
use super::random::RandomSource;
use super::{place_tile_at, ProceduralGenerator};
use crate::error::GenerationError;
use crate::world::{GridSink, TileType};

/// Land-neighbor count at which a cell keeps its current value
const MAJORITY: u8 = 4;

/// The two automata states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    Land,
    Water,
}

impl Terrain {
    /// Tile written to the grid for this state
    pub fn tile(self) -> TileType {
        match self {
            Terrain::Land => TileType::Grass,
            Terrain::Water => TileType::Water,
        }
    }
}

/// Settings for cellular automata smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomataSettings {
    /// Probability that a cell starts as land
    pub noise_density: f32,
    pub max_steps: u32,
    pub width: i32,
    pub height: i32,
}

impl Default for AutomataSettings {
    fn default() -> Self {
        Self {
            noise_density: 0.5,
            max_steps: 5,
            width: 64,
            height: 64,
        }
    }
}

impl AutomataSettings {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !(0.0..=1.0).contains(&self.noise_density) {
            return Err(GenerationError::InvalidConfig(format!(
                "noise_density must be within [0, 1], got {}",
                self.noise_density
            )));
        }
        if self.width < 0 || self.height < 0 {
            return Err(GenerationError::InvalidConfig(format!(
                "automata extent must not be negative, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// The next state of a cell given its land-neighbor count
pub fn next_state(current: Terrain, land_neighbors: u8) -> Terrain {
    if land_neighbors > MAJORITY {
        Terrain::Land
    } else if land_neighbors < MAJORITY {
        Terrain::Water
    } else {
        current
    }
}

/// Dense land/water grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomataGrid {
    width: i32,
    height: i32,
    cells: Vec<Terrain>,
}

impl AutomataGrid {
    /// Build a grid from a per-coordinate function
    pub fn from_fn(width: i32, height: i32, mut f: impl FnMut(i32, i32) -> Terrain) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self { width, height, cells }
    }

    pub fn filled(width: i32, height: i32, terrain: Terrain) -> Self {
        Self::from_fn(width, height, |_, _| terrain)
    }

    /// Each cell independently land with probability `density`.
    /// Draws are taken column by column (x outer, y inner).
    pub fn random_fill(width: i32, height: i32, density: f32, rng: &mut dyn RandomSource) -> Self {
        let mut grid = Self::filled(width, height, Terrain::Water);
        for x in 0..grid.width {
            for y in 0..grid.height {
                if rng.chance(density) {
                    let idx = grid.xy_to_idx(x, y);
                    grid.cells[idx] = Terrain::Land;
                }
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Terrain> {
        self.in_bounds(x, y).then(|| self.cells[self.xy_to_idx(x, y)])
    }

    pub fn count(&self, terrain: Terrain) -> usize {
        self.cells.iter().filter(|&&t| t == terrain).count()
    }

    /// Land cells among the up-to-8 neighbors. Coordinates off the grid
    /// count as neither land nor water.
    pub fn land_neighbors(&self, x: i32, y: i32) -> u8 {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if self.get(x + dx, y + dy) == Some(Terrain::Land) {
                    count += 1;
                }
            }
        }
        count
    }

    /// One smoothing step, computed entirely from the current snapshot
    pub fn step(&self) -> AutomataGrid {
        AutomataGrid::from_fn(self.width, self.height, |x, y| {
            next_state(self.cells[self.xy_to_idx(x, y)], self.land_neighbors(x, y))
        })
    }
}

/// Cellular automata strategy
pub struct CellularAutomata {
    settings: AutomataSettings,
    rng: Box<dyn RandomSource + Send>,
    grid: Option<AutomataGrid>,
}

impl CellularAutomata {
    pub fn new(settings: AutomataSettings, rng: Box<dyn RandomSource + Send>) -> Self {
        Self {
            settings,
            rng,
            grid: None,
        }
    }

    pub fn settings(&self) -> &AutomataSettings {
        &self.settings
    }

    /// Final grid of the last completed run
    pub fn grid(&self) -> Option<&AutomataGrid> {
        self.grid.as_ref()
    }

    /// Seed and smooth without writing anywhere
    pub fn run(&mut self, cancel: &CancelToken) -> Result<AutomataGrid, GenerationError> {
        let AutomataSettings {
            noise_density,
            max_steps,
            width,
            height,
        } = self.settings;

        let mut state = AutomataGrid::random_fill(width, height, noise_density, &mut *self.rng);
        debug!("Seeded {}x{} automata with {} land cells", width, height, state.count(Terrain::Land));

        for step in 0..max_steps {
            if cancel.is_cancelled() {
                return Err(GenerationError::Cancelled);
            }
            let next = state.step();
            if next == state {
                debug!("Automata reached a fixed point after {} steps", step);
            }
            state = next;
            debug!("Step {}: {} land cells", step + 1, state.count(Terrain::Land));
        }
        Ok(state)
    }
}

impl ProceduralGenerator for CellularAutomata {
    fn name(&self) -> &'static str {
        "cellular automata"
    }

    fn generate(&mut self, grid: &mut dyn GridSink, cancel: &CancelToken) -> Result<(), GenerationError> {
        self.grid = None;
        info!(
            "Cellular automata over {}x{} (density={}, steps={})",
            self.settings.width, self.settings.height, self.settings.noise_density, self.settings.max_steps
        );

        let state = self.run(cancel)?;

        for x in 0..state.width() {
            if cancel.is_cancelled() {
                return Err(GenerationError::Cancelled);
            }
            for y in 0..state.height() {
                if let Some(terrain) = state.get(x, y) {
                    place_tile_at(grid, x, y, terrain.tile());
                }
            }
        }

        info!(
            "Cellular automata finished with {} land and {} water cells",
            state.count(Terrain::Land),
            state.count(Terrain::Water)
        );
        self.grid = Some(state);
        Ok(())
    }
}
