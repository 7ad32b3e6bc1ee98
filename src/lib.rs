//! Gridforge - procedural tile-grid level generation
//!
//! Three interchangeable strategies write tile labels into a shared grid:
//! binary-space-partition rooms and corridors, cellular automata caves,
//! and chunked multi-octave noise biomes.

pub mod error;
pub mod world;
pub mod data;

// Re-export commonly used types
pub use error::{ConfigError, GenerationError};
pub use world::{GridSink, Position, TileGrid, TileType};
pub use world::generation::{
    CancelToken, GeneratorBuilder, ProceduralGenerator, RandomSource, SeededRandom,
};
pub use data::{GenerationConfig, GenerationMethod, GridSettings};
