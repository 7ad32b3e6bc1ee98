//! World module
//!
//! Contains the tile vocabulary, the grid sink the generators write into,
//! and procedural generation.

pub mod map;
pub mod tile;
pub mod position;
pub mod generation;

pub use map::{Cell, GridSink, TileGrid};
pub use position::Position;
pub use tile::TileType;
