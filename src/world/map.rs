//! Grid sink
//!
//! The generators never own storage. They look cells up and place tiles
//! through [`GridSink`]; [`TileGrid`] is the in-memory implementation.

use super::position::Position;
use super::tile::TileType;

/// The external grid every strategy writes its output into
pub trait GridSink {
    /// Number of cells along x
    fn width(&self) -> i32;

    /// Number of cells along y
    fn length(&self) -> i32;

    /// Physical size of one cell in world units
    fn cell_size(&self) -> f32;

    /// Look up the cell at a coordinate. `None` when out of range.
    fn cell_at(&self, x: i32, y: i32) -> Option<Position>;

    /// Place a tile on a cell. Without `overwrite`, an occupied cell is left alone.
    fn place_tile(&mut self, cell: Position, tile: TileType, overwrite: bool);

    /// Place non-tile content (ground fill) on a cell.
    /// Without `stack`, an object already on the cell is replaced.
    fn place_object(&mut self, cell: Position, template: &str, stack: bool);
}

/// A single cell of a [`TileGrid`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub tile: Option<TileType>,
    pub objects: Vec<String>,
}

/// Dense in-memory grid
#[derive(Debug, Clone)]
pub struct TileGrid {
    pub width: i32,
    pub length: i32,
    pub cell_size: f32,
    pub cells: Vec<Cell>,
}

impl TileGrid {
    /// Create an empty grid
    pub fn new(width: i32, length: i32, cell_size: f32) -> Self {
        let width = width.max(0);
        let length = length.max(0);
        Self {
            width,
            length,
            cell_size,
            cells: vec![Cell::default(); (width * length) as usize],
        }
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    pub fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.length
    }

    /// Get the cell at a position
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.xy_to_idx(x, y)])
        } else {
            None
        }
    }

    /// Tile label at a position, if any was placed
    pub fn tile(&self, x: i32, y: i32) -> Option<TileType> {
        self.get(x, y).and_then(|c| c.tile)
    }

    /// Count the cells carrying a given tile
    pub fn count(&self, tile: TileType) -> usize {
        self.cells.iter().filter(|c| c.tile == Some(tile)).count()
    }

    /// Render the tile layer as text, one row per line. Empty cells are blanks.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.length) as usize);
        for y in 0..self.length {
            for x in 0..self.width {
                out.push(self.tile(x, y).map_or(' ', |t| t.glyph()));
            }
            out.push('\n');
        }
        out
    }
}

impl GridSink for TileGrid {
    fn width(&self) -> i32 {
        self.width
    }

    fn length(&self) -> i32 {
        self.length
    }

    fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn cell_at(&self, x: i32, y: i32) -> Option<Position> {
        self.in_bounds(x, y).then(|| Position::new(x, y))
    }

    fn place_tile(&mut self, cell: Position, tile: TileType, overwrite: bool) {
        if !self.in_bounds(cell.x, cell.y) {
            return;
        }
        let idx = self.xy_to_idx(cell.x, cell.y);
        let slot = &mut self.cells[idx].tile;
        if overwrite || slot.is_none() {
            *slot = Some(tile);
        }
    }

    fn place_object(&mut self, cell: Position, template: &str, stack: bool) {
        if !self.in_bounds(cell.x, cell.y) {
            return;
        }
        let idx = self.xy_to_idx(cell.x, cell.y);
        let objects = &mut self.cells[idx].objects;
        if !stack {
            objects.clear();
        }
        objects.push(template.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_lookup_bounds() {
        let grid = TileGrid::new(4, 3, 1.0);
        assert_eq!(grid.cell_at(3, 2), Some(Position::new(3, 2)));
        assert_eq!(grid.cell_at(4, 0), None);
        assert_eq!(grid.cell_at(0, -1), None);
    }

    #[test]
    fn test_place_tile_respects_overwrite() {
        let mut grid = TileGrid::new(2, 2, 1.0);
        let cell = Position::new(1, 1);

        grid.place_tile(cell, TileType::Room, false);
        grid.place_tile(cell, TileType::Corridor, false);
        assert_eq!(grid.tile(1, 1), Some(TileType::Room));

        grid.place_tile(cell, TileType::Corridor, true);
        assert_eq!(grid.tile(1, 1), Some(TileType::Corridor));
    }

    #[test]
    fn test_place_object_stacking() {
        let mut grid = TileGrid::new(1, 1, 1.0);
        let cell = Position::new(0, 0);

        grid.place_object(cell, "Grass", false);
        grid.place_object(cell, "Grass", false);
        assert_eq!(grid.get(0, 0).unwrap().objects.len(), 1);

        grid.place_object(cell, "Flower", true);
        assert_eq!(grid.get(0, 0).unwrap().objects, vec!["Grass", "Flower"]);
    }

    #[test]
    fn test_ascii_rendering() {
        let mut grid = TileGrid::new(3, 2, 1.0);
        grid.place_tile(Position::new(0, 0), TileType::Room, true);
        grid.place_tile(Position::new(2, 1), TileType::Water, true);
        assert_eq!(grid.to_ascii(), ".  \n  ~\n");
    }
}
