//! Room and corridor dungeon generator
//!
//! Recursively partitions the grid, carves an inset room in every leaf and
//! joins sibling subtrees with dog-leg corridors.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::cancel::CancelToken;
use super::partition::{PartitionNode, Rect};
use super::random::RandomSource;
use super::{build_ground, place_tile_at, ProceduralGenerator};
use crate::error::GenerationError;
use crate::world::{GridSink, Position, TileType};

/// Which point a subtree hands up to its parent for connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStrategy {
    /// Midpoint of the two child points. May leave rooms unreachable in
    /// trees deeper than one split.
    #[default]
    Midpoint,
    /// The first child's point, always a room center. Every room ends up
    /// connected.
    RoomCenter,
}

/// Settings for BSP room placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BspSettings {
    /// Target room count; the tree is split `ceil(log2(max_rooms))` levels deep
    pub max_rooms: u32,
    /// Smallest room (width, height)
    pub room_min_size: (i32, i32),
    /// Largest room (width, height)
    pub room_max_size: (i32, i32),
    pub connection: ConnectionStrategy,
    /// Object template laid on every cell after carving. `None` skips the fill.
    pub ground_template: Option<String>,
}

impl Default for BspSettings {
    fn default() -> Self {
        Self {
            max_rooms: 10,
            room_min_size: (5, 5),
            room_max_size: (12, 8),
            connection: ConnectionStrategy::Midpoint,
            ground_template: Some("Grass".to_string()),
        }
    }
}

impl BspSettings {
    pub fn validate(&self) -> Result<(), GenerationError> {
        let (min_w, min_h) = self.room_min_size;
        let (max_w, max_h) = self.room_max_size;
        if min_w < 1 || min_h < 1 {
            return Err(GenerationError::InvalidConfig(format!(
                "room_min_size must be positive, got {:?}",
                self.room_min_size
            )));
        }
        if min_w > max_w || min_h > max_h {
            return Err(GenerationError::InvalidConfig(format!(
                "room_min_size {:?} exceeds room_max_size {:?}",
                self.room_min_size, self.room_max_size
            )));
        }
        Ok(())
    }

    /// Split depth derived from `max_rooms`
    pub fn split_budget(&self) -> u32 {
        split_budget(self.max_rooms)
    }
}

/// `max(0, ceil(log2(max_rooms)))`
pub fn split_budget(max_rooms: u32) -> u32 {
    if max_rooms <= 1 {
        0
    } else {
        u32::BITS - (max_rooms - 1).leading_zeros()
    }
}

/// A carved room and the leaf partition that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub rect: Rect,
    pub partition: Rect,
}

impl Room {
    pub fn center(&self) -> Position {
        self.rect.center()
    }
}

/// An L-shaped connection between two points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corridor {
    pub start: Position,
    pub end: Position,
    pub horizontal_first: bool,
}

impl Corridor {
    /// Where the two legs meet
    pub fn corner(&self) -> Position {
        if self.horizontal_first {
            Position::new(self.end.x, self.start.y)
        } else {
            Position::new(self.start.x, self.end.y)
        }
    }

    /// Every coordinate on both legs, endpoints inclusive
    pub fn cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        if self.horizontal_first {
            horizontal_leg(&mut cells, self.start.x, self.end.x, self.start.y);
            vertical_leg(&mut cells, self.start.y, self.end.y, self.end.x);
        } else {
            vertical_leg(&mut cells, self.start.y, self.end.y, self.start.x);
            horizontal_leg(&mut cells, self.start.x, self.end.x, self.end.y);
        }
        cells
    }
}

fn horizontal_leg(cells: &mut Vec<Position>, x1: i32, x2: i32, y: i32) {
    let (start, end) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    cells.extend((start..=end).map(|x| Position::new(x, y)));
}

fn vertical_leg(cells: &mut Vec<Position>, y1: i32, y2: i32, x: i32) {
    let (start, end) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    cells.extend((start..=end).map(|y| Position::new(x, y)));
}

/// Result of the last BSP run
#[derive(Debug, Clone)]
pub struct BspLayout {
    pub tree: PartitionNode,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    pub split_attempts: usize,
}

/// BSP room-and-corridor strategy
pub struct BspRoomPlacement {
    settings: BspSettings,
    rng: Box<dyn RandomSource + Send>,
    layout: Option<BspLayout>,
}

impl BspRoomPlacement {
    pub fn new(settings: BspSettings, rng: Box<dyn RandomSource + Send>) -> Self {
        Self {
            settings,
            rng,
            layout: None,
        }
    }

    pub fn settings(&self) -> &BspSettings {
        &self.settings
    }

    /// Rooms, corridors and tree of the last completed run
    pub fn layout(&self) -> Option<&BspLayout> {
        self.layout.as_ref()
    }
}

impl ProceduralGenerator for BspRoomPlacement {
    fn name(&self) -> &'static str {
        "BSP room placement"
    }

    fn generate(&mut self, grid: &mut dyn GridSink, cancel: &CancelToken) -> Result<(), GenerationError> {
        self.layout = None;

        let mut root = PartitionNode::new(Rect::new(0, 0, grid.width(), grid.length()));
        let budget = self.settings.split_budget();
        info!(
            "BSP generation over {}x{} (max_rooms={}, depth budget={})",
            grid.width(),
            grid.length(),
            self.settings.max_rooms,
            budget
        );

        let mut carver = Carver {
            settings: &self.settings,
            rng: &mut *self.rng,
            grid: &mut *grid,
            cancel,
            rooms: Vec::new(),
            corridors: Vec::new(),
            split_attempts: 0,
        };
        carver.create_partition(&mut root, budget)?;
        let Carver { rooms, corridors, split_attempts, .. } = carver;

        if let Some(template) = &self.settings.ground_template {
            build_ground(grid, template, cancel)?;
        }

        info!(
            "BSP generation placed {} rooms and {} corridors ({} split attempts)",
            rooms.len(),
            corridors.len(),
            split_attempts
        );
        self.layout = Some(BspLayout {
            tree: root,
            rooms,
            corridors,
            split_attempts,
        });
        Ok(())
    }
}

/// Recursion state for a single run
struct Carver<'a> {
    settings: &'a BspSettings,
    rng: &'a mut dyn RandomSource,
    grid: &'a mut dyn GridSink,
    cancel: &'a CancelToken,
    rooms: Vec<Room>,
    corridors: Vec<Corridor>,
    split_attempts: usize,
}

impl Carver<'_> {
    /// Carve the subtree under `node` and return its connection point
    fn create_partition(&mut self, node: &mut PartitionNode, budget: u32) -> Result<Position, GenerationError> {
        if self.cancel.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }

        let rect = node.rect();
        if budget == 0 || !node.can_split() {
            return Ok(self.carve_room(rect));
        }

        self.split_attempts += 1;
        if !node.split(self.rng) {
            debug!("Split of {:?} failed, carving it as a leaf", rect);
            return Ok(self.carve_room(rect));
        }
        let Some((first, second)) = node.children_mut() else {
            return Ok(self.carve_room(rect));
        };

        let a = self.create_partition(first, budget - 1)?;
        let b = self.create_partition(second, budget - 1)?;
        self.carve_corridor(a, b);

        Ok(match self.settings.connection {
            ConnectionStrategy::Midpoint => a.midpoint(&b),
            ConnectionStrategy::RoomCenter => a,
        })
    }

    /// Carve an inset room in a leaf partition and return its center
    fn carve_room(&mut self, partition: Rect) -> Position {
        let interior_w = partition.width - 2;
        let interior_h = partition.height - 2;

        let rect = if interior_w < 1 || interior_h < 1 {
            debug!("Partition {:?} too small for a margin, filling it", partition);
            partition
        } else {
            let max_w = self.settings.room_max_size.0.min(interior_w).max(1);
            let max_h = self.settings.room_max_size.1.min(interior_h).max(1);
            let min_w = self.settings.room_min_size.0.clamp(1, max_w);
            let min_h = self.settings.room_min_size.1.clamp(1, max_h);

            let w = self.rng.range(min_w, max_w + 1);
            let h = self.rng.range(min_h, max_h + 1);
            let offset_x = self.rng.range(1, partition.width - w);
            let offset_y = self.rng.range(1, partition.height - h);

            Rect::new(partition.x + offset_x, partition.y + offset_y, w, h)
        };

        for cell in rect.cells() {
            place_tile_at(self.grid, cell.x, cell.y, TileType::Room);
        }
        debug!("Carved room {:?} in partition {:?}", rect, partition);

        let room = Room { rect, partition };
        self.rooms.push(room);
        room.center()
    }

    fn carve_corridor(&mut self, start: Position, end: Position) {
        let corridor = Corridor {
            start,
            end,
            horizontal_first: self.rng.chance(0.5),
        };
        for cell in corridor.cells() {
            place_tile_at(self.grid, cell.x, cell.y, TileType::Corridor);
        }
        debug!("Carved corridor {:?} -> {:?} via {:?}", start, end, corridor.corner());
        self.corridors.push(corridor);
    }
}
