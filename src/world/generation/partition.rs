//! Binary space partition tree
//!
//! Each node owns an axis-aligned rectangle and, once split, exactly two
//! children whose rectangles tile it.

use log::debug;
use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::world::Position;

/// A partition may not be cut closer than this to either of its edges
pub const MIN_PARTITION_SIZE: i32 = 6;

/// Aspect ratio at which the split axis is forced rather than drawn
const FORCED_AXIS_RATIO: f32 = 1.25;

/// An axis-aligned integer rectangle. `x_max`/`y_max` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn x_max(&self) -> i32 {
        self.x + self.width
    }

    pub fn y_max(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> i32 {
        self.width.max(0) * self.height.max(0)
    }

    /// Center, rounded half away from zero and kept inside the rectangle
    pub fn center(&self) -> Position {
        let cx = (self.x as f32 + self.width as f32 / 2.0).round() as i32;
        let cy = (self.y as f32 + self.height as f32 / 2.0).round() as i32;
        Position::new(
            cx.min(self.x_max() - 1).max(self.x),
            cy.min(self.y_max() - 1).max(self.y),
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x_max() && y >= self.y && y < self.y_max()
    }

    /// Is `other` inside `self` with at least `margin` cells to spare on every side?
    pub fn contains_with_margin(&self, other: &Rect, margin: i32) -> bool {
        other.x >= self.x + margin
            && other.y >= self.y + margin
            && other.x_max() <= self.x_max() - margin
            && other.y_max() <= self.y_max() - margin
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x_max()
            && other.x < self.x_max()
            && self.y < other.y_max()
            && other.y < self.y_max()
    }

    /// Every integer coordinate inside the rectangle, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y..self.y_max()).flat_map(move |y| (self.x..self.x_max()).map(move |x| Position::new(x, y)))
    }
}

/// Which dimension a split divides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// Vertical cut, dividing the width
    Vertical,
    /// Horizontal cut, dividing the height
    Horizontal,
}

/// A node of the partition tree
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionNode {
    rect: Rect,
    children: Option<Box<(PartitionNode, PartitionNode)>>,
}

impl PartitionNode {
    pub fn new(rect: Rect) -> Self {
        Self { rect, children: None }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn children(&self) -> Option<(&PartitionNode, &PartitionNode)> {
        self.children.as_deref().map(|(a, b)| (a, b))
    }

    pub fn children_mut(&mut self) -> Option<(&mut PartitionNode, &mut PartitionNode)> {
        self.children.as_deref_mut().map(|(a, b)| (a, b))
    }

    /// Large enough along at least one dimension to attempt a split
    pub fn can_split(&self) -> bool {
        self.rect.width > MIN_PARTITION_SIZE * 2 || self.rect.height > MIN_PARTITION_SIZE * 2
    }

    /// Try to divide this leaf in two. Returns whether the node has children afterwards.
    ///
    /// Calling again after a successful split is a no-op that returns `true`.
    /// A failed split leaves the node a leaf.
    pub fn split(&mut self, rng: &mut dyn RandomSource) -> bool {
        if self.children.is_some() {
            return true;
        }
        if !self.can_split() {
            return false;
        }

        let axis = self.choose_axis(rng);
        let r = self.rect;
        let (start, end) = match axis {
            SplitAxis::Vertical => (r.x, r.x_max()),
            SplitAxis::Horizontal => (r.y, r.y_max()),
        };
        let min_cut = start + MIN_PARTITION_SIZE;
        let max_cut = end - MIN_PARTITION_SIZE;
        if max_cut <= min_cut {
            debug!("Split of {:?} along {:?} has no room for a cut", r, axis);
            return false;
        }

        let cut = rng.range(min_cut, max_cut);
        let (first, second) = match axis {
            SplitAxis::Vertical => (
                Rect::new(r.x, r.y, cut - r.x, r.height),
                Rect::new(cut, r.y, r.x_max() - cut, r.height),
            ),
            SplitAxis::Horizontal => (
                Rect::new(r.x, r.y, r.width, cut - r.y),
                Rect::new(r.x, cut, r.width, r.y_max() - cut),
            ),
        };
        debug!("Split {:?} {:?} at {} -> {:?} | {:?}", r, axis, cut, first, second);

        self.children = Some(Box::new((PartitionNode::new(first), PartitionNode::new(second))));
        true
    }

    fn choose_axis(&self, rng: &mut dyn RandomSource) -> SplitAxis {
        let w = self.rect.width as f32;
        let h = self.rect.height as f32;
        if w / h >= FORCED_AXIS_RATIO {
            return SplitAxis::Vertical;
        }
        if h / w >= FORCED_AXIS_RATIO {
            return SplitAxis::Horizontal;
        }
        // Only an unforced axis consumes a draw
        let horizontal = rng.chance(0.5);
        if horizontal {
            SplitAxis::Horizontal
        } else {
            SplitAxis::Vertical
        }
    }

    /// Leaf rectangles, depth first, first child before second
    pub fn leaves(&self) -> Vec<Rect> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<Rect>) {
        match self.children() {
            Some((a, b)) => {
                a.collect_leaves(out);
                b.collect_leaves(out);
            }
            None => out.push(self.rect),
        }
    }

    /// Number of edges from this node to its deepest leaf
    pub fn depth(&self) -> usize {
        self.children()
            .map_or(0, |(a, b)| 1 + a.depth().max(b.depth()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::random::{ScriptedRandom, SeededRandom};

    fn assert_children_tile_parent(node: &PartitionNode) {
        let (a, b) = node.children().expect("node should be split");
        let (ra, rb, parent) = (a.rect(), b.rect(), node.rect());

        assert!(!ra.intersects(&rb), "children overlap: {:?} {:?}", ra, rb);
        assert_eq!(ra.area() + rb.area(), parent.area());
        for cell in parent.cells() {
            assert!(ra.contains(cell.x, cell.y) ^ rb.contains(cell.x, cell.y));
        }
    }

    #[test]
    fn test_split_children_tile_parent() {
        for seed in 0..200 {
            let mut rng = SeededRandom::new(seed);
            let mut node = PartitionNode::new(Rect::new(3, -2, 20 + (seed as i32 % 30), 14 + (seed as i32 % 17)));
            if node.split(&mut rng) {
                assert_children_tile_parent(&node);
            }
        }
    }

    #[test]
    fn test_wide_node_cuts_width() {
        let mut rng = ScriptedRandom::new(&[10], &[]);
        let mut node = PartitionNode::new(Rect::new(0, 0, 30, 16));
        assert!(node.split(&mut rng));

        let (a, b) = node.children().unwrap();
        assert_eq!(a.rect(), Rect::new(0, 0, 10, 16));
        assert_eq!(b.rect(), Rect::new(10, 0, 20, 16));
    }

    #[test]
    fn test_tall_node_cuts_height() {
        let mut rng = ScriptedRandom::new(&[9], &[]);
        let mut node = PartitionNode::new(Rect::new(0, 0, 16, 30));
        assert!(node.split(&mut rng));

        let (a, b) = node.children().unwrap();
        assert_eq!(a.rect(), Rect::new(0, 0, 16, 9));
        assert_eq!(b.rect(), Rect::new(0, 9, 16, 21));
    }

    #[test]
    fn test_square_node_draws_axis() {
        let mut rng = ScriptedRandom::new(&[8], &[true]);
        let mut node = PartitionNode::new(Rect::new(0, 0, 16, 16));
        assert!(node.split(&mut rng));
        assert_eq!(node.children().unwrap().0.rect().height, 8);

        let mut rng = ScriptedRandom::new(&[8], &[false]);
        let mut node = PartitionNode::new(Rect::new(0, 0, 16, 16));
        assert!(node.split(&mut rng));
        assert_eq!(node.children().unwrap().0.rect().width, 8);
    }

    #[test]
    fn test_cut_respects_min_partition_size() {
        for seed in 0..100 {
            let mut rng = SeededRandom::new(seed);
            let mut node = PartitionNode::new(Rect::new(0, 0, 40, 13));
            assert!(node.split(&mut rng));
            let (a, b) = node.children().unwrap();
            assert!(a.rect().width >= MIN_PARTITION_SIZE);
            assert!(b.rect().width >= MIN_PARTITION_SIZE);
        }
    }

    #[test]
    fn test_small_node_never_splits() {
        let limit = MIN_PARTITION_SIZE * 2;
        for seed in 0..50 {
            let mut rng = SeededRandom::new(seed);
            for w in 1..=limit {
                for h in 1..=limit {
                    let mut node = PartitionNode::new(Rect::new(0, 0, w, h));
                    assert!(!node.can_split());
                    assert!(!node.split(&mut rng));
                    assert!(node.is_leaf());
                }
            }
        }
    }

    #[test]
    fn test_can_split_is_either_dimension() {
        let limit = MIN_PARTITION_SIZE * 2;
        assert!(PartitionNode::new(Rect::new(0, 0, limit + 1, 1)).can_split());
        assert!(PartitionNode::new(Rect::new(0, 0, 1, limit + 1)).can_split());
        assert!(!PartitionNode::new(Rect::new(0, 0, limit, limit)).can_split());
    }

    #[test]
    fn test_split_fails_when_drawn_axis_too_short() {
        // Width 13 passes can_split, but the drawn axis divides the 11-tall
        // height, which has no valid cut position.
        let mut rng = ScriptedRandom::new(&[], &[true]);
        let mut node = PartitionNode::new(Rect::new(0, 0, 13, 11));
        assert!(node.can_split());
        assert!(!node.split(&mut rng));
        assert!(node.is_leaf());
        assert!(node.children().is_none());
    }

    #[test]
    fn test_forced_axis_skips_draw() {
        let mut rng = ScriptedRandom::new(&[10], &[true]);
        let mut node = PartitionNode::new(Rect::new(0, 0, 30, 16));
        assert!(node.split(&mut rng));
        assert_eq!(node.children().unwrap().0.rect().height, 16);
        assert_eq!(rng.chances.len(), 1);
    }

    #[test]
    fn test_center_stays_inside() {
        assert_eq!(Rect::new(0, 0, 5, 5).center(), Position::new(3, 3));
        assert_eq!(Rect::new(4, 2, 4, 6).center(), Position::new(6, 5));
        assert_eq!(Rect::new(1, 1, 1, 1).center(), Position::new(1, 1));
        assert_eq!(Rect::new(-3, 0, 1, 2).center(), Position::new(-3, 1));
        for w in 1..6 {
            for h in 1..6 {
                let r = Rect::new(2, 7, w, h);
                let c = r.center();
                assert!(r.contains(c.x, c.y), "{:?} -> {:?}", r, c);
            }
        }
    }

    #[test]
    fn test_split_is_idempotent() {
        let mut rng = SeededRandom::new(11);
        let mut node = PartitionNode::new(Rect::new(0, 0, 32, 32));
        assert!(node.split(&mut rng));
        let before = node.clone();

        assert!(node.split(&mut rng));
        assert_eq!(node, before);
    }

    #[test]
    fn test_failed_split_stays_leaf() {
        let mut rng = SeededRandom::new(5);
        let mut node = PartitionNode::new(Rect::new(0, 0, 12, 12));
        assert!(!node.split(&mut rng));
        assert!(!node.split(&mut rng));
        assert!(node.is_leaf());
        assert_eq!(node.leaves(), vec![Rect::new(0, 0, 12, 12)]);
    }
}
