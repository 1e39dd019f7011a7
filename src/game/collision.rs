//! Road-network collision model
//!
//! Every road is widened into an axis-aligned box padded by [`ROAD_HALF_WIDTH`]
//! on all sides. An avatar may stand anywhere inside the union of these boxes.
//! Movement is checked against the boxes touching the start and end points,
//! which keeps queries proportional to the handful of roads meeting at a point.

use super::geometry::{distance, DogPoint};
use super::map::Road;

/// Padding added around a road's centreline
pub const ROAD_HALF_WIDTH: f64 = 0.4;

/// Padded bounding box around one road
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CollisionBox {
    /// Build the padded box for a road, normalising the corner order
    pub fn around(road: &Road) -> Self {
        let start = road.start();
        let end = road.end();
        let (x1, x2) = (start.x.min(end.x), start.x.max(end.x));
        let (y1, y2) = (start.y.min(end.y), start.y.max(end.y));

        Self {
            x1: f64::from(x1) - ROAD_HALF_WIDTH,
            y1: f64::from(y1) - ROAD_HALF_WIDTH,
            x2: f64::from(x2) + ROAD_HALF_WIDTH,
            y2: f64::from(y2) + ROAD_HALF_WIDTH,
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, p: DogPoint) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }

    /// Clip a straight move against this box's edge in the direction of travel.
    /// Returns `end` unchanged when the move stays inside along its axis.
    pub fn clip(&self, start: DogPoint, end: DogPoint) -> DogPoint {
        if start.y == end.y {
            if end.x <= self.x1 {
                return DogPoint::new(self.x1, end.y);
            }
            if end.x >= self.x2 {
                return DogPoint::new(self.x2, end.y);
            }
        }

        if start.x == end.x {
            if end.y <= self.y1 {
                return DogPoint::new(end.x, self.y1);
            }
            if end.y >= self.y2 {
                return DogPoint::new(end.x, self.y2);
            }
        }

        end
    }
}

/// Ordered list of padded road boxes for one map
#[derive(Debug, Clone, Default)]
pub struct CollisionGrid {
    boxes: Vec<CollisionBox>,
}

impl CollisionGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the padded box of a road. Insertion order is kept for tie-breaking.
    pub fn add_road(&mut self, road: &Road) {
        self.boxes.push(CollisionBox::around(road));
    }

    #[cfg(test)]
    pub fn boxes(&self) -> &[CollisionBox] {
        &self.boxes
    }

    /// Every box containing the point, in insertion order
    pub fn boxes_containing(&self, p: DogPoint) -> impl Iterator<Item = &CollisionBox> + '_ {
        self.boxes.iter().filter(move |b| b.contains(p))
    }

    /// Whether a straight move from `start` to `end` stays on the network.
    ///
    /// The end must lie in some box, and either share a box with the start or
    /// the start must sit on an intersection (covered by several boxes).
    pub fn is_valid_move(&self, start: DogPoint, end: DogPoint) -> bool {
        if start == end {
            return true;
        }

        let mut end_boxes = self.boxes_containing(end).peekable();
        if end_boxes.peek().is_none() {
            return false;
        }

        if end_boxes.any(|b| b.contains(start)) {
            return true;
        }

        self.boxes_containing(start).nth(1).is_some()
    }

    /// Where a blocked move from `start` towards `end` comes to rest.
    ///
    /// Each box containing `start` proposes a clipped point; the one closest to
    /// `end` wins, with earlier boxes winning ties. A start outside every box
    /// stays where it is.
    pub fn resolve_blocked_move(&self, start: DogPoint, end: DogPoint) -> DogPoint {
        self.boxes_containing(start)
            .map(|b| b.clip(start, end))
            .min_by(|a, b| distance(*a, end).total_cmp(&distance(*b, end)))
            .unwrap_or(start)
    }
}
