//! Geometry primitives shared by the road network and the avatars

use serde::Serialize;

/// Integer coordinate type used by the map description
pub type Coord = i32;

/// Integer point on the road graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}

/// Continuous world coordinate an avatar occupies
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DogPoint {
    pub x: f64,
    pub y: f64,
}

impl DogPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Point> for DogPoint {
    fn from(p: Point) -> Self {
        Self {
            x: f64::from(p.x),
            y: f64::from(p.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: Coord,
    pub height: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub position: Point,
    pub size: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub dx: Coord,
    pub dy: Coord,
}

/// Euclidean distance between two world points
pub fn distance(a: DogPoint, b: DogPoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}
