//! Static road network: roads, buildings, offices and the derived collision grid

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::collision::CollisionGrid;
use super::geometry::{Coord, DogPoint, Offset, Point, Rectangle};

/// Map speed used when neither the map nor the file sets one
pub const DEFAULT_DOG_SPEED: f64 = 1.0;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(MapId);
string_id!(OfficeId);

/// A straight road, either horizontal or vertical
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Road {
    start: Point,
    end: Point,
}

impl Road {
    pub fn horizontal(start: Point, end_x: Coord) -> Self {
        Self {
            start,
            end: Point::new(end_x, start.y),
        }
    }

    pub fn vertical(start: Point, end_y: Coord) -> Self {
        Self {
            start,
            end: Point::new(start.x, end_y),
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    #[cfg(test)]
    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    /// Road length in whole units. Exact for any pair of `Coord` endpoints.
    pub fn length(&self) -> u64 {
        u64::from(self.start.x.abs_diff(self.end.x)) + u64::from(self.start.y.abs_diff(self.end.y))
    }

    /// Random whole-unit point on the road.
    ///
    /// The offset is drawn from `[0, length - 1)` measured from the lower end,
    /// so the last unit before the upper end is never chosen. Roads shorter than
    /// two units always yield their lower end.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> DogPoint {
        let span = self.length().saturating_sub(1);
        let offset = if span > 0 { rng.gen_range(0..span) } else { 0 };

        // low + offset stays below the upper end, so the sum fits in a Coord
        let along = |low: Coord| f64::from(low) + offset as f64;
        if self.is_horizontal() {
            let low = self.start.x.min(self.end.x);
            DogPoint::new(along(low), f64::from(self.start.y))
        } else {
            let low = self.start.y.min(self.end.y);
            DogPoint::new(f64::from(self.start.x), along(low))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Building {
    bounds: Rectangle,
}

impl Building {
    pub fn new(bounds: Rectangle) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &Rectangle {
        &self.bounds
    }
}

/// Delivery office placed next to a road
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Office {
    id: OfficeId,
    position: Point,
    offset: Offset,
}

impl Office {
    pub fn new(id: OfficeId, position: Point, offset: Offset) -> Self {
        Self {
            id,
            position,
            offset,
        }
    }

    pub fn id(&self) -> &OfficeId {
        &self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("Duplicate office id: {0}")]
    DuplicateOffice(OfficeId),

    #[error("Duplicate map id: {0}")]
    DuplicateMap(MapId),
}

/// A named road network. Built once while loading, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Map {
    id: MapId,
    name: String,
    roads: Vec<Road>,
    buildings: Vec<Building>,
    offices: Vec<Office>,
    office_index: HashMap<OfficeId, usize>,
    grid: CollisionGrid,
    dog_speed: f64,
}

impl Map {
    pub fn new(id: MapId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            roads: Vec::new(),
            buildings: Vec::new(),
            offices: Vec::new(),
            office_index: HashMap::new(),
            grid: CollisionGrid::new(),
            dog_speed: DEFAULT_DOG_SPEED,
        }
    }

    pub fn id(&self) -> &MapId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn offices(&self) -> &[Office] {
        &self.offices
    }

    pub fn grid(&self) -> &CollisionGrid {
        &self.grid
    }

    pub fn dog_speed(&self) -> f64 {
        self.dog_speed
    }

    pub fn set_dog_speed(&mut self, speed: f64) {
        self.dog_speed = speed;
    }

    pub fn add_road(&mut self, road: Road) {
        self.grid.add_road(&road);
        self.roads.push(road);
    }

    pub fn add_building(&mut self, building: Building) {
        self.buildings.push(building);
    }

    /// Add an office. A duplicate id is rejected and leaves the map unchanged.
    pub fn add_office(&mut self, office: Office) -> Result<(), MapError> {
        if self.office_index.contains_key(office.id()) {
            return Err(MapError::DuplicateOffice(office.id().clone()));
        }

        self.office_index.insert(office.id().clone(), self.offices.len());
        self.offices.push(office);
        Ok(())
    }

    #[cfg(test)]
    pub fn find_office(&self, id: &str) -> Option<&Office> {
        self.office_index.get(id).map(|&i| &self.offices[i])
    }

    /// Start of the first road ever added, or the origin for a roadless map
    pub fn default_spawn_point(&self) -> DogPoint {
        self.roads
            .first()
            .map(|road| DogPoint::from(road.start()))
            .unwrap_or_default()
    }

    /// Random point on a uniformly chosen road
    pub fn random_spawn_point<R: Rng + ?Sized>(&self, rng: &mut R) -> DogPoint {
        if self.roads.is_empty() {
            return DogPoint::default();
        }
        let road = &self.roads[rng.gen_range(0..self.roads.len())];
        road.random_point(rng)
    }
}

/// Ordered, id-indexed collection of loaded maps.
///
/// Cloning is cheap; maps are shared behind `Arc` and never mutated once
/// registered, so a clone can be handed to readers outside the world executor.
#[derive(Debug, Clone, Default)]
pub struct MapCatalog {
    maps: Vec<Arc<Map>>,
    index: HashMap<MapId, usize>,
}

impl MapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, map: Map) -> Result<(), MapError> {
        if self.index.contains_key(map.id()) {
            return Err(MapError::DuplicateMap(map.id().clone()));
        }

        self.index.insert(map.id().clone(), self.maps.len());
        self.maps.push(Arc::new(map));
        Ok(())
    }

    pub fn find(&self, id: &str) -> Option<&Arc<Map>> {
        self.index.get(id).map(|&i| &self.maps[i])
    }

    pub fn maps(&self) -> &[Arc<Map>] {
        &self.maps
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn office(id: &str, x: Coord) -> Office {
        Office::new(OfficeId::new(id), Point::new(x, 0), Offset { dx: 1, dy: -1 })
    }

    #[test]
    fn test_duplicate_office_is_rejected() {
        let mut map = Map::new(MapId::new("map1"), "Map 1");
        map.add_office(office("o1", 1)).unwrap();

        let err = map.add_office(office("o1", 7)).unwrap_err();
        assert_eq!(err, MapError::DuplicateOffice(OfficeId::new("o1")));

        let matching: Vec<_> = map.offices().iter().filter(|o| o.id().as_str() == "o1").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].position(), Point::new(1, 0));

        map.add_office(office("o2", 3)).unwrap();
        assert_eq!(map.offices().len(), 2);
        assert_eq!(map.find_office("o2").map(|o| o.position()), Some(Point::new(3, 0)));
    }

    #[test]
    fn test_default_spawn_is_first_road_start() {
        let mut map = Map::new(MapId::new("map1"), "Map 1");
        map.add_road(Road::vertical(Point::new(4, 9), 0));
        let first = map.default_spawn_point();

        map.add_road(Road::horizontal(Point::new(-3, -3), 20));
        map.add_road(Road::vertical(Point::new(0, 0), 5));

        assert_eq!(first, DogPoint::new(4.0, 9.0));
        assert_eq!(map.default_spawn_point(), first);
    }

    #[test]
    fn test_random_spawn_stays_on_roads() {
        let mut map = Map::new(MapId::new("map1"), "Map 1");
        map.add_road(Road::horizontal(Point::new(10, 0), 0));
        map.add_road(Road::vertical(Point::new(3, 2), 8));

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let p = map.random_spawn_point(&mut rng);
            let on_horizontal = p.y == 0.0 && (0.0..9.0).contains(&p.x);
            let on_vertical = p.x == 3.0 && (2.0..7.0).contains(&p.y);
            assert!(on_horizontal || on_vertical, "unexpected spawn {p:?}");
        }
    }

    #[test]
    fn test_random_point_on_short_road() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let road = Road::horizontal(Point::new(5, 5), 6);
        assert_eq!(road.random_point(&mut rng), DogPoint::new(5.0, 5.0));
    }

    #[test]
    fn test_random_point_on_road_spanning_coord_range() {
        let road = Road::horizontal(Point::new(Coord::MAX, -3), Coord::MIN);
        assert_eq!(road.length(), u64::from(u32::MAX));

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..50 {
            let p = road.random_point(&mut rng);
            assert_eq!(p.y, -3.0);
            assert!(p.x >= f64::from(Coord::MIN) && p.x < f64::from(Coord::MAX));
        }
    }

    #[test]
    fn test_catalog_rejects_duplicate_map() {
        let mut catalog = MapCatalog::new();
        catalog.add(Map::new(MapId::new("map1"), "First")).unwrap();
        let err = catalog.add(Map::new(MapId::new("map1"), "Second")).unwrap_err();

        assert_eq!(err, MapError::DuplicateMap(MapId::new("map1")));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("map1").map(|m| m.name()), Some("First"));
        assert!(catalog.find("nope").is_none());
    }
}
