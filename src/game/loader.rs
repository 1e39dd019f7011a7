//! JSON map file loading

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use super::geometry::{Coord, Offset, Point, Rectangle, Size};
use super::map::{Building, Map, MapError, MapId, Office, OfficeId, Road, DEFAULT_DOG_SPEED};
use super::registry::{Game, GameError};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read map file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid map file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Map {map}: duplicate office id {office}")]
    DuplicateOffice { map: MapId, office: OfficeId },

    #[error("Map {0} has no roads")]
    NoRoads(MapId),

    #[error(transparent)]
    Game(#[from] GameError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameFile {
    default_dog_speed: Option<f64>,
    maps: Vec<MapFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapFile {
    id: String,
    name: String,
    dog_speed: Option<f64>,
    roads: Vec<RoadFile>,
    #[serde(default)]
    buildings: Vec<BuildingFile>,
    #[serde(default)]
    offices: Vec<OfficeFile>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoadFile {
    Horizontal { x0: Coord, y0: Coord, x1: Coord },
    Vertical { x0: Coord, y0: Coord, y1: Coord },
}

#[derive(Debug, Deserialize)]
struct BuildingFile {
    x: Coord,
    y: Coord,
    w: Coord,
    h: Coord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfficeFile {
    id: String,
    x: Coord,
    y: Coord,
    offset_x: Coord,
    offset_y: Coord,
}

impl From<RoadFile> for Road {
    fn from(road: RoadFile) -> Self {
        match road {
            RoadFile::Horizontal { x0, y0, x1 } => Road::horizontal(Point::new(x0, y0), x1),
            RoadFile::Vertical { x0, y0, y1 } => Road::vertical(Point::new(x0, y0), y1),
        }
    }
}

fn build_map(file: MapFile, default_speed: f64) -> Result<Map, LoadError> {
    let id = MapId::new(file.id);
    if file.roads.is_empty() {
        return Err(LoadError::NoRoads(id));
    }

    let mut map = Map::new(id, file.name);
    map.set_dog_speed(file.dog_speed.unwrap_or(default_speed));

    for road in file.roads {
        map.add_road(road.into());
    }

    for b in file.buildings {
        map.add_building(Building::new(Rectangle {
            position: Point::new(b.x, b.y),
            size: Size {
                width: b.w,
                height: b.h,
            },
        }));
    }

    for o in file.offices {
        let office = Office::new(
            OfficeId::new(o.id),
            Point::new(o.x, o.y),
            Offset {
                dx: o.offset_x,
                dy: o.offset_y,
            },
        );
        let map_id = map.id().clone();
        map.add_office(office).map_err(|err| match err {
            MapError::DuplicateOffice(office) => LoadError::DuplicateOffice { map: map_id, office },
            other => LoadError::Game(other.into()),
        })?;
    }

    Ok(map)
}

/// Parse a map document and register every map with a fresh registry.
/// Any bad map fails the whole load.
pub fn load_game_from_str(json: &str, mut game: Game) -> Result<Game, LoadError> {
    let file: GameFile = serde_json::from_str(json)?;
    let default_speed = file.default_dog_speed.unwrap_or(DEFAULT_DOG_SPEED);

    for map_file in file.maps {
        let map = build_map(map_file, default_speed)?;
        info!(
            map_id = %map.id(),
            roads = map.roads().len(),
            buildings = map.buildings().len(),
            offices = map.offices().len(),
            dog_speed = map.dog_speed(),
            "Map loaded"
        );
        game.add_map(map)?;
    }

    Ok(game)
}

pub fn load_game(path: &Path, game: Game) -> Result<Game, LoadError> {
    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_game_from_str(&json, game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::geometry::DogPoint;

    const SAMPLE: &str = r#"{
        "defaultDogSpeed": 3.0,
        "maps": [
            {
                "id": "map1",
                "name": "Map 1",
                "roads": [
                    { "x0": 0, "y0": 0, "x1": 40 },
                    { "x0": 40, "y0": 0, "y1": 30 }
                ],
                "buildings": [ { "x": 5, "y": 5, "w": 30, "h": 20 } ],
                "offices": [ { "id": "o0", "x": 40, "y": 30, "offsetX": 5, "offsetY": 0 } ]
            },
            {
                "id": "town",
                "name": "Town",
                "dogSpeed": 4.5,
                "roads": [ { "x0": 10, "y0": 10, "y1": 0 } ],
                "buildings": [],
                "offices": []
            }
        ]
    }"#;

    #[test]
    fn test_load_sample() {
        let game = load_game_from_str(SAMPLE, Game::seeded(0)).unwrap();
        assert_eq!(game.catalog().len(), 2);

        let map1 = game.find_map("map1").unwrap();
        assert_eq!(map1.name(), "Map 1");
        assert_eq!(map1.dog_speed(), 3.0);
        assert_eq!(map1.roads().len(), 2);
        assert!(map1.roads()[0].is_horizontal());
        assert!(map1.roads()[1].is_vertical());
        assert_eq!(map1.roads()[1].end(), Point::new(40, 30));
        assert_eq!(map1.buildings()[0].bounds().size.width, 30);
        assert_eq!(map1.offices()[0].offset(), Offset { dx: 5, dy: 0 });
        assert_eq!(map1.default_spawn_point(), DogPoint::new(0.0, 0.0));

        let town = game.find_map("town").unwrap();
        assert_eq!(town.dog_speed(), 4.5);
        assert_eq!(town.default_spawn_point(), DogPoint::new(10.0, 10.0));
    }

    #[test]
    fn test_speed_falls_back_to_builtin_default() {
        let json = r#"{"maps":[{"id":"m","name":"M","roads":[{"x0":0,"y0":0,"x1":1}]}]}"#;
        let game = load_game_from_str(json, Game::seeded(0)).unwrap();
        assert_eq!(game.find_map("m").unwrap().dog_speed(), DEFAULT_DOG_SPEED);
    }

    #[test]
    fn test_duplicate_office_fails_load() {
        let json = r#"{"maps":[{"id":"m","name":"M",
            "roads":[{"x0":0,"y0":0,"x1":10}],
            "offices":[
                {"id":"o1","x":1,"y":0,"offsetX":0,"offsetY":0},
                {"id":"o1","x":2,"y":0,"offsetX":0,"offsetY":0}
            ]}]}"#;
        let err = load_game_from_str(json, Game::seeded(0)).unwrap_err();
        assert!(matches!(
            err,
            LoadError::DuplicateOffice { ref map, ref office }
                if map.as_str() == "m" && office.as_str() == "o1"
        ));
    }

    #[test]
    fn test_roadless_map_fails_load() {
        let json = r#"{"maps":[{"id":"empty","name":"Empty","roads":[]}]}"#;
        let err = load_game_from_str(json, Game::seeded(0)).unwrap_err();
        assert!(matches!(err, LoadError::NoRoads(ref id) if id.as_str() == "empty"));
    }

    #[test]
    fn test_duplicate_map_fails_load() {
        let json = r#"{"maps":[
            {"id":"m","name":"A","roads":[{"x0":0,"y0":0,"x1":1}]},
            {"id":"m","name":"B","roads":[{"x0":0,"y0":0,"x1":1}]}
        ]}"#;
        let err = load_game_from_str(json, Game::seeded(0)).unwrap_err();
        assert!(matches!(err, LoadError::Game(GameError::Map(MapError::DuplicateMap(_)))));
    }

    #[test]
    fn test_malformed_json() {
        let err = load_game_from_str("{\"maps\": [", Game::seeded(0)).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }
}
