//! HTTP route definitions

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{debug, error};

use crate::app::AppState;
use crate::game::map::{Building, Map, Office, Road};
use crate::game::{Direction, GameError, PlayerStateView, PlayerSummary, TickMode, Token};
use crate::http::middleware::require_token;
use crate::util::time::uptime_secs;
use crate::world::WorldError;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Token-protected game routes
    let player_routes = Router::new()
        .route(
            "/v1/game/players",
            get(players_handler).fallback(|| async { AppError::InvalidMethod("GET, HEAD") }),
        )
        .route(
            "/v1/game/state",
            get(state_handler).fallback(|| async { AppError::InvalidMethod("GET, HEAD") }),
        )
        .route(
            "/v1/game/player/action",
            post(action_handler).fallback(|| async { AppError::InvalidMethod("POST") }),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    let api_routes = Router::new()
        .route(
            "/v1/maps",
            get(list_maps_handler).fallback(|| async { AppError::InvalidMethod("GET, HEAD") }),
        )
        .route(
            "/v1/maps/:id",
            get(map_handler).fallback(|| async { AppError::InvalidMethod("GET, HEAD") }),
        )
        .route(
            "/v1/game/join",
            post(join_handler).fallback(|| async { AppError::InvalidMethod("POST") }),
        )
        .route(
            "/v1/game/tick",
            post(tick_handler).fallback(tick_method_fallback),
        )
        .merge(player_routes)
        .fallback(|| async { AppError::BadRequest("Bad request".to_string()) })
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ));

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(&state.config.www_root))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // CORS configuration - support multiple origins (comma-separated in CLIENT_ORIGIN)
    if let Some(origins) = &state.config.client_origin {
        let allowed_origins: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();

        router = router.layer(
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        );
    }

    router.with_state(state)
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    maps: usize,
    players: usize,
    tick_mode: &'static str,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        maps: state.maps.len(),
        players: state.world.player_count(),
        tick_mode: match state.tick_mode {
            TickMode::Manual => "manual",
            TickMode::Automatic { .. } => "automatic",
        },
    })
}

// ============================================================================
// Map endpoints
// ============================================================================

#[derive(Serialize)]
struct MapSummaryResponse {
    id: String,
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapResponse {
    id: String,
    name: String,
    dog_speed: f64,
    roads: Vec<RoadResponse>,
    buildings: Vec<BuildingResponse>,
    offices: Vec<OfficeResponse>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RoadResponse {
    Horizontal { x0: i32, y0: i32, x1: i32 },
    Vertical { x0: i32, y0: i32, y1: i32 },
}

#[derive(Serialize)]
struct BuildingResponse {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OfficeResponse {
    id: String,
    x: i32,
    y: i32,
    offset_x: i32,
    offset_y: i32,
}

impl From<&Road> for RoadResponse {
    fn from(road: &Road) -> Self {
        let (start, end) = (road.start(), road.end());
        if road.is_horizontal() {
            RoadResponse::Horizontal {
                x0: start.x,
                y0: start.y,
                x1: end.x,
            }
        } else {
            RoadResponse::Vertical {
                x0: start.x,
                y0: start.y,
                y1: end.y,
            }
        }
    }
}

impl From<&Building> for BuildingResponse {
    fn from(building: &Building) -> Self {
        let bounds = building.bounds();
        Self {
            x: bounds.position.x,
            y: bounds.position.y,
            w: bounds.size.width,
            h: bounds.size.height,
        }
    }
}

impl From<&Office> for OfficeResponse {
    fn from(office: &Office) -> Self {
        Self {
            id: office.id().to_string(),
            x: office.position().x,
            y: office.position().y,
            offset_x: office.offset().dx,
            offset_y: office.offset().dy,
        }
    }
}

impl From<&Map> for MapResponse {
    fn from(map: &Map) -> Self {
        Self {
            id: map.id().to_string(),
            name: map.name().to_string(),
            dog_speed: map.dog_speed(),
            roads: map.roads().iter().map(RoadResponse::from).collect(),
            buildings: map.buildings().iter().map(BuildingResponse::from).collect(),
            offices: map.offices().iter().map(OfficeResponse::from).collect(),
        }
    }
}

async fn list_maps_handler(State(state): State<AppState>) -> Json<Vec<MapSummaryResponse>> {
    Json(
        state
            .maps
            .maps()
            .iter()
            .map(|m| MapSummaryResponse {
                id: m.id().to_string(),
                name: m.name().to_string(),
            })
            .collect(),
    )
}

async fn map_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MapResponse>, AppError> {
    state
        .maps
        .find(&id)
        .map(|map| Json(MapResponse::from(map.as_ref())))
        .ok_or(AppError::MapNotFound)
}

// ============================================================================
// Game endpoints
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinRequest {
    user_name: String,
    map_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinResponse {
    auth_token: String,
    player_id: u64,
}

async fn join_handler(
    State(state): State<AppState>,
    body: Result<Json<JoinRequest>, JsonRejection>,
) -> Result<Json<JoinResponse>, AppError> {
    let Json(req) = body
        .map_err(|_| AppError::InvalidArgument("Join game request parse error".to_string()))?;

    let joined = state.world.join(req.map_id, req.user_name).await?;

    Ok(Json(JoinResponse {
        auth_token: joined.token.to_string(),
        player_id: joined.player_id.0,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TickRequest {
    time_delta: u64,
}

#[derive(Serialize)]
struct EmptyResponse {}

async fn tick_handler(
    State(state): State<AppState>,
    body: Result<Json<TickRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, AppError> {
    if !state.tick_mode.is_manual() {
        return Err(AppError::BadRequest("Invalid endpoint".to_string()));
    }

    let Json(req) = body.map_err(|_| {
        AppError::InvalidArgument("Failed to parse tick request JSON".to_string())
    })?;

    state
        .world
        .manual_tick(Duration::from_millis(req.time_delta))
        .await?;

    Ok(Json(EmptyResponse {}))
}

/// The endpoint itself is disabled in automatic mode, whatever the method
async fn tick_method_fallback(State(state): State<AppState>) -> AppError {
    if state.tick_mode.is_manual() {
        AppError::InvalidMethod("POST")
    } else {
        AppError::BadRequest("Invalid endpoint".to_string())
    }
}

#[derive(Serialize)]
struct PlayerNameResponse {
    name: String,
}

async fn players_handler(
    State(state): State<AppState>,
    Extension(token): Extension<Token>,
) -> Result<Json<BTreeMap<u64, PlayerNameResponse>>, AppError> {
    let players = state.world.players(token).await?;

    Ok(Json(
        players
            .into_iter()
            .map(|PlayerSummary { id, name }| (id.0, PlayerNameResponse { name }))
            .collect(),
    ))
}

#[derive(Serialize)]
struct DogStateResponse {
    pos: [f64; 2],
    speed: [f64; 2],
    dir: &'static str,
}

#[derive(Serialize)]
struct StateResponse {
    players: BTreeMap<u64, DogStateResponse>,
}

impl From<&PlayerStateView> for DogStateResponse {
    fn from(view: &PlayerStateView) -> Self {
        Self {
            pos: [view.position.x, view.position.y],
            speed: [view.velocity.x, view.velocity.y],
            dir: view.facing.as_str(),
        }
    }
}

async fn state_handler(
    State(state): State<AppState>,
    Extension(token): Extension<Token>,
) -> Result<Json<StateResponse>, AppError> {
    let views = state.world.state(token).await?;

    Ok(Json(StateResponse {
        players: views
            .iter()
            .map(|view| (view.id.0, DogStateResponse::from(view)))
            .collect(),
    }))
}

#[derive(Deserialize)]
struct ActionRequest {
    #[serde(rename = "move")]
    direction: String,
}

async fn action_handler(
    State(state): State<AppState>,
    Extension(token): Extension<Token>,
    body: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, AppError> {
    let Json(req) = body.map_err(|rejection| match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::InvalidArgument("Invalid content type".to_string())
        }
        _ => AppError::InvalidArgument("Failed to parse action".to_string()),
    })?;

    let direction: Direction = req
        .direction
        .parse()
        .map_err(|_| AppError::from(GameError::InvalidDirection))?;

    state.world.move_player(token, direction).await?;
    debug!(direction = %direction, "Player action applied");

    Ok(Json(EmptyResponse {}))
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authorization header is missing")]
    InvalidToken,

    #[error("Player token has not been found")]
    UnknownToken,

    #[error("Map not found")]
    MapNotFound,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Only {0} method is expected")]
    InvalidMethod(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::MapNotFound => AppError::MapNotFound,
            GameError::UnknownToken => AppError::UnknownToken,
            GameError::InvalidName => AppError::InvalidArgument("Invalid name".to_string()),
            GameError::InvalidDirection => {
                AppError::InvalidArgument("Failed to parse action".to_string())
            }
            GameError::ModeMismatch => AppError::BadRequest("Invalid endpoint".to_string()),
            GameError::Map(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<WorldError> for AppError {
    fn from(err: WorldError) -> Self {
        match err {
            WorldError::Game(e) => e.into(),
            WorldError::Closed => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalidToken"),
            AppError::UnknownToken => (StatusCode::UNAUTHORIZED, "unknownToken"),
            AppError::MapNotFound => (StatusCode::NOT_FOUND, "mapNotFound"),
            AppError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "invalidArgument"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "badRequest"),
            AppError::InvalidMethod(_) => (StatusCode::METHOD_NOT_ALLOWED, "invalidMethod"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        if let AppError::Internal(msg) = &self {
            error!(error = %msg, "Request failed");
        }

        let body = serde_json::json!({
            "code": code,
            "message": self.to_string(),
        });

        let mut response = (status, Json(body)).into_response();
        if let AppError::InvalidMethod(allow) = self {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(allow));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use std::path::PathBuf;
    use tower::ServiceExt;

    use crate::config::{Config, LogFormat};
    use crate::game::geometry::{Offset, Point, Rectangle, Size};
    use crate::game::map::{MapId, OfficeId};
    use crate::game::Game;
    use crate::world::WorldActor;

    fn test_config(www_root: PathBuf) -> Config {
        Config {
            server_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            map_config_path: PathBuf::from("unused.json"),
            www_root,
            tick_period_ms: 0,
            randomize_spawn_points: false,
            client_origin: None,
        }
    }

    fn app_with(tick_ms: u64, www_root: PathBuf) -> Router {
        let mut game = Game::seeded(11);
        let mut map = Map::new(MapId::new("map1"), "Map 1");
        map.add_road(Road::horizontal(Point::new(0, 0), 10));
        map.add_road(Road::vertical(Point::new(10, 0), 10));
        map.add_building(Building::new(Rectangle {
            position: Point::new(2, 2),
            size: Size {
                width: 5,
                height: 3,
            },
        }));
        map.add_office(Office::new(
            OfficeId::new("o1"),
            Point::new(10, 5),
            Offset { dx: 5, dy: 0 },
        ))
        .unwrap();
        game.add_map(map).unwrap();
        game.set_tick_rate(tick_ms).unwrap();

        let maps = game.catalog().clone();
        let tick_mode = game.tick_mode();
        let (actor, world) = WorldActor::new(game, false);
        tokio::spawn(actor.run());

        let mut config = test_config(www_root);
        config.tick_period_ms = tick_ms;
        build_router(AppState::new(config, maps, world, tick_mode))
    }

    fn app() -> Router {
        app_with(0, PathBuf::from("/nonexistent-www-root"))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn get_authed(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_action(token: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/game/player/action")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn join(app: &Router, name: &str) -> (u64, String) {
        let (status, body) = send(
            app,
            post_json("/api/v1/game/join", serde_json::json!({"userName": name, "mapId": "map1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        (
            body["playerId"].as_u64().unwrap(),
            body["authToken"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn test_list_and_describe_maps() {
        let app = app();
        let (status, body) = send(&app, get("/api/v1/maps")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([{"id": "map1", "name": "Map 1"}]));

        let (status, body) = send(&app, get("/api/v1/maps/map1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dogSpeed"], 1.0);
        assert_eq!(body["roads"][0], serde_json::json!({"x0": 0, "y0": 0, "x1": 10}));
        assert_eq!(body["roads"][1], serde_json::json!({"x0": 10, "y0": 0, "y1": 10}));
        assert_eq!(body["buildings"][0], serde_json::json!({"x": 2, "y": 2, "w": 5, "h": 3}));
        assert_eq!(
            body["offices"][0],
            serde_json::json!({"id": "o1", "x": 10, "y": 5, "offsetX": 5, "offsetY": 0})
        );

        let (status, body) = send(&app, get("/api/v1/maps/map404")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "mapNotFound");
    }

    #[tokio::test]
    async fn test_join_validation() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json("/api/v1/game/join", serde_json::json!({"userName": "", "mapId": "map1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalidArgument");

        let (status, body) = send(
            &app,
            post_json("/api/v1/game/join", serde_json::json!({"userName": "Rex", "mapId": "map9"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "mapNotFound");

        let (status, body) =
            send(&app, post_json("/api/v1/game/join", serde_json::json!({"mapId": "map1"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalidArgument");

        let response = app.clone().oneshot(get("/api/v1/game/join")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST");
    }

    #[tokio::test]
    async fn test_walk_scenario() {
        let app = app();
        let (id, token) = join(&app, "Alice").await;
        assert_eq!(id, 0);
        assert_eq!(token.len(), 32);

        let (status, _) = send(&app, post_action(&token, serde_json::json!({"move": "R"}))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            send(&app, post_json("/api/v1/game/tick", serde_json::json!({"timeDelta": 1000}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({}));

        let (status, body) = send(&app, get_authed("/api/v1/game/state", &token)).await;
        assert_eq!(status, StatusCode::OK);
        let dog = &body["players"]["0"];
        assert!((dog["pos"][0].as_f64().unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(dog["pos"][1].as_f64().unwrap(), 0.0);
        assert_eq!(dog["speed"], serde_json::json!([1.0, 0.0]));
        assert_eq!(dog["dir"], "R");

        let (_, second) = join(&app, "Bob").await;
        let (status, body) = send(&app, get_authed("/api/v1/game/players", &second)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"0": {"name": "Alice"}, "1": {"name": "Bob"}})
        );
    }

    #[tokio::test]
    async fn test_token_checks() {
        let app = app();
        let (status, body) = send(&app, get("/api/v1/game/players")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "invalidToken");

        let (status, body) = send(&app, get_authed("/api/v1/game/players", "short")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "invalidToken");

        let unknown = "0123456789abcdef0123456789abcdef";
        let (status, body) = send(&app, get_authed("/api/v1/game/state", unknown)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unknownToken");
    }

    #[tokio::test]
    async fn test_action_validation() {
        let app = app();
        let (_, token) = join(&app, "Alice").await;

        let (status, body) = send(&app, post_action(&token, serde_json::json!({"move": "X"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalidArgument");

        let (status, _) = send(&app, post_action(&token, serde_json::json!({"move": ""}))).await;
        assert_eq!(status, StatusCode::OK);

        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/game/player/action")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(r#"{"move": "U"}"#))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid content type");
    }

    #[tokio::test]
    async fn test_unknown_token_reported_before_body() {
        let app = app();
        let unknown = "0123456789abcdef0123456789abcdef";

        let (status, body) = send(&app, post_action(unknown, serde_json::json!({"move": "X"}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unknownToken");

        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/game/player/action")
            .header(header::AUTHORIZATION, format!("Bearer {unknown}"))
            .body(Body::from("not json"))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unknownToken");
    }

    #[tokio::test]
    async fn test_manual_tick_rejected_in_automatic_mode() {
        let automatic = app_with(100, PathBuf::from("/nonexistent-www-root"));
        let (status, body) =
            send(&automatic, post_json("/api/v1/game/tick", serde_json::json!({"timeDelta": 10}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "badRequest");

        let (status, body) = send(&automatic, get("/api/v1/game/tick")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "badRequest");

        let manual = app();
        let response = manual.oneshot(get("/api/v1/game/tick")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST");
    }

    #[tokio::test]
    async fn test_unknown_api_path_and_health() {
        let app = app();
        let (status, body) = send(&app, get("/api/v2/whatever")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "badRequest");

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["maps"], 1);
        assert_eq!(body["tick_mode"], "manual");
    }

    #[tokio::test]
    async fn test_static_files() {
        let root = std::env::temp_dir().join(format!("road-dog-www-{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("index.html"), "<h1>dogs</h1>").unwrap();

        let app = app_with(0, root.clone());
        let response = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>dogs</h1>");

        let response = app.clone().oneshot(get("/missing.png")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        std::fs::remove_dir_all(root).ok();
    }
}
