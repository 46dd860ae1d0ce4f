use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::congestion::{CongestionLevel, CongestionSpot};
use crate::distance::Coordinate;
use crate::engine::{PlannedRoute, RoutingEngine};
use crate::error::RoutingError;
use crate::graph::{Location, RoadNetwork};

// Shared state, read-only after startup
pub struct AppState {
    pub engine: RoutingEngine,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/locations", get(list_locations))
        .route("/locations/nearest", get(nearest_location))
        .route("/congestion", get(list_congestion))
        .route("/routes", post(compute_routes))
        .layer(cors)
        .with_state(state)
}

// --- Errors ---

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl From<RoutingError> for ApiError {
    fn from(error: RoutingError) -> Self {
        match error {
            RoutingError::UnknownLocation(_) => ApiError::BadRequest(error.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

// --- API DTOs ---

#[derive(Debug, Deserialize)]
pub struct RoutesRequest {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub shortest: RouteBody,
    pub rerouted: RouteBody,
    pub congestion_spots: Vec<SpotBody>,
}

#[derive(Debug, Serialize)]
pub struct RouteBody {
    pub stops: Vec<String>,
    pub reachable: bool,
    /// Absent for unreachable routes.
    pub cost: Option<f64>,
    pub distance_km: f64,
    pub length_km: f64,
    pub visited_order: Vec<String>,
    pub geometry: GeoJsonLineString,
}

#[derive(Debug, Serialize)]
pub struct GeoJsonLineString {
    r#type: String,
    coordinates: Vec<[f64; 2]>, // [lon, lat] standard for GeoJSON
}

#[derive(Debug, Serialize)]
pub struct SpotBody {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub severity: f64,
    pub level: CongestionLevel,
}

#[derive(Debug, Serialize)]
pub struct LocationBody {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub neighbors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LocationsResponse {
    pub locations: Vec<LocationBody>,
}

#[derive(Debug, Serialize)]
pub struct CongestionResponse {
    pub spots: Vec<SpotBody>,
}

#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub lat: f64,
    pub lon: f64,
}

impl From<&PlannedRoute> for RouteBody {
    fn from(planned: &PlannedRoute) -> Self {
        let route = &planned.route;
        RouteBody {
            stops: route.stops.clone(),
            reachable: route.is_reachable(),
            cost: route.is_reachable().then_some(route.cost),
            distance_km: route.distance_km,
            length_km: planned.polyline.length_km(),
            visited_order: route.visited_order.clone(),
            geometry: GeoJsonLineString {
                r#type: "LineString".to_string(),
                coordinates: planned.polyline.lon_lat(),
            },
        }
    }
}

impl From<&CongestionSpot> for SpotBody {
    fn from(spot: &CongestionSpot) -> Self {
        SpotBody {
            name: spot.name.clone(),
            lat: spot.coordinate.lat,
            lon: spot.coordinate.lon,
            severity: spot.severity,
            level: spot.level(),
        }
    }
}

fn location_body(network: &RoadNetwork, loc: &Location) -> LocationBody {
    LocationBody {
        name: loc.name.clone(),
        lat: loc.coordinate.lat,
        lon: loc.coordinate.lon,
        neighbors: network
            .neighbors_of(&loc.name)
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

// --- Handlers ---

async fn compute_routes(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RoutesRequest>, JsonRejection>,
) -> Result<Json<RoutesResponse>, ApiError> {
    let Json(payload) = payload?;
    let set = state
        .engine
        .compute_routes(&payload.origin, &payload.destination)?;

    Ok(Json(RoutesResponse {
        shortest: RouteBody::from(&set.shortest),
        rerouted: RouteBody::from(&set.rerouted),
        congestion_spots: set.congestion_spots.iter().map(SpotBody::from).collect(),
    }))
}

async fn list_locations(State(state): State<Arc<AppState>>) -> Json<LocationsResponse> {
    let network = state.engine.network();
    let locations = network
        .locations()
        .map(|loc| location_body(network, loc))
        .collect();
    Json(LocationsResponse { locations })
}

async fn nearest_location(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<LocationBody>, ApiError> {
    let network = state.engine.network();
    let loc = network
        .nearest_location(Coordinate::new(query.lat, query.lon))
        .ok_or_else(|| ApiError::NotFound("network has no locations".to_string()))?;

    Ok(Json(location_body(network, loc)))
}

async fn list_congestion(State(state): State<Arc<AppState>>) -> Json<CongestionResponse> {
    let spots = state
        .engine
        .congestion()
        .spots()
        .iter()
        .map(SpotBody::from)
        .collect();
    Json(CongestionResponse { spots })
}
