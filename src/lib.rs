//! Traffic-aware routing over a small fixed network of named locations.
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`distance`]    | `Coordinate`, haversine distance                        |
//! | [`graph`]       | `RoadNetwork` and its builder                           |
//! | [`congestion`]  | congestion spots, proximity penalty, hard blocking      |
//! | [`search`]      | Dijkstra search in shortest / avoid-traffic modes       |
//! | [`materialize`] | route to drawable `Polyline`                            |
//! | [`engine`]      | `RoutingEngine::compute_routes`                         |
//! | [`config`]      | network JSON and process settings                       |
//! | [`reference`]   | built-in Bangalore network                              |
//! | [`api`]         | axum HTTP surface                                       |

pub mod api;
pub mod config;
pub mod congestion;
pub mod distance;
pub mod engine;
pub mod error;
pub mod graph;
pub mod materialize;
pub mod reference;
pub mod search;

pub use congestion::{CongestionLevel, CongestionModel, CongestionParams, CongestionSpot};
pub use distance::{haversine_km, Coordinate};
pub use engine::{PlannedRoute, RouteSet, RoutingEngine};
pub use error::{ConfigError, RoutingError};
pub use graph::{Location, RoadNetwork, RoadNetworkBuilder};
pub use materialize::{materialize, Polyline};
pub use search::{find_route, Route, SearchMode};
