use serde::Serialize;
use tracing::{info, warn};

use crate::config::NetworkConfig;
use crate::congestion::{CongestionModel, CongestionSpot};
use crate::distance::Coordinate;
use crate::error::{ConfigResult, RoutingError};
use crate::graph::RoadNetwork;
use crate::materialize::{materialize, Polyline};
use crate::search::{find_route, Route, SearchMode};

/// Immutable snapshot of the network and its congestion.
///
/// Both search modes always run against the same snapshot, so their results
/// are directly comparable. Safe to share across threads.
#[derive(Debug, Clone)]
pub struct RoutingEngine {
    network: RoadNetwork,
    congestion: CongestionModel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRoute {
    pub route: Route,
    pub polyline: Polyline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSet {
    pub shortest: PlannedRoute,
    pub rerouted: PlannedRoute,
    pub congestion_spots: Vec<CongestionSpot>,
}

impl RoutingEngine {
    pub fn new(network: RoadNetwork, congestion: CongestionModel) -> Self {
        Self {
            network,
            congestion,
        }
    }

    pub fn from_config(config: &NetworkConfig) -> ConfigResult<Self> {
        let network = RoadNetwork::from_config(config)?;
        let spots = config
            .congestion_spots
            .iter()
            .map(|s| CongestionSpot {
                name: s.name.clone(),
                coordinate: Coordinate::new(s.lat, s.lon),
                severity: s.severity,
            })
            .collect();
        let congestion = CongestionModel::new(spots, config.params)?;
        info!("Loaded {} congestion spots", congestion.spots().len());
        Ok(Self::new(network, congestion))
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn congestion(&self) -> &CongestionModel {
        &self.congestion
    }

    pub fn shortest_path(&self, origin: &str, destination: &str) -> Result<Route, RoutingError> {
        find_route(
            &self.network,
            &self.congestion,
            origin,
            destination,
            SearchMode::Shortest,
        )
    }

    pub fn rerouted_path(&self, origin: &str, destination: &str) -> Result<Route, RoutingError> {
        find_route(
            &self.network,
            &self.congestion,
            origin,
            destination,
            SearchMode::AvoidTraffic,
        )
    }

    pub fn materialize(&self, route: &Route) -> Result<Polyline, RoutingError> {
        materialize(&self.network, &route.stops)
    }

    /// Both routes between two named locations, ready to draw.
    pub fn compute_routes(&self, origin: &str, destination: &str) -> Result<RouteSet, RoutingError> {
        let shortest = self.plan(origin, destination, SearchMode::Shortest)?;
        let rerouted = self.plan(origin, destination, SearchMode::AvoidTraffic)?;

        info!(
            origin,
            destination,
            shortest = shortest.route.len(),
            rerouted = rerouted.route.len(),
            "computed routes"
        );

        Ok(RouteSet {
            shortest,
            rerouted,
            congestion_spots: self.congestion.spots().to_vec(),
        })
    }

    fn plan(&self, origin: &str, destination: &str, mode: SearchMode) -> Result<PlannedRoute, RoutingError> {
        let route = find_route(&self.network, &self.congestion, origin, destination, mode)?;
        if !route.is_reachable() {
            warn!(origin, destination, ?mode, "destination unreachable");
        }
        let polyline = self.materialize(&route)?;
        Ok(PlannedRoute { route, polyline })
    }
}
