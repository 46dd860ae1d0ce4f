use std::collections::HashMap;

use petgraph::graph::{Graph, NodeIndex};
use tracing::info;

use crate::config::NetworkConfig;
use crate::distance::{haversine_km, Coordinate};
use crate::error::{ConfigError, ConfigResult, RoutingError};

/// How far a road geometry's first/last point may sit from its location.
pub const GEOMETRY_ENDPOINT_TOLERANCE_KM: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub coordinate: Coordinate,
}

/// Static network of named locations.
///
/// Edges are directed and unweighted; costs are computed on demand from
/// coordinates. Road geometries are keyed by ordered location pair and looked
/// up in either orientation.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    graph: Graph<Location, ()>,
    index: HashMap<String, NodeIndex>,
    geometries: HashMap<(NodeIndex, NodeIndex), Vec<Coordinate>>,
}

impl RoadNetwork {
    pub fn from_config(config: &NetworkConfig) -> ConfigResult<Self> {
        let mut builder = RoadNetworkBuilder::new();

        for loc in &config.locations {
            builder.add_location(loc.name.clone(), Coordinate::new(loc.lat, loc.lon))?;
        }
        for (from, neighbors) in &config.adjacency {
            for to in neighbors {
                builder.connect(from, to)?;
            }
        }
        for road in &config.road_geometries {
            builder.add_road_geometry(&road.from, &road.to, road.points.clone())?;
        }

        let network = builder.build();
        info!(
            "Network built: {} locations, {} links, {} road geometries",
            network.location_count(),
            network.edge_count(),
            network.geometries.len()
        );
        Ok(network)
    }

    pub fn location_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Locations in definition order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Result<NodeIndex, RoutingError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| RoutingError::UnknownLocation(name.to_string()))
    }

    pub fn location(&self, idx: NodeIndex) -> &Location {
        &self.graph[idx]
    }

    pub fn coordinate_of(&self, name: &str) -> Result<Coordinate, RoutingError> {
        self.index_of(name).map(|idx| self.graph[idx].coordinate)
    }

    /// Outgoing neighbors of `name`. Unknown names simply have none.
    pub fn neighbors_of(&self, name: &str) -> Vec<&str> {
        match self.index.get(name) {
            Some(&idx) => self
                .neighbor_indices(idx)
                .map(|n| self.graph[n].name.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    pub(crate) fn neighbor_indices(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    /// Road shape from `a` to `b`.
    ///
    /// A geometry stored as (b, a) is returned reversed. Without any stored
    /// geometry the direct two-point segment is used.
    pub fn road_geometry_between(&self, a: &str, b: &str) -> Result<Vec<Coordinate>, RoutingError> {
        let from = self.index_of(a)?;
        let to = self.index_of(b)?;
        Ok(self.geometry_between(from, to))
    }

    pub(crate) fn geometry_between(&self, from: NodeIndex, to: NodeIndex) -> Vec<Coordinate> {
        if let Some(points) = self.geometries.get(&(from, to)) {
            return points.clone();
        }
        if let Some(points) = self.geometries.get(&(to, from)) {
            return points.iter().rev().copied().collect();
        }
        vec![self.graph[from].coordinate, self.graph[to].coordinate]
    }

    /// Closest named location to `target`, or `None` on an empty network.
    pub fn nearest_location(&self, target: Coordinate) -> Option<&Location> {
        self.locations().min_by(|a, b| {
            let da = haversine_km(a.coordinate, target);
            let db = haversine_km(b.coordinate, target);
            da.total_cmp(&db)
        })
    }
}

#[derive(Debug, Default)]
pub struct RoadNetworkBuilder {
    graph: Graph<Location, ()>,
    index: HashMap<String, NodeIndex>,
    geometries: HashMap<(NodeIndex, NodeIndex), Vec<Coordinate>>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_location(
        &mut self,
        name: impl Into<String>,
        coordinate: Coordinate,
    ) -> ConfigResult<NodeIndex> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(ConfigError::DuplicateLocation(name));
        }
        if !coordinate.is_finite() {
            return Err(ConfigError::InvalidCoordinate(name));
        }
        let idx = self.graph.add_node(Location {
            name: name.clone(),
            coordinate,
        });
        self.index.insert(name, idx);
        Ok(idx)
    }

    /// One-way link `from -> to`. Repeating a link is a no-op.
    pub fn connect(&mut self, from: &str, to: &str) -> ConfigResult<()> {
        let a = self.lookup("adjacency", from)?;
        let b = self.lookup("adjacency", to)?;
        self.graph.update_edge(a, b, ());
        Ok(())
    }

    pub fn connect_both(&mut self, a: &str, b: &str) -> ConfigResult<()> {
        self.connect(a, b)?;
        self.connect(b, a)
    }

    pub fn add_road_geometry(
        &mut self,
        from: &str,
        to: &str,
        points: Vec<Coordinate>,
    ) -> ConfigResult<()> {
        let a = self.lookup("road geometry", from)?;
        let b = self.lookup("road geometry", to)?;

        let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
            return Err(self.degenerate(from, to, points.len()));
        };
        if points.len() < 2 {
            return Err(self.degenerate(from, to, points.len()));
        }

        for (endpoint, idx) in [(first, a), (last, b)] {
            let location = &self.graph[idx];
            let offset_km = haversine_km(endpoint, location.coordinate);
            if offset_km > GEOMETRY_ENDPOINT_TOLERANCE_KM {
                return Err(ConfigError::GeometryEndpointMismatch {
                    from: from.to_string(),
                    to: to.to_string(),
                    location: location.name.clone(),
                    offset_km,
                });
            }
        }

        self.geometries.insert((a, b), points);
        Ok(())
    }

    pub fn build(self) -> RoadNetwork {
        RoadNetwork {
            graph: self.graph,
            index: self.index,
            geometries: self.geometries,
        }
    }

    fn lookup(&self, context: &'static str, name: &str) -> ConfigResult<NodeIndex> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownLocation {
                context,
                name: name.to_string(),
            })
    }

    fn degenerate(&self, from: &str, to: &str, points: usize) -> ConfigError {
        ConfigError::DegenerateGeometry {
            from: from.to_string(),
            to: to.to_string(),
            points,
        }
    }
}
