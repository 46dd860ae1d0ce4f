//! Dijkstra search over a [`RoadNetwork`], with an optional traffic-avoidance
//! mode that hard-excludes congested locations and penalizes those nearby.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use itertools::Itertools;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::debug;

use crate::congestion::CongestionModel;
use crate::distance::haversine_km;
use crate::error::RoutingError;
use crate::graph::RoadNetwork;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Pure great-circle distance.
    Shortest,
    /// Skip blocked locations, add weighted congestion penalty to the rest.
    AvoidTraffic,
}

impl SearchMode {
    pub fn avoids_traffic(self) -> bool {
        matches!(self, SearchMode::AvoidTraffic)
    }
}

/// Result of one search. An empty `stops` list means the destination was
/// unreachable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub stops: Vec<String>,
    /// Search cost: kilometres plus any weighted congestion penalty.
    pub cost: f64,
    /// Great-circle length over consecutive stops, ignoring penalties.
    pub distance_km: f64,
    /// Locations in the order the search settled them.
    pub visited_order: Vec<String>,
}

impl Route {
    pub fn is_reachable(&self) -> bool {
        !self.stops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

// Min-heap entry: lowest cost first, then insertion order.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    cost: f64,
    seq: u64,
    node: NodeIndex,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Per-invocation bookkeeping, dropped when the search returns.
struct SearchState {
    cost: Vec<f64>,
    prev: Vec<Option<NodeIndex>>,
    visited: Vec<bool>,
    frontier: BinaryHeap<FrontierEntry>,
    settled: Vec<NodeIndex>,
    seq: u64,
}

impl SearchState {
    fn new(node_count: usize, source: NodeIndex) -> Self {
        let mut state = Self {
            cost: vec![f64::INFINITY; node_count],
            prev: vec![None; node_count],
            visited: vec![false; node_count],
            frontier: BinaryHeap::new(),
            settled: Vec::new(),
            seq: 0,
        };
        state.cost[source.index()] = 0.0;
        state.push(source, 0.0);
        state
    }

    fn push(&mut self, node: NodeIndex, cost: f64) {
        self.frontier.push(FrontierEntry {
            cost,
            seq: self.seq,
            node,
        });
        self.seq += 1;
    }

    fn relax(&mut self, from: NodeIndex, to: NodeIndex, tentative: f64) {
        if tentative < self.cost[to.index()] {
            self.cost[to.index()] = tentative;
            self.prev[to.index()] = Some(from);
            self.push(to, tentative);
        }
    }
}

/// Least-cost route from `origin` to `destination` under `mode`.
///
/// Fails only on unknown location names; an unreachable destination yields a
/// route with no stops.
pub fn find_route(
    network: &RoadNetwork,
    congestion: &CongestionModel,
    origin: &str,
    destination: &str,
    mode: SearchMode,
) -> Result<Route, RoutingError> {
    let source = network.index_of(origin)?;
    let target = network.index_of(destination)?;

    let mut state = SearchState::new(network.location_count(), source);

    while let Some(FrontierEntry { cost, node, .. }) = state.frontier.pop() {
        if state.visited[node.index()] {
            continue;
        }
        state.visited[node.index()] = true;
        state.settled.push(node);

        if node == target {
            break;
        }

        let here = network.location(node).coordinate;
        for next in network.neighbor_indices(node) {
            if state.visited[next.index()] {
                continue;
            }
            let there = network.location(next).coordinate;

            let mut step = haversine_km(here, there);
            if mode.avoids_traffic() {
                // hard filter, no state is recorded for blocked locations
                if congestion.is_blocked(there) {
                    continue;
                }
                step += congestion.weighted_penalty(there);
            }

            state.relax(node, next, cost + step);
        }
    }

    let visited_order = names(network, &state.settled);
    let total = state.cost[target.index()];

    if !total.is_finite() {
        debug!(origin, destination, ?mode, settled = state.settled.len(), "no route found");
        return Ok(Route {
            stops: Vec::new(),
            cost: f64::INFINITY,
            distance_km: 0.0,
            visited_order,
        });
    }

    let path = reconstruct(&state.prev, source, target);
    let distance_km: f64 = path
        .iter()
        .tuple_windows()
        .map(|(&a, &b)| haversine_km(network.location(a).coordinate, network.location(b).coordinate))
        .sum();

    debug!(
        origin,
        destination,
        ?mode,
        stops = path.len(),
        cost = total,
        settled = state.settled.len(),
        "route found"
    );

    Ok(Route {
        stops: names(network, &path),
        cost: total,
        distance_km,
        visited_order,
    })
}

fn reconstruct(prev: &[Option<NodeIndex>], source: NodeIndex, target: NodeIndex) -> Vec<NodeIndex> {
    let mut path = vec![target];
    let mut cur = target;
    while cur != source {
        match prev[cur.index()] {
            Some(p) => {
                path.push(p);
                cur = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

fn names(network: &RoadNetwork, nodes: &[NodeIndex]) -> Vec<String> {
    nodes
        .iter()
        .map(|&n| network.location(n).name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::congestion::{CongestionParams, CongestionSpot};
    use crate::distance::Coordinate;
    use crate::graph::RoadNetworkBuilder;

    /// Diamond around the equator, roughly 1.5 km per side:
    ///
    /// ```text
    ///        north
    ///       /     \
    ///   west       east
    ///       \     /
    ///        south
    /// ```
    ///
    /// The northern arm is slightly shorter than the southern one.
    fn diamond() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        b.add_location("west", Coordinate::new(0.0, 0.0)).unwrap();
        b.add_location("north", Coordinate::new(0.009, 0.01)).unwrap();
        b.add_location("south", Coordinate::new(-0.011, 0.01)).unwrap();
        b.add_location("east", Coordinate::new(0.0, 0.02)).unwrap();
        b.add_location("island", Coordinate::new(0.05, 0.05)).unwrap();
        b.connect_both("west", "north").unwrap();
        b.connect_both("north", "east").unwrap();
        b.connect_both("west", "south").unwrap();
        b.connect_both("south", "east").unwrap();
        b.build()
    }

    fn spots(list: &[(f64, f64, f64)]) -> CongestionModel {
        let spots = list
            .iter()
            .enumerate()
            .map(|(i, &(lat, lon, severity))| CongestionSpot {
                name: format!("spot-{i}"),
                coordinate: Coordinate::new(lat, lon),
                severity,
            })
            .collect();
        CongestionModel::new(spots, CongestionParams::default()).unwrap()
    }

    #[test]
    fn shortest_takes_northern_arm() {
        let net = diamond();
        let route = find_route(&net, &spots(&[]), "west", "east", SearchMode::Shortest).unwrap();
        assert_eq!(route.stops, vec!["west", "north", "east"]);
        assert!((route.cost - route.distance_km).abs() < 1e-9);
        assert_eq!(route.visited_order.first().map(String::as_str), Some("west"));
        assert_eq!(route.visited_order.last().map(String::as_str), Some("east"));
    }

    #[test]
    fn penalty_pushes_route_south() {
        let net = diamond();
        // ~0.5 km east of "north": penalized but not blocked
        let congestion = spots(&[(0.009, 0.0145, 1.0)]);

        let shortest = find_route(&net, &congestion, "west", "east", SearchMode::Shortest).unwrap();
        let rerouted = find_route(&net, &congestion, "west", "east", SearchMode::AvoidTraffic).unwrap();

        assert_eq!(shortest.stops, vec!["west", "north", "east"]);
        assert_eq!(rerouted.stops, vec!["west", "south", "east"]);
        assert!(rerouted.distance_km >= shortest.distance_km);
        assert!(rerouted.cost > rerouted.distance_km - 1e-9);
    }

    #[test]
    fn blocked_location_is_never_entered() {
        let net = diamond();
        let congestion = spots(&[(0.009, 0.01, 0.1)]);
        let rerouted = find_route(&net, &congestion, "west", "east", SearchMode::AvoidTraffic).unwrap();
        assert_eq!(rerouted.stops, vec!["west", "south", "east"]);
        assert!(!rerouted.visited_order.iter().any(|s| s == "north"));
    }

    #[test]
    fn every_detour_blocked_is_unreachable() {
        let net = diamond();
        let congestion = spots(&[(0.009, 0.01, 0.5), (-0.011, 0.01, 0.5)]);
        let rerouted = find_route(&net, &congestion, "west", "east", SearchMode::AvoidTraffic).unwrap();
        assert!(!rerouted.is_reachable());
        assert_eq!(rerouted.visited_order, vec!["west"]);

        // the unconstrained search is unaffected
        let shortest = find_route(&net, &congestion, "west", "east", SearchMode::Shortest).unwrap();
        assert!(shortest.is_reachable());
    }

    #[test]
    fn blocked_destination_is_unreachable_when_avoiding() {
        let net = diamond();
        let congestion = spots(&[(0.0, 0.02, 0.3)]);
        let rerouted = find_route(&net, &congestion, "west", "east", SearchMode::AvoidTraffic).unwrap();
        assert!(rerouted.is_empty());
    }

    #[test]
    fn isolated_destination_is_unreachable_in_both_modes() {
        let net = diamond();
        let congestion = spots(&[]);
        for mode in [SearchMode::Shortest, SearchMode::AvoidTraffic] {
            let route = find_route(&net, &congestion, "west", "island", mode).unwrap();
            assert!(route.stops.is_empty());
            assert_eq!(route.distance_km, 0.0);
        }
    }

    #[test]
    fn origin_equals_destination() {
        let net = diamond();
        for mode in [SearchMode::Shortest, SearchMode::AvoidTraffic] {
            let route = find_route(&net, &spots(&[]), "north", "north", mode).unwrap();
            assert_eq!(route.stops, vec!["north"]);
            assert_eq!(route.cost, 0.0);
            assert_eq!(route.visited_order, vec!["north"]);
        }
    }

    #[test]
    fn unknown_names_fail() {
        let net = diamond();
        let c = spots(&[]);
        assert_eq!(
            find_route(&net, &c, "nowhere", "east", SearchMode::Shortest),
            Err(RoutingError::UnknownLocation("nowhere".into()))
        );
        assert_eq!(
            find_route(&net, &c, "west", "nowhere", SearchMode::AvoidTraffic),
            Err(RoutingError::UnknownLocation("nowhere".into()))
        );
    }

    #[test]
    fn one_way_links_are_respected() {
        let mut b = RoadNetworkBuilder::new();
        b.add_location("a", Coordinate::new(0.0, 0.0)).unwrap();
        b.add_location("b", Coordinate::new(0.0, 0.01)).unwrap();
        b.connect("a", "b").unwrap();
        let net = b.build();
        let c = spots(&[]);
        assert!(find_route(&net, &c, "a", "b", SearchMode::Shortest).unwrap().is_reachable());
        assert!(!find_route(&net, &c, "b", "a", SearchMode::Shortest).unwrap().is_reachable());
    }

    #[test]
    fn frontier_pops_lowest_cost_then_fifo() {
        let mut heap = BinaryHeap::new();
        let n = NodeIndex::new;
        heap.push(FrontierEntry { cost: 2.0, seq: 0, node: n(0) });
        heap.push(FrontierEntry { cost: 1.0, seq: 1, node: n(1) });
        heap.push(FrontierEntry { cost: 1.0, seq: 2, node: n(2) });
        let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|e| e.node.index()).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }
}
