use geo::{HaversineLength, LineString};
use itertools::Itertools;
use serde::Serialize;

use crate::distance::Coordinate;
use crate::error::RoutingError;
use crate::graph::RoadNetwork;

/// Drawable coordinate sequence for a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Polyline(Vec<Coordinate>);

impl Polyline {
    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Coordinate> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<Coordinate> {
        self.0.last().copied()
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        self.0.iter().map(|&c| geo::Coord::from(c)).collect()
    }

    /// Drawn length along the road shapes, in kilometres.
    pub fn length_km(&self) -> f64 {
        self.to_line_string().haversine_length() / 1000.0
    }

    /// `[lon, lat]` pairs, GeoJSON order.
    pub fn lon_lat(&self) -> Vec<[f64; 2]> {
        self.0.iter().map(|c| [c.lon, c.lat]).collect()
    }
}

impl From<Vec<Coordinate>> for Polyline {
    fn from(points: Vec<Coordinate>) -> Self {
        Self(points)
    }
}

/// Expands a sequence of location names into road coordinates.
///
/// Each hop uses the network's road geometry for that pair; every hop after
/// the first drops its leading point, which repeats the previous hop's end.
/// A point equal to the one before it is never emitted, so co-located stops
/// collapse to a single point.
pub fn materialize<S: AsRef<str>>(
    network: &RoadNetwork,
    stops: &[S],
) -> Result<Polyline, RoutingError> {
    let nodes = stops
        .iter()
        .map(|s| network.index_of(s.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut points = Vec::new();
    match nodes.as_slice() {
        [] => {}
        [only] => points.push(network.location(*only).coordinate),
        _ => {
            for (i, (&from, &to)) in nodes.iter().tuple_windows().enumerate() {
                let segment = network.geometry_between(from, to);
                let skip = usize::from(i > 0);
                for p in segment.into_iter().skip(skip) {
                    if points.last() != Some(&p) {
                        points.push(p);
                    }
                }
            }
        }
    }

    Ok(Polyline(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference;

    fn bangalore() -> RoadNetwork {
        RoadNetwork::from_config(reference::bangalore()).unwrap()
    }

    const INDIRANAGAR: Coordinate = Coordinate::new(12.9716, 77.6402);
    const JAYANAGAR: Coordinate = Coordinate::new(12.9308, 77.5838);

    #[test]
    fn empty_route_is_empty_polyline() {
        let net = bangalore();
        let line = materialize::<&str>(&net, &[]).unwrap();
        assert!(line.is_empty());
        assert_eq!(line.length_km(), 0.0);
    }

    #[test]
    fn single_stop_is_single_point() {
        let net = bangalore();
        let line = materialize(&net, &["Whitefield"]).unwrap();
        assert_eq!(line.points(), &[Coordinate::new(12.9698, 77.7500)]);
    }

    #[test]
    fn joins_segments_without_repeating_the_seam() {
        let net = bangalore();
        let line = materialize(&net, &["Indiranagar", "Koramangala", "Jayanagar"]).unwrap();
        // 5 + 5 points, shared seam counted once
        assert_eq!(line.len(), 9);
        assert_eq!(line.first(), Some(INDIRANAGAR));
        assert_eq!(line.last(), Some(JAYANAGAR));
        for (a, b) in line.points().iter().tuple_windows() {
            assert_ne!(a, b);
        }
    }

    #[test]
    fn reverse_travel_starts_at_origin() {
        let net = bangalore();
        let line = materialize(&net, &["Jayanagar", "Koramangala", "Indiranagar"]).unwrap();
        assert_eq!(line.first(), Some(JAYANAGAR));
        assert_eq!(line.last(), Some(INDIRANAGAR));
        assert_eq!(line.len(), 9);
    }

    #[test]
    fn direct_segment_when_no_geometry() {
        let net = bangalore();
        let line = materialize(&net, &["Indiranagar", "M.G. Road", "Bangalore City H.O."]).unwrap();
        // 4 points of the stored road, then the bare endpoint
        assert_eq!(line.len(), 5);
        assert_eq!(line.last(), Some(Coordinate::new(12.9724, 77.5806)));
    }

    #[test]
    fn co_located_stops_do_not_repeat_a_point() {
        let net = bangalore();
        let gpo = Coordinate::new(12.9724, 77.5806);

        let line =
            materialize(&net, &["Indiranagar", "Bangalore City H.O.", "Bangalore G.P.O."]).unwrap();
        assert_eq!(line.len(), 4);
        assert_eq!(line.last(), Some(gpo));
        for (a, b) in line.points().iter().tuple_windows() {
            assert_ne!(a, b);
        }

        let hop = materialize(&net, &["Bangalore City H.O.", "Bangalore G.P.O."]).unwrap();
        assert_eq!(hop.points(), &[gpo]);
    }

    #[test]
    fn unknown_stop_fails() {
        let net = bangalore();
        assert_eq!(
            materialize(&net, &["Indiranagar", "Atlantis"]),
            Err(RoutingError::UnknownLocation("Atlantis".into()))
        );
    }

    #[test]
    fn length_tracks_road_shape() {
        let net = bangalore();
        let line = materialize(&net, &["Indiranagar", "M.G. Road"]).unwrap();
        // straight along one parallel, so close to the great-circle hop
        let direct = INDIRANAGAR.distance_km(Coordinate::new(12.9716, 77.5946));
        assert!((line.length_km() - direct).abs() < 0.05);
        assert_eq!(line.lon_lat()[0], [77.6402, 12.9716]);
    }
}
