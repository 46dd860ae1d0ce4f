//! Built-in Bangalore network used when no network file is configured.

use lazy_static::lazy_static;

use crate::config::{CongestionSpotEntry, LocationEntry, NetworkConfig, RoadGeometryEntry};
use crate::congestion::CongestionParams;
use crate::distance::Coordinate;

const LOCATIONS: &[(&str, f64, f64)] = &[
    ("Indiranagar", 12.9716, 77.6402),
    ("Koramangala", 12.9352, 77.6245),
    ("Jayanagar", 12.9308, 77.5838),
    ("Banashankari", 12.9255, 77.5468),
    ("M.G. Road", 12.9716, 77.5946),
    ("Whitefield", 12.9698, 77.7500),
    ("Bangalore City H.O.", 12.9724, 77.5806),
    ("Bangalore G.P.O.", 12.9724, 77.5806),
    ("Marathahalli", 12.9586, 77.7010),
    ("Electronic City", 12.8456, 77.6603),
];

const ADJACENCY: &[(&str, &[&str])] = &[
    ("Indiranagar", &["Koramangala", "M.G. Road", "Whitefield", "Bangalore City H.O."]),
    ("Koramangala", &["Indiranagar", "Jayanagar"]),
    ("Jayanagar", &["Koramangala", "Banashankari", "M.G. Road"]),
    ("Banashankari", &["Jayanagar"]),
    ("M.G. Road", &["Indiranagar", "Jayanagar", "Bangalore City H.O."]),
    ("Whitefield", &["Indiranagar", "Marathahalli"]),
    ("Marathahalli", &["Whitefield", "Electronic City"]),
    ("Electronic City", &["Marathahalli"]),
    ("Bangalore City H.O.", &["M.G. Road", "Bangalore G.P.O.", "Indiranagar"]),
    ("Bangalore G.P.O.", &["Bangalore City H.O."]),
];

const ROADS: &[(&str, &str, &[(f64, f64)])] = &[
    (
        "Indiranagar",
        "Koramangala",
        &[(12.9716, 77.6402), (12.9680, 77.6350), (12.9620, 77.6300), (12.9550, 77.6270), (12.9352, 77.6245)],
    ),
    (
        "Koramangala",
        "Jayanagar",
        &[(12.9352, 77.6245), (12.9330, 77.6200), (12.9310, 77.6150), (12.9308, 77.6100), (12.9308, 77.5838)],
    ),
    (
        "Indiranagar",
        "M.G. Road",
        &[(12.9716, 77.6402), (12.9716, 77.6200), (12.9716, 77.6000), (12.9716, 77.5946)],
    ),
    (
        "M.G. Road",
        "Jayanagar",
        &[(12.9716, 77.5946), (12.9600, 77.5900), (12.9450, 77.5850), (12.9308, 77.5838)],
    ),
    (
        "Jayanagar",
        "Banashankari",
        &[(12.9308, 77.5838), (12.9280, 77.5700), (12.9255, 77.5600), (12.9255, 77.5468)],
    ),
    (
        "Indiranagar",
        "Whitefield",
        &[(12.9716, 77.6402), (12.9700, 77.6800), (12.9698, 77.7200), (12.9698, 77.7500)],
    ),
    (
        "Whitefield",
        "Marathahalli",
        &[(12.9698, 77.7500), (12.9650, 77.7300), (12.9600, 77.7100), (12.9586, 77.7010)],
    ),
    (
        "Marathahalli",
        "Electronic City",
        &[(12.9586, 77.7010), (12.9200, 77.6800), (12.8800, 77.6700), (12.8456, 77.6603)],
    ),
    (
        "Indiranagar",
        "Bangalore City H.O.",
        &[(12.9716, 77.6402), (12.9720, 77.6200), (12.9724, 77.6000), (12.9724, 77.5806)],
    ),
    (
        "Bangalore City H.O.",
        "Bangalore G.P.O.",
        &[(12.9724, 77.5806), (12.9724, 77.5806)],
    ),
];

const SPOTS: &[(&str, f64, f64, f64)] = &[
    ("Koramangala Traffic", 12.9352, 77.6245, 0.8),
    ("M.G. Road Junction", 12.9716, 77.5946, 0.6),
    ("Marathahalli Bridge", 12.9586, 77.7010, 0.9),
    ("Electronic City", 12.8456, 77.6603, 0.7),
];

lazy_static! {
    static ref BANGALORE: NetworkConfig = build();
}

/// The reference configuration, built once per process.
pub fn bangalore() -> &'static NetworkConfig {
    &BANGALORE
}

fn build() -> NetworkConfig {
    NetworkConfig {
        locations: LOCATIONS
            .iter()
            .map(|&(name, lat, lon)| LocationEntry {
                name: name.to_string(),
                lat,
                lon,
            })
            .collect(),
        adjacency: ADJACENCY
            .iter()
            .map(|&(from, to)| (from.to_string(), to.iter().map(|s| s.to_string()).collect()))
            .collect(),
        road_geometries: ROADS
            .iter()
            .map(|&(from, to, points)| RoadGeometryEntry {
                from: from.to_string(),
                to: to.to_string(),
                points: points.iter().map(|&(lat, lon)| Coordinate::new(lat, lon)).collect(),
            })
            .collect(),
        congestion_spots: SPOTS
            .iter()
            .map(|&(name, lat, lon, severity)| CongestionSpotEntry {
                name: name.to_string(),
                lat,
                lon,
                severity,
            })
            .collect(),
        params: CongestionParams::default(),
    }
}
