use serde::{Deserialize, Serialize};

/// Mean Earth radius used by every distance in the engine.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(self, other: Coordinate) -> f64 {
        haversine_km(self, other)
    }
}

impl From<Coordinate> for geo::Coord<f64> {
    // geo is x = lon, y = lat
    fn from(c: Coordinate) -> Self {
        geo::Coord { x: c.lon, y: c.lat }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// Haversine distance between two coordinates, in kilometres.
///
/// Total over finite inputs; NaN in gives NaN out.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDIRANAGAR: Coordinate = Coordinate::new(12.9716, 77.6402);
    const MG_ROAD: Coordinate = Coordinate::new(12.9716, 77.5946);

    #[test]
    fn zero_for_identical_points() {
        assert_eq!(haversine_km(INDIRANAGAR, INDIRANAGAR), 0.0);
    }

    #[test]
    fn symmetric() {
        let ab = haversine_km(INDIRANAGAR, MG_ROAD);
        let ba = haversine_km(MG_ROAD, INDIRANAGAR);
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn indiranagar_to_mg_road() {
        // same latitude, 0.0456 degrees of longitude apart
        let d = haversine_km(INDIRANAGAR, MG_ROAD);
        assert!((d - 4.941).abs() < 0.01, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn geo_coord_swaps_axes() {
        let c: geo::Coord<f64> = INDIRANAGAR.into();
        assert_eq!(c.x, 77.6402);
        assert_eq!(c.y, 12.9716);
    }
}
