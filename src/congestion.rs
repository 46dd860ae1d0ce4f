use serde::{Deserialize, Serialize};

use crate::distance::{haversine_km, Coordinate};
use crate::error::{ConfigError, ConfigResult};

/// Spots farther than this contribute no penalty.
pub const INFLUENCE_RADIUS_KM: f64 = 1.0;
/// Locations this close to any spot cannot be entered by a rerouted search.
pub const BLOCK_RADIUS_KM: f64 = 0.1;
/// Multiplier applied to the proximity penalty when added to an edge cost.
pub const PENALTY_WEIGHT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CongestionParams {
    pub influence_radius_km: f64,
    pub block_radius_km: f64,
    pub penalty_weight: f64,
}

impl Default for CongestionParams {
    fn default() -> Self {
        Self {
            influence_radius_km: INFLUENCE_RADIUS_KM,
            block_radius_km: BLOCK_RADIUS_KM,
            penalty_weight: PENALTY_WEIGHT,
        }
    }
}

impl CongestionParams {
    pub fn validate(&self) -> ConfigResult<()> {
        let ok = |v: f64| v.is_finite() && v >= 0.0;
        if !ok(self.influence_radius_km) {
            return Err(ConfigError::InvalidParam("influence_radius_km"));
        }
        if !ok(self.block_radius_km) {
            return Err(ConfigError::InvalidParam("block_radius_km"));
        }
        if !ok(self.penalty_weight) {
            return Err(ConfigError::InvalidParam("penalty_weight"));
        }
        Ok(())
    }
}

/// 0.0 = free flowing, 1.0 = gridlock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CongestionSpot {
    pub name: String,
    pub coordinate: Coordinate,
    pub severity: f64,
}

impl CongestionSpot {
    pub fn level(&self) -> CongestionLevel {
        CongestionLevel::from_severity(self.severity)
    }
}

/// Display bucket for a spot's severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Light,
    Moderate,
    Severe,
}

impl CongestionLevel {
    pub fn from_severity(severity: f64) -> Self {
        if severity > 0.8 {
            CongestionLevel::Severe
        } else if severity > 0.5 {
            CongestionLevel::Moderate
        } else {
            CongestionLevel::Light
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CongestionModel {
    spots: Vec<CongestionSpot>,
    params: CongestionParams,
}

impl CongestionModel {
    pub fn new(spots: Vec<CongestionSpot>, params: CongestionParams) -> ConfigResult<Self> {
        params.validate()?;
        for spot in &spots {
            if !(0.0..=1.0).contains(&spot.severity) {
                return Err(ConfigError::InvalidSeverity {
                    name: spot.name.clone(),
                    severity: spot.severity,
                });
            }
            if !spot.coordinate.is_finite() {
                return Err(ConfigError::InvalidCoordinate(spot.name.clone()));
            }
        }
        Ok(Self { spots, params })
    }

    pub fn spots(&self) -> &[CongestionSpot] {
        &self.spots
    }

    pub fn params(&self) -> &CongestionParams {
        &self.params
    }

    /// True when some spot lies strictly within the block radius of `coord`.
    pub fn is_blocked(&self, coord: Coordinate) -> bool {
        self.spots
            .iter()
            .any(|spot| haversine_km(coord, spot.coordinate) < self.params.block_radius_km)
    }

    /// Strongest single-spot penalty at `coord`.
    ///
    /// Each spot within the influence radius scores
    /// `severity * (radius - distance)`; overlapping spots do not add up.
    pub fn penalty(&self, coord: Coordinate) -> f64 {
        let radius = self.params.influence_radius_km;
        self.spots
            .iter()
            .filter_map(|spot| {
                let d = haversine_km(coord, spot.coordinate);
                (d < radius).then(|| spot.severity * (radius - d))
            })
            .fold(0.0, f64::max)
    }

    /// Penalty scaled by the configured weight, ready to add to a distance.
    pub fn weighted_penalty(&self, coord: Coordinate) -> f64 {
        self.penalty(coord) * self.params.penalty_weight
    }
}
