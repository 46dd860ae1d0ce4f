use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::congestion::CongestionParams;
use crate::distance::Coordinate;
use crate::error::ConfigResult;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

// --- Network data ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadGeometryEntry {
    pub from: String,
    pub to: String,
    pub points: Vec<Coordinate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CongestionSpotEntry {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub severity: f64,
}

/// Locations, links, road shapes and congestion spots the engine is built from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub locations: Vec<LocationEntry>,
    /// Directed neighbor lists keyed by location name.
    #[serde(default)]
    pub adjacency: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub road_geometries: Vec<RoadGeometryEntry>,
    #[serde(default)]
    pub congestion_spots: Vec<CongestionSpotEntry>,
    #[serde(default)]
    pub params: CongestionParams,
}

impl NetworkConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

// --- Process settings ---

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// JSON network file; the built-in reference network when unset.
    pub network_path: Option<PathBuf>,
    pub log_level: Level,
}

impl ServerConfig {
    /// Reads `./.env.local` if present, then the `REROUTE_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::from_filename("./.env.local").ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let addr = lookup("REROUTE_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse::<SocketAddr>()
            .with_context(|| format!("REROUTE_ADDR is not a socket address: {addr}"))?;

        let network_path = lookup("REROUTE_NETWORK")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let log_level = match lookup("REROUTE_LOG_LEVEL") {
            Some(level) => level
                .parse::<Level>()
                .with_context(|| format!("REROUTE_LOG_LEVEL is not a log level: {level}"))?,
            None => Level::INFO,
        };

        Ok(Self {
            addr,
            network_path,
            log_level,
        })
    }
}
